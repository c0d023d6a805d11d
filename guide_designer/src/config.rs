use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use sequence_retriever::ENSEMBL_REST_URL;

use crate::scoring::{ScorerKind, ScoringSettings};

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// CRISPR guide RNA designer: NGG-anchored guide scan over a DNA sequence or
/// the coding sequence of a human gene.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the Ensembl REST service
    #[arg(long, env = "ENSEMBL_REST_URL", default_value = ENSEMBL_REST_URL, global = true)]
    pub ensembl_url: String,

    /// Guide scoring function
    #[arg(long, env = "GUIDE_SCORER", value_enum, default_value_t = ScorerKind::Random, global = true)]
    pub scorer: ScorerKind,

    /// Seed for the random scorer; makes scores reproducible
    #[arg(long, env = "GUIDE_SCORE_SEED", global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "GUIDE_DESIGNER_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Scan once and print the guides
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["sequence", "gene", "fasta"])))]
pub struct ScanArgs {
    /// Raw DNA sequence (>= 23 bp)
    #[arg(long)]
    pub sequence: Option<String>,

    /// Human gene symbol, e.g. TP53
    #[arg(long)]
    pub gene: Option<String>,

    /// FASTA file; the first record is scanned
    #[arg(long)]
    pub fasta: Option<PathBuf>,

    /// Also write the guides as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Cli {
    pub fn scoring(&self) -> ScoringSettings {
        ScoringSettings {
            kind: self.scorer,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["guide_designer", "serve"]).unwrap();
        match cli.command {
            Command::Serve { ref bind } => {
                // Only meaningful when the env override is unset.
                if std::env::var_os("GUIDE_DESIGNER_BIND").is_none() {
                    assert_eq!(bind, DEFAULT_BIND);
                }
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn scan_takes_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "guide_designer",
            "scan",
            "--gene",
            "TP53",
            "--scorer",
            "pssm",
            "--seed",
            "9",
        ])
        .unwrap();
        let scoring = cli.scoring();
        assert_eq!(scoring.kind, ScorerKind::Pssm);
        assert_eq!(scoring.seed, Some(9));
        match cli.command {
            Command::Scan(args) => assert_eq!(args.gene.as_deref(), Some("TP53")),
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn scan_needs_exactly_one_input() {
        assert!(Cli::try_parse_from(["guide_designer", "scan"]).is_err());
        assert!(Cli::try_parse_from([
            "guide_designer",
            "scan",
            "--gene",
            "TP53",
            "--sequence",
            "ACGT"
        ])
        .is_err());
    }
}
