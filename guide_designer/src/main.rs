use anyhow::Context;
use clap::Parser;
use sequence_retriever::EnsemblClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Command, ScanArgs};
use crate::export::write_guides_csv_file;
use crate::fasta::first_record_from_path;
use crate::models::CrisprRequest;
use crate::scoring::ScoringSettings;
use crate::server::GuideService;
use crate::workflow::{design_guides, parse_request};

mod config;
mod errors;
mod export;
mod fasta;
mod models;
mod scanner;
mod scoring;
mod sequence_map;
mod server;
mod workflow;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting the CRISPR guide designer");

    let client = EnsemblClient::new(&cli.ensembl_url)?;
    let scoring = cli.scoring();

    match cli.command {
        Command::Serve { bind } => server::serve(&GuideService::new(client, scoring), &bind),
        Command::Scan(args) => run_scan(args, &client, scoring),
    }
}

fn run_scan(args: ScanArgs, client: &EnsemblClient, scoring: ScoringSettings) -> anyhow::Result<()> {
    let raw = match args.fasta {
        Some(ref path) => CrisprRequest {
            sequence: Some(first_record_from_path(path)?.sequence),
            gene: None,
        },
        None => CrisprRequest {
            sequence: args.sequence,
            gene: args.gene,
        },
    };

    let request = parse_request(raw)?;
    let mut scorer = scoring.build();
    let result = design_guides(request, client, scorer.as_mut())?;

    if result.guides.is_empty() {
        warn!("No suitable gRNAs found.");
    } else {
        println!("Found {} gRNAs from source: {}", result.guides.len(), result.source);
        println!("{:>8}  {:<20}  {:<3}  {:>5}", "position", "gRNA", "PAM", "score");
        for guide in &result.guides {
            println!(
                "{:>8}  {:<20}  {:<3}  {:>5.3}",
                guide.position, guide.guide, guide.pam, guide.score
            );
        }
    }

    if let Some(path) = args.csv {
        write_guides_csv_file(&path, &result.guides)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
