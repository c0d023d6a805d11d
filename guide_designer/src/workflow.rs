use std::sync::OnceLock;

use regex::Regex;
use sequence_retriever::SequenceSource;
use tracing::{info, warn};

use crate::errors::{DesignError, ValidationError};
use crate::models::{CrisprRequest, DesignRequest, Provenance, ScanResult};
use crate::scanner::{check_length, scan_sequence};
use crate::scoring::GuideScorer;

fn gene_symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("static regex"))
}

/// Turns the loose wire request into a [`DesignRequest`].
///
/// A non-empty sequence always wins over a gene symbol. Empty strings and
/// whitespace-only gene symbols count as absent.
pub fn parse_request(raw: CrisprRequest) -> Result<DesignRequest, ValidationError> {
    let sequence = raw.sequence.filter(|s| !s.is_empty());
    let gene = raw
        .gene
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty());

    match (sequence, gene) {
        (Some(sequence), _) => {
            let sequence = sequence.to_uppercase();
            check_length(&sequence)?;
            Ok(DesignRequest::Sequence(sequence))
        }
        (None, Some(symbol)) => {
            if !gene_symbol_pattern().is_match(&symbol) {
                return Err(ValidationError::InvalidGeneSymbol(symbol));
            }
            Ok(DesignRequest::Gene(symbol))
        }
        (None, None) => Err(ValidationError::missing_input()),
    }
}

/// Parses a JSON request body.
pub fn parse_request_body(body: &str) -> Result<DesignRequest, ValidationError> {
    let raw: CrisprRequest = if body.trim().is_empty() {
        CrisprRequest::default()
    } else {
        serde_json::from_str(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))?
    };
    parse_request(raw)
}

/// Resolves the sequence if needed, then scans it.
///
/// A resolution failure ends the request; nothing is scanned in that case.
pub fn design_guides(
    request: DesignRequest,
    source: &dyn SequenceSource,
    scorer: &mut dyn GuideScorer,
) -> Result<ScanResult, DesignError> {
    let (sequence, provenance) = match request {
        DesignRequest::Sequence(sequence) => (sequence, Provenance::Custom),
        DesignRequest::Gene(symbol) => {
            let sequence = source.coding_sequence(&symbol).map_err(|e| {
                warn!("Gene lookup for {} failed: {}", symbol, e);
                e
            })?;
            (sequence.to_uppercase(), Provenance::Gene(symbol))
        }
    };

    let guides = scan_sequence(&sequence, scorer)?;
    info!(
        "Designed {} guides from {} ({} bp)",
        guides.len(),
        provenance,
        sequence.chars().count()
    );
    Ok(ScanResult {
        guides,
        source: provenance,
        sequence,
    })
}
