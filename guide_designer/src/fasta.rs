use std::io::Cursor;
use std::path::Path;

use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};
use tracing::info;

use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub sequence: String,
}

/// First record of FASTA text, wrapped sequence lines joined.
pub fn first_record(text: &str) -> Result<FastaRecord, ValidationError> {
    let reader = parse_fastx_reader(Cursor::new(text.as_bytes().to_vec()))
        .map_err(|e| ValidationError::Fasta(e.to_string()))?;
    take_first(reader)
}

pub fn first_record_from_path(path: impl AsRef<Path>) -> Result<FastaRecord, ValidationError> {
    let path = path.as_ref();
    let reader = parse_fastx_file(path)
        .map_err(|e| ValidationError::Fasta(format!("{}: {}", path.display(), e)))?;
    take_first(reader)
}

fn take_first(mut reader: Box<dyn FastxReader + '_>) -> Result<FastaRecord, ValidationError> {
    let record = reader
        .next()
        .ok_or_else(|| ValidationError::Fasta("no records".to_string()))?
        .map_err(|e| ValidationError::Fasta(e.to_string()))?;

    let id = String::from_utf8_lossy(record.id()).into_owned();
    let sequence = String::from_utf8_lossy(&record.seq()).into_owned();
    info!("Loaded sequence from FASTA: {} ({} bp)", id, sequence.len());
    Ok(FastaRecord { id, sequence })
}
