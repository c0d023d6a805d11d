use sequence_retriever::ResolutionError;
use thiserror::Error;

use crate::scanner::MIN_SEQUENCE_LEN;

/// Bad or missing input; reported to the caller and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a valid DNA sequence of at least {min} bp (or a valid gene symbol).")]
    MissingInput { min: usize },

    #[error("Sequence is {len} bp long; at least {min} bp are required.")]
    TooShort { len: usize, min: usize },

    #[error("Invalid gene symbol '{0}'.")]
    InvalidGeneSymbol(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Could not read FASTA input: {0}")]
    Fasta(String),
}

impl ValidationError {
    pub fn missing_input() -> Self {
        ValidationError::MissingInput {
            min: MIN_SEQUENCE_LEN,
        }
    }
}

/// Terminal failure of a single design request.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Gene lookup failed: {0}")]
    Resolution(#[from] ResolutionError),
}
