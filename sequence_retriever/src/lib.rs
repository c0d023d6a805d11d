// src/lib.rs

//! Resolves human gene symbols to coding sequences through the Ensembl REST API.

pub mod api_handler;
pub mod error;
pub mod gene_sequence;
pub mod models;

pub use crate::api_handler::{APIHandler, ENSEMBL_REST_URL};
pub use crate::error::ResolutionError;
pub use crate::gene_sequence::{EnsemblClient, SPECIES};

/// Anything that can turn a gene symbol into a coding sequence.
///
/// Implementations must either return the complete sequence or fail; a
/// partial sequence is never handed back to the caller.
pub trait SequenceSource {
    fn coding_sequence(&self, gene_symbol: &str) -> Result<String, ResolutionError>;
}
