// src/error.rs

use thiserror::Error;

/// Every way the symbol -> gene -> transcript -> CDS chain can fail.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("unexpected response from {url}: {source}")]
    Shape {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no gene found for symbol '{0}'")]
    UnknownSymbol(String),

    #[error("gene {0} has no transcripts")]
    NoTranscripts(String),

    #[error("transcript {0} has an empty coding sequence")]
    EmptySequence(String),
}
