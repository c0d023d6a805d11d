// src/api_handler.rs

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ResolutionError;

pub const ENSEMBL_REST_URL: &str = "https://rest.ensembl.org";

/// Thin JSON-over-GET wrapper around a shared blocking client.
///
/// No retries and no explicit timeout: a failing call surfaces immediately
/// and a slow one blocks the caller until it returns.
pub struct APIHandler {
    client: Client,
    base_url: String,
}

impl APIHandler {
    pub fn new(base_url: &str) -> Result<Self, ResolutionError> {
        Self::from_builder(Client::builder(), base_url)
    }

    /// Finishes `builder` with the JSON headers every Ensembl call needs.
    pub fn from_builder(builder: ClientBuilder, base_url: &str) -> Result<Self, ResolutionError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("sequence_retriever/", env!("CARGO_PKG_VERSION"))),
        );

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(ResolutionError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` relative to the base URL and decode the JSON body as `T`.
    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ResolutionError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| ResolutionError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(ResolutionError::Status {
                url,
                status: status.as_u16(),
                body: error_text.trim().to_string(),
            });
        }

        let body = response.text().map_err(|source| ResolutionError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ResolutionError::Shape { url, source })
    }
}
