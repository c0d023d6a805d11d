// src/gene_sequence.rs

use tracing::{debug, info};

use crate::api_handler::APIHandler;
use crate::error::ResolutionError;
use crate::models::{CodingSequence, GeneLookup, Xref};
use crate::SequenceSource;

pub const SPECIES: &str = "homo_sapiens";

/// Resolves gene symbols with three sequential Ensembl calls:
/// symbol -> gene ID -> first transcript of the expanded lookup -> CDS.
pub struct EnsemblClient {
    api: APIHandler,
}

impl EnsemblClient {
    pub fn new(base_url: &str) -> Result<Self, ResolutionError> {
        Ok(Self {
            api: APIHandler::new(base_url)?,
        })
    }

    pub fn with_handler(api: APIHandler) -> Self {
        Self { api }
    }

    pub fn resolve_coding_sequence(&self, gene_symbol: &str) -> Result<String, ResolutionError> {
        let gene_id = fetch_gene_id(&self.api, gene_symbol)?;
        let transcript_id = fetch_canonical_transcript_id(&self.api, &gene_id)?;
        let sequence = fetch_coding_sequence(&self.api, &transcript_id)?;
        info!(
            "Resolved {} -> {} -> {} ({} bp CDS)",
            gene_symbol,
            gene_id,
            transcript_id,
            sequence.len()
        );
        Ok(sequence)
    }
}

impl SequenceSource for EnsemblClient {
    fn coding_sequence(&self, gene_symbol: &str) -> Result<String, ResolutionError> {
        self.resolve_coding_sequence(gene_symbol)
    }
}

pub fn fetch_gene_id(api: &APIHandler, gene_symbol: &str) -> Result<String, ResolutionError> {
    info!("Fetching gene ID for gene symbol: {}", gene_symbol);
    let xrefs: Vec<Xref> = api.get(&format!("/xrefs/symbol/{}/{}", SPECIES, gene_symbol))?;
    select_gene_id(gene_symbol, &xrefs)
}

/// First cross-reference of type `gene`; the xref list may also carry
/// transcripts or translations that share the symbol.
pub fn select_gene_id(gene_symbol: &str, xrefs: &[Xref]) -> Result<String, ResolutionError> {
    xrefs
        .iter()
        .find(|xref| xref.id_type == "gene")
        .map(|xref| xref.id.clone())
        .ok_or_else(|| ResolutionError::UnknownSymbol(gene_symbol.to_string()))
}

pub fn fetch_canonical_transcript_id(
    api: &APIHandler,
    gene_id: &str,
) -> Result<String, ResolutionError> {
    info!("Fetching transcripts for gene ID: {}", gene_id);
    let lookup: GeneLookup = api.get(&format!("/lookup/id/{}?expand=1", gene_id))?;
    select_transcript_id(&lookup)
}

/// Ensembl lists the canonical transcript first in an expanded lookup, so the
/// first entry is taken as is.
pub fn select_transcript_id(lookup: &GeneLookup) -> Result<String, ResolutionError> {
    let first = lookup
        .transcripts
        .first()
        .ok_or_else(|| ResolutionError::NoTranscripts(lookup.id.clone()))?;
    debug!(
        "Gene {} ({}): {} transcripts, first {} canonical={}",
        lookup.id,
        lookup.display_name.as_deref().unwrap_or("N/A"),
        lookup.transcripts.len(),
        first.id,
        first.is_canonical.unwrap_or(0)
    );
    Ok(first.id.clone())
}

pub fn fetch_coding_sequence(
    api: &APIHandler,
    transcript_id: &str,
) -> Result<String, ResolutionError> {
    info!("Fetching coding sequence for transcript ID: {}", transcript_id);
    let record: CodingSequence = api.get(&format!("/sequence/id/{}?type=cds", transcript_id))?;
    if record.seq.trim().is_empty() {
        return Err(ResolutionError::EmptySequence(
            record.id.unwrap_or_else(|| transcript_id.to_string()),
        ));
    }
    Ok(record.seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::blocking::Client;
    use serde_json::json;
    use std::thread;

    fn local_client(base_url: &str) -> EnsemblClient {
        EnsemblClient::with_handler(APIHandler::from_builder(Client::builder().no_proxy(), base_url).unwrap())
    }

    /// Serves canned bodies keyed by URL prefix until the test process exits.
    fn fake_ensembl(routes: Vec<(&'static str, u16, String)>) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let url = request.url().to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _, _)| url.starts_with(prefix))
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, json!({"error": "not found"}).to_string()));
                let _ = request.respond(
                    tiny_http::Response::from_string(body).with_status_code(status),
                );
            }
        });
        format!("http://127.0.0.1:{}", port)
    }

    fn tp53_routes() -> Vec<(&'static str, u16, String)> {
        vec![
            (
                "/xrefs/symbol/homo_sapiens/TP53",
                200,
                json!([
                    {"type": "transcript", "id": "ENST00000269305"},
                    {"type": "gene", "id": "ENSG00000141510"}
                ])
                .to_string(),
            ),
            (
                "/lookup/id/ENSG00000141510",
                200,
                json!({
                    "id": "ENSG00000141510",
                    "display_name": "TP53",
                    "Transcript": [
                        {"id": "ENST00000269305", "is_canonical": 1},
                        {"id": "ENST00000445888", "is_canonical": 0}
                    ]
                })
                .to_string(),
            ),
            (
                "/sequence/id/ENST00000269305",
                200,
                json!({"id": "ENST00000269305", "seq": "ATGGAGGAGCCGCAGTCAGATCCTAGCGTCGAG"})
                    .to_string(),
            ),
        ]
    }

    #[test]
    fn gene_xref_wins_over_other_types() {
        let xrefs: Vec<Xref> = serde_json::from_value(json!([
            {"type": "translation", "id": "ENSP1"},
            {"type": "gene", "id": "ENSG1"},
            {"type": "gene", "id": "ENSG2"}
        ]))
        .unwrap();
        assert_eq!(select_gene_id("X", &xrefs).unwrap(), "ENSG1");
    }

    #[test]
    fn empty_xref_list_is_unknown_symbol() {
        let err = select_gene_id("NOPE1", &[]).unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownSymbol(ref s) if s == "NOPE1"));
    }

    #[test]
    fn lookup_without_transcripts_fails() {
        let lookup: GeneLookup = serde_json::from_value(json!({"id": "ENSG9"})).unwrap();
        let err = select_transcript_id(&lookup).unwrap_err();
        assert_eq!(err.to_string(), "gene ENSG9 has no transcripts");
    }

    #[test]
    fn resolves_full_chain() {
        let base = fake_ensembl(tp53_routes());
        let client = local_client(&base);
        let seq = client.coding_sequence("TP53").unwrap();
        assert_eq!(seq, "ATGGAGGAGCCGCAGTCAGATCCTAGCGTCGAG");
    }

    #[test]
    fn unknown_symbol_stops_after_first_call() {
        let base = fake_ensembl(vec![(
            "/xrefs/symbol/homo_sapiens/",
            200,
            "[]".to_string(),
        )]);
        let client = local_client(&base);
        let err = client.coding_sequence("NOTAGENE").unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownSymbol(_)), "{err:?}");
    }

    #[test]
    fn http_error_carries_status_and_body() {
        let base = fake_ensembl(vec![(
            "/xrefs/symbol/homo_sapiens/",
            400,
            json!({"error": "bad symbol"}).to_string(),
        )]);
        let client = local_client(&base);
        let err = client.coding_sequence("TP53").unwrap_err();
        match err {
            ResolutionError::Status { status, ref body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("bad symbol"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_lookup_is_shape_error() {
        let mut routes = tp53_routes();
        routes[1].2 = json!({"id": "ENSG00000141510", "Transcript": "oops"}).to_string();
        let client = local_client(&fake_ensembl(routes));
        let err = client.coding_sequence("TP53").unwrap_err();
        assert!(matches!(err, ResolutionError::Shape { .. }), "{err:?}");
    }

    #[test]
    fn empty_cds_is_rejected() {
        let mut routes = tp53_routes();
        routes[2].2 = json!({"id": "ENST00000269305", "seq": ""}).to_string();
        let client = local_client(&fake_ensembl(routes));
        let err = client.coding_sequence("TP53").unwrap_err();
        assert_eq!(
            err.to_string(),
            "transcript ENST00000269305 has an empty coding sequence"
        );
    }
}
