// src/models.rs

use serde::Deserialize;

/// One entry of `/xrefs/symbol/{species}/{symbol}`.
#[derive(Deserialize, Debug, Clone)]
pub struct Xref {
    pub id: String,
    #[serde(rename = "type")]
    pub id_type: String,
}

/// The parts of an expanded `/lookup/id/{gene}?expand=1` record we use.
#[derive(Deserialize, Debug)]
pub struct GeneLookup {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "Transcript", default)]
    pub transcripts: Vec<TranscriptSummary>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TranscriptSummary {
    pub id: String,
    #[serde(default)]
    pub is_canonical: Option<u8>,
}

/// Body of `/sequence/id/{transcript}?type=cds`.
#[derive(Deserialize, Debug)]
pub struct CodingSequence {
    #[serde(default)]
    pub id: Option<String>,
    pub seq: String,
}
