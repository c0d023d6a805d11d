use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A 20 nt spacer and the 3 nt PAM right behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideCandidate {
    #[serde(rename = "gRNA")]
    pub guide: String,
    #[serde(rename = "PAM")]
    pub pam: String,
    pub position: usize,
    pub score: f64,
}

/// Where the scanned sequence came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Custom,
    Gene(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Custom => f.write_str("custom"),
            Provenance::Gene(symbol) => f.write_str(symbol),
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub guides: Vec<GuideCandidate>,
    pub source: Provenance,
    pub sequence: String,
}

/// Wire shape of an inbound design request, before validation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CrisprRequest {
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub gene: Option<String>,
}

/// A validated request: exactly one input path survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignRequest {
    Sequence(String),
    Gene(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
