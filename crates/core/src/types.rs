use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Where a catalog came from. The model list looks the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub models: Vec<ModelDescriptor>,
    pub source: CatalogSource,
}

impl Catalog {
    pub fn is_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }

    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
    pub sentiment: String,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisStatus {
    Genuine,
    /// The model replied with text that did not decode; `raw` is that text.
    Degraded { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub status: AnalysisStatus,
}

impl Analysis {
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, AnalysisStatus::Degraded { .. })
    }
}
