//! Request types for the HTTP surface

use serde::{Deserialize, Serialize};

/// Retrieval request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveRequest {
    /// The query to find context for
    pub query: String,

    /// Number of chunks to retrieve (default: 3)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    crate::retrieval::DEFAULT_TOP_K
}

impl RetrieveRequest {
    /// Create a new retrieval request with default top_k
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: default_top_k(),
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
}

/// A single document in an ingestion batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestDocument {
    /// Opaque document id; re-ingesting an id replaces its content
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Full source text
    pub text: String,
}

/// Ingestion request: documents are processed one at a time, in list order,
/// independently — one failure does not abort the rest of the batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<IngestDocument>,
}
