//! Document metadata records

use serde::{Deserialize, Serialize};

/// Metadata for an ingested document
///
/// The id is an opaque, caller-supplied string (e.g. "lec1"). The metadata
/// record is written last during ingestion: a document with no metadata is
/// not visible to retrieval, whatever chunk or vector records exist for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Opaque document id
    pub id: String,
    /// Human-readable title, used for citations
    pub title: String,
    /// Number of chunks, indices 0..chunk_count
    pub chunk_count: u32,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl DocumentMeta {
    /// Create a new metadata record stamped with the current time
    pub fn new(id: impl Into<String>, title: impl Into<String>, chunk_count: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            chunk_count,
            ingested_at: chrono::Utc::now(),
        }
    }
}
