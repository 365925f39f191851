//! Response types for the HTTP surface

use serde::{Deserialize, Serialize};

/// Response from a retrieval call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveResponse {
    /// Chunk texts in ranked order, for prompt construction
    pub chunks: Vec<String>,
    /// Distinct source titles in order of first appearance, for citation
    pub titles: Vec<String>,
    /// Number of chunks returned
    pub chunks_retrieved: usize,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Summary of one successfully ingested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    pub id: String,
    pub title: String,
    pub chunks: u32,
}

/// Per-document ingestion failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestError {
    pub id: String,
    pub error: String,
}

/// Response from a batch ingestion call, one outcome per input document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// True when at least one document was ingested
    pub success: bool,
    /// Documents ingested in this batch
    pub documents: Vec<IngestedDocument>,
    /// Per-document failures, in input order
    pub errors: Vec<IngestError>,
    /// Total chunks written across the batch
    pub total_chunks_created: u32,
    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}
