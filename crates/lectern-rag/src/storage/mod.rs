//! Durable key-value storage for document metadata, chunks, and vectors

pub mod sqlite;

pub use sqlite::SqliteVectorStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DocumentMeta;

/// A vector record surfaced by a store scan
#[derive(Debug, Clone)]
pub struct VectorRecord {
    /// Owning document id
    pub document_id: String,
    /// Chunk index within the document
    pub index: u32,
    /// Embedding of the chunk's text
    pub embedding: Vec<f32>,
}

/// Durable storage for three record kinds keyed by `(document id, index)`:
/// document metadata, chunk text, and embedding vectors.
///
/// Writes are last-write-wins per exact key; nothing orders keys written by
/// different logical operations. Callers that need ordering (metadata after
/// all of a document's chunks) enforce it themselves.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write a document metadata record
    async fn put_meta(&self, meta: &DocumentMeta) -> Result<()>;

    /// Read a document metadata record
    async fn get_meta(&self, document_id: &str) -> Result<Option<DocumentMeta>>;

    /// List all document metadata records
    async fn list_meta(&self) -> Result<Vec<DocumentMeta>>;

    /// Write one chunk's text
    async fn put_chunk(&self, document_id: &str, index: u32, text: &str) -> Result<()>;

    /// Read one chunk's text
    async fn get_chunk(&self, document_id: &str, index: u32) -> Result<Option<String>>;

    /// Write one chunk's embedding vector
    async fn put_vector(&self, document_id: &str, index: u32, embedding: &[f32]) -> Result<()>;

    /// Snapshot of all vectors belonging to visible documents
    ///
    /// A vector is visible iff its document's metadata record exists and the
    /// vector's index is below the advertised chunk count. Vectors of a
    /// document whose metadata has not been written yet never appear here.
    /// The snapshot is point-in-time-ish: it is not isolated against
    /// concurrent writers.
    async fn scan_vectors(&self) -> Result<Vec<VectorRecord>>;

    /// Delete chunk and vector records with `index >= first_index`
    ///
    /// Used on re-ingestion to drop stale trailing records when the new
    /// version of a document has fewer chunks than the old one.
    async fn delete_from(&self, document_id: &str, first_index: u32) -> Result<usize>;

    /// Total number of stored vector records, visible or not
    async fn vector_count(&self) -> Result<usize>;

    /// Store name for logging
    fn name(&self) -> &str;
}
