//! lectern-rag: vector storage and retrieval core for a course-material Q&A assistant
//!
//! Splits course documents into overlapping text chunks, embeds each chunk
//! via an external provider, persists chunks and vectors in a durable store,
//! and answers queries with a brute-force cosine scan over all stored
//! embeddings. The generation side of the assistant consumes the retrieved
//! chunks and titles; it is not part of this crate.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use ingestion::{Chunker, IngestPipeline};
pub use providers::{EmbeddingProvider, OllamaEmbedder};
pub use retrieval::{RetrievalEngine, RetrievedContext};
pub use storage::{SqliteVectorStore, VectorStore};
pub use types::DocumentMeta;
