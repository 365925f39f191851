//! Ingestion pipeline: chunk, embed, persist
//!
//! Orchestrates the chunker, the embedding provider, and the vector store.
//! Within one document the metadata write is the final observable effect,
//! so a reader never sees a chunk count larger than the number of
//! chunk/vector records actually present.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::storage::VectorStore;
use crate::types::{DocumentMeta, IngestDocument};

use super::chunker::Chunker;

/// Outcome of ingesting one document in a batch
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Document was chunked, embedded, and persisted
    Ingested {
        id: String,
        title: String,
        chunks: u32,
    },
    /// Document was aborted; partial records may remain but its metadata
    /// was not written, so it is not advertised to retrieval
    Failed { id: String, error: String },
}

/// Pipeline for adding or replacing a document's content
pub struct IngestPipeline {
    chunker: Chunker,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    /// Concurrent embedding calls per document
    parallel_embeddings: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        chunker: Chunker,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        parallel_embeddings: usize,
    ) -> Self {
        Self {
            chunker,
            store,
            embedder,
            parallel_embeddings: parallel_embeddings.max(1),
        }
    }

    /// Ingest one document, replacing any previous content under the same id
    ///
    /// Returns the number of chunks written. Re-running with the same input
    /// is idempotent: every chunk/vector key it touches is overwritten and
    /// stale trailing records from a longer previous version are deleted
    /// before the new metadata is written.
    pub async fn ingest(&self, id: &str, title: &str, text: &str) -> Result<u32> {
        if id.is_empty() {
            return Err(Error::invalid_input("document id must not be empty"));
        }

        let chunks = self.chunker.chunk(text);
        let chunk_count = chunks.len() as u32;

        // Embed and write chunk/vector pairs with bounded concurrency. The
        // first provider failure aborts this document and leaves whatever
        // records were already written; a retry overwrites them.
        stream::iter(chunks.into_iter().enumerate().map(|(index, chunk_text)| {
            let store = Arc::clone(&self.store);
            let embedder = Arc::clone(&self.embedder);
            let id = id.to_string();
            async move {
                let index = index as u32;
                let embedding = embedder.embed(&chunk_text).await?;
                store.put_chunk(&id, index, &chunk_text).await?;
                store.put_vector(&id, index, &embedding).await?;
                Ok::<(), Error>(())
            }
        }))
        .buffer_unordered(self.parallel_embeddings)
        .try_collect::<Vec<()>>()
        .await?;

        // Drop records beyond the new chunk count before advertising it
        let stale = self.store.delete_from(id, chunk_count).await?;
        if stale > 0 {
            tracing::debug!("Deleted {} stale records for '{}'", stale, id);
        }

        // Metadata last: write-after-children
        self.store
            .put_meta(&DocumentMeta::new(id, title, chunk_count))
            .await?;

        tracing::info!("Ingested '{}' ({}): {} chunks", id, title, chunk_count);
        Ok(chunk_count)
    }

    /// Ingest a batch, one outcome per document, in input order
    ///
    /// One document's failure does not abort processing of subsequent
    /// documents.
    pub async fn ingest_batch(&self, documents: &[IngestDocument]) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(documents.len());

        for doc in documents {
            let outcome = match self.ingest(&doc.id, &doc.title, &doc.text).await {
                Ok(chunks) => IngestOutcome::Ingested {
                    id: doc.id.clone(),
                    title: doc.title.clone(),
                    chunks,
                },
                Err(e) => {
                    tracing::error!("Failed to ingest '{}': {}", doc.id, e);
                    IngestOutcome::Failed {
                        id: doc.id.clone(),
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
