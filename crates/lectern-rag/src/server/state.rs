//! Application state for the retrieval server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{Chunker, IngestPipeline};
use crate::providers::EmbeddingProvider;
use crate::retrieval::RetrievalEngine;
use crate::storage::VectorStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Vector store (injected, shared with pipeline and engine)
    store: Arc<dyn VectorStore>,
    /// Embedding provider (injected)
    embedder: Arc<dyn EmbeddingProvider>,
    /// Ingestion pipeline
    pipeline: IngestPipeline,
    /// Retrieval engine
    engine: RetrievalEngine,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state from injected collaborators
    pub fn new(
        config: RagConfig,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

        let pipeline = IngestPipeline::new(
            chunker,
            Arc::clone(&store),
            Arc::clone(&embedder),
            config.processing.parallel_embeddings,
        );
        let engine = RetrievalEngine::new(Arc::clone(&store), Arc::clone(&embedder));

        tracing::info!(
            "Application state initialized (store: {}, embedder: {})",
            store.name(),
            embedder.name()
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                embedder,
                pipeline,
                engine,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the vector store
    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.inner.store
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the retrieval engine
    pub fn engine(&self) -> &RetrievalEngine {
        &self.inner.engine
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
