//! Retrieval server binary
//!
//! Run with: cargo run -p lectern-rag --bin lectern-server

use std::sync::Arc;

use lectern_rag::{
    config::RagConfig,
    providers::{EmbeddingProvider, OllamaEmbedder},
    server::RagServer,
    storage::{SqliteVectorStore, VectorStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectern_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match std::env::var("LECTERN_CONFIG") {
        Ok(path) => RagConfig::load(&path)?,
        Err(_) => RagConfig::from_env(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Store path: {}", config.storage.path.display());

    if config.server.admin_token.is_none() {
        tracing::warn!("LECTERN_ADMIN_TOKEN is not set; ingestion requests will be rejected");
    }

    let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(&config.storage.path)?);
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::new(&config.embeddings));

    // Check the embedding provider
    match embedder.health_check().await {
        Ok(true) => {
            tracing::info!("Embedding provider available at {}", config.embeddings.base_url);
        }
        _ => {
            tracing::warn!("Embedding provider not reachable at {}", config.embeddings.base_url);
            tracing::warn!("Start Ollama and pull the embedding model:");
            tracing::warn!("  1. ollama serve");
            tracing::warn!("  2. ollama pull {}", config.embeddings.model);
        }
    }

    let server = RagServer::new(config, store, embedder)?;

    tracing::info!("API: http://{}", server.address());
    tracing::info!("Health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
