//! Deterministic embedding providers for tests

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Deterministic embedder mapping texts to letter-class frequency vectors
///
/// Texts dominated by the same letters map to the same direction, so cosine
/// ranking is predictable: a query of "jj" is closest to a chunk of "jjjj".
pub struct StubEmbedder;

pub const STUB_DIMENSIONS: usize = 4;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; STUB_DIMENSIONS];
        for ch in text.chars() {
            match ch.to_ascii_lowercase() {
                'a'..='i' => vector[0] += 1.0,
                'j'..='r' => vector[1] += 1.0,
                's'..='z' => vector[2] += 1.0,
                _ => vector[3] += 1.0,
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        STUB_DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Embedder that always fails, for provider-failure paths
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::provider("embedding service is down"))
    }

    fn dimensions(&self) -> usize {
        STUB_DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }
}
