//! Retrieval engine: brute-force nearest-neighbor scan over stored vectors
//!
//! Embeds an incoming query, scores every visible vector with cosine
//! similarity, and resolves the top candidates to chunk texts and
//! de-duplicated source titles. The full-corpus linear scan is
//! O(total chunks x embedding dimension) per query, sized for a corpus of
//! one academic course.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::storage::VectorStore;

use super::similarity::cosine_similarity;

/// Default number of chunks to retrieve
pub const DEFAULT_TOP_K: usize = 3;

/// A scored candidate produced during the scan (transient)
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Cosine similarity against the query embedding
    pub score: f32,
    /// Owning document id
    pub document_id: String,
    /// Chunk index within the document
    pub index: u32,
}

/// Context selected for a query
#[derive(Debug, Clone, Default)]
pub struct RetrievedContext {
    /// Chunk texts in ranked order, for prompt construction
    pub chunks: Vec<String>,
    /// Distinct source titles in order of first appearance, for citation
    pub titles: Vec<String>,
}

/// Engine answering queries against the vector store
pub struct RetrievalEngine {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RetrievalEngine {
    /// Create a new retrieval engine
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Retrieve the `top_k` most relevant chunks for a query
    ///
    /// A provider failure fails the whole call: "retrieval unavailable" is
    /// observable and distinct from an empty result on an empty store.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievedContext> {
        let query_embedding = self.embedder.embed(query).await?;

        let records = self.store.scan_vectors().await?;
        if records.is_empty() {
            return Ok(RetrievedContext::default());
        }

        let mut candidates: Vec<ScoredChunk> = Vec::with_capacity(records.len());
        for record in records {
            if record.embedding.len() != query_embedding.len() {
                tracing::warn!(
                    "Skipping vector ({}, {}) with dimension {} (query has {})",
                    record.document_id,
                    record.index,
                    record.embedding.len(),
                    query_embedding.len()
                );
                continue;
            }
            candidates.push(ScoredChunk {
                score: cosine_similarity(&query_embedding, &record.embedding),
                document_id: record.document_id,
                index: record.index,
            });
        }

        // Descending score; ties broken by (document id, index) so results
        // are reproducible for identical stored data
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
                .then_with(|| a.index.cmp(&b.index))
        });
        candidates.truncate(top_k);

        self.hydrate(&candidates).await
    }

    /// Resolve scored candidates to chunk texts and distinct titles
    ///
    /// A store failure or an absent record on an individual read drops that
    /// one candidate; the partial-visibility race makes a missing record a
    /// soft signal, not a hard failure.
    async fn hydrate(&self, candidates: &[ScoredChunk]) -> Result<RetrievedContext> {
        let mut context = RetrievedContext::default();

        for candidate in candidates {
            let text = match self.store.get_chunk(&candidate.document_id, candidate.index).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    tracing::warn!(
                        "Chunk ({}, {}) missing during hydration, skipping",
                        candidate.document_id,
                        candidate.index
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to read chunk ({}, {}): {}, skipping",
                        candidate.document_id,
                        candidate.index,
                        e
                    );
                    continue;
                }
            };

            let title = match self.store.get_meta(&candidate.document_id).await {
                Ok(Some(meta)) => meta.title,
                Ok(None) => {
                    tracing::warn!(
                        "Metadata for '{}' missing during hydration, skipping",
                        candidate.document_id
                    );
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to read metadata for '{}': {}, skipping",
                        candidate.document_id,
                        e
                    );
                    continue;
                }
            };

            context.chunks.push(text);
            if !context.titles.contains(&title) {
                context.titles.push(title);
            }
        }

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ingestion::{Chunker, IngestPipeline};
    use crate::providers::testing::{FailingEmbedder, StubEmbedder};
    use crate::storage::SqliteVectorStore;

    async fn engine_with_documents(
        documents: &[(&str, &str, &str)],
    ) -> (RetrievalEngine, Arc<SqliteVectorStore>) {
        let store = Arc::new(SqliteVectorStore::in_memory().unwrap());
        let embedder = Arc::new(StubEmbedder);
        let pipeline = IngestPipeline::new(
            Chunker::new(1700, 200).unwrap(),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
            2,
        );
        for (id, title, text) in documents {
            pipeline.ingest(id, title, text).await.unwrap();
        }
        let engine = RetrievalEngine::new(
            Arc::clone(&store) as Arc<dyn VectorStore>,
            embedder as Arc<dyn EmbeddingProvider>,
        );
        (engine, store)
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty_results() {
        let (engine, _store) = engine_with_documents(&[]).await;

        let context = engine.retrieve("anything", DEFAULT_TOP_K).await.unwrap();
        assert!(context.chunks.is_empty());
        assert!(context.titles.is_empty());
    }

    #[tokio::test]
    async fn test_ranking_returns_closest_chunk() {
        // Letter classes: a-i, j-r, s-z map to distinct axes in the stub
        let (engine, _store) = engine_with_documents(&[
            ("d1", "Early letters", "aaaaaaaa"),
            ("d2", "Middle letters", "jjjjjjjj"),
            ("d3", "Late letters", "ssssssss"),
        ])
        .await;

        let context = engine.retrieve("jj", 1).await.unwrap();
        assert_eq!(context.chunks, vec!["jjjjjjjj".to_string()]);
        assert_eq!(context.titles, vec!["Middle letters".to_string()]);
    }

    #[tokio::test]
    async fn test_titles_are_distinct_in_first_appearance_order() {
        let (engine, _store) = engine_with_documents(&[
            ("d1", "Shared title", "aaaaaaaa"),
            ("d2", "Shared title", "aaaajjjj"),
            ("d3", "Other title", "aaaassss"),
        ])
        .await;

        let context = engine.retrieve("aaaa", 3).await.unwrap();
        assert_eq!(context.chunks.len(), 3);
        assert_eq!(
            context.titles,
            vec!["Shared title".to_string(), "Other title".to_string()]
        );
    }

    #[tokio::test]
    async fn test_tie_break_is_deterministic() {
        // Identical texts produce identical scores; order falls back to
        // (document id, index)
        let (engine, _store) = engine_with_documents(&[
            ("z-doc", "Z", "aaaa"),
            ("a-doc", "A", "aaaa"),
        ])
        .await;

        let context = engine.retrieve("aa", 2).await.unwrap();
        assert_eq!(context.titles, vec!["A".to_string(), "Z".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_failure_is_observable() {
        let store = Arc::new(SqliteVectorStore::in_memory().unwrap());
        let engine = RetrievalEngine::new(
            store as Arc<dyn VectorStore>,
            Arc::new(FailingEmbedder) as Arc<dyn EmbeddingProvider>,
        );

        let err = engine.retrieve("query", 3).await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_missing_chunk_is_skipped_not_fatal() {
        use crate::types::DocumentMeta;

        let store = Arc::new(SqliteVectorStore::in_memory().unwrap());

        // A visible vector whose chunk record is absent, as under the
        // partial-visibility race
        store.put_vector("ghost", 0, &[8.0, 0.0, 0.0, 0.0]).await.unwrap();
        store.put_meta(&DocumentMeta::new("ghost", "Ghost", 1)).await.unwrap();

        store.put_chunk("real", 0, "aaaa").await.unwrap();
        store.put_vector("real", 0, &[4.0, 0.0, 0.0, 0.0]).await.unwrap();
        store.put_meta(&DocumentMeta::new("real", "Real", 1)).await.unwrap();

        let engine = RetrievalEngine::new(
            store as Arc<dyn VectorStore>,
            Arc::new(StubEmbedder) as Arc<dyn EmbeddingProvider>,
        );

        let context = engine.retrieve("aa", 2).await.unwrap();
        assert_eq!(context.chunks, vec!["aaaa".to_string()]);
        assert_eq!(context.titles, vec!["Real".to_string()]);
    }

    #[tokio::test]
    async fn test_end_to_end_course_document() {
        let text = "A".repeat(5000);
        let (engine, store) =
            engine_with_documents(&[("lec1", "Intro", text.as_str())]).await;

        let meta = store.get_meta("lec1").await.unwrap().unwrap();
        assert_eq!(meta.chunk_count, 4);

        let context = engine.retrieve("A", 1).await.unwrap();
        assert_eq!(context.chunks.len(), 1);
        assert!(context.chunks[0].chars().all(|c| c == 'A'));
        assert_eq!(context.titles, vec!["Intro".to_string()]);
    }
}
