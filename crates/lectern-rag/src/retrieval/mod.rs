//! Query-time retrieval: similarity scoring and the retrieval engine

pub mod engine;
pub mod similarity;

pub use engine::{RetrievalEngine, RetrievedContext, ScoredChunk, DEFAULT_TOP_K};
pub use similarity::cosine_similarity;
