//! Document ingestion: chunking and the ingestion pipeline

pub mod chunker;
pub mod pipeline;

pub use chunker::Chunker;
pub use pipeline::{IngestOutcome, IngestPipeline};
