//! Shared types for documents, requests, and responses

pub mod document;
pub mod request;
pub mod response;

pub use document::DocumentMeta;
pub use request::{IngestDocument, IngestRequest, RetrieveRequest};
pub use response::{IngestError, IngestResponse, IngestedDocument, RetrieveResponse};
