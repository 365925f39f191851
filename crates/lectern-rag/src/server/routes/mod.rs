//! API routes for the retrieval server

pub mod documents;
pub mod ingest;
pub mod retrieve;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Document metadata
        .route("/documents", get(documents::list_documents))
        .route("/documents/:id", get(documents::get_document))
        // Ingestion (admin-gated)
        .route("/ingest", post(ingest::ingest_documents))
        // Retrieval
        .route("/retrieve", post(retrieve::retrieve_context))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "lectern-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Vector storage and retrieval core for a course-material Q&A assistant",
        "endpoints": {
            "POST /api/ingest": "Add or replace course documents (admin token required)",
            "POST /api/retrieve": "Retrieve ranked context chunks for a query",
            "GET /api/documents": "List ingested documents",
            "GET /api/documents/:id": "Get one document's metadata"
        }
    }))
}
