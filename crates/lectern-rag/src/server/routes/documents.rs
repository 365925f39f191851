//! Document metadata endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::DocumentMeta;

/// GET /api/documents - List all ingested documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentMeta>>> {
    let metas = state.store().list_meta().await?;
    Ok(Json(metas))
}

/// GET /api/documents/:id - Get one document's metadata
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentMeta>> {
    state
        .store()
        .get_meta(&id)
        .await?
        .map(Json)
        .ok_or(Error::DocumentNotFound(id))
}
