//! Context retrieval endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{RetrieveRequest, RetrieveResponse};

/// POST /api/retrieve - Retrieve ranked context chunks for a query
pub async fn retrieve_context(
    State(state): State<AppState>,
    Json(request): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>> {
    if request.query.trim().is_empty() {
        return Err(Error::invalid_input("query must not be empty"));
    }

    let start = Instant::now();
    tracing::info!("Retrieve: \"{}\"", request.query);

    let context = state.engine().retrieve(&request.query, request.top_k).await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Retrieval completed in {}ms, {} chunks from {} source(s)",
        processing_time_ms,
        context.chunks.len(),
        context.titles.len()
    );

    Ok(Json(RetrieveResponse {
        chunks_retrieved: context.chunks.len(),
        chunks: context.chunks,
        titles: context.titles,
        processing_time_ms,
    }))
}
