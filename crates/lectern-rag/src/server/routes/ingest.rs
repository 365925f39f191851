//! Document ingestion endpoint

use axum::{extract::State, http::HeaderMap, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::IngestOutcome;
use crate::server::auth::require_admin;
use crate::server::state::AppState;
use crate::types::{IngestError, IngestRequest, IngestResponse, IngestedDocument};

/// POST /api/ingest - Add or replace course documents
///
/// Documents are processed one at a time, in list order, independently;
/// the response carries one outcome per input document.
pub async fn ingest_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    require_admin(&headers, &state.config().server)?;

    if request.documents.is_empty() {
        return Err(Error::invalid_input("documents must not be empty"));
    }

    let start = Instant::now();
    tracing::info!("Ingesting batch of {} document(s)", request.documents.len());

    let outcomes = state.pipeline().ingest_batch(&request.documents).await;

    let mut documents = Vec::new();
    let mut errors = Vec::new();
    let mut total_chunks = 0u32;

    for outcome in outcomes {
        match outcome {
            IngestOutcome::Ingested { id, title, chunks } => {
                total_chunks += chunks;
                documents.push(IngestedDocument { id, title, chunks });
            }
            IngestOutcome::Failed { id, error } => {
                errors.push(IngestError { id, error });
            }
        }
    }

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Batch completed in {}ms: {} ingested, {} failed, {} chunks",
        processing_time_ms,
        documents.len(),
        errors.len(),
        total_chunks
    );

    Ok(Json(IngestResponse {
        success: !documents.is_empty(),
        documents,
        errors,
        total_chunks_created: total_chunks,
        processing_time_ms,
    }))
}
