use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::routes::message;
use crate::state::AppState;
use crate::validation::parse_candidate;

/// GET /api/candidates
pub async fn list_candidates(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let candidates = state.store.list_candidates().await?;
    Ok(Json(json!({ "data": candidates })))
}

/// POST /api/candidates
pub async fn insert_candidate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payload = parse_candidate(&body)?;
    state.store.insert_candidate(&payload).await?;
    Ok(message(StatusCode::CREATED, "Candidate added successfully"))
}

/// GET /api/candidates/:id
pub async fn find_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let candidate = state.store.find_candidate(id).await?;
    Ok(Json(json!({ "data": candidate })))
}

/// PUT /api/candidates/:id
pub async fn force_insert_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payload = parse_candidate(&body)?;
    state.store.force_insert_candidate(id, &payload).await?;
    Ok(message(StatusCode::CREATED, "Candidate saved successfully"))
}

/// DELETE /api/candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    state.store.delete_candidate(id).await?;
    Ok(message(StatusCode::ACCEPTED, "Candidate deleted successfully"))
}

/// POST /api/candidates/:id/apply/jobs/:job_id
pub async fn apply_candidate(
    State(state): State<AppState>,
    Path((id, job_id)): Path<(i32, i32)>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    state.store.apply_candidate(id, job_id).await?;
    Ok(message(StatusCode::CREATED, "Candidate applied successfully"))
}
