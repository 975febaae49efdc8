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
use crate::validation::parse_job;

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let jobs = state.store.list_jobs().await?;
    Ok(Json(json!({ "data": jobs })))
}

/// POST /api/jobs
pub async fn insert_job(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payload = parse_job(&body)?;
    state.store.insert_job(&payload).await?;
    Ok(message(StatusCode::CREATED, "Job added successfully"))
}

/// GET /api/jobs/:id
pub async fn find_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let job = state.store.find_job(id).await?;
    Ok(Json(json!({ "data": job })))
}

/// PUT /api/jobs/:id
pub async fn force_insert_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let payload = parse_job(&body)?;
    state.store.force_insert_job(id, &payload).await?;
    Ok(message(StatusCode::CREATED, "Job saved successfully"))
}

/// DELETE /api/jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    state.store.delete_job(id).await?;
    Ok(message(StatusCode::ACCEPTED, "Job deleted successfully"))
}
