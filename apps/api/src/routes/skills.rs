use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/skills
pub async fn list_skills(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let skills = state.store.list_skills().await?;
    Ok(Json(json!({ "data": skills })))
}
