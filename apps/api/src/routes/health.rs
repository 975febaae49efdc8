use axum::{extract::State, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, database reachability and the server clock.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = if state.store.ping().await {
        "ok"
    } else {
        "unreachable"
    };
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "time": iso_utc(Utc::now())
    }))
}

/// ISO-8601 in UTC with a `Z` suffix instead of `+00:00`.
pub fn iso_utc(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
