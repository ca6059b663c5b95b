pub mod avatar;
pub mod records;
pub mod upload;
pub mod vitals;
pub mod voice;

use crate::models::HealthSummary;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "BodyClone API is running"
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn health_summary(State(state): State<Arc<AppState>>) -> Json<HealthSummary> {
    Json(state.store.summary().await)
}

/// Today's date as stored on new records.
pub(crate) fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
