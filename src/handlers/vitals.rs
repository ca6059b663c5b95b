use crate::models::Vitals;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Every call returns a freshly jittered reading.
pub async fn get_vitals(State(state): State<Arc<AppState>>) -> Json<Vitals> {
    Json(state.store.vitals())
}
