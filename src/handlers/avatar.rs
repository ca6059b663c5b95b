use crate::models::{AvatarMood, MoodRequest, MoodResponse};
use crate::{AppError, AppState, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

pub async fn get_mood(State(state): State<Arc<AppState>>) -> Json<AvatarMood> {
    Json(state.store.mood().await)
}

pub async fn set_mood(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<MoodResponse>> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;

    let mood = request
        .mood
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No mood provided".to_string()))?;

    let current = state.store.set_mood(mood).await;

    Ok(Json(MoodResponse {
        success: true,
        mood: current.mood,
        timestamp: current.timestamp,
    }))
}
