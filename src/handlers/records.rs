use crate::models::{ConsultationsResponse, MedicationsResponse, Report, ReportsResponse};
use crate::{AppError, AppState, Result};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;

pub async fn list_reports(State(state): State<Arc<AppState>>) -> Json<ReportsResponse> {
    Json(ReportsResponse {
        reports: state.store.reports().await,
    })
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Report>> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(format!("Invalid report id: {}", e)))?;

    state
        .store
        .report(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
}

pub async fn list_medications(State(state): State<Arc<AppState>>) -> Json<MedicationsResponse> {
    Json(MedicationsResponse {
        medications: state.store.medications().await,
    })
}

pub async fn list_consultations(
    State(state): State<Arc<AppState>>,
) -> Json<ConsultationsResponse> {
    Json(ConsultationsResponse {
        consultations: state.store.consultations().await,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_seeded_records() {
        let temp_dir = TempDir::new().unwrap();
        let (_, app) = test_app(temp_dir.path());

        let (status, body) = send(&app, get("/api/reports")).await;
        assert_eq!(status, StatusCode::OK);
        let reports = body["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0]["type"], "Blood Test");
        assert_eq!(reports[1]["type"], "ECG");

        let (status, body) = send(&app, get("/api/medication")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["medications"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, get("/api/consultations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["consultations"][0]["specialty"], "General Physician");
    }

    #[tokio::test]
    async fn test_get_report_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let (_, app) = test_app(temp_dir.path());

        let (status, body) = send(&app, get("/api/reports/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert_eq!(body["type"], "ECG");

        let (status, body) = send(&app, get("/api/reports/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Report 42 not found");

        let (status, body) = send(&app, get("/api/reports/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
