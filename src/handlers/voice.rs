use crate::models::{Report, ReportType, VoiceReportRequest, VoiceReportResponse};
use crate::{AppError, AppState, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::today;

const SUMMARY_MAX_CHARS: usize = 100;
const DEFAULT_SUMMARY: &str = "Voice consultation recorded";

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Report summary: the diagnosis cut to `SUMMARY_MAX_CHARS` characters.
fn summarize(diagnosis: Option<&str>) -> String {
    match diagnosis.map(str::trim).filter(|d| !d.is_empty()) {
        Some(diagnosis) => diagnosis.chars().take(SUMMARY_MAX_CHARS).collect(),
        None => DEFAULT_SUMMARY.to_string(),
    }
}

pub async fn report_from_voice(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VoiceReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VoiceReportResponse>)> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;

    let transcript = non_blank(request.transcript)
        .ok_or_else(|| AppError::Validation("No transcript provided".to_string()))?;
    let data = request.structured_data.unwrap_or_default();

    let diagnosis = non_blank(data.diagnosis);

    let mut report = Report::new(
        ReportType::VoiceReport,
        today(),
        "Processed",
        summarize(diagnosis.as_deref()),
    );
    report.is_voice_report = true;
    report.patient_name = non_blank(data.patient_name);
    report.complaints = non_blank(data.complaints);
    report.diagnosis = diagnosis;
    report.notes = non_blank(data.notes);
    report.prescription = non_blank(data.prescription);
    report.raw_transcript = Some(transcript);

    let report = state.store.add_report(report).await;
    tracing::info!("Created voice report {}", report.id);

    Ok((
        StatusCode::CREATED,
        Json(VoiceReportResponse {
            success: true,
            message: "Voice report created successfully".to_string(),
            report,
        }),
    ))
}
