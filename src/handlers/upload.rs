//! Report upload.
//!
//! `POST /api/reports/upload` takes a multipart form with a `file` part, an
//! optional `is_prescription` flag and an optional `file_name` display name.
//! A prescription upload also lands in the medication list, pointing at the
//! same saved file.

use crate::models::{Medication, Report, ReportType, UploadResponse};
use crate::{storage, AppError, AppState, Result};
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::today;

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn map_multipart_error(e: MultipartError, max_mb: u64) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::FileTooLarge(max_mb);
    }
    tracing::error!("Failed to read multipart field: {}", e);
    AppError::Validation(format!("Failed to read form field: {}", e.body_text()))
}

pub async fn upload_report(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    tracing::info!("Received report upload");

    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload body: {}", e);
        AppError::Validation("No file provided".to_string())
    })?;

    let mut file: Option<(String, Bytes)> = None;
    let mut is_prescription = false;
    let mut display_name: Option<String> = None;

    let max_size = state.config.max_upload_size_bytes();
    let max_mb = state.config.max_upload_size_mb;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_mb))?
    {
        let name = field.name().unwrap_or("").to_string();
        tracing::debug!("Processing field: {}", name);

        match name.as_str() {
            "file" => {
                // A part without a filename is a plain form value, not a file
                let Some(filename) = field.file_name().map(str::to_string) else {
                    tracing::debug!("Ignoring `file` part without a filename");
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| map_multipart_error(e, max_mb))?;

                if data.len() as u64 > max_size {
                    return Err(AppError::FileTooLarge(max_mb));
                }

                file = Some((filename, data));
            }
            "is_prescription" => {
                let value = field.text().await.unwrap_or_default();
                is_prescription = is_truthy(&value);
            }
            "file_name" => {
                display_name = Some(field.text().await.unwrap_or_default().trim().to_string())
                    .filter(|s| !s.is_empty())
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if filename.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    if !storage::is_allowed_file(&filename) {
        return Err(AppError::Validation("File type not allowed".to_string()));
    }

    let stored = storage::save_upload(&state.config.upload_dir, &filename, &data).await?;
    let file_path = stored.path.to_string_lossy().into_owned();
    let file_name = display_name.unwrap_or(filename);
    let date = today();

    let report_type = if is_prescription {
        ReportType::Prescription
    } else {
        ReportType::MedicalReport
    };
    let mut report = Report::new(
        report_type,
        date.clone(),
        "Uploaded",
        format!("Uploaded: {}", file_name),
    );
    report.file_path = Some(file_path.clone());
    report.file_name = Some(file_name.clone());
    report.content_type = Some(stored.content_type);
    report.file_size = Some(stored.size);
    report.is_prescription = Some(is_prescription);

    let report = state.store.add_report(report).await;

    let medication = if is_prescription {
        let medication = Medication {
            id: 0,
            name: format!("Prescription: {}", file_name),
            dosage: "See prescription".to_string(),
            frequency: "As prescribed".to_string(),
            next_dose: "To be scheduled".to_string(),
            status: "Pending Review".to_string(),
            prescription_file: Some(file_path),
            prescription_report_id: Some(report.id),
            added_date: Some(date),
        };
        Some(state.store.add_medication(medication).await)
    } else {
        None
    };

    let message = if medication.is_some() {
        "Prescription uploaded and added to medications".to_string()
    } else {
        "File uploaded successfully".to_string()
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message,
            report,
            medication,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("on"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }

    #[tokio::test]
    async fn test_upload_appends_one_report() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let request = post_multipart(
            "/api/reports/upload",
            &[Part::File("file", "blood panel.pdf", b"%PDF-1.4")],
        );
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["report"]["file_name"], "blood panel.pdf");
        assert_eq!(body["report"]["type"], "Medical Report");
        assert_eq!(body["report"]["content_type"], "application/pdf");
        assert!(body.get("medication").is_none());

        let reports = state.store.reports().await;
        assert_eq!(reports.len(), 4);
        assert_eq!(state.store.medications().await.len(), 2);

        let saved = reports[3].file_path.clone().unwrap();
        assert!(saved.ends_with("_blood_panel.pdf"));
        assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_upload_file_name_override() {
        let temp_dir = TempDir::new().unwrap();
        let (_, app) = test_app(temp_dir.path());

        let request = post_multipart(
            "/api/reports/upload",
            &[
                Part::Text("file_name", "January lipid panel"),
                Part::File("file", "scan.png", b"png"),
            ],
        );
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["report"]["file_name"], "January lipid panel");
        assert!(body["report"]["file_path"]
            .as_str()
            .unwrap()
            .ends_with("_scan.png"));
    }

    #[tokio::test]
    async fn test_prescription_upload_adds_medication() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let request = post_multipart(
            "/api/reports/upload",
            &[
                Part::File("file", "rx.jpg", b"jpeg bytes"),
                Part::Text("is_prescription", "true"),
            ],
        );
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["report"]["type"], "Prescription");

        let reports = state.store.reports().await;
        let medications = state.store.medications().await;
        assert_eq!(reports.len(), 4);
        assert_eq!(medications.len(), 3);

        let report = &reports[3];
        let medication = &medications[2];
        assert_eq!(medication.prescription_file, report.file_path);
        assert_eq!(medication.prescription_report_id, Some(report.id));
        assert_eq!(body["medication"]["id"], 3);
    }

    #[tokio::test]
    async fn test_disallowed_extension_leaves_state_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let request = post_multipart(
            "/api/reports/upload",
            &[
                Part::File("file", "installer.exe", b"MZ"),
                Part::Text("is_prescription", "true"),
            ],
        );
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File type not allowed");
        assert_eq!(state.store.reports().await.len(), 3);
        assert_eq!(state.store.medications().await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let request = post_multipart(
            "/api/reports/upload",
            &[Part::Text("is_prescription", "false")],
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");

        let request = post_multipart("/api/reports/upload", &[Part::File("file", "", b"")]);
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file selected");

        let request = post_json("/api/reports/upload", serde_json::json!({}));
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");

        assert_eq!(state.store.reports().await.len(), 3);
    }

    #[tokio::test]
    async fn test_file_part_without_filename_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let request = post_multipart("/api/reports/upload", &[Part::Text("file", "scan.pdf")]);
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");
        assert_eq!(state.store.reports().await.len(), 3);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let data = vec![b'x'; 17 * 1024 * 1024];
        let request = post_multipart(
            "/api/reports/upload",
            &[
                Part::File("file", "big.pdf", data.as_slice()),
                Part::Text("is_prescription", "true"),
            ],
        );
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File too large: max 16MB allowed");
        assert_eq!(state.store.reports().await.len(), 3);
        assert_eq!(state.store.medications().await.len(), 2);

        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_name_uploads_keep_their_own_files() {
        let temp_dir = TempDir::new().unwrap();
        let (state, app) = test_app(temp_dir.path());

        let mut handles = Vec::new();
        for i in 0..8 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let content = format!("scan contents {}", i);
                let request = post_multipart(
                    "/api/reports/upload",
                    &[Part::File("file", "scan.pdf", content.as_bytes())],
                );
                let (status, body) = send(&app, request).await;
                assert_eq!(status, StatusCode::CREATED);
                (body["report"]["file_path"].as_str().unwrap().to_string(), content)
            }));
        }

        let mut paths = HashSet::new();
        for handle in handles {
            let (path, content) = handle.await.unwrap();
            let written = tokio::fs::read_to_string(&path).await.unwrap();
            assert_eq!(written, content);
            paths.insert(path);
        }

        assert_eq!(paths.len(), 8);
        assert_eq!(state.store.reports().await.len(), 11);
    }
}
