use crate::{AppError, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "doc", "docx", "txt"];

/// A file written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub content_type: String,
    pub size: u64,
}

/// Lower-cased text after the last `.`, or empty if there is none.
pub fn extract_ext(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

pub fn is_allowed_file(filename: &str) -> bool {
    let ext = extract_ext(filename);
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Reduce a client-supplied name to something safe to use as a path component.
///
/// Whitespace and path separators collapse into a single `_`, other characters
/// outside `[A-Za-z0-9._-]` are dropped and leading/trailing `.`/`_` are trimmed.
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() || ch == '/' || ch == '\\' {
            pending_sep = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_') {
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.push(ch);
    }

    out.trim_matches(['.', '_']).to_string()
}

fn stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => filename,
    }
}

/// `<timestamp>_<uuid8>_<sanitized stem>.<ext>`. The uuid part keeps uploads
/// of the same file in the same instant from landing on one path.
pub fn stored_file_name(original_filename: &str) -> String {
    let ext = extract_ext(original_filename);
    let mut safe_name = sanitize_filename(stem(original_filename));
    if safe_name.len() > 120 {
        safe_name.truncate(120);
        safe_name = safe_name.trim_matches(['.', '_', '-']).to_string();
    }

    let unique_id = Uuid::new_v4().to_string()[..8].to_string();
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

    let mut name = format!("{}_{}", timestamp, unique_id);
    if !safe_name.is_empty() {
        name.push('_');
        name.push_str(&safe_name);
    }
    if !ext.is_empty() {
        name.push('.');
        name.push_str(&ext);
    }
    name
}

/// Write an upload to `upload_dir` under a sanitized, timestamped name.
pub async fn save_upload(
    upload_dir: &Path,
    original_filename: &str,
    data: &[u8],
) -> Result<StoredFile> {
    tokio::fs::create_dir_all(upload_dir).await.map_err(|e| {
        AppError::Storage(format!(
            "Failed to create upload directory {}: {}",
            upload_dir.display(),
            e
        ))
    })?;

    let stored_name = stored_file_name(original_filename);
    let path = upload_dir.join(&stored_name);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to save {}: {}", stored_name, e)))?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::info!(
        "Saved upload {} ({} bytes) to {}",
        original_filename,
        data.len(),
        path.display()
    );

    Ok(StoredFile {
        path,
        content_type,
        size: data.len() as u64,
    })
}
