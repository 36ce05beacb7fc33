//! Common utilities for the upload handler

use axum::extract::Multipart;
use bytes::Bytes;
use imgpress_core::AppError;

use crate::error::HttpAppError;

/// File part pulled out of a multipart body
#[derive(Debug)]
pub struct MultipartFile {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// Extract the file sent under `field_name` from a multipart form.
///
/// Other fields are ignored. More than one part named `field_name` is rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<MultipartFile, HttpAppError> {
    let mut file: Option<MultipartFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        if file.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple file fields are not allowed; send exactly one field named '{}'",
                field_name
            ))
            .into());
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field.bytes().await?;

        file = Some(MultipartFile {
            data,
            file_name,
            content_type,
        });
    }

    file.ok_or_else(|| AppError::NoFileProvided.into())
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Reduce a client-supplied file name to a single safe storage key.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]` become `_`
/// and runs of dots collapse to one.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    // Browsers on Windows may send the full client path
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut sanitized = String::with_capacity(filename_only.len());
    for c in filename_only.chars().take(MAX_FILENAME_LENGTH) {
        let c = if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }

    if sanitized.trim_matches('.').is_empty() || sanitized.chars().count() < 3 {
        return "file".to_string();
    }

    sanitized
}
