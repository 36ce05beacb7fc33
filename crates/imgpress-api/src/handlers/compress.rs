use axum::{
    extract::{Multipart, State},
    http::{header::HOST, HeaderMap},
    Json,
};
use imgpress_core::models::{CompressResponse, UploadedImage};
use imgpress_core::Config;
use imgpress_services::ResultReporter;
use std::sync::Arc;

use crate::constants::{UPLOADS_PATH, UPLOAD_FIELD_NAME};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, sanitize_filename, validate_file_size};

/// Compress an image
///
/// Re-encodes the uploaded image in its own format. When the result is smaller it is
/// stored under a generated name; otherwise the original is stored and served and the
/// ratio is `0.00`. An original whose name is already taken is stored under a
/// timestamped variant of it.
///
/// # Errors
/// - `AppError::NoFileProvided` - No `image` part in the form
/// - `AppError::UnsupportedFormat` - Declared type is not JPEG, PNG or WebP
/// - `AppError::PayloadTooLarge` - File exceeds size limit
/// - `AppError::EncodingFailed` - Decoder or encoder failure
/// - `AppError::Storage` - Output or original could not be written
#[utoipa::path(
    post,
    path = "/compress",
    tag = "compression",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image processed", body = CompressResponse),
        (status = 400, description = "No file or unsupported format", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Error compressing image", body = String, content_type = "text/plain")
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "compress_image"))]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<CompressResponse>, HttpAppError> {
    let file = extract_multipart_file(multipart, UPLOAD_FIELD_NAME).await?;
    validate_file_size(file.data.len(), state.config.max_file_size_bytes)?;

    let upload = UploadedImage::new(
        file.data,
        file.content_type,
        sanitize_filename(&file.file_name),
    );

    tracing::debug!(
        file_name = %upload.original_file_name,
        content_type = %upload.content_type,
        size_bytes = upload.size(),
        "Received image for compression"
    );

    let mut outcome = state.compressor.compress(&upload).await?;

    if !outcome.is_accepted() && state.config.retain_rejected_originals {
        outcome.original_file_name = state.compressor.retain_original(&upload).await?;
    }

    let base_url = uploads_base_url(&state.config, &headers);
    Ok(Json(ResultReporter::build_response(&outcome, &base_url)))
}

/// `<public origin>/uploads`, where the origin is `PUBLIC_BASE_URL` when set and the
/// request's `Host` otherwise.
fn uploads_base_url(config: &Config, headers: &HeaderMap) -> String {
    let origin = match config.public_base_url {
        Some(ref url) => url.trim_end_matches('/').to_string(),
        None => {
            let host = headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("localhost:{}", config.server_port));
            format!("http://{}", host)
        }
    };

    format!("{}{}", origin, UPLOADS_PATH)
}
