use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidgate_core::{sanitize_filename, validate_format_id, validate_url, AppError};

const DEFAULT_FILENAME: &str = "video";

#[derive(Debug, Deserialize, ToSchema)]
pub struct DownloadRequest {
    pub url: Option<String>,
    pub format_id: Option<String>,
    pub filename: Option<String>,
}

/// Stream one format of a video straight to the client as an attachment.
///
/// The body starts flowing before the temp file is fully read; the file is
/// removed once the stream ends, whether the transfer completed or the
/// client disconnected.
#[utoipa::path(
    post,
    path = "/api/download",
    tag = "videos",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Streamed media file", content_type = "application/octet-stream"),
        (status = 400, description = "Missing or invalid url/format_id", body = ErrorResponse),
        (status = 500, description = "Extraction or streaming failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn download(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> Result<Response<Body>, HttpAppError> {
    let url = request.url.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let format_id = request
        .format_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let (url, format_id) = match (url, format_id) {
        (Some(url), Some(format_id)) => (url, format_id),
        _ => {
            return Err(
                AppError::InvalidInput("URL and format ID are required".to_string()).into(),
            );
        }
    };

    validate_url(url)?;
    validate_format_id(format_id)?;

    let file = state
        .extractor
        .fetch(url, format_id)
        .await
        .map_err(|e| e.into_download_error())?;

    let stem = sanitize_filename(request.filename.as_deref().unwrap_or(DEFAULT_FILENAME));
    let stem = if stem.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        stem
    };
    let content_disposition = format!("attachment; filename=\"{}.{}\"", stem, file.extension());

    // Consumes the LocalFile; the stream's drop guard owns deletion from here
    let stream = file
        .into_stream()
        .await
        .map_err(|e| e.into_download_error())?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}
