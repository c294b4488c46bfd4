use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use vidgate_core::{validate_url, AppError, VideoMetadata};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VideoInfoRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoInfoResponse {
    pub success: bool,
    pub data: VideoMetadata,
}

/// Fetch available formats and information for a video URL.
#[utoipa::path(
    post,
    path = "/api/video-info",
    tag = "videos",
    request_body = VideoInfoRequest,
    responses(
        (status = 200, description = "Video metadata", body = VideoInfoResponse),
        (status = 400, description = "Missing or invalid URL", body = ErrorResponse),
        (status = 500, description = "Extraction failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VideoInfoRequest>,
) -> Result<Json<VideoInfoResponse>, HttpAppError> {
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::InvalidInput("URL is required".to_string()))?;

    validate_url(url)?;

    let data = state
        .extractor
        .probe(url)
        .await
        .map_err(|e| e.into_probe_error())?;

    Ok(Json(VideoInfoResponse {
        success: true,
        data,
    }))
}
