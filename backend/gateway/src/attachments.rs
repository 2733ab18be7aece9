//! Screenshot upload endpoint.
//!
//! `POST /api/upload` takes a multipart form with the two screenshots under
//! the `files` field and returns the aggregated analysis.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use liftlens_core::{AggregatedResponse, SubmittedImage, ValidationError};
use liftlens_media::resolve_media_type;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Multipart field name carrying the screenshots.
pub const UPLOAD_FIELD: &str = "files";

/// Handler for `POST /api/upload`.
pub async fn upload_screenshots(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AggregatedResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ValidationError::MalformedUpload(e.body_text()))?;
    let images = read_images(multipart).await?;

    info!(
        files = images.len(),
        bytes = images.iter().map(SubmittedImage::size).sum::<usize>(),
        "Received upload"
    );

    // A panic inside the pipeline surfaces as a JoinError rather than a dropped connection.
    let pipeline = state.pipeline.clone();
    let response = tokio::spawn(async move { pipeline.process(images).await })
        .await
        .map_err(|e| anyhow::anyhow!("analysis task failed: {e}"))??;

    Ok(Json(response))
}

async fn read_images(mut multipart: Multipart) -> Result<Vec<SubmittedImage>, ValidationError> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Ignoring form field");
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let media_type = resolve_media_type(field.content_type(), &filename);
        let data = field
            .bytes()
            .await
            .map_err(upload_error)?;

        images.push(SubmittedImage {
            filename,
            media_type,
            data,
        });
    }

    Ok(images)
}

fn upload_error(err: MultipartError) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::UploadTooLarge
    } else {
        ValidationError::MalformedUpload(err.body_text())
    }
}
