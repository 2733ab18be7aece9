use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use liftlens_core::{AggregatedResponse, LiftLensError, ValidationError};

/// Message returned for anything that is not the client's fault.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Failed to process upload";

/// HTTP mapping for [`LiftLensError`]: validation is 400 (413 when the body
/// is over the limit), everything else 500.
///
/// The body is always `{ "success": false, "error": ... }`.
#[derive(Debug)]
pub struct ApiError(pub LiftLensError);

impl From<LiftLensError> for ApiError {
    fn from(err: LiftLensError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LiftLensError::Validation(e @ ValidationError::UploadTooLarge) => {
                (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
            }
            LiftLensError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            LiftLensError::Unexpected(other) => {
                error!(error = %other, "Upload failed unexpectedly");
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE.to_string())
            }
        };
        (status, Json(AggregatedResponse::failure(message))).into_response()
    }
}
