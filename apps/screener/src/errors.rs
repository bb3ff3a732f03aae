use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Boxed underlying cause carried by pipeline errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a screening run. Never mixed with a valid profile or score:
/// a run either yields a full `MatchResult` or exactly one of these.
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("Unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    Extraction(#[source] BoxError),

    #[error("Scoring failed: {0}")]
    Scoring(#[source] BoxError),
}

impl ScreeningError {
    pub fn extraction(cause: impl Into<BoxError>) -> Self {
        ScreeningError::Extraction(cause.into())
    }

    pub fn scoring(cause: impl Into<BoxError>) -> Self {
        ScreeningError::Scoring(cause.into())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Screening(#[from] ScreeningError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Screening(ScreeningError::UnsupportedFormat(tag)) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file format '{tag}'. Please upload a PDF or DOCX."),
            ),
            AppError::Screening(e @ ScreeningError::Extraction(_)) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_ERROR",
                    "The document could not be read".to_string(),
                )
            }
            AppError::Screening(e @ ScreeningError::Scoring(_)) => {
                tracing::error!("Scoring error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SCORING_ERROR",
                    "The scoring service failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
