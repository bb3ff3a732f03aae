//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{file_extension, MatchResult};
use crate::scoring::ScoringStrategy;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub result: MatchResult,
    pub scoring_strategy: ScoringStrategy,
    /// Inclusive bounds of `result.score` for this strategy.
    pub score_range: (f64, f64),
}

struct Upload {
    filename: String,
    content: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screen
///
/// Multipart form: `file` (PDF or DOCX resume) and optional `job_description`.
/// Returns the extracted profile and the match score.
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, AppError> {
    let mut upload: Option<Upload> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                upload = Some(Upload { filename, content });
            }
            "job_description" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?;
                job_description = Some(text);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    if upload.filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let job_description = match job_description {
        Some(jd) if jd.trim().is_empty() => {
            return Err(AppError::Validation(
                "job_description cannot be empty".to_string(),
            ))
        }
        Some(jd) => jd,
        None => state.config.default_job_description.clone(),
    };

    let format_tag = file_extension(&upload.filename);
    let result = state
        .pipeline
        .run_tagged(upload.content, format_tag, &job_description)
        .await?;
    let scoring_strategy = state.pipeline.scoring_strategy();

    Ok(Json(ScreenResponse {
        result,
        scoring_strategy,
        score_range: scoring_strategy.score_range(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
