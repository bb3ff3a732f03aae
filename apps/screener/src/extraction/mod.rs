//! Text extraction — turns an uploaded PDF or DOCX into one plain-text string.
//!
//! Format dispatch happens on the already-validated `DocumentFormat`; unknown
//! formats are rejected when the `Document` is built, before we get here.
//!
//! Parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`. A parser
//! panic surfaces as an extraction error through the `JoinError`.

pub mod docx;
pub mod pdf;

use tracing::debug;

use crate::errors::ScreeningError;
use crate::models::{Document, DocumentFormat, PlainText};

/// Separator between pages (PDF) and paragraphs (DOCX).
pub const SEGMENT_SEPARATOR: &str = "\n";

/// Extracts the plain text of `document`, consuming it.
pub async fn extract_text(document: Document) -> Result<PlainText, ScreeningError> {
    let (content, format) = document.into_parts();

    let segments = tokio::task::spawn_blocking(move || match format {
        DocumentFormat::Pdf => pdf::page_texts(&content),
        DocumentFormat::Docx => docx::paragraph_texts(&content),
    })
    .await
    .map_err(|e| ScreeningError::extraction(format!("{format} parser aborted: {e}")))??;

    debug!("Extracted {} {} segments", segments.len(), format);
    Ok(PlainText::new(join_segments(&segments)))
}

/// Joins segments in order. Empty segments are kept so positions survive.
pub fn join_segments(segments: &[String]) -> String {
    segments.join(SEGMENT_SEPARATOR)
}
