//! Shared fixtures and stub collaborators for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};

use crate::errors::ScreeningError;
use crate::inference_client::InferenceError;
use crate::models::LabeledSpan;
use crate::scoring::{ScoringStrategy, SimilarityScorer};
use crate::sections::EntityClassifier;

/// Builds an in-memory DOCX with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::new();
    for text in paragraphs {
        let para = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx = docx.add_paragraph(para);
    }
    let mut buf = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut buf).expect("pack docx fixture");
    buf.into_inner()
}

/// Builds an in-memory PDF with one page per entry. Each non-empty entry is
/// drawn as a single Helvetica line; empty entries give pages with no text.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    // Objects 1 and 2 are the catalog and page tree, 3 is the font, and each
    // page takes two more: the page itself and its content stream.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (text, page_id) in pages.iter().zip(&page_ids) {
        let content = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET")
        };
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(
        format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
    );
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

/// Entity classifier returning a fixed span list, or failing.
pub struct StubClassifier {
    spans: Vec<LabeledSpan>,
    fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StubClassifier {
    pub fn with_spans(spans: Vec<LabeledSpan>) -> Self {
        Self {
            spans,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            spans: vec![],
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl EntityClassifier for StubClassifier {
    async fn label_spans(&self, _text: &str) -> Result<Vec<LabeledSpan>, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(InferenceError::Malformed("stub classifier failure".to_string()));
        }
        Ok(self.spans.clone())
    }
}

enum StubOutcome {
    Score(f64),
    Fail,
    Hang(Duration),
}

/// Similarity scorer returning a fixed score, failing, or hanging.
pub struct StubScorer {
    outcome: StubOutcome,
    strategy: ScoringStrategy,
    pub calls: Arc<AtomicUsize>,
}

impl StubScorer {
    fn new(outcome: StubOutcome) -> Self {
        Self {
            outcome,
            strategy: ScoringStrategy::Classification,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fixed(score: f64) -> Self {
        Self::new(StubOutcome::Score(score))
    }

    pub fn failing() -> Self {
        Self::new(StubOutcome::Fail)
    }

    pub fn hanging(delay: Duration) -> Self {
        Self::new(StubOutcome::Hang(delay))
    }
}

#[async_trait]
impl SimilarityScorer for StubScorer {
    fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    async fn score(&self, _candidate: &str, _job: &str) -> Result<f64, ScreeningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            StubOutcome::Score(score) => Ok(score),
            StubOutcome::Fail => Err(ScreeningError::scoring("stub scorer failure")),
            StubOutcome::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(0.0)
            }
        }
    }
}
