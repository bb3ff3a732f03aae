//! Match Pipeline — orchestrates one screening run.
//!
//! Flow: extract_text → { label spans → resolve sections ∥ similarity score }
//!       → MatchResult.
//!
//! Profile resolution and scoring share nothing but the read-only extracted
//! text, so they run concurrently. Either failing fails the whole run; no
//! partial result is ever returned. Nothing is kept between runs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::ScreeningError;
use crate::extraction::extract_text;
use crate::models::{CandidateProfile, Document, MatchResult};
use crate::scoring::{ScoringStrategy, SimilarityScorer};
use crate::sections::{EntityClassifier, SectionResolver};

pub struct MatchPipeline {
    classifier: Arc<dyn EntityClassifier>,
    resolver: SectionResolver,
    scorer: Arc<dyn SimilarityScorer>,
    collaborator_timeout: Duration,
}

impl MatchPipeline {
    pub fn new(
        classifier: Arc<dyn EntityClassifier>,
        resolver: SectionResolver,
        scorer: Arc<dyn SimilarityScorer>,
        collaborator_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            resolver,
            scorer,
            collaborator_timeout,
        }
    }

    pub fn scoring_strategy(&self) -> ScoringStrategy {
        self.scorer.strategy()
    }

    /// Runs the pipeline on a document whose format is declared by a tag.
    /// Unknown tags fail before any extraction or collaborator call.
    pub async fn run_tagged(
        &self,
        content: Bytes,
        format_tag: &str,
        job_description: &str,
    ) -> Result<MatchResult, ScreeningError> {
        let document = Document::from_tag(content, format_tag)?;
        self.run(document, job_description).await
    }

    /// Steps:
    /// 1. extract_text() → PlainText (failure aborts the run)
    /// 2. classifier.label_spans() → resolver.resolve() → CandidateProfile
    /// 3. scorer.score() → f64, concurrently with step 2
    /// 4. assemble MatchResult once both succeed
    pub async fn run(
        &self,
        document: Document,
        job_description: &str,
    ) -> Result<MatchResult, ScreeningError> {
        let run_id = Uuid::new_v4();
        info!(
            "Screening run {run_id}: {} document, {} bytes",
            document.format(),
            document.len()
        );

        // Step 1: Extract text
        let text = extract_text(document).await?;
        debug!(
            "Run {run_id}: extracted {} chars: {:?}",
            text.as_str().chars().count(),
            text.as_str().chars().take(60).collect::<String>()
        );

        // Steps 2 + 3: Resolve profile and score concurrently
        let (profile, score) = tokio::try_join!(
            self.resolve_profile(text.as_str()),
            self.score(text.as_str(), job_description)
        )?;

        info!(
            "Screening run {run_id} finished: score={score} ({}), {} profile entries",
            self.scorer.strategy(),
            profile.len()
        );

        // Step 4: Assemble
        Ok(MatchResult { profile, score })
    }

    async fn resolve_profile(&self, text: &str) -> Result<CandidateProfile, ScreeningError> {
        let spans = with_timeout(
            self.collaborator_timeout,
            self.classifier.label_spans(text),
        )
        .await
        .map_err(|e| match e {
            CallError::TimedOut(t) => {
                ScreeningError::extraction(format!("entity classifier timed out after {t:?}"))
            }
            CallError::Failed(e) => ScreeningError::extraction(e),
        })?;

        let span_count = spans.len();
        debug!("Entity classifier returned {span_count} spans");

        let profile = self.resolver.resolve(spans);
        if profile.is_empty() {
            warn!("No profile entries resolved from {span_count} labeled spans");
        }
        Ok(profile)
    }

    async fn score(&self, text: &str, job_description: &str) -> Result<f64, ScreeningError> {
        with_timeout(
            self.collaborator_timeout,
            self.scorer.score(text, job_description),
        )
        .await
        .map_err(|e| match e {
            CallError::TimedOut(t) => {
                ScreeningError::scoring(format!("similarity scorer timed out after {t:?}"))
            }
            CallError::Failed(e) => e,
        })
    }
}

enum CallError<E> {
    TimedOut(Duration),
    Failed(E),
}

async fn with_timeout<T, E>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, CallError<E>> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(CallError::Failed),
        Err(_) => Err(CallError::TimedOut(limit)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
