//! Similarity Scoring — pluggable, trait-based scorer for (resume, JD) pairs.
//!
//! Two strategies with different output ranges, chosen explicitly at startup:
//! - `Classification`: match-class probability as a percentage in [0, 100],
//!   rounded to two decimals.
//! - `Embedding`: raw cosine similarity of the two embeddings in [-1, 1].
//!
//! `MatchPipeline` holds an `Arc<dyn SimilarityScorer>`.

pub mod classification;
pub mod embedding;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ScreeningError;
use crate::inference_client::InferenceClient;

pub use classification::{ClassificationScorer, HttpPairClassifier};
pub use embedding::{EmbeddingScorer, HttpTextEmbedder};

// ────────────────────────────────────────────────────────────────────────────
// Strategy selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    Classification,
    Embedding,
}

impl ScoringStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStrategy::Classification => "classification",
            ScoringStrategy::Embedding => "embedding",
        }
    }

    /// Inclusive bounds of the scores this strategy produces.
    pub fn score_range(&self) -> (f64, f64) {
        match self {
            ScoringStrategy::Classification => (0.0, 100.0),
            ScoringStrategy::Embedding => (-1.0, 1.0),
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classification" => Ok(ScoringStrategy::Classification),
            "embedding" => Ok(ScoringStrategy::Embedding),
            other => Err(format!(
                "unknown scoring strategy '{other}' (expected 'classification' or 'embedding')"
            )),
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores how well a candidate text matches a job description.
///
/// A collaborator failure is an `Err(ScreeningError::Scoring)`, never a
/// sentinel number: a score of 0 always means "scored, no match".
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    fn strategy(&self) -> ScoringStrategy;

    async fn score(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<f64, ScreeningError>;
}

/// Builds the configured scorer over the shared inference client.
pub fn build_scorer(config: &Config, client: InferenceClient) -> Arc<dyn SimilarityScorer> {
    let url = config.scoring_service_url.clone();
    match config.scoring_strategy {
        ScoringStrategy::Classification => Arc::new(ClassificationScorer::new(
            Arc::new(HttpPairClassifier::new(client, url)),
            config.match_class_index,
            config.max_input_chars,
        )),
        ScoringStrategy::Embedding => Arc::new(EmbeddingScorer::new(
            Arc::new(HttpTextEmbedder::new(client, url)),
            config.max_input_chars,
        )),
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
