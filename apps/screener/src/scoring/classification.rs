//! Classification-based scoring: a binary pair classifier judges the
//! (resume, JD) pair and the "match" class probability becomes a percentage.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScreeningError;
use crate::inference_client::{InferenceClient, InferenceError};
use crate::scoring::{truncate_prefix, ScoringStrategy, SimilarityScorer};

// Slack for probabilities that drift just past [0, 1] after serialization.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Raw classifier output. Services may return either normalized
/// probabilities or unnormalized logits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClassOutput {
    Probabilities { probabilities: Vec<f64> },
    Logits { logits: Vec<f64> },
}

impl ClassOutput {
    pub fn into_probabilities(self) -> Vec<f64> {
        match self {
            ClassOutput::Probabilities { probabilities } => probabilities,
            ClassOutput::Logits { logits } => softmax(&logits),
        }
    }
}

/// Pair classifier collaborator: judges two texts jointly.
#[async_trait]
pub trait PairClassifier: Send + Sync {
    async fn classify_pair(&self, text: &str, text_pair: &str)
        -> Result<ClassOutput, InferenceError>;
}

#[derive(Debug, Serialize)]
struct PairRequest<'a> {
    text: &'a str,
    text_pair: &'a str,
}

/// Pair classifier backed by an HTTP inference service.
///
/// Request: `{"text", "text_pair"}`. Response: `{"probabilities": [..]}` or
/// `{"logits": [..]}`.
pub struct HttpPairClassifier {
    client: InferenceClient,
    url: String,
}

impl HttpPairClassifier {
    pub fn new(client: InferenceClient, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl PairClassifier for HttpPairClassifier {
    async fn classify_pair(
        &self,
        text: &str,
        text_pair: &str,
    ) -> Result<ClassOutput, InferenceError> {
        self.client
            .post_json(&self.url, &PairRequest { text, text_pair })
            .await
    }
}

pub struct ClassificationScorer {
    classifier: Arc<dyn PairClassifier>,
    match_class_index: usize,
    max_input_chars: usize,
}

impl ClassificationScorer {
    pub fn new(
        classifier: Arc<dyn PairClassifier>,
        match_class_index: usize,
        max_input_chars: usize,
    ) -> Self {
        Self {
            classifier,
            match_class_index,
            max_input_chars,
        }
    }
}

#[async_trait]
impl SimilarityScorer for ClassificationScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Classification
    }

    async fn score(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<f64, ScreeningError> {
        let candidate = truncate_prefix(candidate_text, self.max_input_chars);
        let job = truncate_prefix(job_description, self.max_input_chars);

        let output = self
            .classifier
            .classify_pair(candidate, job)
            .await
            .map_err(ScreeningError::scoring)?;

        let probability = match_probability(output, self.match_class_index)?;
        let score = to_percentage(probability);
        debug!("Match probability {probability:.4} → score {score}");
        Ok(score)
    }
}

/// Picks the match-class probability and validates it.
pub fn match_probability(output: ClassOutput, index: usize) -> Result<f64, ScreeningError> {
    let probabilities = output.into_probabilities();
    let p = probabilities.get(index).copied().ok_or_else(|| {
        ScreeningError::scoring(format!(
            "classifier returned {} classes, match class index is {index}",
            probabilities.len()
        ))
    })?;

    if !p.is_finite() || p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
        return Err(ScreeningError::scoring(format!(
            "match probability {p} is outside [0, 1]"
        )));
    }
    Ok(p.clamp(0.0, 1.0))
}

/// Probability → percentage, rounded to two decimals.
pub fn to_percentage(probability: f64) -> f64 {
    ((probability * 100.0 * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Numerically stable softmax. Non-finite input yields NaNs, which the
/// probability check rejects.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
