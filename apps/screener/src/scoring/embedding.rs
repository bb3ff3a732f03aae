//! Embedding-based scoring: both texts are embedded independently and the
//! raw cosine similarity in [-1, 1] is the score. Not rescaled.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScreeningError;
use crate::inference_client::{InferenceClient, InferenceError};
use crate::scoring::{truncate_prefix, ScoringStrategy, SimilarityScorer};

/// Text embedding collaborator. Returns one vector per input, in input order.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedder backed by an HTTP inference service.
///
/// Request: `{"inputs": [..]}`. Response: `{"embeddings": [[..], ..]}`.
pub struct HttpTextEmbedder {
    client: InferenceClient,
    url: String,
}

impl HttpTextEmbedder {
    pub fn new(client: InferenceClient, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl TextEmbedder for HttpTextEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, InferenceError> {
        let response: EmbedResponse = self
            .client
            .post_json(&self.url, &EmbedRequest { inputs: texts })
            .await?;
        if response.embeddings.len() != texts.len() {
            return Err(InferenceError::Malformed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings)
    }
}

pub struct EmbeddingScorer {
    embedder: Arc<dyn TextEmbedder>,
    max_input_chars: usize,
}

impl EmbeddingScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>, max_input_chars: usize) -> Self {
        Self {
            embedder,
            max_input_chars,
        }
    }
}

#[async_trait]
impl SimilarityScorer for EmbeddingScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Embedding
    }

    async fn score(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<f64, ScreeningError> {
        let inputs = [
            truncate_prefix(candidate_text, self.max_input_chars),
            truncate_prefix(job_description, self.max_input_chars),
        ];

        let embeddings = self
            .embedder
            .embed(&inputs)
            .await
            .map_err(ScreeningError::scoring)?;

        let [candidate, job] = embeddings.as_slice() else {
            return Err(ScreeningError::scoring(format!(
                "expected 2 embeddings, got {}",
                embeddings.len()
            )));
        };

        let similarity = cosine_similarity(candidate, job)?;
        debug!("Cosine similarity {similarity:.4}");
        Ok(similarity)
    }
}

/// Cosine similarity clamped to [-1, 1]. Fails on empty, mismatched or
/// zero-norm vectors, where the similarity is undefined.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ScreeningError> {
    if a.is_empty() || a.len() != b.len() {
        return Err(ScreeningError::scoring(format!(
            "embedding dimensions differ or are empty ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() || !dot.is_finite() {
        return Err(ScreeningError::scoring(
            "cosine similarity undefined for zero or non-finite embedding",
        ));
    }
    Ok((dot / denom).clamp(-1.0, 1.0))
}
