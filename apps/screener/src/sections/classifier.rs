//! Entity classifier collaborator — labels spans of resume text.
//!
//! The NER model itself is an external service; this module only owns its
//! input/output contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::inference_client::{InferenceClient, InferenceError};
use crate::models::LabeledSpan;

/// Labels spans of text. Implementations must return spans in the order the
/// underlying engine produced them.
#[async_trait]
pub trait EntityClassifier: Send + Sync {
    async fn label_spans(&self, text: &str) -> Result<Vec<LabeledSpan>, InferenceError>;
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct NerResponse {
    entities: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    text: String,
    label: String,
}

/// Entity classifier backed by an HTTP NER service.
///
/// Request: `{"text": "..."}`. Response: `{"entities": [{"text", "label"}]}`.
pub struct HttpEntityClassifier {
    client: InferenceClient,
    url: String,
}

impl HttpEntityClassifier {
    pub fn new(client: InferenceClient, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl EntityClassifier for HttpEntityClassifier {
    async fn label_spans(&self, text: &str) -> Result<Vec<LabeledSpan>, InferenceError> {
        let response: NerResponse = self.client.post_json(&self.url, &NerRequest { text }).await?;
        Ok(response
            .entities
            .into_iter()
            .map(|e| LabeledSpan::new(e.text, e.label.as_str()))
            .collect())
    }
}
