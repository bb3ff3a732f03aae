//! Inference Client — the single HTTP path to the model-serving collaborators.
//!
//! Entity labeling, pair classification and embedding services are all
//! reached through this module. Every request is an idempotent inference
//! call, so transport failures, 429s and 5xx responses are retried with
//! exponential backoff.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed inference output: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

/// Shared client for all inference collaborators.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    max_attempts: u32,
    base_backoff: Duration,
}

impl InferenceClient {
    /// `request_timeout` bounds each individual HTTP attempt.
    pub fn new(request_timeout: Duration, max_attempts: u32) -> Result<Self, InferenceError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            base_backoff: DEFAULT_BASE_BACKOFF,
        })
    }

    #[cfg(test)]
    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// POSTs `body` as JSON to `url` and deserializes the JSON reply.
    /// Retries on transport errors, 429 and 5xx with exponential backoff.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, InferenceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let retryable = match self.client.post(url).json(body).send().await {
                Err(e) => InferenceError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!("Inference service {} returned {}: {}", url, status, body);
                        InferenceError::Api {
                            status: status.as_u16(),
                            message: body,
                        }
                    } else {
                        let text = response.text().await?;

                        if !status.is_success() {
                            let message = serde_json::from_str::<ServiceError>(&text)
                                .map(|e| e.error)
                                .unwrap_or(text);
                            return Err(InferenceError::Api {
                                status: status.as_u16(),
                                message,
                            });
                        }

                        debug!("Inference call to {} succeeded ({} bytes)", url, text.len());
                        return serde_json::from_str(&text).map_err(InferenceError::Parse);
                    }
                }
            };

            if attempt >= self.max_attempts {
                return Err(retryable);
            }

            let delay = self.backoff_delay(attempt);
            warn!(
                "Inference call to {} attempt {} failed, retrying after {}ms...",
                url,
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based):
    /// `base × 2^(attempt-1)`, saturating instead of overflowing.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_backoff.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(attempts: u32) -> InferenceClient {
        InferenceClient::new(Duration::from_secs(5), attempts)
            .unwrap()
            .with_base_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_post_json_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ner"))
            .and(body_json(json!({"text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let reply: Value = client(3)
            .post_json(&format!("{}/ner", server.uri()), &json!({"text": "hello"}))
            .await
            .unwrap();
        assert_eq!(reply["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_gives_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client(3)
            .post_json::<_, Value>(&server.uri(), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "input too long"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client(3)
            .post_json::<_, Value>(&server.uri(), &json!({}))
            .await
            .unwrap_err();
        match err {
            InferenceError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "input too long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        let client = InferenceClient::new(Duration::from_secs(5), 3)
            .unwrap()
            .with_base_backoff(Duration::from_millis(100));
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(400));

        let capped = client.backoff_delay(64);
        assert_eq!(capped, client.backoff_delay(u32::MAX));
        assert!(capped >= client.backoff_delay(32));
    }

    #[tokio::test]
    async fn test_transport_failure_returns_last_error() {
        // Nothing listens on the discard port.
        let err = client(2)
            .post_json::<_, Value>("http://127.0.0.1:9/score", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Http(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(1)
            .post_json::<_, Value>(&server.uri(), &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Parse(_)));
    }
}
