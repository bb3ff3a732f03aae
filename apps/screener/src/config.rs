use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::scoring::ScoringStrategy;

pub const DEFAULT_JOB_DESCRIPTION: &str = "Looking for a Python Developer with NLP experience";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ner_service_url: String,
    pub scoring_service_url: String,
    pub scoring_strategy: ScoringStrategy,
    pub match_class_index: usize,
    pub max_input_chars: usize,
    pub collaborator_timeout: Duration,
    pub inference_max_retries: u32,
    pub max_upload_bytes: usize,
    pub default_job_description: String,
    pub drop_blank_spans: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            ner_service_url: require("NER_SERVICE_URL")?,
            scoring_service_url: require("SCORING_SERVICE_URL")?,
            scoring_strategy: lookup("SCORING_STRATEGY")
                .map(|v| v.parse::<ScoringStrategy>().map_err(|e| anyhow!(e)))
                .transpose()
                .context("SCORING_STRATEGY is invalid")?
                .unwrap_or(ScoringStrategy::Classification),
            match_class_index: parse_or(&lookup, "MATCH_CLASS_INDEX", 1)?,
            max_input_chars: parse_or(&lookup, "MAX_INPUT_CHARS", 2048)?,
            collaborator_timeout: Duration::from_secs(parse_or(
                &lookup,
                "COLLABORATOR_TIMEOUT_SECS",
                30,
            )?),
            inference_max_retries: parse_or(&lookup, "INFERENCE_MAX_RETRIES", 3)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            default_job_description: lookup("DEFAULT_JOB_DESCRIPTION")
                .unwrap_or_else(|| DEFAULT_JOB_DESCRIPTION.to_string()),
            drop_blank_spans: parse_or(&lookup, "DROP_BLANK_SPANS", false)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("NER_SERVICE_URL", "http://localhost:9001/ner"),
        ("SCORING_SERVICE_URL", "http://localhost:9002/score"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(&REQUIRED).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.scoring_strategy, ScoringStrategy::Classification);
        assert_eq!(config.match_class_index, 1);
        assert_eq!(config.max_input_chars, 2048);
        assert_eq!(config.collaborator_timeout, Duration::from_secs(30));
        assert_eq!(config.default_job_description, DEFAULT_JOB_DESCRIPTION);
        assert!(!config.drop_blank_spans);
    }

    #[test]
    fn test_missing_required_variable_fails() {
        let err = config_from(&REQUIRED[..1]).unwrap_err();
        assert!(err.to_string().contains("SCORING_SERVICE_URL"));
    }

    #[test]
    fn test_embedding_strategy_and_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("SCORING_STRATEGY", "embedding"),
            ("PORT", "9090"),
            ("DROP_BLANK_SPANS", "true"),
        ]);
        let config = config_from(&pairs).unwrap();
        assert_eq!(config.scoring_strategy, ScoringStrategy::Embedding);
        assert_eq!(config.port, 9090);
        assert!(config.drop_blank_spans);
    }

    #[test]
    fn test_invalid_values_fail() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(config_from(&pairs).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SCORING_STRATEGY", "keyword"));
        assert!(config_from(&pairs).is_err());
    }
}
