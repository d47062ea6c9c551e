//! Text-generation adapters

pub mod hive;
pub mod openai_compat;
pub mod stub;

pub use hive::HiveGenerator;
pub use openai_compat::OpenAiCompatGenerator;
pub use stub::StubGenerator;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use topic_tweeter_domain::GenerateError;

/// Character budget asked of the model, below the hard posting limit
pub const PROMPT_CHAR_BUDGET: usize = 250;

/// Common generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Model name/ID (ignored by providers without model selection)
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 200,
            timeout_secs: 30,
        }
    }
}

/// Build the tweet-writing prompt for a topic
pub fn build_tweet_prompt(topic: &str) -> String {
    format!(
        "Write a tweet about the topic below.\n\
         Requirements:\n\
         - At most 2 sentences and {PROMPT_CHAR_BUDGET} characters\n\
         - Informative, approachable and engaging\n\
         - Phrase it as a question or a prediction where possible\n\
         - Include relevant hashtags\n\
         - Do not promote any specific product or service\n\
         - Do not use emojis\n\
         Topic: {topic}"
    )
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, GenerateError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GenerateError::Config(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Api(e.to_string())
    }
}

/// Map a non-success status to an error, consuming the body for context
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, GenerateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == 429 {
        return Err(GenerateError::RateLimited);
    }

    let body = response.text().await.unwrap_or_default();
    if status == 401 || status == 403 {
        return Err(GenerateError::Config(format!(
            "API rejected credentials ({}): {}",
            status, body
        )));
    }

    Err(GenerateError::Api(format!(
        "API returned {}: {}",
        status, body
    )))
}

/// Trim model output and reject empty text
pub(crate) fn non_empty(text: &str) -> Result<String, GenerateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerateError::Empty);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_topic_and_budget() {
        let prompt = build_tweet_prompt("DevOps: DevOps practices and tools");
        assert!(prompt.ends_with("Topic: DevOps: DevOps practices and tools"));
        assert!(prompt.contains("250 characters"));
        assert!(prompt.contains("hashtags"));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  hi #x \n").unwrap(), "hi #x");
        assert!(matches!(non_empty(" \n "), Err(GenerateError::Empty)));
    }
}
