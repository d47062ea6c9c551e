//! Stub generator for testing and offline mode

use async_trait::async_trait;
use topic_tweeter_domain::{GenerateError, Generator};

/// Stub generator that returns configurable responses
pub struct StubGenerator {
    response: Option<String>,
    error: Option<GenerateError>,
}

impl StubGenerator {
    /// Create a stub that always returns the given text
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerateError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Create a stub that writes a canned post mentioning the topic
    pub fn echo() -> Self {
        Self {
            response: None,
            error: None,
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, topic: &str) -> Result<String, GenerateError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                GenerateError::Api(msg) => GenerateError::Api(msg.clone()),
                GenerateError::InvalidFormat(msg) => GenerateError::InvalidFormat(msg.clone()),
                GenerateError::Empty => GenerateError::Empty,
                GenerateError::RateLimited => GenerateError::RateLimited,
                GenerateError::Timeout => GenerateError::Timeout,
                GenerateError::Config(msg) => GenerateError::Config(msg.clone()),
            });
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        let title = topic.split(':').next().unwrap_or(topic).trim();
        let hashtag: String = title.chars().filter(|c| c.is_alphanumeric()).collect();

        Ok(format!(
            "Where will {} be a year from now? #{}",
            title, hashtag
        ))
    }

    fn provider(&self) -> &'static str {
        "stub"
    }
}
