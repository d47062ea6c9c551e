//! X (Twitter) API adapters

mod oauth;
mod write;

pub use oauth::OAuthCredentials;
pub use write::{DEFAULT_BASE_URL, XPublisher};

use async_trait::async_trait;
use std::sync::Mutex;
use topic_tweeter_domain::{PublishError, PublishResult, Publisher};

/// Stub X publisher that records posts instead of sending them
pub struct StubXPublisher {
    enabled: bool,
    published: Mutex<Vec<String>>,
}

impl StubXPublisher {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            published: Mutex::new(vec![]),
        }
    }

    /// Get all texts that were published
    pub fn get_published(&self) -> Vec<String> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Publisher for StubXPublisher {
    async fn publish(&self, text: &str) -> Result<PublishResult, PublishError> {
        if !self.enabled {
            return Err(PublishError::Disabled);
        }

        let mut published = self
            .published
            .lock()
            .map_err(|e| PublishError::Api(e.to_string()))?;
        published.push(text.to_string());
        let id = format!("stub_{}", published.len());

        Ok(PublishResult {
            url: Some(format!("https://x.com/stub/status/{}", id)),
            id,
        })
    }

    fn platform(&self) -> &'static str {
        "x"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_posts() {
        let publisher = StubXPublisher::new(true);

        let first = publisher.publish("one").await.unwrap();
        let second = publisher.publish("two").await.unwrap();

        assert_eq!(first.id, "stub_1");
        assert_eq!(second.id, "stub_2");
        assert_eq!(publisher.get_published(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_disabled_stub() {
        let publisher = StubXPublisher::new(false);

        assert!(matches!(
            publisher.publish("one").await,
            Err(PublishError::Disabled)
        ));
        assert!(publisher.get_published().is_empty());
    }
}
