//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Topic;

/// Error type for topic source operations
#[derive(Debug, Error)]
pub enum TopicStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
    #[error("No topics found in {0}")]
    Empty(String),
}

/// Port for loading the ordered topic list
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Load all topics in file order. Never returns an empty list.
    async fn load(&self) -> Result<Vec<Topic>, TopicStoreError>;
}

/// Error type for cursor store operations
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt cursor value {value:?}: {message}")]
    Corrupt { value: String, message: String },
}

/// Port for the persisted rotation cursor (index of the last topic served)
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Read the stored index. `Ok(None)` means nothing has been stored yet.
    async fn load(&self) -> Result<Option<u64>, CursorError>;

    /// Overwrite the stored index
    async fn write_last(&self, index: u64) -> Result<(), CursorError>;

    /// Read the stored index, falling back to 0 when it is missing or unreadable
    async fn read_last(&self) -> u64 {
        match self.load().await {
            Ok(Some(index)) => index,
            Ok(None) => {
                tracing::info!("No stored topic index, starting from the beginning");
                0
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read topic index, starting from the beginning");
                0
            }
        }
    }
}

/// Error type for tweet generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Empty response")]
    Empty,
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for generating tweet text about a topic
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate short-form text about `topic` (rendered `title: description`)
    async fn generate(&self, topic: &str) -> Result<String, GenerateError>;

    /// Provider name for logging
    fn provider(&self) -> &'static str;
}

/// Error type for publisher operations
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Content too long: {len} > {max}")]
    ContentTooLong { len: usize, max: usize },
    #[error("Publisher is disabled")]
    Disabled,
}

/// Result of a successful publish operation
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// Platform-specific post ID
    pub id: String,
    /// URL to the published content, if available
    pub url: Option<String>,
}

/// Port for publishing tweet text
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `text`, returns the platform's post ID
    async fn publish(&self, text: &str) -> Result<PublishResult, PublishError>;

    /// Get the platform name (e.g., "x")
    fn platform(&self) -> &'static str;
}
