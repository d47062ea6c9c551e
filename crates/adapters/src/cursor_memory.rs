//! In-memory cursor store for testing and dry runs

use async_trait::async_trait;
use std::sync::RwLock;
use topic_tweeter_domain::{CursorError, CursorStore};

/// In-memory cursor implementation
pub struct InMemoryCursorStore {
    value: RwLock<Option<u64>>,
}

impl InMemoryCursorStore {
    pub fn new() -> Self {
        Self::with_value(None)
    }

    /// Start from a known value, e.g. one read from the persisted cursor
    pub fn with_value(value: Option<u64>) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    fn poisoned(e: impl std::fmt::Display) -> CursorError {
        CursorError::Io(std::io::Error::other(e.to_string()))
    }
}

impl Default for InMemoryCursorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CursorStore for InMemoryCursorStore {
    async fn load(&self) -> Result<Option<u64>, CursorError> {
        let value = self.value.read().map_err(Self::poisoned)?;
        Ok(*value)
    }

    async fn write_last(&self, index: u64) -> Result<(), CursorError> {
        let mut value = self.value.write().map_err(Self::poisoned)?;
        *value = Some(index);
        Ok(())
    }
}
