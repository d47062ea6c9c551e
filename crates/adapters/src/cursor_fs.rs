//! File-backed rotation cursor

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use topic_tweeter_domain::{CursorError, CursorStore};

/// Stores the last served topic index as a decimal integer in a plain file
pub struct FsCursorStore {
    path: PathBuf,
}

impl FsCursorStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_index(content: &str) -> Result<u64, CursorError> {
    let value = content.trim();
    value.parse::<u64>().map_err(|e| CursorError::Corrupt {
        value: value.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl CursorStore for FsCursorStore {
    async fn load(&self) -> Result<Option<u64>, CursorError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_index(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Cursor file not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_last(&self, index: u64) -> Result<(), CursorError> {
        tokio::fs::write(&self.path, index.to_string()).await?;
        tracing::info!(index = index, path = %self.path.display(), "Saved topic index");
        Ok(())
    }
}
