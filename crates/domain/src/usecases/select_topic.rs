//! Topic selection use case - loads topics and advances the rotation cursor

use std::sync::Arc;

use crate::{
    model::SelectedTopic,
    ports::{CursorStore, TopicSource, TopicStoreError},
    rotation,
};

/// Picks the next topic and persists the new cursor position
pub struct TopicRotation<T, C>
where
    T: TopicSource + ?Sized,
    C: CursorStore + ?Sized,
{
    topics: Arc<T>,
    cursor: Arc<C>,
}

impl<T, C> TopicRotation<T, C>
where
    T: TopicSource + ?Sized,
    C: CursorStore + ?Sized,
{
    pub fn new(topics: Arc<T>, cursor: Arc<C>) -> Self {
        Self { topics, cursor }
    }

    /// Select the topic after the last one served.
    ///
    /// The new index is written before returning, whatever happens to the
    /// rest of the run. A failed write is logged and the in-memory index is
    /// still used.
    pub async fn select_next(&self) -> Result<SelectedTopic, SelectError> {
        let topics = self.topics.load().await?;

        let last_index = self.cursor.read_last().await;
        let advance = rotation::advance(topics.len(), last_index).ok_or(SelectError::NoTopics)?;

        if advance.wrapped {
            tracing::info!(
                last_index = last_index,
                total = topics.len(),
                "Reached end of topic list, cycle restarted"
            );
        }

        // advance() keeps the index below topics.len()
        let topic = topics[advance.index as usize].clone();

        match self.cursor.write_last(advance.index).await {
            Ok(()) => tracing::debug!(index = advance.index, "Saved topic index"),
            Err(e) => {
                tracing::error!(
                    index = advance.index,
                    error = %e,
                    "Failed to save topic index, continuing"
                );
            }
        }

        Ok(SelectedTopic {
            index: advance.index,
            total: topics.len(),
            topic,
            wrapped: advance.wrapped,
        })
    }

    /// Compute the next topic without touching the cursor
    pub async fn peek_next(&self) -> Result<SelectedTopic, SelectError> {
        let topics = self.topics.load().await?;
        let last_index = self.cursor.read_last().await;
        let advance = rotation::advance(topics.len(), last_index).ok_or(SelectError::NoTopics)?;

        Ok(SelectedTopic {
            index: advance.index,
            total: topics.len(),
            topic: topics[advance.index as usize].clone(),
            wrapped: advance.wrapped,
        })
    }
}

/// Errors from topic selection
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("Topic source error: {0}")]
    Source(#[from] TopicStoreError),
    #[error("No topics available")]
    NoTopics,
}
