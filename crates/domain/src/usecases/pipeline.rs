//! Posting pipeline - select a topic, generate a tweet, publish it

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::{
    model::{RunOutcome, Stage},
    policy::TweetPolicy,
    ports::{CursorStore, Generator, Publisher, TopicSource},
    usecases::select_topic::TopicRotation,
};

/// Configuration for the posting pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Generate but don't publish
    pub dry_run: bool,
    /// Length and format rules for the posted text
    pub policy: TweetPolicy,
}

/// Single-shot pipeline orchestrator.
///
/// Each stage runs at most once per call to [`PostingPipeline::run_once`];
/// retrying is left to whatever schedules the process.
pub struct PostingPipeline<T, C, G, P>
where
    T: TopicSource + ?Sized,
    C: CursorStore + ?Sized,
    G: Generator + ?Sized,
    P: Publisher + ?Sized,
{
    rotation: TopicRotation<T, C>,
    generator: Arc<G>,
    publisher: Arc<P>,
    config: PipelineConfig,
}

impl<T, C, G, P> PostingPipeline<T, C, G, P>
where
    T: TopicSource + ?Sized,
    C: CursorStore + ?Sized,
    G: Generator + ?Sized,
    P: Publisher + ?Sized,
{
    pub fn new(
        topics: Arc<T>,
        cursor: Arc<C>,
        generator: Arc<G>,
        publisher: Arc<P>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            rotation: TopicRotation::new(topics, cursor),
            generator,
            publisher,
            config,
        }
    }

    /// Run the pipeline once. Never panics and never returns an error:
    /// every path ends in a [`RunOutcome`].
    pub async fn run_once(&self) -> RunOutcome {
        match AssertUnwindSafe(self.execute()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => fail(Stage::Unexpected, panic_message(panic.as_ref())),
        }
    }

    async fn execute(&self) -> RunOutcome {
        let selected = match self.rotation.select_next().await {
            Ok(selected) => selected,
            Err(e) => return fail(Stage::SelectTopic, e.to_string()),
        };

        tracing::info!(
            topic_index = selected.index,
            total = selected.total,
            topic = %selected.topic,
            "Selected topic"
        );

        let topic_text = selected.topic.to_string();
        let raw = match self.generator.generate(&topic_text).await {
            Ok(raw) => raw,
            Err(e) => return fail(Stage::Generate, e.to_string()),
        };

        let Some(text) = self.config.policy.prepare(&raw) else {
            return fail(Stage::Generate, "Generator returned empty text".to_string());
        };

        tracing::info!(
            provider = self.generator.provider(),
            length = text.chars().count(),
            tweet = %text,
            "Generated tweet"
        );

        if self.config.dry_run {
            tracing::info!(
                platform = self.publisher.platform(),
                tweet = %text,
                "[DRY RUN] Would post"
            );
            return RunOutcome::DryRun { selected, text };
        }

        match self.publisher.publish(&text).await {
            Ok(result) => {
                tracing::info!(
                    platform = self.publisher.platform(),
                    post_id = %result.id,
                    url = ?result.url,
                    "Tweet posted successfully"
                );
                RunOutcome::Posted {
                    selected,
                    text,
                    post_id: result.id,
                    url: result.url,
                }
            }
            Err(e) => fail(Stage::Post, e.to_string()),
        }
    }
}

fn fail(stage: Stage, error: String) -> RunOutcome {
    tracing::error!(stage = %stage, error = %error, "{}", stage.failure_message());
    RunOutcome::Failed { stage, error }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
