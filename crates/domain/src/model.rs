//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// A subject to write a tweet about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Short title (first CSV column)
    pub title: String,
    /// Longer description (second CSV column). `None` when the row has no second cell.
    pub description: Option<String>,
}

impl Topic {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
        }
    }

    /// A topic from a row that only has a title cell
    pub fn title_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// Renders as `title: description` whenever the row had a description cell,
/// even an empty one. Title-only rows render as just `title`.
impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.title, description),
            None => f.write_str(&self.title),
        }
    }
}

/// The built-in topic list written when no topic file exists
pub const DEFAULT_TOPICS: [(&str, &str); 10] = [
    (
        "Artificial Intelligence",
        "AI and its impact on modern technology",
    ),
    ("Machine Learning", "ML algorithms and their applications"),
    (
        "Blockchain Technology",
        "Blockchain and cryptocurrency basics",
    ),
    ("Cloud Computing", "Cloud services and infrastructure"),
    ("Cybersecurity", "Modern security threats and solutions"),
    ("Internet of Things", "IoT devices and their applications"),
    ("Quantum Computing", "Quantum computing fundamentals"),
    ("5G Technology", "5G networks and their capabilities"),
    ("Edge Computing", "Edge computing and distributed systems"),
    ("DevOps", "DevOps practices and tools"),
];

/// Build the default topic list
pub fn default_topics() -> Vec<Topic> {
    DEFAULT_TOPICS
        .iter()
        .map(|(title, description)| Topic::new(*title, *description))
        .collect()
}

/// A topic picked for this run, with its position in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedTopic {
    /// Index of the topic in the loaded list (also the new cursor value)
    pub index: u64,
    /// Number of topics in the list at selection time
    pub total: usize,
    /// The topic itself
    pub topic: Topic,
    /// Whether selection wrapped back to the start of the list
    pub wrapped: bool,
}

/// Pipeline stage, used to report where a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SelectTopic,
    Generate,
    Post,
    Unexpected,
}

impl Stage {
    /// Operator-facing failure message for this stage
    pub fn failure_message(&self) -> &'static str {
        match self {
            Stage::SelectTopic => "Failed to get topic",
            Stage::Generate => "Failed to generate tweet content",
            Stage::Post => "Failed to post tweet",
            Stage::Unexpected => "Unexpected error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SelectTopic => "select_topic",
            Stage::Generate => "generate",
            Stage::Post => "post",
            Stage::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

/// Terminal state of a single pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Tweet was generated and posted
    Posted {
        selected: SelectedTopic,
        text: String,
        post_id: String,
        url: Option<String>,
    },
    /// Tweet was generated but not posted (dry run)
    DryRun { selected: SelectedTopic, text: String },
    /// The run stopped at `stage`
    Failed { stage: Stage, error: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_display_joins_title_and_description() {
        let topic = Topic::new("DevOps", "DevOps practices and tools");
        assert_eq!(topic.to_string(), "DevOps: DevOps practices and tools");
    }

    #[test]
    fn test_topic_display_with_empty_description_keeps_separator() {
        let topic = Topic::new("DevOps", "");
        assert_eq!(topic.to_string(), "DevOps: ");
    }

    #[test]
    fn test_topic_display_title_only() {
        let topic = Topic::title_only("DevOps");
        assert_eq!(topic.to_string(), "DevOps");
    }

    #[test]
    fn test_default_topics_has_ten_entries() {
        let topics = default_topics();
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0].title, "Artificial Intelligence");
        assert_eq!(topics[9].to_string(), "DevOps: DevOps practices and tools");
    }

    #[test]
    fn test_failed_outcome_is_not_success() {
        let outcome = RunOutcome::Failed {
            stage: Stage::Post,
            error: "boom".to_string(),
        };
        assert!(!outcome.is_success());
        assert_eq!(Stage::Post.failure_message(), "Failed to post tweet");
    }
}
