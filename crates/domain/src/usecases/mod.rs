//! Application use cases / business logic

pub mod pipeline;
pub mod select_topic;

pub use pipeline::{PipelineConfig, PostingPipeline};
pub use select_topic::{SelectError, TopicRotation};
