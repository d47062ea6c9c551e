//! topic-tweeter adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `topics`: CSV-backed topic store
//! - `cursor`: file-backed and in-memory rotation cursors
//! - `llm`: text generation providers (Hive, OpenAI-compatible, stub)
//! - `x`: X (Twitter) API adapters

mod cursor_fs;
mod cursor_memory;
mod topics_csv;

pub mod llm;
pub mod x_api;

/// Re-exports for topic store adapters
pub mod topics {
    pub use crate::topics_csv::{FsTopicStore, render_csv};
}

/// Re-exports for cursor adapters
pub mod cursor {
    pub use crate::cursor_fs::FsCursorStore;
    pub use crate::cursor_memory::InMemoryCursorStore;
}

/// Re-exports for X API adapters
pub mod x {
    pub use crate::x_api::{OAuthCredentials, StubXPublisher, XPublisher};
}
