//! topic-tweeter domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `rotation`: Cursor arithmetic with wraparound
//! - `usecases`: Topic selection and the posting pipeline
//! - `policy`: Format constraints for posted text

pub mod model;
pub mod policy;
pub mod ports;
pub mod rotation;
pub mod usecases;

pub use model::*;
pub use ports::*;
