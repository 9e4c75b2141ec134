//! Application layer: the navigation pipeline
//!
//! This layer orchestrates domain logic and depends on the repository trait.

pub mod context;
pub mod error;
pub mod services;

pub use context::RenderContext;
pub use error::{ApplicationError, ApplicationResult};
