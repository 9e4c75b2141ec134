//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ItemId;

/// Domain errors represent violations of the tree invariants.
/// These are independent of where the items came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cycle detected in item hierarchy: item {0} reached twice")]
    CycleDetected(ItemId),

    #[error("item hierarchy deeper than {max_depth} levels at item {id}")]
    DepthExceeded { id: ItemId, max_depth: usize },
}

/// Failures reported by an item repository.
///
/// The core never retries these; they abort the render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error("malformed hierarchy at item {id}: {reason}")]
    Malformed { id: ItemId, reason: String },

    #[error("item repository unavailable: {0}")]
    Unavailable(String),
}
