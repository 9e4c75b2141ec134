//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, ItemId, LookupError};

/// Application errors wrap domain errors and add render-level context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("root item {0} is flagged hidden")]
    RootHidden(ItemId),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
