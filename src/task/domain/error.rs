//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A task cannot complete without at least one generated variant.
    #[error("task {0} cannot be completed without image variants")]
    MissingImages(TaskId),

    /// The resolution value is not a positive pixel width.
    #[error("invalid resolution '{0}', expected a positive pixel width")]
    InvalidResolution(String),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
