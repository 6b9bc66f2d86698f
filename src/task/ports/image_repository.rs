//! Repository port for generated image records.

use crate::task::domain::{ImageRecord, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for image repository operations.
pub type ImageRepositoryResult<T> = Result<T, ImageRepositoryError>;

/// Image metadata persistence contract.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Stores a generated image record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ImageRepositoryError::Persistence`] when the backing store
    /// rejects the write.
    async fn save(&self, record: &ImageRecord) -> ImageRepositoryResult<ImageRecord>;

    /// Returns every record belonging to `task_id`, in insertion order.
    async fn find_by_task_id(&self, task_id: TaskId) -> ImageRepositoryResult<Vec<ImageRecord>>;
}

/// Errors returned by image repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ImageRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ImageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
