//! In-memory image metadata repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ImageRecord, TaskId},
    ports::{ImageRepository, ImageRepositoryError, ImageRepositoryResult},
};

/// Thread-safe in-memory image repository, indexed by owning task.
///
/// Lookups return a task's records ordered by creation time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImageRepository {
    state: Arc<RwLock<HashMap<TaskId, Vec<ImageRecord>>>>,
}

impl InMemoryImageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn save(&self, record: &ImageRecord) -> ImageRepositoryResult<ImageRecord> {
        let mut state = self.state.write().map_err(|err| {
            ImageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .entry(record.task_id())
            .or_default()
            .push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_task_id(&self, task_id: TaskId) -> ImageRepositoryResult<Vec<ImageRecord>> {
        let state = self.state.read().map_err(|err| {
            ImageRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut records = state.get(&task_id).cloned().unwrap_or_default();
        records.sort_by_key(ImageRecord::created_at);
        Ok(records)
    }
}
