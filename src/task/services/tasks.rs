//! Task creation and lookup use cases.

use super::TaskLifecycleManager;
use crate::task::{
    domain::{ImageVariant, Price, Task, TaskId, TaskStatus},
    ports::{
        AcquisitionError, ImageRepository, ImageRepositoryError, SourceResolver, TaskRepository,
        TaskRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    image_path: String,
}

impl CreateTaskRequest {
    /// Creates a request for the image at `image_path`, a local path or an
    /// `http(s)` URL.
    #[must_use]
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
        }
    }

    /// Returns the submitted reference.
    #[must_use]
    pub fn image_path(&self) -> &str {
        &self.image_path
    }
}

/// Read model returned by [`TaskService::get_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Task identifier.
    pub task_id: TaskId,
    /// Current status.
    pub status: TaskStatus,
    /// Assigned price.
    pub price: Price,
    /// Generated variants; present only once the task has completed.
    pub images: Option<Vec<ImageVariant>>,
}

/// Service-level errors for task creation and lookup.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The submitted reference could not be acquired.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    /// Task persistence failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Image metadata lookup failed.
    #[error(transparent)]
    ImageRepository(#[from] ImageRepositoryError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Creates priced tasks from image references and reads them back.
pub struct TaskService<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    images: Arc<I>,
    resolver: Arc<S>,
    lifecycle: TaskLifecycleManager<C>,
}

impl<R, I, S, C> Clone for TaskService<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            images: Arc::clone(&self.images),
            resolver: Arc::clone(&self.resolver),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<R, I, S, C> TaskService<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub fn new(tasks: Arc<R>, images: Arc<I>, resolver: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            images,
            resolver,
            lifecycle: TaskLifecycleManager::new(clock),
        }
    }

    /// Acquires the referenced image and persists a pending, priced task.
    ///
    /// Nothing is persisted when acquisition fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Acquisition`] when the reference cannot be
    /// resolved or downloaded, and [`TaskServiceError::Repository`] when the
    /// task cannot be stored.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let original_path = self.resolver.resolve(request.image_path()).await?;
        let task = self.lifecycle.new_task(original_path);
        let saved = self.tasks.save(&task).await?;
        info!(
            task_id = %saved.id(),
            price = %saved.price(),
            source = %saved.original_path(),
            "task created"
        );
        Ok(saved)
    }

    /// Returns the task with its variants when completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for an unknown ID, or a
    /// repository error when lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskServiceResult<TaskView> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))?;

        let images = if task.status() == TaskStatus::Completed {
            let records = self.images.find_by_task_id(task_id).await?;
            Some(records.iter().map(|record| record.to_variant()).collect())
        } else {
            None
        };

        Ok(TaskView {
            task_id: task.id(),
            status: task.status(),
            price: task.price(),
            images,
        })
    }
}
