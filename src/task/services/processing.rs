//! Task processing orchestration.
//!
//! Processing a pending task runs the variant generator on the task's
//! source, stores one image record per variant, and persists the task as
//! `completed`. Any failure along the way is absorbed: the task as it was
//! loaded is persisted as `failed` instead. Only an unknown task ID or a
//! failure to persist the failed task reaches the caller.

use super::TaskLifecycleManager;
use crate::task::{
    domain::{ImageRecord, Task, TaskDomainError, TaskId},
    ports::{
        ImageRepository, ImageRepositoryError, ProcessingError, TaskRepository,
        TaskRepositoryError, VariantGenerator,
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that escape [`TaskProcessingService::process`].
#[derive(Debug, Error)]
pub enum TaskProcessingError {
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Loading the task, or persisting its failed state, failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Failures inside a processing attempt. These never leave the service.
#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Processing(#[from] ProcessingError),
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    #[error(transparent)]
    Images(#[from] ImageRepositoryError),
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Anything able to drive a task to a terminal state.
///
/// The processing queue depends on this seam rather than on the concrete
/// service so it stays free of repository type parameters.
#[async_trait]
pub trait TaskProcessor: Send + Sync {
    /// Processes the task with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProcessingError`] when the task does not exist or its
    /// terminal state cannot be persisted.
    async fn process(&self, task_id: TaskId) -> Result<Task, TaskProcessingError>;
}

/// Orchestrates variant generation and terminal state persistence.
pub struct TaskProcessingService<R, I, G, C>
where
    R: TaskRepository,
    I: ImageRepository,
    G: VariantGenerator,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    images: Arc<I>,
    generator: Arc<G>,
    lifecycle: TaskLifecycleManager<C>,
    clock: Arc<C>,
}

impl<R, I, G, C> Clone for TaskProcessingService<R, I, G, C>
where
    R: TaskRepository,
    I: ImageRepository,
    G: VariantGenerator,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            images: Arc::clone(&self.images),
            generator: Arc::clone(&self.generator),
            lifecycle: self.lifecycle.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, I, G, C> TaskProcessingService<R, I, G, C>
where
    R: TaskRepository,
    I: ImageRepository,
    G: VariantGenerator,
    C: Clock + Send + Sync,
{
    /// Creates a new processing service.
    #[must_use]
    pub fn new(tasks: Arc<R>, images: Arc<I>, generator: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            images,
            generator,
            lifecycle: TaskLifecycleManager::new(Arc::clone(&clock)),
            clock,
        }
    }

    /// Drives the task to `completed` or `failed` and returns it as stored.
    ///
    /// Tasks that are already terminal are returned unchanged and are
    /// neither reprocessed nor saved again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskProcessingError::NotFound`] for an unknown ID and
    /// [`TaskProcessingError::Repository`] when the task cannot be loaded or
    /// its failed state cannot be saved.
    pub async fn process(&self, task_id: TaskId) -> Result<Task, TaskProcessingError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskProcessingError::NotFound(task_id))?;

        if task.status().is_terminal() {
            debug!(task_id = %task_id, status = %task.status(), "task already terminal");
            return Ok(task);
        }

        info!(task_id = %task_id, source = %task.original_path(), "processing task");
        match self.attempt(&task).await {
            Ok(completed) => {
                info!(
                    task_id = %task_id,
                    variants = completed.images().len(),
                    "task completed"
                );
                Ok(completed)
            }
            Err(err) => {
                warn!(task_id = %task_id, error = %err, "task processing failed");
                let failed = self.lifecycle.mark_failed(&task);
                Ok(self.tasks.save(&failed).await?)
            }
        }
    }

    async fn attempt(&self, task: &Task) -> Result<Task, AttemptError> {
        let variants = self.generator.generate(task.original_path()).await?;
        let completed = self
            .lifecycle
            .mark_completed(&task.with_images(variants))?;

        for variant in completed.images() {
            let record = ImageRecord::from_variant(completed.id(), variant, &*self.clock);
            let stored = self.images.save(&record).await?;
            debug!(
                task_id = %stored.task_id(),
                image_id = %stored.id(),
                path = stored.path(),
                "image record stored"
            );
        }

        Ok(self.tasks.save(&completed).await?)
    }
}

#[async_trait]
impl<R, I, G, C> TaskProcessor for TaskProcessingService<R, I, G, C>
where
    R: TaskRepository,
    I: ImageRepository,
    G: VariantGenerator,
    C: Clock + Send + Sync,
{
    async fn process(&self, task_id: TaskId) -> Result<Task, TaskProcessingError> {
        Self::process(self, task_id).await
    }
}
