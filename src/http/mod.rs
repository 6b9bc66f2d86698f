//! HTTP surface for creating and reading image tasks.
//!
//! `POST /tasks` acquires the referenced image, persists a pending task and
//! hands it to the processing queue without waiting for the result.
//! `GET /tasks/:id` reads the task back, listing variants once it has
//! completed.

mod dto;
mod errors;
mod handlers;

pub use dto::{CreateTaskBody, CreatedTaskBody, ImageBody, TaskBody};

use crate::task::{
    ports::{ImageRepository, SourceResolver, TaskRepository},
    services::{ProcessingQueue, TaskService},
};
use axum::{
    Router,
    routing::{get, post},
};
use mockable::Clock;

/// Shared state handed to every handler.
pub struct ApiState<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    tasks: TaskService<R, I, S, C>,
    queue: ProcessingQueue,
}

impl<R, I, S, C> Clone for ApiState<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<R, I, S, C> ApiState<R, I, S, C>
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    /// Bundles the task service with the queue that processes new tasks.
    #[must_use]
    pub const fn new(tasks: TaskService<R, I, S, C>, queue: ProcessingQueue) -> Self {
        Self { tasks, queue }
    }
}

/// Builds the application router.
pub fn router<R, I, S, C>(state: ApiState<R, I, S, C>) -> Router
where
    R: TaskRepository + 'static,
    I: ImageRepository + 'static,
    S: SourceResolver + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tasks", post(handlers::create_task::<R, I, S, C>))
        .route("/tasks/:id", get(handlers::get_task::<R, I, S, C>))
        .with_state(state)
}
