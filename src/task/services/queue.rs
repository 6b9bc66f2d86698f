//! Background processing queue.
//!
//! A single worker drains task IDs in submission order, so at most one task
//! is processed at a time.

use super::TaskProcessor;
use crate::task::domain::TaskId;
use std::sync::Arc;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info};

/// Errors returned when submitting work to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The worker has stopped and no longer accepts tasks.
    #[error("processing queue is closed; task {0} was not enqueued")]
    Closed(TaskId),
}

/// Handle used to submit tasks to the background worker.
#[derive(Debug, Clone)]
pub struct ProcessingQueue {
    sender: mpsc::UnboundedSender<TaskId>,
}

impl ProcessingQueue {
    /// Spawns the worker on the current Tokio runtime.
    ///
    /// The worker exits once every queue handle has been dropped and the
    /// backlog is drained.
    #[must_use]
    pub fn spawn(processor: Arc<dyn TaskProcessor>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(processor, receiver));
        (Self { sender }, handle)
    }

    /// Submits a task for processing.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] when the worker is no longer running.
    pub fn enqueue(&self, task_id: TaskId) -> Result<(), QueueError> {
        self.sender
            .send(task_id)
            .map_err(|_| QueueError::Closed(task_id))?;
        debug!(task_id = %task_id, "task enqueued");
        Ok(())
    }
}

async fn run_worker(
    processor: Arc<dyn TaskProcessor>,
    mut receiver: mpsc::UnboundedReceiver<TaskId>,
) {
    info!("processing worker started");
    while let Some(task_id) = receiver.recv().await {
        match processor.process(task_id).await {
            Ok(task) => debug!(task_id = %task_id, status = %task.status(), "task processed"),
            Err(err) => error!(task_id = %task_id, error = %err, "task processing aborted"),
        }
    }
    info!("processing worker stopped");
}

#[cfg(test)]
mod tests {
    //! Unit tests for the processing queue.

    use super::*;
    use crate::task::{
        domain::{Price, Task},
        services::TaskProcessingError,
    };
    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use mockable::DefaultClock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProcessor {
        seen: Mutex<Vec<TaskId>>,
    }

    #[async_trait]
    impl TaskProcessor for RecordingProcessor {
        async fn process(&self, task_id: TaskId) -> Result<Task, TaskProcessingError> {
            self.seen
                .lock()
                .map_err(|_| TaskProcessingError::NotFound(task_id))?
                .push(task_id);
            Ok(Task::new_pending(
                Utf8PathBuf::from("input/cat.png"),
                Price::new(10),
                &DefaultClock,
            ))
        }
    }

    #[tokio::test]
    async fn processes_tasks_in_submission_order() {
        let processor = Arc::new(RecordingProcessor::default());
        let (queue, handle) = ProcessingQueue::spawn(processor.clone());
        let ids = [TaskId::new(), TaskId::new(), TaskId::new()];
        for id in ids {
            queue.enqueue(id).expect("enqueue should succeed");
        }
        drop(queue);
        handle.await.expect("worker should exit cleanly");

        let seen = processor.seen.lock().expect("lock should not be poisoned");
        assert_eq!(seen.as_slice(), ids.as_slice());
    }

    #[tokio::test]
    async fn enqueue_fails_once_worker_stopped() {
        let (queue, handle) = ProcessingQueue::spawn(Arc::new(RecordingProcessor::default()));
        handle.abort();
        assert!(handle.await.is_err_and(|err| err.is_cancelled()));

        let id = TaskId::new();
        assert_eq!(queue.enqueue(id), Err(QueueError::Closed(id)));
    }
}
