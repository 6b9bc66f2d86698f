//! Application services for image task processing.

mod lifecycle;
mod processing;
mod queue;
mod tasks;

pub use lifecycle::TaskLifecycleManager;
pub use processing::{TaskProcessingError, TaskProcessingService, TaskProcessor};
pub use queue::{ProcessingQueue, QueueError};
pub use tasks::{CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, TaskView};
