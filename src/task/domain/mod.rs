//! Domain model for image task processing.
//!
//! The task domain models priced tasks, their status state machine, and the
//! image variants derived from a task's source image while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod image;
mod price;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ImageId, TaskId};
pub use image::{ImageRecord, ImageVariant, Resolution};
pub use price::{DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE, Price};
pub use task::{PersistedTaskData, Task, TaskStatus};
