//! JSON request and response bodies.

use crate::task::{
    domain::{ImageVariant, Task, TaskStatus},
    services::TaskView,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    /// Local path or `http(s)` URL of the source image.
    pub image_path: String,
}

/// Response of `POST /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTaskBody {
    /// Identifier of the new task.
    pub task_id: String,
    /// Always `pending` on creation.
    pub status: TaskStatus,
    /// Assigned price.
    pub price: u32,
}

impl From<&Task> for CreatedTaskBody {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id().to_string(),
            status: task.status(),
            price: task.price().value(),
        }
    }
}

/// One generated variant in a task response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageBody {
    /// Target width, as a decimal string.
    pub resolution: String,
    /// Public path of the written file.
    pub path: String,
}

impl From<ImageVariant> for ImageBody {
    fn from(variant: ImageVariant) -> Self {
        Self {
            resolution: variant.resolution.to_string(),
            path: variant.path,
        }
    }
}

/// Response of `GET /tasks/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    /// Task identifier.
    pub task_id: String,
    /// Current status.
    pub status: TaskStatus,
    /// Assigned price.
    pub price: u32,
    /// Variants, present only for completed tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageBody>>,
}

impl From<TaskView> for TaskBody {
    fn from(view: TaskView) -> Self {
        Self {
            task_id: view.task_id.to_string(),
            status: view.status,
            price: view.price.value(),
            images: view
                .images
                .map(|images| images.into_iter().map(ImageBody::from).collect()),
        }
    }
}
