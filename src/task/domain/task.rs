//! Task aggregate root and its status state machine.

use super::{ImageVariant, ParseTaskStatusError, Price, TaskDomainError, TaskId};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task processing status.
///
/// `Pending` is the only non-terminal state. `Completed` and `Failed` are
/// absorbing: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is queued and its variants have not been generated yet.
    Pending,
    /// All variants were generated and persisted.
    Completed,
    /// Variant generation or persistence failed.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed | Self::Failed)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
///
/// Lifecycle mutations return modified copies; the receiver is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    status: TaskStatus,
    price: Price,
    original_path: Utf8PathBuf,
    images: Vec<ImageVariant>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted price.
    pub price: Price,
    /// Absolute local path of the acquired source image.
    pub original_path: Utf8PathBuf,
    /// Persisted variants, empty unless completed.
    pub images: Vec<ImageVariant>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest status timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task for an already-resolved source path.
    #[must_use]
    pub fn new_pending(original_path: Utf8PathBuf, price: Price, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            status: TaskStatus::Pending,
            price,
            original_path,
            images: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            status: data.status,
            price: data.price,
            original_path: data.original_path,
            images: data.images,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the task price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the absolute local path of the source image.
    #[must_use]
    pub fn original_path(&self) -> &Utf8Path {
        &self.original_path
    }

    /// Returns the generated variants, in configured resolution order.
    #[must_use]
    pub fn images(&self) -> &[ImageVariant] {
        &self.images
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest status timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy carrying `images`, with status and timestamps untouched.
    #[must_use]
    pub fn with_images(&self, images: Vec<ImageVariant>) -> Self {
        Self {
            images,
            ..self.clone()
        }
    }

    /// Returns a completed copy of this task.
    ///
    /// The status check is the caller's responsibility; a terminal task is
    /// still rewritten when asked.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingImages`] when no variants are
    /// attached, since a completed task always carries its images.
    pub fn completed(&self, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        if self.images.is_empty() {
            return Err(TaskDomainError::MissingImages(self.id));
        }
        Ok(self.with_status(TaskStatus::Completed, clock))
    }

    /// Returns a failed copy of this task.
    #[must_use]
    pub fn failed(&self, clock: &impl Clock) -> Self {
        self.with_status(TaskStatus::Failed, clock)
    }

    fn with_status(&self, status: TaskStatus, clock: &impl Clock) -> Self {
        Self {
            status,
            updated_at: clock.utc(),
            ..self.clone()
        }
    }
}
