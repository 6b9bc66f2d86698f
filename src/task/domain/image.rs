//! Image variant value objects.

use super::{ImageId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target width, in pixels, of a generated variant.
///
/// Serialized as a decimal string (`"1024"`), which is how resolutions are
/// exposed over the API and stored alongside image records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Resolution(u32);

impl Resolution {
    /// Creates a validated resolution.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidResolution`] when `width` is zero.
    pub fn new(width: u32) -> Result<Self, TaskDomainError> {
        if width == 0 {
            return Err(TaskDomainError::InvalidResolution(width.to_string()));
        }
        Ok(Self(width))
    }

    /// Returns the target width in pixels.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.0
    }
}

impl TryFrom<&str> for Resolution {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let width = value
            .trim()
            .parse::<u32>()
            .map_err(|_| TaskDomainError::InvalidResolution(value.to_owned()))?;
        Self::new(width).map_err(|_| TaskDomainError::InvalidResolution(value.to_owned()))
    }
}

impl TryFrom<String> for Resolution {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One resized derivative of a task's source image.
///
/// `path` is the public, root-relative reference to the generated file and
/// never a raw filesystem path. `md5` is a per-generation uniqueness token
/// used in the output file name; it is not a digest of the file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Configured target width of this variant.
    pub resolution: Resolution,
    /// Public reference such as `/images/<stem>/<resolution>/<token>.jpg`.
    pub path: String,
    /// Uniqueness token embedded in the file name.
    pub md5: String,
}

impl ImageVariant {
    /// Creates a variant description.
    #[must_use]
    pub fn new(resolution: Resolution, path: impl Into<String>, md5: impl Into<String>) -> Self {
        Self {
            resolution,
            path: path.into(),
            md5: md5.into(),
        }
    }
}

/// Standalone image record stored in the image metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    id: ImageId,
    task_id: TaskId,
    resolution: Resolution,
    path: String,
    md5: String,
    created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Creates a record for `variant`, owned by `task_id`.
    #[must_use]
    pub fn from_variant(task_id: TaskId, variant: &ImageVariant, clock: &impl Clock) -> Self {
        Self {
            id: ImageId::new(),
            task_id,
            resolution: variant.resolution,
            path: variant.path.clone(),
            md5: variant.md5.clone(),
            created_at: clock.utc(),
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ImageId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the variant resolution.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Returns the public path of the generated file.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the uniqueness token.
    #[must_use]
    pub fn md5(&self) -> &str {
        &self.md5
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the embedded variant form of this record.
    #[must_use]
    pub fn to_variant(&self) -> ImageVariant {
        ImageVariant::new(self.resolution(), self.path(), self.md5())
    }
}
