//! Variant generation port.

use crate::task::domain::ImageVariant;
use async_trait::async_trait;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for variant generation.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Contract for deriving resized variants from a local source image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VariantGenerator: Send + Sync {
    /// Generates one variant per configured resolution, in configured order.
    ///
    /// Either every variant is produced or the call fails; partial results
    /// are never returned. Files already written before a failure are left
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError`] when the source cannot be decoded or a
    /// resize or write fails.
    async fn generate(&self, source: &Utf8Path) -> ProcessingResult<Vec<ImageVariant>>;
}

/// Errors returned while generating image variants.
#[derive(Debug, Clone, Error)]
pub enum ProcessingError {
    /// The source has no recognizable image format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The source could not be decoded.
    #[error("failed to decode {path}: {cause}")]
    Decode {
        /// Source path.
        path: String,
        /// Decoder error.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A resized variant could not be encoded.
    #[error("failed to encode {path}: {cause}")]
    Encode {
        /// Output path.
        path: String,
        /// Encoder error.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// Local filesystem failure.
    #[error("file error: {0}")]
    Io(Arc<std::io::Error>),

    /// The blocking worker running the generation did not finish.
    #[error("variant generation interrupted: {0}")]
    Interrupted(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
