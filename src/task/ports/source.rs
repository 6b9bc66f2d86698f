//! Source acquisition port.
//!
//! A source resolver turns whatever reference a client submitted (a local
//! path or an `http(s)` URL) into an absolute path of a local file under the
//! managed input root.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for source acquisition.
pub type AcquisitionResult<T> = Result<T, AcquisitionError>;

/// Contract for normalizing an image reference into a local file path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Resolves `reference` to an absolute local path, downloading remote
    /// content when the reference is an `http` or `https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] when the reference is unusable or the
    /// download fails.
    async fn resolve(&self, reference: &str) -> AcquisitionResult<Utf8PathBuf>;
}

/// Errors returned while acquiring a source image.
#[derive(Debug, Clone, Error)]
pub enum AcquisitionError {
    /// The reference was empty after trimming.
    #[error("image reference must not be empty")]
    EmptyReference,

    /// No file name could be derived from the reference.
    #[error("cannot derive a file name from '{0}'")]
    MissingFileName(String),

    /// The remote server answered with a non-success status.
    #[error("failed to download {url}: HTTP {status}")]
    UnexpectedStatus {
        /// URL that produced the response.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The redirect chain exceeded the configured limit.
    #[error("too many redirects fetching {url} (limit {limit})")]
    TooManyRedirects {
        /// URL at which the limit was hit.
        url: String,
        /// Configured redirect limit.
        limit: usize,
    },

    /// A redirect response carried no usable `Location`.
    #[error("invalid redirect from {0}")]
    InvalidRedirect(String),

    /// Network or protocol failure.
    #[error("download error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// Local filesystem failure while storing the download.
    #[error("file write error: {0}")]
    Io(Arc<std::io::Error>),
}

impl AcquisitionError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<std::io::Error> for AcquisitionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
