//! Source resolver backed by the local filesystem and `reqwest`.

use super::{download, local::normalize_local_reference};
use crate::config::PipelineConfig;
use crate::task::ports::{AcquisitionError, AcquisitionResult, SourceResolver};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::{debug, info};
use url::Url;

/// Resolves image references into files under the configured input root.
///
/// `http` and `https` URLs are downloaded on every call; there is no cache.
/// Any other reference, including URLs with other schemes, is treated as a
/// local path and normalized with [`normalize_local_reference`].
#[derive(Debug, Clone)]
pub struct FileSourceResolver {
    config: PipelineConfig,
    client: Client,
}

impl FileSourceResolver {
    /// Creates a resolver using the configured timeout and redirect limit.
    ///
    /// Redirects are followed by the resolver itself so the limit and the
    /// browser-like headers apply to every hop.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: PipelineConfig) -> AcquisitionResult<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(config.download_timeout())
            .build()
            .map_err(AcquisitionError::transport)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SourceResolver for FileSourceResolver {
    async fn resolve(&self, reference: &str) -> AcquisitionResult<Utf8PathBuf> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(AcquisitionError::EmptyReference);
        }

        match Url::parse(trimmed) {
            Ok(url) if download::is_remote(&url) => {
                info!(url = %url, "downloading source image");
                let path = download::download(
                    &self.client,
                    self.config.input_root(),
                    url,
                    self.config.max_redirects(),
                )
                .await?;
                debug!(path = %path, "source image downloaded");
                Ok(path)
            }
            _ => normalize_local_reference(self.config.input_root(), trimmed),
        }
    }
}
