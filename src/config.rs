//! Pipeline and server configuration.
//!
//! Configuration is an explicit value built once at startup and handed to
//! the resolver, the generator and the services. Values come from
//! environment variables with the defaults below:
//!
//! | variable | default |
//! |---|---|
//! | `IMAGE_TASKS_INPUT_DIR` | `<cwd>/input` |
//! | `IMAGE_TASKS_OUTPUT_DIR` | `<cwd>/output` |
//! | `IMAGE_TASKS_RESOLUTIONS` | `1024,800` |
//! | `IMAGE_TASKS_PUBLIC_PREFIX` | `/images` |
//! | `IMAGE_TASKS_DOWNLOAD_TIMEOUT_SECS` | `30` |
//! | `IMAGE_TASKS_MAX_REDIRECTS` | `10` |
//! | `IMAGE_TASKS_BIND` | `0.0.0.0:$PORT` |
//! | `PORT` | `3000` |

use crate::task::domain::Resolution;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

const INPUT_DIR_VAR: &str = "IMAGE_TASKS_INPUT_DIR";
const OUTPUT_DIR_VAR: &str = "IMAGE_TASKS_OUTPUT_DIR";
const RESOLUTIONS_VAR: &str = "IMAGE_TASKS_RESOLUTIONS";
const PUBLIC_PREFIX_VAR: &str = "IMAGE_TASKS_PUBLIC_PREFIX";
const DOWNLOAD_TIMEOUT_VAR: &str = "IMAGE_TASKS_DOWNLOAD_TIMEOUT_SECS";
const MAX_REDIRECTS_VAR: &str = "IMAGE_TASKS_MAX_REDIRECTS";
const BIND_VAR: &str = "IMAGE_TASKS_BIND";
const PORT_VAR: &str = "PORT";

/// Target widths generated for every task unless configured otherwise.
pub const DEFAULT_RESOLUTIONS: [u32; 2] = [1024, 800];

const DEFAULT_PUBLIC_PREFIX: &str = "/images";
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_REDIRECTS: usize = 10;
const DEFAULT_PORT: &str = "3000";

/// Errors raised while building configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable held a value that could not be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable or field name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The resolution list was empty.
    #[error("at least one resolution must be configured")]
    EmptyResolutions,

    /// The same resolution was listed twice.
    #[error("resolution {0} is configured more than once")]
    DuplicateResolution(Resolution),

    /// The working directory could not be determined.
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

/// Settings consumed by the acquisition and variant generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    input_root: Utf8PathBuf,
    output_root: Utf8PathBuf,
    resolutions: Vec<Resolution>,
    public_prefix: String,
    download_timeout: Duration,
    max_redirects: usize,
}

impl PipelineConfig {
    /// Creates a configuration with the given roots and default settings.
    ///
    /// Both roots should be absolute; the resolver returns paths built from
    /// `input_root` as-is.
    #[must_use]
    pub fn new(input_root: impl Into<Utf8PathBuf>, output_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            resolutions: DEFAULT_RESOLUTIONS
                .iter()
                .filter_map(|width| Resolution::new(*width).ok())
                .collect(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_owned(),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed or the working
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = current_dir()?;
        Self::from_source(&cwd, |key| std::env::var(key).ok())
    }

    /// Loads configuration from `lookup`, resolving relative roots against
    /// `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is malformed.
    pub fn from_source(
        cwd: &Utf8Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let input_root = lookup(INPUT_DIR_VAR).map_or_else(
            || cwd.join("input"),
            |value| absolutize(cwd, &value),
        );
        let output_root = lookup(OUTPUT_DIR_VAR).map_or_else(
            || cwd.join("output"),
            |value| absolutize(cwd, &value),
        );
        let mut config = Self::new(input_root, output_root);

        if let Some(raw) = lookup(RESOLUTIONS_VAR) {
            config = config.with_resolutions(parse_resolutions(&raw)?)?;
        }
        if let Some(prefix) = lookup(PUBLIC_PREFIX_VAR) {
            config = config.with_public_prefix(prefix);
        }
        if let Some(raw) = lookup(DOWNLOAD_TIMEOUT_VAR) {
            let secs = parse_number::<u64>(DOWNLOAD_TIMEOUT_VAR, &raw)?;
            config = config.with_download_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(MAX_REDIRECTS_VAR) {
            config = config.with_max_redirects(parse_number::<usize>(MAX_REDIRECTS_VAR, &raw)?);
        }
        Ok(config)
    }

    /// Replaces the resolution list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyResolutions`] for an empty list and
    /// [`ConfigError::DuplicateResolution`] when a width repeats.
    pub fn with_resolutions(
        mut self,
        resolutions: impl IntoIterator<Item = Resolution>,
    ) -> Result<Self, ConfigError> {
        let list: Vec<Resolution> = resolutions.into_iter().collect();
        if list.is_empty() {
            return Err(ConfigError::EmptyResolutions);
        }
        let mut seen = HashSet::new();
        for resolution in &list {
            if !seen.insert(*resolution) {
                return Err(ConfigError::DuplicateResolution(*resolution));
            }
        }
        self.resolutions = list;
        Ok(self)
    }

    /// Sets the prefix of public variant paths. Trailing slashes are dropped.
    #[must_use]
    pub fn with_public_prefix(mut self, prefix: impl Into<String>) -> Self {
        let raw = prefix.into();
        let trimmed = raw.trim().trim_end_matches('/');
        self.public_prefix = if trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Sets the per-request download timeout.
    #[must_use]
    pub const fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Sets the maximum number of redirects followed per download.
    #[must_use]
    pub const fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Directory receiving acquired source images.
    #[must_use]
    pub fn input_root(&self) -> &Utf8Path {
        &self.input_root
    }

    /// Directory receiving generated variants.
    #[must_use]
    pub fn output_root(&self) -> &Utf8Path {
        &self.output_root
    }

    /// Target widths, in generation order.
    #[must_use]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Prefix of public variant paths, without trailing slash.
    #[must_use]
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Per-request download timeout.
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    /// Maximum redirects followed per download.
    #[must_use]
    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    pub bind_address: String,
}

impl ServerConfig {
    /// Loads server settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Loads server settings from `lookup`.
    #[must_use]
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_address = lookup(BIND_VAR).unwrap_or_else(|| {
            let port = lookup(PORT_VAR).unwrap_or_else(|| DEFAULT_PORT.to_owned());
            format!("0.0.0.0:{port}")
        });
        Self { bind_address }
    }
}

fn current_dir() -> Result<Utf8PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|path| ConfigError::InvalidValue {
        key: "working directory",
        value: path.display().to_string(),
        reason: "path is not valid UTF-8".to_owned(),
    })
}

fn absolutize(cwd: &Utf8Path, value: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(value.trim());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn parse_resolutions(raw: &str) -> Result<Vec<Resolution>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            Resolution::try_from(part).map_err(|err| ConfigError::InvalidValue {
                key: RESOLUTIONS_VAR,
                value: raw.to_owned(),
                reason: err.to_string(),
            })
        })
        .collect()
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
            reason: err.to_string(),
        })
}
