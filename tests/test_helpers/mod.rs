//! Shared fixtures for integration tests: temporary pipeline roots, encoded
//! sample images and an axum server bound to an ephemeral port.

use axum::Router;
use camino::Utf8PathBuf;
use image::{ImageFormat, Rgb, RgbImage};
use image_tasks::config::PipelineConfig;
use std::io::Cursor;
use tempfile::TempDir;

/// Temporary input and output roots, removed on drop.
pub struct Workspace {
    _dir: TempDir,
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

impl Workspace {
    /// Creates empty roots under a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temporary directory");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temporary directory path is UTF-8");
        let input = root.join("input");
        std::fs::create_dir_all(&input).expect("input directory");
        Self {
            _dir: dir,
            input,
            output: root.join("output"),
        }
    }

    /// Default pipeline configuration rooted in this workspace.
    #[must_use]
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::new(self.input.clone(), self.output.clone())
    }
}

/// Encodes a solid-colour PNG of the given size.
///
/// # Panics
///
/// Panics when encoding fails.
#[must_use]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb([10, 180, 90]))
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("png encoding");
    buffer.into_inner()
}

/// A router served on `127.0.0.1` with an ephemeral port. The server task
/// is aborted on drop.
pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serves `app` until the returned value is dropped.
    ///
    /// # Panics
    ///
    /// Panics when no local port can be bound.
    pub async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("bound address");
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "test server stopped");
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
