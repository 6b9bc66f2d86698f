//! Runs the image task HTTP service.
//!
//! Configuration comes from the environment; see
//! [`image_tasks::config::PipelineConfig::from_env`] and
//! [`image_tasks::config::ServerConfig::from_env`]. Tasks and image records
//! are held in memory for the lifetime of the process.

use image_tasks::{
    config::{ConfigError, PipelineConfig, ServerConfig},
    http::{self, ApiState},
    task::{
        adapters::{
            files::FileSourceResolver,
            imaging::ImageVariantGenerator,
            memory::{InMemoryImageRepository, InMemoryTaskRepository},
        },
        ports::AcquisitionError,
        services::{ProcessingQueue, TaskProcessingService, TaskService},
    },
    telemetry,
};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build download client: {0}")]
    Client(#[source] AcquisitionError),

    #[error("failed to bind {address}: {cause}")]
    Bind {
        address: String,
        cause: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    telemetry::init();
    run().await.map_err(Into::into)
}

async fn run() -> Result<(), ServerError> {
    let pipeline = PipelineConfig::from_env()?;
    let server = ServerConfig::from_env();

    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let images = Arc::new(InMemoryImageRepository::new());
    let resolver =
        Arc::new(FileSourceResolver::new(pipeline.clone()).map_err(ServerError::Client)?);
    let generator = Arc::new(ImageVariantGenerator::new(
        pipeline.clone(),
        Arc::clone(&clock),
    ));

    let processor = TaskProcessingService::new(
        Arc::clone(&tasks),
        Arc::clone(&images),
        generator,
        Arc::clone(&clock),
    );
    let (queue, worker) = ProcessingQueue::spawn(Arc::new(processor));
    let service = TaskService::new(tasks, images, resolver, clock);
    let app = http::router(ApiState::new(service, queue));

    let listener = tokio::net::TcpListener::bind(&server.bind_address)
        .await
        .map_err(|cause| ServerError::Bind {
            address: server.bind_address.clone(),
            cause,
        })?;
    info!(
        address = %server.bind_address,
        input = %pipeline.input_root(),
        output = %pipeline.output_root(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    worker.abort();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
