//! Shared world state for task processing BDD scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use image_tasks::{
    config::PipelineConfig,
    task::{
        adapters::{
            files::FileSourceResolver,
            imaging::ImageVariantGenerator,
            memory::{InMemoryImageRepository, InMemoryTaskRepository},
        },
        domain::Task,
        services::{TaskProcessingError, TaskProcessingService, TaskService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;
use tempfile::TempDir;

/// Creation service used by the BDD world.
pub type TestTaskService =
    TaskService<InMemoryTaskRepository, InMemoryImageRepository, FileSourceResolver, DefaultClock>;

/// Processing service used by the BDD world.
pub type TestProcessingService = TaskProcessingService<
    InMemoryTaskRepository,
    InMemoryImageRepository,
    ImageVariantGenerator<DefaultClock>,
    DefaultClock,
>;

/// Scenario world for task processing behaviour tests.
pub struct TaskProcessingWorld {
    _workspace: TempDir,
    pub config: PipelineConfig,
    pub tasks: TestTaskService,
    pub processor: TestProcessingService,
    pub created: Option<Task>,
    pub first_run: Option<Task>,
    pub second_run: Option<Task>,
    pub last_error: Option<TaskProcessingError>,
}

impl TaskProcessingWorld {
    /// Creates a world backed by fresh input and output directories.
    ///
    /// # Panics
    ///
    /// Panics when the temporary workspace cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("temporary workspace");
        let root = Utf8PathBuf::from_path_buf(workspace.path().to_path_buf())
            .expect("temporary workspace path is UTF-8");
        let config = PipelineConfig::new(root.join("input"), root.join("output"));
        std::fs::create_dir_all(config.input_root()).expect("input directory");

        let clock = Arc::new(DefaultClock);
        let task_store = Arc::new(InMemoryTaskRepository::new());
        let image_store = Arc::new(InMemoryImageRepository::new());
        let resolver =
            FileSourceResolver::new(config.clone()).expect("download client should build");
        let tasks = TaskService::new(
            Arc::clone(&task_store),
            Arc::clone(&image_store),
            Arc::new(resolver),
            Arc::clone(&clock),
        );
        let processor = TaskProcessingService::new(
            task_store,
            image_store,
            Arc::new(ImageVariantGenerator::new(
                config.clone(),
                Arc::clone(&clock),
            )),
            clock,
        );

        Self {
            _workspace: workspace,
            config,
            tasks,
            processor,
            created: None,
            first_run: None,
            second_run: None,
            last_error: None,
        }
    }

    /// Returns the task created in this scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn created_task(&self) -> Result<&Task, eyre::Report> {
        self.created
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no task created in scenario world"))
    }

    /// Maps a public variant path onto the output directory.
    #[must_use]
    pub fn variant_file(&self, public_path: &str) -> Utf8PathBuf {
        let prefix = format!("{}/", self.config.public_prefix());
        let relative = public_path.strip_prefix(&prefix).unwrap_or(public_path);
        self.config.output_root().join(relative)
    }
}

impl Default for TaskProcessingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskProcessingWorld {
    TaskProcessingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
