//! Black-box tests for the HTTP surface, served on an ephemeral port.

mod test_helpers;

use axum::Router;
use eyre::{Result, bail};
use image_tasks::{
    http::{self, ApiState, CreatedTaskBody, TaskBody},
    task::{
        adapters::{
            files::FileSourceResolver,
            imaging::ImageVariantGenerator,
            memory::{InMemoryImageRepository, InMemoryTaskRepository},
        },
        domain::TaskStatus,
        services::{ProcessingQueue, TaskProcessingService, TaskService},
    },
};
use mockable::DefaultClock;
use reqwest::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::{TestServer, Workspace, png_bytes};

struct Api {
    workspace: Workspace,
    server: TestServer,
    client: reqwest::Client,
}

fn app(workspace: &Workspace) -> Router {
    let config = workspace.config();
    let clock = Arc::new(DefaultClock);
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let images = Arc::new(InMemoryImageRepository::new());
    let processor = TaskProcessingService::new(
        Arc::clone(&tasks),
        Arc::clone(&images),
        Arc::new(ImageVariantGenerator::new(
            config.clone(),
            Arc::clone(&clock),
        )),
        Arc::clone(&clock),
    );
    let (queue, _worker) = ProcessingQueue::spawn(Arc::new(processor));
    let resolver = FileSourceResolver::new(config).expect("client should build");
    let service = TaskService::new(tasks, images, Arc::new(resolver), clock);
    http::router(ApiState::new(service, queue))
}

#[fixture]
async fn api() -> Api {
    let workspace = Workspace::new();
    let server = TestServer::spawn(app(&workspace)).await;
    Api {
        workspace,
        server,
        client: reqwest::Client::new(),
    }
}

impl Api {
    async fn create(&self, image_path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.server.url("/tasks"))
            .json(&json!({ "imagePath": image_path }))
            .send()
            .await?)
    }

    async fn get(&self, task_id: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.server.url(&format!("/tasks/{task_id}")))
            .send()
            .await?)
    }

    /// Polls until the task leaves `pending`.
    async fn settled(&self, task_id: &str) -> Result<TaskBody> {
        for _ in 0..200 {
            let body: TaskBody = self.get(task_id).await?.json().await?;
            if body.status != TaskStatus::Pending {
                return Ok(body);
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        bail!("task {task_id} did not settle in time")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok(#[future] api: Api) -> Result<()> {
    let api = api.await;

    let response = api.client.get(api.server.url("/health")).send().await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_processed_in_background(#[future] api: Api) -> Result<()> {
    let api = api.await;
    std::fs::write(api.workspace.input.join("cat.png"), png_bytes(1600, 800))?;

    let response = api.create("cat.png").await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreatedTaskBody = response.json().await?;
    assert_eq!(created.status, TaskStatus::Pending);
    assert!((5..=50).contains(&created.price));

    let settled = api.settled(&created.task_id).await?;
    assert_eq!(settled.status, TaskStatus::Completed);
    assert_eq!(settled.price, created.price);
    let images = settled.images.unwrap_or_default();
    let resolutions: Vec<&str> = images.iter().map(|i| i.resolution.as_str()).collect();
    assert_eq!(resolutions, vec!["1024", "800"]);
    assert!(images.iter().all(|i| i.path.starts_with("/images/cat/")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_image_ends_failed_without_images(#[future] api: Api) -> Result<()> {
    let api = api.await;
    std::fs::write(api.workspace.input.join("notes.png"), b"plain text")?;

    let created: CreatedTaskBody = api.create("notes.png").await?.json().await?;
    let settled = api.settled(&created.task_id).await?;

    assert_eq!(settled.status, TaskStatus::Failed);
    let raw: Value = api.get(&created.task_id).await?.json().await?;
    assert!(raw.get("images").is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_source_is_rejected(#[future] api: Api) -> Result<()> {
    let api = api.await;
    let origin = TestServer::spawn(Router::new()).await;

    let response = api.create(&origin.url("/a.jpg")).await?;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "acquisition_error");
    Ok(())
}

#[rstest]
#[case("0b6f0d4e-8a55-4c43-9f0a-5d1c9e2b7a10", StatusCode::NOT_FOUND, "not_found")]
#[case("not-a-task", StatusCode::BAD_REQUEST, "invalid_task_id")]
#[tokio::test(flavor = "multi_thread")]
async fn lookup_errors_are_reported(
    #[future] api: Api,
    #[case] task_id: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) -> Result<()> {
    let api = api.await;

    let response = api.get(task_id).await?;

    assert_eq!(response.status(), status);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], code);
    Ok(())
}

#[rstest]
#[case::missing_field(Some("application/json"), "{}", StatusCode::UNPROCESSABLE_ENTITY)]
#[case::malformed_json(Some("application/json"), "{\"imagePath\":", StatusCode::BAD_REQUEST)]
#[case::wrong_content_type(None, "imagePath=cat.png", StatusCode::UNSUPPORTED_MEDIA_TYPE)]
#[tokio::test(flavor = "multi_thread")]
async fn unusable_bodies_get_json_errors(
    #[future] api: Api,
    #[case] content_type: Option<&str>,
    #[case] payload: &'static str,
    #[case] status: StatusCode,
) -> Result<()> {
    let api = api.await;
    let mut request = api.client.post(api.server.url("/tasks")).body(payload);
    if let Some(content_type) = content_type {
        request = request.header(reqwest::header::CONTENT_TYPE, content_type);
    }

    let response = request.send().await?;

    assert_eq!(response.status(), status);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    Ok(())
}
