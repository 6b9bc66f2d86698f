//! Then steps for task processing BDD scenarios.

use super::world::{TaskProcessingWorld, run_async};
use eyre::{WrapErr, ensure, eyre};
use image::GenericImageView;
use image_tasks::task::{
    domain::{ImageVariant, TaskStatus},
    services::TaskProcessingError,
};
use rstest_bdd_macros::then;

fn stored_images(world: &TaskProcessingWorld) -> Result<Vec<ImageVariant>, eyre::Report> {
    let task_id = world.created_task()?.id();
    let view = run_async(world.tasks.get_task(task_id)).wrap_err("get task")?;
    Ok(view.images.unwrap_or_default())
}

#[then(r#"the task status is "{status}""#)]
fn task_status(world: &mut TaskProcessingWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str()).wrap_err("parse expected status")?;
    let task_id = world.created_task()?.id();
    let view = run_async(world.tasks.get_task(task_id)).wrap_err("get task")?;
    ensure!(
        view.status == expected,
        "expected status {expected}, found {}",
        view.status
    );
    Ok(())
}

#[then("the task lists {count} images")]
fn task_lists_images(world: &mut TaskProcessingWorld, count: usize) -> Result<(), eyre::Report> {
    let images = stored_images(world)?;
    ensure!(images.len() == count, "expected {count} images, found {}", images.len());
    Ok(())
}

#[then("the task has no images")]
fn task_lists_no_images(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    let task_id = world.created_task()?.id();
    let view = run_async(world.tasks.get_task(task_id)).wrap_err("get task")?;
    ensure!(view.images.is_none(), "failed task should not list images");
    Ok(())
}

#[then("every image fits within its resolution")]
fn images_fit(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    for variant in stored_images(world)? {
        let path = world.variant_file(&variant.path);
        let (width, _) = image::open(&path)
            .wrap_err_with(|| format!("open {path}"))?
            .dimensions();
        ensure!(
            width <= variant.resolution.width(),
            "{path} is {width}px wide, above {}",
            variant.resolution
        );
    }
    Ok(())
}

#[then("every image is {width} pixels wide")]
fn images_have_width(world: &mut TaskProcessingWorld, width: u32) -> Result<(), eyre::Report> {
    let images = stored_images(world)?;
    ensure!(!images.is_empty(), "expected generated images");
    for variant in images {
        let path = world.variant_file(&variant.path);
        let (actual, _) = image::open(&path)
            .wrap_err_with(|| format!("open {path}"))?
            .dimensions();
        ensure!(actual == width, "{path} is {actual}px wide, expected {width}");
    }
    Ok(())
}

#[then("the second run returned the task unchanged")]
fn second_run_unchanged(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    let first = world.first_run.as_ref().ok_or_else(|| eyre!("no first run"))?;
    let second = world.second_run.as_ref().ok_or_else(|| eyre!("no second run"))?;
    ensure!(first == second, "reprocessing changed the task");
    Ok(())
}

#[then("processing reports the task as not found")]
fn reports_not_found(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    ensure!(
        matches!(world.last_error, Some(TaskProcessingError::NotFound(_))),
        "expected a not-found error, got {:?}",
        world.last_error
    );
    Ok(())
}
