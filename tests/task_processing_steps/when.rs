//! When steps for task processing BDD scenarios.

use super::world::{TaskProcessingWorld, run_async};
use eyre::WrapErr;
use image_tasks::task::{domain::TaskId, services::CreateTaskRequest};
use rstest_bdd_macros::when;

#[when(r#"a task is created for "{reference}""#)]
fn create_task(world: &mut TaskProcessingWorld, reference: String) -> Result<(), eyre::Report> {
    let task = run_async(world.tasks.create_task(CreateTaskRequest::new(reference)))
        .wrap_err("create task")?;
    world.created = Some(task);
    Ok(())
}

#[when("the task is processed")]
fn process_task(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    let task_id = world.created_task()?.id();
    let processed = run_async(world.processor.process(task_id)).wrap_err("process task")?;
    world.first_run = Some(processed);
    Ok(())
}

#[when("the task is processed again")]
fn process_task_again(world: &mut TaskProcessingWorld) -> Result<(), eyre::Report> {
    let task_id = world.created_task()?.id();
    let processed = run_async(world.processor.process(task_id)).wrap_err("reprocess task")?;
    world.second_run = Some(processed);
    Ok(())
}

#[when("an unknown task is processed")]
fn process_unknown_task(world: &mut TaskProcessingWorld) {
    if let Err(err) = run_async(world.processor.process(TaskId::new())) {
        world.last_error = Some(err);
    }
}
