//! When steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskdeck::task::services::{CreateTaskRequest, UpdateTaskRequest};

#[when(r#"a task titled "{title}" is created at priority {priority:u32}"#)]
fn create_at_priority(
    world: &mut TaskWorkflowWorld,
    title: String,
    priority: u32,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.owner, title.as_str()).with_priority(priority);
    let created = run_async(world.service.create_task(request)).wrap_err("create task")?;
    world.remember(&title, &created);
    Ok(())
}

#[when(r#"a task titled "{title}" is created with status "{status}""#)]
fn create_with_status(
    world: &mut TaskWorkflowWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.owner, title.as_str()).with_status(status);
    let created = run_async(world.service.create_task(request)).wrap_err("create task")?;
    world.remember(&title, &created);
    Ok(())
}

#[when(r#"the task "{title}" is moved to status "{status}""#)]
fn move_to_status(
    world: &mut TaskWorkflowWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let request = UpdateTaskRequest::new(world.owner, world.task_id(&title)?).with_status(status);
    run_async(world.service.update_task(request)).wrap_err("update task status")?;
    Ok(())
}

#[when(r#"the task "{title}" is renamed to "{new_title}""#)]
fn rename_task(
    world: &mut TaskWorkflowWorld,
    title: String,
    new_title: String,
) -> Result<(), eyre::Report> {
    let request =
        UpdateTaskRequest::new(world.owner, world.task_id(&title)?).with_title(new_title);
    run_async(world.service.update_task(request)).wrap_err("rename task")?;
    Ok(())
}

#[when(r#"the task "{title}" is completed"#)]
fn complete_task(world: &mut TaskWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    run_async(world.service.complete_task(world.owner, task_id)).wrap_err("complete task")?;
    Ok(())
}
