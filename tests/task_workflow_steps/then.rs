//! Then steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use rstest_bdd_macros::then;
use taskdeck::task::domain::TaskStatus;

#[then(r#"the task "{title}" has priority {priority:u32}"#)]
fn task_has_priority(
    world: &TaskWorkflowWorld,
    title: String,
    priority: u32,
) -> Result<(), eyre::Report> {
    let task = world.load(&title)?;
    eyre::ensure!(
        task.priority().value() == priority,
        "expected '{title}' at priority {priority}, found {}",
        task.priority()
    );
    Ok(())
}

#[then(r#"the task "{title}" has status "{status}""#)]
fn task_has_status(
    world: &TaskWorkflowWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.load(&title)?;
    eyre::ensure!(
        task.status() == expected,
        "expected '{title}' in status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task "{title}" is titled "{expected}""#)]
fn task_is_titled(
    world: &TaskWorkflowWorld,
    title: String,
    expected: String,
) -> Result<(), eyre::Report> {
    let task = world.load(&title)?;
    eyre::ensure!(
        task.title().as_str() == expected,
        "expected title {expected}, found {}",
        task.title()
    );
    Ok(())
}

#[then(r#"the task "{title}" has {count:usize} status change records"#)]
fn task_has_history_length(
    world: &TaskWorkflowWorld,
    title: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let history = run_async(world.service.status_history(world.owner, task_id, None))?;
    eyre::ensure!(
        history.len() == count,
        "expected {count} status change records for '{title}', found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the latest status change of "{title}" is from "{old}" to "{new}""#)]
fn latest_status_change(
    world: &TaskWorkflowWorld,
    title: String,
    old: String,
    new: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&title)?;
    let history = run_async(world.service.status_history(world.owner, task_id, None))?;
    let latest = history
        .last()
        .ok_or_else(|| eyre::eyre!("no status change recorded for '{title}'"))?;
    eyre::ensure!(
        latest.old_status().as_str() == old && latest.new_status().as_str() == new,
        "expected {old} -> {new}, found {} -> {}",
        latest.old_status(),
        latest.new_status()
    );
    Ok(())
}
