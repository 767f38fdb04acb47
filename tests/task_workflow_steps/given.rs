//! Given steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdeck::task::services::CreateTaskRequest;

#[given(r#"an active task titled "{title}" at priority {priority:u32}"#)]
fn active_task_at_priority(
    world: &mut TaskWorkflowWorld,
    title: String,
    priority: u32,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.owner, title.as_str()).with_priority(priority);
    let created =
        run_async(world.service.create_task(request)).wrap_err("create task in scenario setup")?;
    world.remember(&title, &created);
    Ok(())
}
