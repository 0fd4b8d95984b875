//! Task commands: add, list, status flips, delete, and the delete-then-
//! recreate edit.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Task, TaskStatus};
use crate::output::{emit_success, HumanOutput};
use crate::tag;

use super::{parse_date_arg, resolve_planner, Context, TaskCommands};

#[derive(Serialize)]
struct TaskListOutput {
    planner_id: i64,
    tasks: Vec<Task>,
}

pub async fn run(ctx: &Context, cmd: &TaskCommands) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            planner,
            note,
            date,
            hour,
            plain,
        } => add(ctx, planner, note, date.as_deref(), *hour, *plain).await,
        TaskCommands::Ls { planner, status } => list(ctx, planner, status.as_deref()).await,
        TaskCommands::Done { id } => set_status(ctx, *id, TaskStatus::Completed).await,
        TaskCommands::Reopen { id } => set_status(ctx, *id, TaskStatus::Pending).await,
        TaskCommands::Rm { id } => remove(ctx, *id).await,
        TaskCommands::Edit { planner, id, note } => edit(ctx, planner, *id, note).await,
    }
}

async fn add(
    ctx: &Context,
    planner: &str,
    note: &str,
    date: Option<&str>,
    hour: Option<u32>,
    plain: bool,
) -> Result<()> {
    let title = if plain {
        let note = note.trim();
        if note.is_empty() {
            return Err(Error::EmptyNote);
        }
        note.to_string()
    } else {
        let date = parse_date_arg(date)?;
        let slot_key = tag::encode_slot_key(date, hour)?;
        tag::build_title(&slot_key, note)?
    };

    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let task = client.create_task(planner.id, &title).await?;

    // Full refetch after the mutation; the created task alone is not the
    // source of truth.
    let tasks = client.tasks(planner.id).await?;

    let mut human = HumanOutput::new(format!("Added task #{}", task.id));
    human.push_summary("planner", &planner.name);
    human.push_summary("title", &task.title);
    human.push_summary("tasks in planner", tasks.len().to_string());

    emit_success(ctx.options, "task add", &task, Some(&human))
}

async fn list(ctx: &Context, planner: &str, status: Option<&str>) -> Result<()> {
    let status = match status {
        Some("pending") => Some(TaskStatus::Pending),
        Some("completed") => Some(TaskStatus::Completed),
        Some(other) => {
            return Err(Error::InvalidArgument(format!(
                "invalid status '{other}': must be pending or completed"
            )));
        }
        None => None,
    };

    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let mut tasks = client.tasks(planner.id).await?;
    if let Some(status) = status {
        tasks.retain(|task| task.status == status);
    }

    let mut human = HumanOutput::new(format!(
        "{} task(s) in {}",
        tasks.len(),
        planner.name
    ));
    for task in &tasks {
        let marker = match task.status {
            TaskStatus::Completed => "x",
            TaskStatus::Pending => " ",
        };
        let slot = tag::extract_slot_key(&task.title).unwrap_or("-");
        human.push_detail(format!(
            "#{} [{marker}] {slot} {}",
            task.id,
            tag::strip_tags(&task.title)
        ));
    }

    emit_success(
        ctx.options,
        "task ls",
        &TaskListOutput {
            planner_id: planner.id,
            tasks,
        },
        Some(&human),
    )
}

async fn set_status(ctx: &Context, id: i64, status: TaskStatus) -> Result<()> {
    let client = ctx.client()?;
    let task = client.set_task_status(id, status).await?;
    let tasks = client.tasks(task.planner_id).await?;
    let pending = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .count();

    let mut human = HumanOutput::new(format!("Task #{} is now {}", task.id, task.status));
    human.push_summary("note", tag::strip_tags(&task.title));
    human.push_summary("pending in planner", pending.to_string());

    let command = match status {
        TaskStatus::Completed => "task done",
        TaskStatus::Pending => "task reopen",
    };
    emit_success(ctx.options, command, &task, Some(&human))
}

async fn remove(ctx: &Context, id: i64) -> Result<()> {
    let client = ctx.client()?;
    client.delete_task(id).await?;

    let human = HumanOutput::new(format!("Deleted task #{id}"));
    emit_success(
        ctx.options,
        "task rm",
        &serde_json::json!({ "deleted": id }),
        Some(&human),
    )
}

/// Edit is delete-then-create: the backend has no title update. The slot
/// tag is carried over from the old title so the task stays in its slot.
/// If the create fails after the delete succeeded, the old task is gone;
/// the error says so instead of pretending the edit was atomic.
async fn edit(ctx: &Context, planner: &str, id: i64, note: &str) -> Result<()> {
    let client = ctx.client()?;
    let planner = resolve_planner(&client, planner).await?;
    let tasks = client.tasks(planner.id).await?;
    let old = tasks
        .iter()
        .find(|task| task.id == id)
        .ok_or(Error::TaskNotFound(id))?;

    let title = match tag::extract_slot_key(&old.title) {
        Some(slot_key) => tag::build_title(slot_key, note)?,
        None => {
            let note = note.trim();
            if note.is_empty() {
                return Err(Error::EmptyNote);
            }
            note.to_string()
        }
    };

    client.delete_task(id).await?;
    let created = match client.create_task(planner.id, &title).await {
        Ok(task) => task,
        Err(err) => {
            return Err(Error::OperationFailed(format!(
                "task #{id} was deleted but recreating it failed ({err}); re-add the note manually"
            )));
        }
    };

    let tasks = client.tasks(planner.id).await?;

    let mut human = HumanOutput::new(format!("Replaced task #{id} with #{}", created.id));
    human.push_summary("title", &created.title);
    human.push_summary("tasks in planner", tasks.len().to_string());

    emit_success(ctx.options, "task edit", &created, Some(&human))
}
