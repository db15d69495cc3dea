use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use taskdeck_app::service::{CreateTaskInput, DescriptionPatch, TaskEdit, TaskListService};
use taskdeck_app::store::TaskStore;
use taskdeck_core::{TaskId, TaskRecord};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{Command, ListFormat, UndoTarget};

/// Dispatch one parsed command against the loaded engine.
#[allow(clippy::too_many_lines)]
pub fn run<S: TaskStore>(command: Command, service: &mut TaskListService<S>) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let due_date = parse_due_date(&due)?;
            let record = service.add_task(CreateTaskInput {
                title,
                description,
                priority,
                due_date,
            })?;
            println!("created task: {} ({})", record.id, record.title);
        }

        Command::List {
            sort,
            filter,
            all,
            format,
        } => {
            if let Some(sort) = sort {
                service.set_sort_option(sort);
            }
            if all {
                service.set_filter_status(None);
            } else if let Some(filter) = filter {
                service.set_filter_status(Some(filter));
            }

            let tasks = service.visible_tasks();
            if tasks.is_empty() {
                if service.filter_status().is_some() {
                    println!("No tasks matched the status filter");
                } else {
                    println!("No tasks found");
                }
                return Ok(());
            }

            match format {
                ListFormat::Table => {
                    render_task_table(tasks);
                    let stats = service.completion_stats();
                    println!();
                    println!(
                        "{}/{} completed ({:.0}%)",
                        stats.completed,
                        stats.total,
                        service.completion_percentage()
                    );
                }
                ListFormat::Json => println!("{}", serde_json::to_string_pretty(tasks)?),
            }
        }

        Command::Show { id } => {
            let id = resolve_task_id(service, &id)?;
            let record = service
                .tasks()
                .iter()
                .find(|task| task.id == id)
                .ok_or_else(|| anyhow!("task {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }

        Command::Edit {
            id,
            title,
            description,
            clear_description,
            priority,
            due,
        } => {
            let id = resolve_task_id(service, &id)?;
            let description = if clear_description {
                DescriptionPatch::Clear
            } else {
                description.map_or(DescriptionPatch::Keep, DescriptionPatch::Set)
            };
            let due_date = due.as_deref().map(parse_due_date).transpose()?;
            let record = service.edit_task(
                id,
                TaskEdit {
                    title,
                    description,
                    priority,
                    due_date,
                },
            )?;
            println!("updated task: {} ({})", record.id, record.title);
        }

        Command::Done { id } => {
            let id = resolve_task_id(service, &id)?;
            let status = service.toggle_status(id)?;
            println!("task {id} is now {}", status.as_str());
            print_undo_hint(service);
        }

        Command::Rm { id } => {
            let id = resolve_task_id(service, &id)?;
            service.delete_task(id)?;
            println!("deleted task: {id}");
            print_undo_hint(service);
        }

        Command::Undo { kind } => {
            let restored = match kind {
                Some(UndoTarget::Delete) => service.undo_delete()?,
                Some(UndoTarget::Toggle) => service.undo_toggle()?,
                None => match service.undo_delete()? {
                    Some(record) => Some(record),
                    None => service.undo_toggle()?,
                },
            };
            match restored {
                Some(record) => println!("restored task: {} ({})", record.id, record.title),
                None => println!("nothing to undo"),
            }
        }

        Command::Mv { id, position } => {
            let id = resolve_task_id(service, &id)?;
            let visible = service.visible_tasks();
            if !visible.iter().any(|task| task.id == id) {
                bail!("task {id} is not in the displayed sequence; clear the filter first");
            }
            if position == 0 || position > visible.len() {
                bail!("position must be between 1 and {}", visible.len());
            }
            let mut order: Vec<TaskId> = visible.iter().map(|task| task.id).collect();
            order.retain(|candidate| *candidate != id);
            order.insert(position - 1, id);
            service.reorder(&order)?;
            println!("moved task {id} to position {position}");
        }

        Command::Repl => unreachable!("Handled in main"),
    }

    Ok(())
}

/// Resolve a full task id or a unique prefix against the loaded collection.
fn resolve_task_id<S>(service: &TaskListService<S>, raw: &str) -> Result<TaskId> {
    let needle = raw.trim();
    if let Ok(id) = TaskId::from_str(needle) {
        return Ok(id);
    }
    if needle.is_empty() {
        bail!("task id must not be empty");
    }

    let mut matches = service
        .tasks()
        .iter()
        .filter(|task| task.id.to_string().starts_with(needle));
    let Some(first) = matches.next() else {
        bail!("no task id starts with '{needle}'");
    };
    if matches.next().is_some() {
        bail!("task id prefix '{needle}' is ambiguous");
    }
    Ok(first.id)
}

/// Accept an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
///
/// Timestamps with an offset are normalized to UTC so comparisons stay
/// consistent across interfaces.
fn parse_due_date(raw: &str) -> Result<OffsetDateTime> {
    let trimmed = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }
    let date = Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("invalid due date '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))?;
    Ok(date.midnight().assume_utc())
}

fn render_task_table(tasks: &[TaskRecord]) {
    println!("ID | Priority | Due | Status | Title");
    println!("-- | -------- | --- | ------ | -----");

    for task in tasks {
        println!(
            "{} | {} | {} | {} | {}",
            task.id,
            task.priority.as_str(),
            format_due(task.due_date),
            task.status.as_str(),
            task.title
        );
    }
}

fn format_due(due: OffsetDateTime) -> String {
    due.format(&Rfc3339)
        .unwrap_or_else(|_| due.date().to_string())
}

fn print_undo_hint<S>(service: &TaskListService<S>) {
    if let Some(affordance) = service.undo_affordance() {
        println!(
            "{} Run `undo` within {:.0}s to restore.",
            affordance.message,
            affordance.remaining.as_seconds_f64()
        );
    }
}
