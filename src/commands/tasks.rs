//! Task commands (`folio tasks ...`)
//!
//! Every handler passes the route guard for [`TASKS_ROUTE`] before touching
//! the API. Mutations go through [`TaskBoard`](crate::board::TaskBoard) so
//! they validate, invalidate and record toasts the same way the board does.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, report_toasts};
use crate::api::TaskBackend;
use crate::board::{DropEvent, DropLocation, DropOutcome, filter_items};
use crate::cli::OutputOptions;
use crate::display::{format_item_detail, format_item_line, task_table};
use crate::error::{FolioError, Result};
use crate::types::{ItemStatus, RecordId};
use crate::validate::{WorkItemForm, apply_form};

/// Route guarding all task commands
pub const TASKS_ROUTE: &str = "/tasks";

/// Raw fields for `tasks create`
#[derive(Debug, Clone, Default)]
pub struct NewTaskOptions {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due: Option<String>,
}

/// Fields to change with `tasks edit`; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
}

impl EditOptions {
    fn apply_to(self, form: &mut WorkItemForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
        if let Some(due) = self.due {
            form.due_date = due;
        }
    }
}

pub async fn cmd_task_ls(
    ctx: &AppContext,
    status: Option<ItemStatus>,
    search: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let board = ctx.board()?;
    let items = board.load().await?;
    let items: Vec<_> = filter_items(&items, search.unwrap_or(""))
        .into_iter()
        .filter(|item| status.is_none_or(|s| item.status == s))
        .collect();

    let text = if items.is_empty() {
        "No tasks".dimmed().to_string()
    } else {
        task_table(&items)
    };
    CommandOutput::new(json!(items)).with_text(text).print(output)
}

pub async fn cmd_task_show(ctx: &AppContext, id: &RecordId, output: OutputOptions) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let item = ctx.api()?.get_task(id).await?;
    CommandOutput::new(json!(item))
        .with_text(format_item_detail(&item))
        .print(output)
}

pub async fn cmd_task_create(
    ctx: &AppContext,
    options: NewTaskOptions,
    output: OutputOptions,
) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let form = WorkItemForm {
        title: options.title,
        description: options.description.unwrap_or_default(),
        status: options.status,
        priority: options.priority,
        due_date: options.due.unwrap_or_default(),
    };
    let item = form.validate()?.into_new();

    let board = ctx.board()?;
    let result = board.create(item).await;
    report_toasts(board.notifications(), output);
    let created = result?;

    CommandOutput::new(json!(created))
        .with_text(format_item_line(&created))
        .print(output)
}

pub async fn cmd_task_edit(
    ctx: &AppContext,
    id: &RecordId,
    options: EditOptions,
    output: OutputOptions,
) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let board = ctx.board()?;
    let current = board.backend().get_task(id).await?;

    let mut form = WorkItemForm::from_item(&current);
    options.apply_to(&mut form);
    let updated = apply_form(&current, &form)?;

    let result = board.update(updated).await;
    report_toasts(board.notifications(), output);
    let saved = result?;

    CommandOutput::new(json!(saved))
        .with_text(format_item_line(&saved))
        .print(output)
}

/// Move a task the way a board drop does: cache patch first, rollback on failure
pub async fn cmd_task_move(
    ctx: &AppContext,
    id: &RecordId,
    status: ItemStatus,
    output: OutputOptions,
) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let board = ctx.board()?;
    board.load().await?;
    let item = board
        .find(id)
        .ok_or_else(|| FolioError::TaskNotFound(id.to_string()))?;

    if item.status == status {
        return CommandOutput::new(json!({
            "action": "move",
            "id": id,
            "status": status,
            "changed": false,
        }))
        .with_text(format!("'{}' is already in {}", item.title, status.label()))
        .print(output);
    }

    let index = board
        .columns("")
        .iter()
        .find(|column| column.status == item.status)
        .and_then(|column| column.items.iter().position(|i| &i.id == id))
        .unwrap_or(0);
    let event = DropEvent::new(
        id.clone(),
        DropLocation::new(item.status, index),
        Some(DropLocation::new(status, 0)),
    );

    let outcome = board.handle_drop(event).await;
    report_toasts(board.notifications(), output);
    match outcome {
        DropOutcome::Confirmed(saved) => CommandOutput::new(json!({
            "action": "move",
            "id": id,
            "status": saved.status,
            "changed": true,
            "task": saved,
        }))
        .with_text(format_item_line(&saved))
        .print(output),
        DropOutcome::RolledBack { message, .. } => Err(FolioError::Other(message)),
        DropOutcome::Ignored(reason) => Err(FolioError::Other(reason.to_string())),
        DropOutcome::Busy(id) => Err(FolioError::Other(format!("task '{id}' is busy"))),
    }
}

pub async fn cmd_task_rm(ctx: &AppContext, id: &RecordId, output: OutputOptions) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, output)? {
        return Ok(());
    }
    let board = ctx.board()?;
    let result = board.delete(id).await;
    report_toasts(board.notifications(), output);
    result?;

    CommandOutput::new(json!({
        "action": "delete",
        "id": id,
    }))
    .with_text(format!("Deleted task {}", id.to_string().cyan()))
    .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemPriority, WorkItem};
    use std::collections::BTreeMap;

    #[test]
    fn test_edit_options_override_only_given_fields() {
        let item = WorkItem {
            id: RecordId::Int(3),
            title: "Plan sprint".to_string(),
            description: Some("Backlog grooming".to_string()),
            status: ItemStatus::Todo,
            priority: ItemPriority::Low,
            due_date: None,
            extra: BTreeMap::new(),
        };
        let mut form = WorkItemForm::from_item(&item);
        EditOptions {
            priority: Some("High".to_string()),
            due: Some("2024-09-01".to_string()),
            ..Default::default()
        }
        .apply_to(&mut form);

        let updated = apply_form(&item, &form).unwrap();
        assert_eq!(updated.title, "Plan sprint");
        assert_eq!(updated.description.as_deref(), Some("Backlog grooming"));
        assert_eq!(updated.priority, ItemPriority::High);
        assert_eq!(updated.due_date, Some(jiff::civil::date(2024, 9, 1)));
        assert_eq!(updated.id, RecordId::Int(3));
    }

    #[test]
    fn test_empty_due_clears_date() {
        let item = WorkItem {
            id: RecordId::Int(4),
            title: "Renew domain".to_string(),
            description: None,
            status: ItemStatus::Todo,
            priority: ItemPriority::Medium,
            due_date: Some(jiff::civil::date(2024, 1, 1)),
            extra: BTreeMap::new(),
        };
        let mut form = WorkItemForm::from_item(&item);
        EditOptions {
            due: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut form);
        assert_eq!(apply_form(&item, &form).unwrap().due_date, None);
    }
}
