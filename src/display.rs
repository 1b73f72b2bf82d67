//! Terminal formatting for CLI output.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::access::MenuGroup;
use crate::board::Column;
use crate::notify::{Toast, ToastLevel};
use crate::types::{ItemPriority, ItemStatus, WorkItem};
use crate::validate::FieldErrors;

pub fn format_status_colored(status: ItemStatus) -> String {
    let badge = format!("[{}]", status);
    match status {
        ItemStatus::Todo => badge.yellow().to_string(),
        ItemStatus::InProgress => badge.cyan().to_string(),
        ItemStatus::Completed => badge.green().to_string(),
    }
}

pub fn format_priority_colored(priority: ItemPriority) -> String {
    let label = priority.to_string();
    match priority {
        ItemPriority::High => label.red().to_string(),
        ItemPriority::Medium => label.yellow().to_string(),
        ItemPriority::Low => label.dimmed().to_string(),
    }
}

/// Single-line summary of a task
pub fn format_item_line(item: &WorkItem) -> String {
    let id = format!("{:>6}", item.id.to_string());
    format!(
        "{} {} {} - {}",
        id.cyan(),
        format_status_colored(item.status),
        format_priority_colored(item.priority),
        item.title
    )
}

/// Multi-line view of one task
pub fn format_item_detail(item: &WorkItem) -> String {
    let mut out = format!("{}\n", item.title.bold());
    out.push_str(&format!("  id:       {}\n", item.id.to_string().cyan()));
    out.push_str(&format!("  status:   {}\n", format_status_colored(item.status)));
    out.push_str(&format!(
        "  priority: {}\n",
        format_priority_colored(item.priority)
    ));
    if let Some(due) = item.due_date {
        out.push_str(&format!("  due:      {due}\n"));
    }
    if let Some(description) = item.description.as_deref() {
        out.push('\n');
        for line in description.lines() {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

/// A row in the task table
#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
}

pub fn task_table(items: &[WorkItem]) -> String {
    let rows: Vec<TaskRow> = items
        .iter()
        .map(|item| TaskRow {
            id: item.id.to_string(),
            status: item.status.label(),
            priority: item.priority.to_string(),
            due: item
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            title: item.title.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Columns printed one after another, for non-interactive board output
pub fn format_columns(columns: &[Column]) -> String {
    let mut out = String::new();
    for column in columns {
        out.push_str(&format!(
            "{} ({})\n",
            column.title().bold(),
            column.len()
        ));
        if column.is_empty() {
            out.push_str(&format!("  {}\n", "(empty)".dimmed()));
        }
        for item in &column.items {
            out.push_str(&format!("  {}\n", format_item_line(item)));
        }
        out.push('\n');
    }
    out
}

pub fn format_toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Info => toast.message.clone(),
        ToastLevel::Success => format!("{} {}", "✓".green(), toast.message),
        ToastLevel::Warning => format!("{} {}", "!".yellow(), toast.message),
        ToastLevel::Error => format!("{} {}", "✗".red(), toast.message.red()),
    }
}

/// One line per failed field, suitable for stderr
pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", e.field.bold(), e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_menu(groups: &[MenuGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{}\n", group.title.bold()));
        for item in &group.items {
            out.push_str(&format!("  {:<12} {}\n", item.title, item.path.dimmed()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use std::collections::BTreeMap;

    fn item() -> WorkItem {
        WorkItem {
            id: RecordId::Int(12),
            title: "Ship release notes".to_string(),
            description: Some("Changelog\nBlog post".to_string()),
            status: ItemStatus::InProgress,
            priority: ItemPriority::High,
            due_date: Some(jiff::civil::date(2024, 6, 3)),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_task_table_contains_fields() {
        let table = task_table(&[item()]);
        assert!(table.contains("Ship release notes"));
        assert!(table.contains("In Progress"));
        assert!(table.contains("2024-06-03"));
        assert!(table.contains("ID"));
    }

    #[test]
    fn test_item_detail_lists_description_lines() {
        let detail = format_item_detail(&item());
        assert!(detail.contains("Changelog"));
        assert!(detail.contains("Blog post"));
        assert!(detail.contains("2024-06-03"));
    }

    #[test]
    fn test_format_columns_marks_empty() {
        let columns = crate::board::group_items(&[item()], "");
        let out = format_columns(&columns);
        assert!(out.contains("(empty)"));
        assert!(out.contains("Ship release notes"));
    }
}
