//! Client-side validation for the work item form.
//!
//! Validation runs before any request is built. Every field is checked and
//! all failures are reported together so they can be shown next to the
//! offending inputs.

use std::fmt;

use jiff::civil::Date;

use crate::error::{FolioError, Result};
use crate::types::{ItemPriority, ItemStatus, NewWorkItem, WorkItem};

/// Maximum length for work item titles (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collected field errors for one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First error message for `field`, for inline display
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Raw text input of the create/edit dialog
#[derive(Debug, Clone, Default)]
pub struct WorkItemForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

/// Values that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidWorkItem {
    pub title: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub priority: ItemPriority,
    pub due_date: Option<Date>,
}

impl WorkItemForm {
    /// Prefill the form from an existing item (edit dialog)
    pub fn from_item(item: &WorkItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            status: item.status.to_string(),
            priority: item.priority.to_string(),
            due_date: item.due_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    /// Check every field, collecting all failures.
    ///
    /// Empty status and priority fall back to their defaults.
    pub fn validate(&self) -> Result<ValidWorkItem> {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", "Title is required");
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            errors.push(
                "title",
                format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
            );
        } else if title.chars().any(|c| c.is_control()) {
            errors.push("title", "Title cannot contain control characters");
        }

        let description = self.description.trim();
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(
                "description",
                format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            );
        } else if description
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
        {
            errors.push("description", "Description contains invalid control characters");
        }

        let status = parse_or_default(&self.status, "status", &mut errors);
        let priority = parse_or_default(&self.priority, "priority", &mut errors);

        let due_date = match self.due_date.trim() {
            "" => None,
            s => match s.parse::<Date>() {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push("due_date", "Due date must be YYYY-MM-DD");
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(FolioError::Validation(errors));
        }

        Ok(ValidWorkItem {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status,
            priority,
            due_date,
        })
    }
}

fn parse_or_default<T>(raw: &str, field: &'static str, errors: &mut FieldErrors) -> T
where
    T: std::str::FromStr<Err = FolioError> + Default,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return T::default();
    }
    raw.parse().unwrap_or_else(|e: FolioError| {
        errors.push(field, e.to_string());
        T::default()
    })
}

impl ValidWorkItem {
    pub fn into_new(self) -> NewWorkItem {
        NewWorkItem {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        }
    }

    /// Merge onto an existing record, keeping fields the form does not edit.
    pub fn merge_into(self, current: &WorkItem) -> WorkItem {
        WorkItem {
            id: current.id.clone(),
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            extra: current.extra.clone(),
        }
    }
}

/// Validate a fully built item before it is sent as an update.
pub fn validate_item(item: &WorkItem) -> Result<()> {
    WorkItemForm::from_item(item).validate().map(|_| ())
}

/// Validate a creation request before it is sent.
pub fn validate_new(item: &NewWorkItem) -> Result<()> {
    let form = WorkItemForm {
        title: item.title.clone(),
        description: item.description.clone().unwrap_or_default(),
        status: item.status.to_string(),
        priority: item.priority.to_string(),
        due_date: item.due_date.map(|d| d.to_string()).unwrap_or_default(),
    };
    form.validate().map(|_| ())
}

/// Convenience used by the edit command: same id, validated form values.
pub fn apply_form(current: &WorkItem, form: &WorkItemForm) -> Result<WorkItem> {
    Ok(form.validate()?.merge_into(current))
}
