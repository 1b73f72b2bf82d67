use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use jiff::civil::Date;

use crate::cache::CacheRecord;
use crate::error::FolioError;

/// Backend-assigned identifier. The API hands out integers for some
/// resources and strings for others, so both are accepted.
///
/// Identity is the display form: `Int(42)` and `Str("42")` are the same
/// record, so an id typed at the CLI finds a card the server sent as a
/// string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    fn key(&self) -> Cow<'_, str> {
        match self {
            RecordId::Int(n) => Cow::Owned(n.to_string()),
            RecordId::Str(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Int(a), RecordId::Int(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RecordId::Int(a), RecordId::Int(b)) => a.cmp(b),
            _ => self.key().cmp(&other.key()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for RecordId {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FolioError::Other("empty id".to_string()));
        }
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Str(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

/// Board column a work item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemStatus {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [
        ItemStatus::Todo,
        ItemStatus::InProgress,
        ItemStatus::Completed,
    ];

    /// Wire name, also used as the board column identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Todo => "todo",
            ItemStatus::InProgress => "in-progress",
            ItemStatus::Completed => "completed",
        }
    }

    /// Human readable column title
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Todo => "To Do",
            ItemStatus::InProgress => "In Progress",
            ItemStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(ItemStatus::Todo),
            "in-progress" | "in_progress" => Ok(ItemStatus::InProgress),
            "completed" => Ok(ItemStatus::Completed),
            _ => Err(FolioError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_STATUSES: &[&str] = &["todo", "in-progress", "completed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for ItemPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemPriority::Low => write!(f, "Low"),
            ItemPriority::Medium => write!(f, "Medium"),
            ItemPriority::High => write!(f, "High"),
        }
    }
}

impl FromStr for ItemPriority {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ItemPriority::Low),
            "medium" => Ok(ItemPriority::Medium),
            "high" => Ok(ItemPriority::High),
            _ => Err(FolioError::InvalidPriority(s.to_string())),
        }
    }
}

pub const VALID_PRIORITIES: &[&str] = &["Low", "Medium", "High"];

/// A task card on the board.
///
/// Fields the client does not model are kept in `extra` so that a full-object
/// `PUT` echoes them back unchanged. A due date the server sent as a full
/// timestamp is kept there too, under `dueDate`, and goes back verbatim as
/// long as its calendar day still matches `due_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireItem", into = "WireItem")]
pub struct WorkItem {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub priority: ItemPriority,
    pub due_date: Option<Date>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

const DUE_DATE_KEY: &str = "dueDate";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    id: RecordId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    status: ItemStatus,
    #[serde(default)]
    priority: ItemPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<WireItem> for WorkItem {
    type Error = jiff::Error;

    fn try_from(wire: WireItem) -> Result<Self, Self::Error> {
        let mut extra = wire.extra;
        let raw = wire.due_date.as_deref().map(str::trim).unwrap_or_default();
        let due_date = due_date::parse(raw)?;
        if due_date.is_some_and(|date| raw != date.to_string()) {
            extra.insert(DUE_DATE_KEY.to_string(), raw.into());
        }
        Ok(WorkItem {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            status: wire.status,
            priority: wire.priority,
            due_date,
            extra,
        })
    }
}

impl From<WorkItem> for WireItem {
    fn from(item: WorkItem) -> Self {
        let mut extra = item.extra;
        let original = extra.remove(DUE_DATE_KEY);
        let due_date = item.due_date.map(|date| {
            match original.as_ref().and_then(|v| v.as_str()) {
                Some(raw) if due_date::parse(raw).ok().flatten() == Some(date) => raw.to_string(),
                _ => date.to_string(),
            }
        });
        WireItem {
            id: item.id,
            title: item.title,
            description: item.description,
            status: item.status,
            priority: item.priority,
            due_date,
            extra,
        }
    }
}

impl CacheRecord for WorkItem {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

impl WorkItem {
    /// Full copy of this item with only the status replaced.
    pub fn with_status(&self, status: ItemStatus) -> WorkItem {
        WorkItem {
            status,
            ..self.clone()
        }
    }
}

/// Body of a creation request; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ItemStatus,
    pub priority: ItemPriority,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "due_date::serialize")]
    pub due_date: Option<Date>,
}

/// Authenticated user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Due dates arrive either as `YYYY-MM-DD` or as a full ISO timestamp;
/// only the calendar day is modelled.
mod due_date {
    use super::*;

    pub fn parse(raw: &str) -> Result<Option<Date>, jiff::Error> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.get(..10).unwrap_or(raw).parse::<Date>().map(Some)
    }

    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.to_string()),
            None => serializer.serialize_none(),
        }
    }
}
