//! Pure board logic: column grouping, search filtering and drop planning.
//!
//! Nothing here touches the cache or the network, so everything can be
//! tested directly against plain `WorkItem` slices.

use std::fmt;

use unicase::UniCase;

use crate::types::{ItemStatus, RecordId, WorkItem};

/// The three board columns in display order
pub const COLUMNS: [ItemStatus; 3] = ItemStatus::ALL;

/// Items of one status, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: ItemStatus,
    pub items: Vec<WorkItem>,
}

impl Column {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Case-insensitive substring match of `term` against the title.
/// A blank term matches everything.
pub fn matches_search(item: &WorkItem, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let title = UniCase::new(item.title.as_str()).to_folded_case();
    title.contains(&UniCase::new(term).to_folded_case())
}

/// Items matching `term`, in their original order
pub fn filter_items(items: &[WorkItem], term: &str) -> Vec<WorkItem> {
    items
        .iter()
        .filter(|item| matches_search(item, term))
        .cloned()
        .collect()
}

/// Partition `items` into the fixed status columns.
///
/// Every column is present even when empty. Within a column items appear in
/// reverse fetch order so the most recently created card is on top.
pub fn group_items(items: &[WorkItem], term: &str) -> Vec<Column> {
    COLUMNS
        .iter()
        .map(|&status| Column {
            status,
            items: items
                .iter()
                .rev()
                .filter(|item| item.status == status && matches_search(item, term))
                .cloned()
                .collect(),
        })
        .collect()
}

/// A position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub column: ItemStatus,
    pub index: usize,
}

impl DropLocation {
    pub fn new(column: ItemStatus, index: usize) -> Self {
        Self { column, index }
    }
}

/// Completion of a drag: which card, where it came from, where it landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub item_id: RecordId,
    pub source: DropLocation,
    /// `None` when the card was released outside any column
    pub destination: Option<DropLocation>,
}

impl DropEvent {
    pub fn new(item_id: RecordId, source: DropLocation, destination: Option<DropLocation>) -> Self {
        Self {
            item_id,
            source,
            destination,
        }
    }
}

/// Why a drop produced no change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoDestination,
    SamePosition,
    ItemNotFound,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::NoDestination => write!(f, "dropped outside the board"),
            IgnoreReason::SamePosition => write!(f, "dropped where it started"),
            IgnoreReason::ItemNotFound => write!(f, "task is no longer on the board"),
        }
    }
}

/// The status change a drop asks for
#[derive(Debug, Clone, PartialEq)]
pub struct DropPlan {
    pub before: WorkItem,
    /// Complete record with the new status, ready for a full-object update
    pub updated: WorkItem,
}

/// Turn a drop into a status change, or explain why there is none.
///
/// `find` resolves the dragged card from the current collection.
pub fn plan_drop(
    event: &DropEvent,
    find: impl FnOnce(&RecordId) -> Option<WorkItem>,
) -> Result<DropPlan, IgnoreReason> {
    let destination = event.destination.ok_or(IgnoreReason::NoDestination)?;
    if destination == event.source {
        return Err(IgnoreReason::SamePosition);
    }

    let before = find(&event.item_id).ok_or(IgnoreReason::ItemNotFound)?;
    let updated = before.with_status(destination.column);
    Ok(DropPlan { before, updated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemPriority;
    use std::collections::BTreeMap;

    fn item(id: i64, title: &str, status: ItemStatus) -> WorkItem {
        WorkItem {
            id: RecordId::Int(id),
            title: title.to_string(),
            description: None,
            status,
            priority: ItemPriority::Medium,
            due_date: None,
            extra: BTreeMap::new(),
        }
    }

    fn sample() -> Vec<WorkItem> {
        vec![
            item(1, "Write blog post", ItemStatus::Todo),
            item(2, "Fix login bug", ItemStatus::InProgress),
            item(3, "Deploy portfolio", ItemStatus::Todo),
            item(4, "Review PR", ItemStatus::Completed),
        ]
    }

    fn find_in(items: &[WorkItem]) -> impl FnOnce(&RecordId) -> Option<WorkItem> + '_ {
        move |id: &RecordId| items.iter().find(|i| &i.id == id).cloned()
    }

    #[test]
    fn test_group_items_all_columns_present() {
        let columns = group_items(&[], "");
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(Column::is_empty));
        assert_eq!(columns[1].title(), "In Progress");
    }

    #[test]
    fn test_group_items_newest_first() {
        let columns = group_items(&sample(), "");
        let todo: Vec<_> = columns[0].items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(todo, vec![RecordId::Int(3), RecordId::Int(1)]);
        assert_eq!(columns[1].len(), 1);
        assert_eq!(columns[2].len(), 1);
    }

    #[test]
    fn test_group_items_search_is_case_insensitive() {
        let columns = group_items(&sample(), "  DEPLOY ");
        assert_eq!(columns[0].len(), 1);
        assert_eq!(columns[0].items[0].title, "Deploy portfolio");
        assert!(columns[1].is_empty());
    }

    #[test]
    fn test_search_folds_non_ascii_titles() {
        let items = vec![item(9, "Café menu redesign", ItemStatus::Todo)];
        assert_eq!(filter_items(&items, "CAFÉ").len(), 1);
        assert!(filter_items(&items, "cafe").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent_and_pure() {
        let items = sample();
        let once = filter_items(&items, "o");
        let twice = filter_items(&items, "o");
        assert_eq!(once, twice);
        assert_eq!(filter_items(&once, "o"), once);
        assert_eq!(items, sample());
    }

    #[test]
    fn test_plan_drop_ignores_missing_destination() {
        let items = sample();
        let event = DropEvent::new(
            RecordId::Int(1),
            DropLocation::new(ItemStatus::Todo, 1),
            None,
        );
        assert_eq!(plan_drop(&event, find_in(&items)), Err(IgnoreReason::NoDestination));
    }

    #[test]
    fn test_plan_drop_ignores_same_position() {
        let items = sample();
        let here = DropLocation::new(ItemStatus::Todo, 1);
        let event = DropEvent::new(RecordId::Int(1), here, Some(here));
        assert_eq!(plan_drop(&event, find_in(&items)), Err(IgnoreReason::SamePosition));
    }

    #[test]
    fn test_plan_drop_unknown_item() {
        let items = sample();
        let event = DropEvent::new(
            RecordId::Int(99),
            DropLocation::new(ItemStatus::Todo, 0),
            Some(DropLocation::new(ItemStatus::Completed, 0)),
        );
        assert_eq!(plan_drop(&event, find_in(&items)), Err(IgnoreReason::ItemNotFound));
    }

    #[test]
    fn test_plan_drop_builds_full_record() {
        let mut items = sample();
        items[0].description = Some("draft in notes".to_string());
        items[0].priority = ItemPriority::High;
        let event = DropEvent::new(
            RecordId::Int(1),
            DropLocation::new(ItemStatus::Todo, 1),
            Some(DropLocation::new(ItemStatus::InProgress, 0)),
        );

        let plan = plan_drop(&event, find_in(&items)).unwrap();
        assert_eq!(plan.before.status, ItemStatus::Todo);
        assert_eq!(plan.updated.status, ItemStatus::InProgress);
        assert_eq!(plan.updated.description.as_deref(), Some("draft in notes"));
        assert_eq!(plan.updated.priority, ItemPriority::High);
        assert_eq!(plan.updated.title, plan.before.title);
    }

    #[test]
    fn test_plan_drop_same_column_new_index_proceeds() {
        let items = sample();
        let event = DropEvent::new(
            RecordId::Int(1),
            DropLocation::new(ItemStatus::Todo, 1),
            Some(DropLocation::new(ItemStatus::Todo, 0)),
        );
        let plan = plan_drop(&event, find_in(&items)).unwrap();
        assert_eq!(plan.updated.status, ItemStatus::Todo);
    }
}
