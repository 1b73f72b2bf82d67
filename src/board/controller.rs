//! Task board controller.
//!
//! [`TaskBoard`] ties the cached task collection to a [`TaskBackend`].
//! Drops are applied to the cache first and persisted afterwards; a failed
//! request rolls the cached record back and records an error toast.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::model::{Column, DropEvent, IgnoreReason, group_items, plan_drop};
use crate::api::TaskBackend;
use crate::cache::{QueryCache, QueryKey, Tag};
use crate::error::{FolioError, Result};
use crate::notify::{Notifications, Toast};
use crate::types::{NewWorkItem, RecordId, WorkItem};
use crate::validate::{validate_item, validate_new};

/// Cache key of the task collection
pub const TASKS_KEY: &str = "tasks";

/// Invalidation tag carried by every task query
pub const TASK_TAG: &str = "Task";

/// Shown when a failed request carries no message of its own
pub const GENERIC_UPDATE_FAILURE: &str = "Failed to update task";

/// Result of handling one drop
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Nothing changed and no request was made
    Ignored(IgnoreReason),
    /// The card already has an update in flight; the drop was refused
    Busy(RecordId),
    /// The server accepted the new status
    Confirmed(WorkItem),
    /// The server rejected the update and the card is back where it was
    RolledBack { item: WorkItem, message: String },
}

/// Removes an id from the in-flight set when dropped
struct InFlight<'a> {
    set: &'a Mutex<HashSet<RecordId>>,
    id: RecordId,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<RecordId>>, id: &RecordId) -> Option<Self> {
        set.lock().insert(id.clone()).then(|| Self {
            set,
            id: id.clone(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}

pub struct TaskBoard<B> {
    backend: B,
    cache: QueryCache<WorkItem>,
    notifications: Notifications,
    in_flight: Mutex<HashSet<RecordId>>,
}

impl<B: TaskBackend> TaskBoard<B> {
    pub fn new(backend: B) -> Self {
        Self::with_parts(backend, QueryCache::new(), Notifications::new())
    }

    /// Build a board over an existing cache and notification log
    pub fn with_parts(backend: B, cache: QueryCache<WorkItem>, notifications: Notifications) -> Self {
        Self {
            backend,
            cache,
            notifications,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &QueryCache<WorkItem> {
        &self.cache
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    fn key() -> QueryKey {
        QueryKey::new(TASKS_KEY)
    }

    fn tag() -> Tag {
        Tag::new(TASK_TAG)
    }

    /// The task collection, from cache when fresh
    pub async fn load(&self) -> Result<Vec<WorkItem>> {
        self.cache
            .fetch(&Self::key(), &[Self::tag()], || self.backend.list_tasks())
            .await
    }

    /// Drop cached tasks and fetch them again
    pub async fn refresh(&self) -> Result<Vec<WorkItem>> {
        self.cache.invalidate(&Self::tag());
        self.load().await
    }

    /// Cached tasks without touching the network
    pub fn items(&self) -> Vec<WorkItem> {
        self.cache.peek(&Self::key()).unwrap_or_default()
    }

    /// Cached tasks grouped for rendering
    pub fn columns(&self, search: &str) -> Vec<Column> {
        group_items(&self.items(), search)
    }

    pub fn find(&self, id: &RecordId) -> Option<WorkItem> {
        self.cache.find(&Self::key(), id)
    }

    pub fn is_in_flight(&self, id: &RecordId) -> bool {
        self.in_flight.lock().contains(id)
    }

    /// Apply a drop optimistically, persist it, and roll back on failure.
    pub async fn handle_drop(&self, event: DropEvent) -> DropOutcome {
        let key = Self::key();
        let plan = match plan_drop(&event, |id| self.cache.find(&key, id)) {
            Ok(plan) => plan,
            Err(reason) => {
                tracing::debug!(id = %event.item_id, %reason, "drop ignored");
                return DropOutcome::Ignored(reason);
            }
        };

        let Some(_guard) = InFlight::acquire(&self.in_flight, &plan.updated.id) else {
            tracing::debug!(id = %plan.updated.id, "drop refused, update in flight");
            self.notifications.push(Toast::warning(format!(
                "'{}' is still being saved",
                plan.updated.title
            )));
            return DropOutcome::Busy(plan.updated.id);
        };

        let updated = plan.updated.clone();
        let Some(patch) = self.cache.patch(&key, |draft| {
            draft.replace(updated);
        }) else {
            return DropOutcome::Ignored(IgnoreReason::ItemNotFound);
        };

        tracing::info!(
            id = %plan.updated.id,
            from = %plan.before.status,
            to = %plan.updated.status,
            "moving task"
        );

        match self.backend.update_task(&plan.updated).await {
            Ok(saved) => {
                drop(patch);
                self.notifications.push(Toast::success(format!(
                    "Moved '{}' to {}",
                    saved.title,
                    saved.status.label()
                )));
                DropOutcome::Confirmed(saved)
            }
            Err(e) => {
                patch.undo();
                tracing::warn!(id = %plan.updated.id, "task update failed: {e}");
                let message = e
                    .server_message()
                    .unwrap_or(GENERIC_UPDATE_FAILURE)
                    .to_string();
                self.notifications.push(Toast::error(message.clone()));
                DropOutcome::RolledBack {
                    item: plan.before,
                    message,
                }
            }
        }
    }

    fn record_failure(&self, action: &str, err: &FolioError) {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to {action} task: {err}"));
        self.notifications.push(Toast::error(message));
    }

    /// Create a task. Invalid input never reaches the server.
    pub async fn create(&self, item: NewWorkItem) -> Result<WorkItem> {
        validate_new(&item)?;
        match self.backend.create_task(&item).await {
            Ok(created) => {
                self.cache.invalidate(&Self::tag());
                self.notifications
                    .push(Toast::success(format!("Created '{}'", created.title)));
                Ok(created)
            }
            Err(e) => {
                self.record_failure("create", &e);
                Err(e)
            }
        }
    }

    /// Replace a task with `item` (full object)
    pub async fn update(&self, item: WorkItem) -> Result<WorkItem> {
        validate_item(&item)?;
        match self.backend.update_task(&item).await {
            Ok(updated) => {
                self.cache.invalidate(&Self::tag());
                self.notifications
                    .push(Toast::success(format!("Updated '{}'", updated.title)));
                Ok(updated)
            }
            Err(e) => {
                self.record_failure("update", &e);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        match self.backend.delete_task(id).await {
            Ok(()) => {
                self.cache.invalidate(&Self::tag());
                self.notifications.push(Toast::success("Task deleted"));
                Ok(())
            }
            Err(e) => {
                self.record_failure("delete", &e);
                Err(e)
            }
        }
    }
}
