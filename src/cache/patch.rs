//! Optimistic patches and their undo handles.

use std::fmt;

use super::{CacheRecord, QueryCache, QueryKey};
use crate::types::RecordId;

/// Inverse of one change made through a [`Draft`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordChange<T> {
    /// A record was edited in place; holds its prior value
    Updated { before: T },
    /// A record was added; undo removes it again
    Inserted { id: RecordId },
    /// A record was removed from `index`; undo puts it back
    Removed { index: usize, before: T },
}

/// Mutable view of a cached collection handed to a patch mutator.
///
/// Only records that are actually touched get copied into the undo log.
pub struct Draft<'a, T> {
    data: &'a mut Vec<T>,
    changes: Vec<RecordChange<T>>,
}

impl<'a, T: CacheRecord> Draft<'a, T> {
    pub(super) fn new(data: &'a mut Vec<T>) -> Self {
        Self {
            data,
            changes: Vec::new(),
        }
    }

    pub(super) fn into_changes(self) -> Vec<RecordChange<T>> {
        self.changes
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.data.iter().find(|r| r.record_id() == id)
    }

    /// Edit the record with `id` in place. Returns false if it is absent.
    pub fn update(&mut self, id: &RecordId, edit: impl FnOnce(&mut T)) -> bool {
        let Some(record) = self.data.iter_mut().find(|r| r.record_id() == id) else {
            return false;
        };
        self.changes.push(RecordChange::Updated {
            before: record.clone(),
        });
        edit(record);
        true
    }

    /// Swap the record with the same id for `record`
    pub fn replace(&mut self, record: T) -> bool {
        let id = record.record_id().clone();
        self.update(&id, |slot| *slot = record)
    }

    pub fn insert(&mut self, index: usize, record: T) {
        let index = index.min(self.data.len());
        self.changes.push(RecordChange::Inserted {
            id: record.record_id().clone(),
        });
        self.data.insert(index, record);
    }

    pub fn push(&mut self, record: T) {
        let len = self.data.len();
        self.insert(len, record);
    }

    pub fn remove(&mut self, id: &RecordId) -> Option<T> {
        let index = self.data.iter().position(|r| r.record_id() == id)?;
        let removed = self.data.remove(index);
        self.changes.push(RecordChange::Removed {
            index,
            before: removed.clone(),
        });
        Some(removed)
    }
}

/// Rollback capability for one applied patch.
///
/// `undo` consumes the handle, so a patch can be reverted at most once.
/// Reverting touches only the records this patch changed; records edited
/// by other patches in the meantime are left alone.
#[must_use = "dropping the handle commits the patch; keep it to roll back on failure"]
pub struct PatchHandle<T: CacheRecord> {
    cache: QueryCache<T>,
    key: QueryKey,
    changes: Vec<RecordChange<T>>,
}

impl<T: CacheRecord> PatchHandle<T> {
    pub(super) fn new(cache: QueryCache<T>, key: QueryKey, changes: Vec<RecordChange<T>>) -> Self {
        Self {
            cache,
            key,
            changes,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// True when the mutator changed nothing
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[RecordChange<T>] {
        &self.changes
    }

    /// Restore the pre-patch value of every record this patch touched.
    pub fn undo(self) {
        let PatchHandle {
            cache,
            key,
            changes,
        } = self;
        let count = changes.len();

        let restored = cache.with_entry_mut(&key, move |data| {
            for change in changes.into_iter().rev() {
                match change {
                    RecordChange::Updated { before } => {
                        if let Some(slot) = data
                            .iter_mut()
                            .find(|r| r.record_id() == before.record_id())
                        {
                            *slot = before;
                        }
                    }
                    RecordChange::Inserted { id } => {
                        if let Some(pos) = data.iter().position(|r| r.record_id() == &id) {
                            data.remove(pos);
                        }
                    }
                    RecordChange::Removed { index, before } => {
                        let index = index.min(data.len());
                        data.insert(index, before);
                    }
                }
            }
        });

        if restored.is_some() {
            tracing::debug!(%key, changes = count, "cache patch undone");
        } else {
            tracing::warn!(%key, "cache entry gone before undo");
        }
    }
}

impl<T: CacheRecord> fmt::Debug for PatchHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchHandle")
            .field("key", &self.key)
            .field("changes", &self.changes.len())
            .finish()
    }
}
