//! In-memory request cache for remote collections.
//!
//! Collections are cached per resource key and labelled with tags.
//! Invalidating a tag marks every entry carrying it as stale so the next
//! `fetch` goes back to the server. Callers may also rewrite a cached
//! collection synchronously through [`QueryCache::patch`], keeping the
//! returned [`PatchHandle`] to roll the change back later.

mod patch;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::types::RecordId;

pub use patch::{Draft, PatchHandle, RecordChange};

/// A record that can live in a cached collection
pub trait CacheRecord: Clone + Send + 'static {
    /// Stable identifier used to find the record again on undo
    fn record_id(&self) -> &RecordId;
}

/// Resource type a collection is cached under (e.g. `tasks`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invalidation label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Entry<T> {
    data: Vec<T>,
    tags: Vec<Tag>,
    stale: bool,
}

type Entries<T> = Arc<Mutex<HashMap<QueryKey, Entry<T>>>>;

/// Shared cache handle; clones see the same entries.
pub struct QueryCache<T> {
    entries: Entries<T>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T: CacheRecord> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached collection, awaiting `fetcher` when the entry is
    /// missing or stale. A failed fetch leaves the cache as it was.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, tags: &[Tag], fetcher: F) -> Result<Vec<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Some(data) = self.fresh(key) {
            tracing::trace!(%key, "cache hit");
            return Ok(data);
        }

        tracing::debug!(%key, "cache miss, fetching");
        let data = fetcher().await?;
        self.replace(key, tags, data.clone());
        Ok(data)
    }

    fn fresh(&self, key: &QueryKey) -> Option<Vec<T>> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|e| !e.stale)
            .map(|e| e.data.clone())
    }

    /// Current value regardless of freshness
    pub fn peek(&self, key: &QueryKey) -> Option<Vec<T>> {
        self.entries.lock().get(key).map(|e| e.data.clone())
    }

    /// Look up one record without cloning the collection
    pub fn find(&self, key: &QueryKey, id: &RecordId) -> Option<T> {
        self.entries
            .lock()
            .get(key)
            .and_then(|e| e.data.iter().find(|r| r.record_id() == id).cloned())
    }

    /// Store a server response as the fresh value for `key`
    pub fn replace(&self, key: &QueryKey, tags: &[Tag], data: Vec<T>) {
        self.entries.lock().insert(
            key.clone(),
            Entry {
                data,
                tags: tags.to_vec(),
                stale: false,
            },
        );
    }

    /// Mark every entry tagged with `tag` stale; returns how many were hit.
    pub fn invalidate(&self, tag: &Tag) -> usize {
        let mut entries = self.entries.lock();
        let mut count = 0;
        for entry in entries.values_mut().filter(|e| e.tags.contains(tag)) {
            entry.stale = true;
            count += 1;
        }
        tracing::debug!(%tag, count, "cache invalidated");
        count
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.lock().get(key).is_none_or(|e| e.stale)
    }

    pub fn remove(&self, key: &QueryKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Synchronously rewrite the cached collection for `key`.
    ///
    /// `mutator` edits a [`Draft`] that records the inverse of every change;
    /// the returned handle undoes exactly those changes. Returns `None` when
    /// nothing is cached under `key`. Dropping the handle keeps the change.
    pub fn patch<F>(&self, key: &QueryKey, mutator: F) -> Option<PatchHandle<T>>
    where
        F: FnOnce(&mut Draft<'_, T>),
    {
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(key)?;
        let mut draft = Draft::new(&mut entry.data);
        mutator(&mut draft);
        let changes = draft.into_changes();
        tracing::debug!(%key, changes = changes.len(), "cache patched");
        Some(PatchHandle::new(self.clone(), key.clone(), changes))
    }

    pub(crate) fn with_entry_mut<R>(
        &self,
        key: &QueryKey,
        f: impl FnOnce(&mut Vec<T>) -> R,
    ) -> Option<R> {
        self.entries.lock().get_mut(key).map(|e| f(&mut e.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: RecordId,
        label: &'static str,
    }

    impl CacheRecord for Row {
        fn record_id(&self) -> &RecordId {
            &self.id
        }
    }

    fn row(id: i64, label: &'static str) -> Row {
        Row {
            id: RecordId::Int(id),
            label,
        }
    }

    fn key() -> QueryKey {
        QueryKey::new("rows")
    }

    fn tag() -> Tag {
        Tag::new("Row")
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let cache: QueryCache<Row> = QueryCache::new();
        let mut calls = 0;

        let first = cache
            .fetch(&key(), &[tag()], || {
                calls += 1;
                async { Ok(vec![row(1, "a")]) }
            })
            .await
            .unwrap();
        assert_eq!(first, vec![row(1, "a")]);

        let second = cache
            .fetch(&key(), &[tag()], || {
                calls += 1;
                async { Ok(vec![row(2, "b")]) }
            })
            .await
            .unwrap();
        assert_eq!(second, vec![row(1, "a")]);
        assert_eq!(calls, 1);

        assert_eq!(cache.invalidate(&tag()), 1);
        assert!(cache.is_stale(&key()));

        let third = cache
            .fetch(&key(), &[tag()], || {
                calls += 1;
                async { Ok(vec![row(2, "b")]) }
            })
            .await
            .unwrap();
        assert_eq!(third, vec![row(2, "b")]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache: QueryCache<Row> = QueryCache::new();
        cache.replace(&key(), &[tag()], vec![row(1, "a")]);
        cache.invalidate(&tag());

        let result = cache
            .fetch(&key(), &[tag()], || async {
                Err(FolioError::Other("offline".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.peek(&key()), Some(vec![row(1, "a")]));
        assert!(cache.is_stale(&key()));
    }

    #[test]
    fn test_invalidate_only_matching_tag() {
        let cache: QueryCache<Row> = QueryCache::new();
        cache.replace(&QueryKey::new("a"), &[Tag::new("A")], vec![]);
        cache.replace(&QueryKey::new("b"), &[Tag::new("B")], vec![]);

        assert_eq!(cache.invalidate(&Tag::new("A")), 1);
        assert!(cache.is_stale(&QueryKey::new("a")));
        assert!(!cache.is_stale(&QueryKey::new("b")));
        assert_eq!(cache.invalidate(&Tag::new("C")), 0);
    }

    #[test]
    fn test_patch_missing_key_returns_none() {
        let cache: QueryCache<Row> = QueryCache::new();
        assert!(cache.patch(&key(), |_| {}).is_none());
    }

    #[test]
    fn test_remove_drops_entry() {
        let cache: QueryCache<Row> = QueryCache::new();
        cache.replace(&key(), &[tag()], vec![row(1, "a"), row(2, "b")]);
        assert_eq!(cache.peek(&key()).map(|rows| rows.len()), Some(2));
        assert!(!cache.is_stale(&key()));
        assert!(cache.remove(&key()));
        assert!(cache.peek(&key()).is_none());
        assert!(cache.is_stale(&key()));
        assert!(!cache.remove(&key()));
    }
}
