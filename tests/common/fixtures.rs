use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use folio::types::{ItemPriority, ItemStatus, RecordId, WorkItem};

pub fn item(id: i64, title: &str, status: ItemStatus) -> WorkItem {
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

/// A small board: two todo cards, one in progress, one done
pub fn sample_items() -> Vec<WorkItem> {
    vec![
        item(1, "Write blog post", ItemStatus::Todo),
        item(2, "Fix login bug", ItemStatus::InProgress),
        item(3, "Deploy portfolio", ItemStatus::Todo),
        item(4, "Review PR", ItemStatus::Completed),
    ]
}

/// RAII guard that sets an environment variable and restores it on drop.
///
/// This modifies the process environment. Tests using it should be marked
/// with `#[serial]`.
pub struct EnvGuard {
    key: &'static str,
    original: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, value: impl AsRef<OsStr>) -> Self {
        let original = std::env::var_os(key);
        // SAFETY: callers are marked #[serial], so no other thread reads the environment
        unsafe { std::env::set_var(key, value) };
        Self { key, original }
    }

    pub fn remove(key: &'static str) -> Self {
        let original = std::env::var_os(key);
        // SAFETY: as above
        unsafe { std::env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: runs during teardown of a #[serial] test
        match &self.original {
            Some(val) => unsafe { std::env::set_var(self.key, val) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}
