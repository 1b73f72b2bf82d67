//! In-memory `TaskBackend` with programmable failures and gating.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use folio::api::TaskBackend;
use folio::error::{FolioError, Result};
use folio::types::{NewWorkItem, RecordId, WorkItem};

#[derive(Debug, Default)]
pub struct CallCounts {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

impl CallCounts {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn create(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn update(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }

    pub fn delete(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.list()
            + self.get.load(Ordering::SeqCst)
            + self.create()
            + self.update()
            + self.delete()
    }
}

/// A failure to hand back from the next mutating call
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: u16,
    pub message: Option<String>,
}

impl Failure {
    pub fn api(status: u16, message: &str) -> Self {
        Self {
            status,
            message: Some(message.to_string()),
        }
    }

    pub fn bare(status: u16) -> Self {
        Self {
            status,
            message: None,
        }
    }

    fn to_error(&self) -> FolioError {
        FolioError::Api {
            status: self.status,
            message: self.message.clone(),
        }
    }
}

#[derive(Default)]
pub struct MockBackend {
    items: Mutex<Vec<WorkItem>>,
    next_id: Mutex<i64>,
    fail_mutations: Mutex<Option<Failure>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub calls: CallCounts,
}

impl MockBackend {
    pub fn with_items(items: Vec<WorkItem>) -> Self {
        let backend = Self::default();
        *backend.next_id.lock() = 100;
        *backend.items.lock() = items;
        backend
    }

    /// Make every following create/update/delete fail with `failure`
    pub fn fail_with(&self, failure: Failure) {
        *self.fail_mutations.lock() = Some(failure);
    }

    pub fn succeed(&self) {
        *self.fail_mutations.lock() = None;
    }

    /// Hold the next update until the returned sender fires
    pub fn gate_next_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock() = Some(rx);
        tx
    }

    /// What the "server" currently holds
    pub fn stored(&self) -> Vec<WorkItem> {
        self.items.lock().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_mutations.lock().as_ref() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

impl TaskBackend for MockBackend {
    async fn list_tasks(&self) -> Result<Vec<WorkItem>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored())
    }

    async fn get_task(&self, id: &RecordId) -> Result<WorkItem> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or_else(|| FolioError::TaskNotFound(id.to_string()))
    }

    async fn create_task(&self, item: &NewWorkItem) -> Result<WorkItem> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            *next
        };
        let created = WorkItem {
            id: RecordId::Int(id),
            title: item.title.clone(),
            description: item.description.clone(),
            status: item.status,
            priority: item.priority,
            due_date: item.due_date,
            extra: Default::default(),
        };
        self.items.lock().push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, item: &WorkItem) -> Result<WorkItem> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check_failure()?;

        let mut items = self.items.lock();
        let slot = items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| FolioError::Api {
                status: 404,
                message: Some("Task not found".to_string()),
            })?;
        *slot = item.clone();
        Ok(item.clone())
    }

    async fn delete_task(&self, id: &RecordId) -> Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.items.lock().retain(|item| &item.id != id);
        Ok(())
    }
}
