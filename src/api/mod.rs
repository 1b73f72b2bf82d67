//! Dashboard REST backend.
//!
//! [`TaskBackend`] is the seam the board controller talks through. The
//! production implementation is [`ApiClient`]; tests substitute an in-memory
//! backend.

mod client;
mod error;

pub use client::ApiClient;
pub use error::{ErrorEnvelope, api_error};

use crate::error::Result;
use crate::types::{NewWorkItem, RecordId, WorkItem};

/// Persistence operations on work items
pub trait TaskBackend: Send + Sync {
    /// `GET /tasks`
    fn list_tasks(&self) -> impl std::future::Future<Output = Result<Vec<WorkItem>>> + Send;

    /// `GET /tasks/{id}`
    fn get_task(
        &self,
        id: &RecordId,
    ) -> impl std::future::Future<Output = Result<WorkItem>> + Send;

    /// `POST /tasks`
    fn create_task(
        &self,
        item: &NewWorkItem,
    ) -> impl std::future::Future<Output = Result<WorkItem>> + Send;

    /// `PUT /tasks/{id}` with the complete record; partial updates are not
    /// accepted by the backend.
    fn update_task(
        &self,
        item: &WorkItem,
    ) -> impl std::future::Future<Output = Result<WorkItem>> + Send;

    /// `DELETE /tasks/{id}`
    fn delete_task(&self, id: &RecordId) -> impl std::future::Future<Output = Result<()>> + Send;
}
