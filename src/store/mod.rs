//! Remote task store: wire types and the client for the hosted table API.
//!
//! The [`TaskStore`] trait is the seam the controller depends on;
//! [`RestTaskStore`] is the production implementation. Tests substitute
//! in-memory stores or point the REST client at a mock server.

pub mod error;
pub mod rest;
pub mod types;

use async_trait::async_trait;

pub use error::StoreError;
pub use rest::RestTaskStore;
pub use types::{Priority, Task, TaskDraft, TaskId};

/// Operations the remote task table exposes to this client.
///
/// All four are single round trips; none is retried or cancellable once
/// issued. Ordering by creation time (descending) is a server guarantee of
/// `list_tasks`, not something callers re-sort.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch all visible rows, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Insert one row owned by `user_id` and return the stored row
    /// (with server-assigned `id` and `created_at`).
    async fn insert_task(&self, draft: &TaskDraft, user_id: &str) -> Result<Task, StoreError>;

    /// Set the completion flag of the row with the given id.
    async fn set_complete(&self, id: TaskId, is_complete: bool) -> Result<(), StoreError>;

    /// Delete the row with the given id.
    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError>;
}
