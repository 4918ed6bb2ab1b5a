//! Task list controller: the in-memory collection and its synchronization
//! contract with the remote store.
//!
//! The collection is a cache of the remote table. Every mutation goes
//! through the store first; local state is patched only after the server
//! confirms, and left untouched on failure. Mutations are gated on an
//! authenticated session; the shell handles the resulting sign-in redirect.
//!
//! Failures from all four operations surface through one notice channel
//! (drained by the shell) and the tracing log.

use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::types::{Session, SessionUser};
use crate::store::{Task, TaskDraft, TaskId, TaskStore};

/// Stable codes for controller notices.
pub mod notice_codes {
    /// Fetching the task list failed.
    pub const TASKS_LOAD_FAILED: &str = "TASKS_LOAD_FAILED";
    /// Creating a task failed.
    pub const TASK_ADD_FAILED: &str = "TASK_ADD_FAILED";
    /// Toggling a task's completion flag failed.
    pub const TASK_TOGGLE_FAILED: &str = "TASK_TOGGLE_FAILED";
    /// Deleting a task failed.
    pub const TASK_DELETE_FAILED: &str = "TASK_DELETE_FAILED";
}

/// One user-visible failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Stable code from [`notice_codes`].
    pub code: &'static str,
    /// Human-readable description for display.
    pub message: String,
}

/// What a mutation did, from the shell's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The store confirmed the mutation and local state was patched.
    Completed,
    /// The operation failed; a notice was emitted and local state is
    /// unchanged.
    Failed,
    /// Validation short-circuited the operation; nothing happened.
    Ignored,
    /// No authenticated user; the shell should navigate to sign-in. No
    /// store call was made.
    SignInRequired,
}

/// Mediates between UI actions and the remote task store.
pub struct TaskListController {
    store: Arc<dyn TaskStore>,
    sessions: watch::Receiver<Option<Session>>,
    tasks: Vec<Task>,
    loading: bool,
    notices: Vec<Notice>,
}

impl TaskListController {
    /// Create a controller with an empty collection.
    pub fn new(store: Arc<dyn TaskStore>, sessions: watch::Receiver<Option<Session>>) -> Self {
        Self {
            store,
            sessions,
            tasks: Vec::new(),
            loading: false,
            notices: Vec::new(),
        }
    }

    /// The current local collection, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drain pending notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.sessions.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Replace the collection with the store's newest-first list.
    ///
    /// On failure a notice is emitted and the collection is left as it was
    /// (empty on first load).
    pub async fn load_tasks(&mut self) {
        self.loading = true;
        let result = self.store.list_tasks().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "task list loaded");
                self.tasks = tasks;
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "loading tasks failed");
                self.notices.push(Notice {
                    code: notice_codes::TASKS_LOAD_FAILED,
                    message: "Could not load tasks. Try reloading.".into(),
                });
            }
        }
    }

    /// Create a task from the draft.
    ///
    /// An empty (post-trim) title is a validation no-op; without a signed-in
    /// user no store call is made and the shell is asked to redirect. On
    /// success the stored row is prepended, preserving newest-first order by
    /// construction.
    pub async fn add_task(&mut self, draft: TaskDraft) -> ActionOutcome {
        let draft = draft.normalized();
        if !draft.has_title() {
            return ActionOutcome::Ignored;
        }
        let Some(user) = self.current_user() else {
            return ActionOutcome::SignInRequired;
        };

        match self.store.insert_task(&draft, &user.id).await {
            Ok(task) => {
                tracing::info!(id = task.id, "task created");
                self.tasks.insert(0, task);
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "creating task failed");
                self.notices.push(Notice {
                    code: notice_codes::TASK_ADD_FAILED,
                    message: "Could not add the task.".into(),
                });
                ActionOutcome::Failed
            }
        }
    }

    /// Flip the completion flag of the task with the given id.
    ///
    /// The store is updated first; only on confirmation is the matching
    /// local entry flipped in place. An unknown id is a no-op.
    pub async fn toggle_complete(&mut self, id: TaskId) -> ActionOutcome {
        if self.current_user().is_none() {
            return ActionOutcome::SignInRequired;
        }
        let Some(current) = self.tasks.iter().find(|t| t.id == id).map(|t| t.is_complete)
        else {
            return ActionOutcome::Ignored;
        };
        let target = !current;

        match self.store.set_complete(id, target).await {
            Ok(()) => {
                for task in &mut self.tasks {
                    if task.id == id {
                        task.is_complete = target;
                    }
                }
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(code = e.code(), id, error = %e, "toggling task failed");
                self.notices.push(Notice {
                    code: notice_codes::TASK_TOGGLE_FAILED,
                    message: "Could not update the task.".into(),
                });
                ActionOutcome::Failed
            }
        }
    }

    /// Delete the task with the given id, removing the local entry only
    /// after the store confirms.
    pub async fn delete_task(&mut self, id: TaskId) -> ActionOutcome {
        if self.current_user().is_none() {
            return ActionOutcome::SignInRequired;
        }

        match self.store.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!(code = e.code(), id, error = %e, "deleting task failed");
                self.notices.push(Notice {
                    code: notice_codes::TASK_DELETE_FAILED,
                    message: "Could not delete the task.".into(),
                });
                ActionOutcome::Failed
            }
        }
    }
}
