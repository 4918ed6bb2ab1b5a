//! REST implementation of the task store against the hosted table API.
//!
//! The table is exposed PostgREST-style under `/rest/v1/tasks`. Every
//! request carries the publishable key as `apikey`; the `Authorization`
//! bearer is the signed-in user's access token when a session is live,
//! falling back to the publishable key otherwise. Row visibility is the
//! store's row-level security policy, not client logic.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;

use crate::auth::types::Session;
use crate::config::AppConfig;
use crate::store::error::StoreError;
use crate::store::types::{Priority, Task, TaskDraft, TaskId};
use crate::store::TaskStore;

/// Task store client speaking the hosted table's REST dialect.
pub struct RestTaskStore {
    http: reqwest::Client,
    base: String,
    api_key: String,
    sessions: watch::Receiver<Option<Session>>,
}

impl std::fmt::Debug for RestTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTaskStore")
            .field("base", &self.base)
            .finish()
    }
}

/// Insert payload for one row. The server assigns `id` and `created_at`.
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    is_complete: bool,
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
}

impl RestTaskStore {
    /// Create a client from the resolved configuration and a live view of
    /// the current session.
    pub fn new(config: &AppConfig, sessions: watch::Receiver<Option<Session>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.store_base(),
            api_key: config.store_key.clone(),
            sessions,
        }
    }

    fn tasks_url(&self) -> String {
        format!("{}/rest/v1/tasks", self.base)
    }

    /// The bearer for the next request: the live access token, or the
    /// publishable key when signed out.
    fn bearer(&self) -> String {
        match self.sessions.borrow().as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.api_key.clone(),
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status.as_u16(), &body))
    }
}

/// Map a non-success status to [`StoreError::Api`], extracting the server's
/// message from the error body when present.
fn map_api_error(status: u16, body: &str) -> StoreError {
    StoreError::Api {
        status,
        message: extract_server_message(body),
    }
}

/// Pull the human-readable message out of a table-API error body.
///
/// The store answers errors as JSON with a `message` field; anything else
/// is passed through verbatim.
fn extract_server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_owned())
}

#[async_trait]
impl TaskStore for RestTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let request = self
            .http
            .get(self.tasks_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| StoreError::Http(format!("list request failed: {e}")))?;
        let response = Self::check_status(response).await?;
        response
            .json::<Vec<Task>>()
            .await
            .map_err(|e| StoreError::Decode(format!("task list payload: {e}")))
    }

    async fn insert_task(&self, draft: &TaskDraft, user_id: &str) -> Result<Task, StoreError> {
        let row = InsertRow {
            title: &draft.title,
            description: draft.description.as_deref(),
            is_complete: false,
            user_id,
            due_date: draft.due_date,
            priority: draft.priority,
        };
        let request = self
            .http
            .post(self.tasks_url())
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| StoreError::Http(format!("insert request failed: {e}")))?;
        let response = Self::check_status(response).await?;
        let mut rows = response
            .json::<Vec<Task>>()
            .await
            .map_err(|e| StoreError::Decode(format!("insert representation: {e}")))?;
        match rows.pop() {
            Some(task) if rows.is_empty() => Ok(task),
            Some(_) => Err(StoreError::Decode(
                "insert returned more than one row".into(),
            )),
            None => Err(StoreError::Decode("insert returned no rows".into())),
        }
    }

    async fn set_complete(&self, id: TaskId, is_complete: bool) -> Result<(), StoreError> {
        let request = self
            .http
            .patch(self.tasks_url())
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "is_complete": is_complete }));
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| StoreError::Http(format!("update request failed: {e}")))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        let request = self
            .http
            .delete(self.tasks_url())
            .query(&[("id", format!("eq.{id}"))]);
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| StoreError::Http(format!("delete request failed: {e}")))?;
        Self::check_status(response).await?;
        Ok(())
    }
}
