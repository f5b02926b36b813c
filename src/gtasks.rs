//! Google Tasks API client.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::task_mapper::GtaskDraft;

const GTASKS_API_BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// A task list of the authenticated account
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tasklist {
    pub id: String,

    #[serde(default)]
    pub title: String,
}

/// A task as returned by the Tasks API, reduced to the fields worth showing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GtaskSummary {
    pub id: String,

    #[serde(default)]
    pub title: String,

    pub due: Option<String>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

/// Thin client over the Google Tasks REST API.
pub struct GtasksClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GtasksClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(access_token, GTASKS_API_BASE_URL)
    }

    /// Point the client at a different API root (used by tests)
    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the account's first task list, if any exists
    pub async fn first_tasklist(&self) -> Result<Option<Tasklist>> {
        let url = format!("{}/users/@me/lists?maxResults=1", self.base_url);
        log::debug!("Tasks API call: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send task list request")?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to list task lists: {} - {}", status, error_text);
        }

        let lists: ListResponse<Tasklist> = resp
            .json()
            .await
            .context("Failed to parse task list response")?;

        Ok(lists.items.into_iter().next())
    }

    /// Insert one task into the given task list and return the created id
    pub async fn insert_task(&self, tasklist_id: &str, draft: &GtaskDraft) -> Result<String> {
        let url = format!(
            "{}/lists/{}/tasks",
            self.base_url,
            urlencoding::encode(tasklist_id)
        );
        log::debug!("Tasks API call: POST {}", url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(draft)
            .send()
            .await
            .context("Failed to send task insert request")?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to insert task: {} - {}", status, error_text);
        }

        let created: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse task insert response")?;

        let task_id = created
            .get("id")
            .and_then(|v| v.as_str())
            .context("Created task has no id")?
            .to_string();

        Ok(task_id)
    }

    /// List the tasks of a task list (inspection helper for the CLI)
    pub async fn list_tasks(&self, tasklist_id: &str) -> Result<Vec<GtaskSummary>> {
        let url = format!(
            "{}/lists/{}/tasks",
            self.base_url,
            urlencoding::encode(tasklist_id)
        );
        log::debug!("Tasks API call: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to send task listing request")?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to list tasks: {} - {}", status, error_text);
        }

        let tasks: ListResponse<GtaskSummary> = resp
            .json()
            .await
            .context("Failed to parse task listing response")?;

        Ok(tasks.items)
    }
}
