//! Asana API client: resolves the user's "My Tasks" list and fetches the
//! incomplete tasks of a named section.

use anyhow::{Context, Result};
use serde::Deserialize;

const ASANA_API_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Fields requested for every task entering the sync.
const TASK_OPT_FIELDS: &str = "name,notes,due_on,due_at,permalink_url,gid,completed";

/// An incomplete task fetched from a section.
///
/// Due fields stay as raw strings; interpretation happens in the mapper so a
/// malformed value degrades to a missing suffix instead of failing the fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct AsanaTask {
    pub gid: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub notes: String,

    /// Date-only due field, `YYYY-MM-DD`
    pub due_on: Option<String>,

    /// Date+time due field, takes precedence over `due_on`
    pub due_at: Option<String>,

    pub permalink_url: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
struct Section {
    gid: String,
    name: String,
}

/// Thin client over the Asana REST API.
pub struct AsanaClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl AsanaClient {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(access_token, ASANA_API_BASE_URL)
    }

    /// Point the client at a different API root (used by tests)
    pub fn with_base_url(access_token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue an authenticated GET and unwrap Asana's `{"data": ...}` envelope.
    async fn get(&self, endpoint: &str) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("Asana API call: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Asana API request failed: {} - {}", status, error_text);
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Asana response from {}", url))?;

        match body.get("data") {
            Some(data) => Ok(data.clone()),
            None => Ok(body),
        }
    }

    /// Resolve the GID of the caller's "My Tasks" list in the given workspace
    pub async fn my_user_task_list_gid(&self, workspace_gid: &str) -> Result<String> {
        let endpoint = format!(
            "/users/me/user_task_list?workspace={}&opt_fields=gid",
            urlencoding::encode(workspace_gid)
        );
        let data = self.get(&endpoint).await?;

        let gid = data
            .get("gid")
            .and_then(|v| v.as_str())
            .context("User task list response has no gid")?
            .to_string();

        log::debug!("Resolved user task list gid: {}", gid);
        Ok(gid)
    }

    /// Find a section by exact name within a project or user task list.
    ///
    /// Returns `Ok(None)` when no section carries that name, which is
    /// distinct from a failed fetch.
    pub async fn section_gid_by_name(
        &self,
        project_gid: &str,
        section_name: &str,
    ) -> Result<Option<String>> {
        let endpoint = format!(
            "/projects/{}/sections?opt_fields=name,gid",
            urlencoding::encode(project_gid)
        );
        let data = self.get(&endpoint).await?;

        let sections: Vec<Section> = serde_json::from_value(data)
            .with_context(|| format!("Failed to parse sections of project {}", project_gid))?;

        for section in sections {
            if section.name == section_name {
                log::debug!("Section '{}' found, gid: {}", section_name, section.gid);
                return Ok(Some(section.gid));
            }
        }

        log::info!(
            "Section '{}' not found in project {}",
            section_name,
            project_gid
        );
        Ok(None)
    }

    /// Fetch the incomplete tasks of the named section.
    ///
    /// A missing section yields an empty list; only a failed fetch or an
    /// unparseable response is an error.
    pub async fn tasks_from_named_section(
        &self,
        user_task_list_gid: &str,
        section_name: &str,
    ) -> Result<Vec<AsanaTask>> {
        let Some(section_gid) = self
            .section_gid_by_name(user_task_list_gid, section_name)
            .await?
        else {
            return Ok(Vec::new());
        };

        let endpoint = format!(
            "/sections/{}/tasks?completed=false&opt_fields={}",
            urlencoding::encode(&section_gid),
            TASK_OPT_FIELDS
        );
        let data = self.get(&endpoint).await?;

        let tasks: Vec<AsanaTask> = serde_json::from_value(data)
            .with_context(|| format!("Failed to parse tasks of section {}", section_gid))?;

        log::info!(
            "Fetched {} incomplete tasks from section '{}'",
            tasks.len(),
            section_name
        );
        Ok(tasks)
    }
}
