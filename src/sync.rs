//! Sync logic: Asana section → Google Tasks.

use crate::asana::AsanaClient;
use crate::config::SyncConfig;
use crate::gtasks::GtasksClient;
use crate::pacing::{FixedPacing, PacingPolicy};
use crate::task_mapper::{fixed_due_timestamp, task_to_gtask};
use anyhow::{Context, Result};
use chrono::Utc;

/// Sync statistics
#[derive(Debug, Default)]
pub struct SyncStats {
    pub fetched: usize,
    pub created: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Main sync orchestrator
pub struct SyncRunner {
    config: SyncConfig,
    asana: AsanaClient,
    gtasks: GtasksClient,
    pacing: Box<dyn PacingPolicy>,
}

impl SyncRunner {
    /// Create a runner from a validated configuration
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let asana = AsanaClient::new(&config.asana.access_token);
        let gtasks = GtasksClient::new(&config.google_tasks.access_token);
        let pacing = Box::new(FixedPacing::from_millis(config.google_tasks.pacing_ms));

        Ok(Self {
            config,
            asana,
            gtasks,
            pacing,
        })
    }

    /// Create a runner with injected clients and pacing (used by tests)
    pub fn with_clients(
        config: SyncConfig,
        asana: AsanaClient,
        gtasks: GtasksClient,
        pacing: Box<dyn PacingPolicy>,
    ) -> Self {
        Self {
            config,
            asana,
            gtasks,
            pacing,
        }
    }

    /// Perform a full sync run
    pub async fn run(&self, dry_run: bool) -> Result<SyncStats> {
        let mut stats = SyncStats::default();

        let user_task_list_gid = self
            .asana
            .my_user_task_list_gid(&self.config.asana.workspace_gid)
            .await
            .context("Could not resolve the \"My Tasks\" list")?;
        log::debug!("User task list gid: {}", user_task_list_gid);

        let tasks = self
            .asana
            .tasks_from_named_section(&user_task_list_gid, &self.config.asana.section_name)
            .await?;
        stats.fetched = tasks.len();

        if tasks.is_empty() {
            log::info!(
                "No tasks to sync in section '{}'",
                self.config.asana.section_name
            );
            return Ok(stats);
        }

        let due = fixed_due_timestamp(Utc::now());
        log::info!("Due time for created tasks: {} (UTC)", due);

        if dry_run {
            for task in &tasks {
                let draft = task_to_gtask(task, &due);
                println!("Would create: \"{}\"", draft.title);
                stats.skipped += 1;
            }
            return Ok(stats);
        }

        let tasklist_id = self.resolve_tasklist_id().await?;

        for (index, task) in tasks.iter().enumerate() {
            let draft = task_to_gtask(task, &due);
            match self.gtasks.insert_task(&tasklist_id, &draft).await {
                Ok(task_id) => {
                    log::info!("Created task: '{}' (id: {})", draft.title, task_id);
                    stats.created += 1;
                }
                Err(e) => {
                    stats
                        .errors
                        .push(format!("Failed to create '{}': {}", draft.title, e));
                }
            }
            tokio::time::sleep(self.pacing.wait(index)).await;
        }

        log::info!(
            "Sync finished: {} fetched, {} created, {} failed",
            stats.fetched,
            stats.created,
            stats.errors.len()
        );
        Ok(stats)
    }

    /// Pick the destination task list: configured id, else the account's
    /// first list. Zero lists is fatal before any task is inserted.
    async fn resolve_tasklist_id(&self) -> Result<String> {
        if let Some(id) = &self.config.google_tasks.tasklist_id {
            return Ok(id.clone());
        }

        let list = self
            .gtasks
            .first_tasklist()
            .await
            .context("Failed to fetch Google task lists")?;

        match list {
            Some(list) => {
                log::info!("Using default task list: {} ({})", list.id, list.title);
                Ok(list.id)
            }
            None => anyhow::bail!(
                "No Google task list found. Create at least one list in Google Tasks."
            ),
        }
    }
}
