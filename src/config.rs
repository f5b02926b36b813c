//! Configuration for the Asana → Google Tasks sync.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Asana side of the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsanaConfig {
    /// Personal access token used as the bearer credential
    #[serde(default)]
    pub access_token: String,

    /// Workspace GID the "My Tasks" list is resolved in
    #[serde(default)]
    pub workspace_gid: String,

    /// Section of "My Tasks" to sync from (default: "今日")
    #[serde(default = "default_section_name")]
    pub section_name: String,
}

/// Google Tasks side of the configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GtasksConfig {
    /// OAuth access token for the Tasks API
    #[serde(default)]
    pub access_token: String,

    /// Task list to insert into; when unset the first list of the account is used
    #[serde(default)]
    pub tasklist_id: Option<String>,

    /// Pause between task insertions, in milliseconds (default: 500)
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

/// Full sync configuration, loaded once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub asana: AsanaConfig,

    #[serde(default)]
    pub google_tasks: GtasksConfig,
}

fn default_section_name() -> String {
    "今日".to_string()
}

fn default_pacing_ms() -> u64 {
    500
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            asana: AsanaConfig {
                access_token: String::new(),
                workspace_gid: String::new(),
                section_name: default_section_name(),
            },
            google_tasks: GtasksConfig {
                access_token: String::new(),
                tasklist_id: None,
                pacing_ms: default_pacing_ms(),
            },
        }
    }
}

impl SyncConfig {
    /// Load configuration from the default config file.
    /// A missing file yields the defaults; `validate` rejects them later.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_file_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SyncConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check that the fields every run needs are present
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.asana.access_token.is_empty() {
            anyhow::bail!("asana.access_token is not set. Please add it to the config file.");
        }
        if self.asana.workspace_gid.is_empty() {
            anyhow::bail!("asana.workspace_gid is not set. Please add it to the config file.");
        }
        if self.google_tasks.access_token.is_empty() {
            anyhow::bail!("google_tasks.access_token is not set. Please add it to the config file.");
        }
        Ok(())
    }

    /// Get the path to the tsugu config directory
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("tsugu");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Get the path to the tsugu config file
    pub fn config_file_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("tsugu.toml"))
    }
}
