//! JSON-file-backed store for per-group configuration.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ConfigError;
use crate::policy::GroupPolicy;

/// The customizable settings of one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Whether the participant who starts a game may also play it.
    #[serde(default)]
    pub allow_originator_play: bool,
    /// Maximum duration any game may request, in seconds. `None` disables
    /// the ceiling.
    #[serde(default)]
    pub max_game_secs: Option<u64>,
    /// Channels where games are forbidden.
    #[serde(default)]
    pub blocked_channels: HashSet<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            allow_originator_play: false,
            max_game_secs: None,
            blocked_channels: HashSet::new(),
        }
    }
}

/// Loads, mutates and persists group configurations.
///
/// Every mutation saves the whole map back to the file, pretty-printed, so
/// the file stays hand-editable. Groups without an entry get the defaults.
pub struct ConfigStore {
    path: PathBuf,
    configs: RwLock<HashMap<String, GroupConfig>>,
}

impl ConfigStore {
    /// Opens the store at `path`. A missing file is not an error: it will be
    /// created on the first save.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let configs = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No group config file at {:?}, starting empty", path);
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            configs: RwLock::new(configs),
        })
    }

    /// The effective configuration of a group (defaults if never configured).
    pub async fn get(&self, group_id: &str) -> GroupConfig {
        self.configs
            .read()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_allow_originator_play(
        &self,
        group_id: &str,
        allow: bool,
    ) -> Result<(), ConfigError> {
        let mut configs = self.configs.write().await;
        configs.entry(group_id.to_string()).or_default().allow_originator_play = allow;
        self.save(&configs).await
    }

    pub async fn set_max_game_secs(
        &self,
        group_id: &str,
        max: Option<u64>,
    ) -> Result<(), ConfigError> {
        let mut configs = self.configs.write().await;
        configs.entry(group_id.to_string()).or_default().max_game_secs = max;
        self.save(&configs).await
    }

    pub async fn block_channel(
        &self,
        group_id: &str,
        channel_id: &str,
    ) -> Result<(), ConfigError> {
        let mut configs = self.configs.write().await;
        configs
            .entry(group_id.to_string())
            .or_default()
            .blocked_channels
            .insert(channel_id.to_string());
        self.save(&configs).await
    }

    pub async fn unblock_channel(
        &self,
        group_id: &str,
        channel_id: &str,
    ) -> Result<(), ConfigError> {
        let mut configs = self.configs.write().await;
        configs
            .entry(group_id.to_string())
            .or_default()
            .blocked_channels
            .remove(channel_id);
        self.save(&configs).await
    }

    async fn save(&self, configs: &HashMap<String, GroupConfig>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(configs)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl GroupPolicy for ConfigStore {
    async fn max_game_secs(&self, group_id: &str) -> Option<u64> {
        // Legacy files used 0 for "no limit".
        self.get(group_id).await.max_game_secs.filter(|max| *max > 0)
    }

    async fn allow_originator_play(&self, group_id: &str) -> bool {
        self.get(group_id).await.allow_originator_play
    }

    async fn is_channel_blocked(&self, group_id: &str, channel_id: &str) -> bool {
        self.get(group_id).await.blocked_channels.contains(channel_id)
    }
}
