// Settings Store
// Guild and user preferences cached in memory, persisted as one JSON document

use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::models::settings::{
    AllSettings, DiceExplode, EmbedColor, GuildKey, RollEmbedColor, UserKey,
};
use crate::utils::config::{DEFAULT_DICE_EXPLODE, DEFAULT_ROLL_EMBED_COLOR};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process-wide settings cache backed by a JSON file
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    cache: RwLock<AllSettings>,
    /// Held across serialize + write so saves land one at a time
    save_lock: Mutex<()>,
}

impl SettingsStore {
    /// Load settings from `path`.
    ///
    /// A missing file starts an empty store without creating the file. A file
    /// that can't be read or parsed is logged and also yields an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<AllSettings>(&content) {
                Ok(settings) => {
                    info!(
                        "Loaded settings for {} guild(s) from {}",
                        settings.len(),
                        path.display()
                    );
                    settings
                }
                Err(e) => {
                    error!("Failed to parse {}, starting empty: {:?}", path.display(), e);
                    AllSettings::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found. Starting with empty settings.", path.display());
                AllSettings::new()
            }
            Err(e) => {
                error!("Failed to read {}, starting empty: {:?}", path.display(), e);
                AllSettings::new()
            }
        };

        Self {
            path,
            cache: RwLock::new(settings),
            save_lock: Mutex::new(()),
        }
    }

    /// Copy of the whole in-memory document
    #[cfg(test)]
    pub async fn snapshot(&self) -> AllSettings {
        self.cache.read().await.clone()
    }

    pub async fn get_guild_setting<K: GuildKey>(
        &self,
        guild_id: &str,
        _key: K,
        default: K::Value,
    ) -> K::Value {
        let cache = self.cache.read().await;
        cache
            .get(guild_id)
            .and_then(|guild| K::value(guild))
            .cloned()
            .unwrap_or(default)
    }

    /// Set a guild setting and persist the whole document.
    ///
    /// The in-memory value is kept even if writing the file fails.
    pub async fn set_guild_setting<K: GuildKey>(
        &self,
        guild_id: &str,
        _key: K,
        value: K::Value,
    ) -> Result<(), SettingsError> {
        {
            let mut cache = self.cache.write().await;
            let guild = cache.entry(guild_id.to_string()).or_default();
            *K::slot(guild) = Some(value);
        }
        self.save().await
    }

    pub async fn get_user_setting<K: UserKey>(
        &self,
        guild_id: &str,
        user_id: &str,
        _key: K,
        default: K::Value,
    ) -> K::Value {
        let cache = self.cache.read().await;
        cache
            .get(guild_id)
            .and_then(|guild| guild.user_settings.get(user_id))
            .and_then(|user| K::value(user))
            .cloned()
            .unwrap_or(default)
    }

    pub async fn set_user_setting<K: UserKey>(
        &self,
        guild_id: &str,
        user_id: &str,
        _key: K,
        value: K::Value,
    ) -> Result<(), SettingsError> {
        {
            let mut cache = self.cache.write().await;
            let user = cache
                .entry(guild_id.to_string())
                .or_default()
                .user_settings
                .entry(user_id.to_string())
                .or_default();
            *K::slot(user) = Some(value);
        }
        self.save().await
    }

    pub async fn dice_explode(&self, guild_id: &str) -> bool {
        self.get_guild_setting(guild_id, DiceExplode, DEFAULT_DICE_EXPLODE)
            .await
    }

    pub async fn set_dice_explode(&self, guild_id: &str, enabled: bool) -> Result<(), SettingsError> {
        self.set_guild_setting(guild_id, DiceExplode, enabled).await?;
        info!("Dice explode for guild {} set to {}", guild_id, enabled);
        Ok(())
    }

    pub async fn roll_embed_color(&self, guild_id: &str, user_id: &str) -> EmbedColor {
        self.get_user_setting(
            guild_id,
            user_id,
            RollEmbedColor,
            EmbedColor::Text(DEFAULT_ROLL_EMBED_COLOR.to_string()),
        )
        .await
    }

    pub async fn set_roll_embed_color(
        &self,
        guild_id: &str,
        user_id: &str,
        color: EmbedColor,
    ) -> Result<(), SettingsError> {
        let label = color.to_string();
        self.set_user_setting(guild_id, user_id, RollEmbedColor, color)
            .await?;
        info!(
            "Roll embed color for user {} in guild {} set to {}",
            user_id, guild_id, label
        );
        Ok(())
    }

    /// Serialize the full cache and replace the backing file.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so the file on disk is always a complete document.
    async fn save(&self) -> Result<(), SettingsError> {
        let _guard = self.save_lock.lock().await;

        let json = {
            let cache = self.cache.read().await;
            serde_json::to_string_pretty(&*cache)?
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
