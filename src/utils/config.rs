// Centralized configuration for Lafayette

use std::path::PathBuf;

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Where guild settings live unless SETTINGS_PATH says otherwise
pub const DEFAULT_SETTINGS_PATH: &str = "data/guild-settings.json";

pub const DEFAULT_DICE_EXPLODE: bool = true;
pub const DEFAULT_ROLL_EMBED_COLOR: &str = "#ffffff";

/// Notation rolled when /roll gets no input
pub const DEFAULT_ROLL_NOTATION: &str = "1d6";
/// Maximum notations in a single /roll request
pub const MAX_ROLLS_PER_REQUEST: usize = 5;

pub const COLOR_PICKER_TIMEOUT_SECS: u64 = 60;
pub const COLORS_PER_PAGE: usize = 4;

pub const PRESENCE: &str = "vaše skladby a kostky | /play /roll";

/// Discord embed colors
pub mod colors {
    pub const PRIMARY: u32 = 0x00bfff;
    pub const ECHO: u32 = 0xb6713f;
    pub const NATURAL_ONE: u32 = 0xff0000;
    pub const NATURAL_TWENTY: u32 = 0x00ff00;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0} is required")]
    Missing(&'static str),
    #[error("{name} must be a Discord ID, got {value:?}")]
    InvalidId { name: &'static str, value: String },
}

/// Startup configuration read from the environment
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    /// Register commands in this guild only (fast) instead of globally
    pub guild_id: Option<serenity::GuildId>,
    /// User allowed to run owner-only commands
    pub owner_id: Option<serenity::UserId>,
    pub settings_path: PathBuf,
}

// Manual Debug impl so the token never ends up in logs
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("owner_id", &self.owner_id)
            .field("settings_path", &self.settings_path)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = non_empty("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let guild_id = parse_id(non_empty("GUILD_ID"), "GUILD_ID")?.map(serenity::GuildId::new);
        let owner_id =
            parse_id(non_empty("BOT_OWNER_ID"), "BOT_OWNER_ID")?.map(serenity::UserId::new);
        let settings_path = non_empty("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        Ok(Self {
            token,
            guild_id,
            owner_id,
            settings_path,
        })
    }
}

fn parse_id(value: Option<String>, name: &'static str) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(id) if id != 0 => Ok(Some(id)),
            _ => Err(ConfigError::InvalidId { name, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_token_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.token, "abc");
        assert!(config.guild_id.is_none());
        assert!(config.owner_id.is_none());
        assert_eq!(config.settings_path, PathBuf::from(DEFAULT_SETTINGS_PATH));
    }

    #[test]
    fn test_optional_ids() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("GUILD_ID", "123456789012345678"),
            ("BOT_OWNER_ID", "42"),
            ("SETTINGS_PATH", "/tmp/settings.json"),
        ])
        .unwrap();
        assert_eq!(config.guild_id, Some(serenity::GuildId::new(123456789012345678)));
        assert_eq!(config.owner_id, Some(serenity::UserId::new(42)));
        assert_eq!(config.settings_path, PathBuf::from("/tmp/settings.json"));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = config_from(&[("DISCORD_TOKEN", "secret-token")]).unwrap();
        assert!(!format!("{:?}", config).contains("secret-token"));
    }

    #[test]
    fn test_invalid_ids() {
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("GUILD_ID", "general")]),
            Err(ConfigError::InvalidId { name: "GUILD_ID", .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("BOT_OWNER_ID", "0")]),
            Err(ConfigError::InvalidId { name: "BOT_OWNER_ID", .. })
        ));
    }
}
