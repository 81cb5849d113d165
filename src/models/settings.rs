use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Whole settings document, keyed by guild ID
pub type AllSettings = BTreeMap<String, GuildSettings>;

/// Guild (Server) specific settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettings {
    /// Mark dice that land on their highest face
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice_explode: Option<bool>,
    /// Per-user settings within this guild, keyed by user ID
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_settings: HashMap<String, UserSpecificSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpecificSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_embed_color: Option<EmbedColor>,
}

/// A stored embed color: a numeric code, or a hex string / color keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbedColor {
    Code(u32),
    Text(String),
}

impl fmt::Display for EmbedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedColor::Code(code) => write!(f, "#{:06X}", code),
            EmbedColor::Text(text) => f.write_str(text),
        }
    }
}

/// A guild-level setting
pub trait GuildKey {
    type Value: Clone;

    fn slot(settings: &mut GuildSettings) -> &mut Option<Self::Value>;
    fn value(settings: &GuildSettings) -> Option<&Self::Value>;
}

/// A per-user setting
pub trait UserKey {
    type Value: Clone;

    fn slot(settings: &mut UserSpecificSettings) -> &mut Option<Self::Value>;
    fn value(settings: &UserSpecificSettings) -> Option<&Self::Value>;
}

pub struct DiceExplode;

impl GuildKey for DiceExplode {
    type Value = bool;

    fn slot(settings: &mut GuildSettings) -> &mut Option<bool> {
        &mut settings.dice_explode
    }

    fn value(settings: &GuildSettings) -> Option<&bool> {
        settings.dice_explode.as_ref()
    }
}

pub struct RollEmbedColor;

impl UserKey for RollEmbedColor {
    type Value = EmbedColor;

    fn slot(settings: &mut UserSpecificSettings) -> &mut Option<EmbedColor> {
        &mut settings.roll_embed_color
    }

    fn value(settings: &UserSpecificSettings) -> Option<&EmbedColor> {
        settings.roll_embed_color.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let json = r##"{
            "123": {
                "diceExplode": false,
                "userSettings": {
                    "42": { "rollEmbedColor": "#FF0000" },
                    "43": { "rollEmbedColor": 5793266 },
                    "44": {}
                }
            },
            "456": {}
        }"##;
        let all: AllSettings = serde_json::from_str(json).unwrap();

        let guild = &all["123"];
        assert_eq!(guild.dice_explode, Some(false));
        assert_eq!(
            guild.user_settings["42"].roll_embed_color,
            Some(EmbedColor::Text("#FF0000".into()))
        );
        assert_eq!(
            guild.user_settings["43"].roll_embed_color,
            Some(EmbedColor::Code(5793266))
        );
        assert_eq!(guild.user_settings["44"].roll_embed_color, None);
        assert_eq!(all["456"], GuildSettings::default());
    }

    #[test]
    fn test_absent_fields_are_not_written() {
        let json = serde_json::to_string(&GuildSettings::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_color_display() {
        assert_eq!(EmbedColor::Code(0x5865F2).to_string(), "#5865F2");
        assert_eq!(EmbedColor::Text("#ABC".into()).to_string(), "#ABC");
    }
}
