// Color parsing for user-chosen embed colors

use poise::serenity_prelude as serenity;

use crate::models::settings::EmbedColor;
use crate::utils::config::DEFAULT_ROLL_EMBED_COLOR;

/// Discord's named colors
pub const NAMED_COLORS: &[(&str, u32)] = &[
    ("Default", 0x000000),
    ("White", 0xffffff),
    ("Aqua", 0x1abc9c),
    ("Green", 0x57f287),
    ("Blue", 0x3498db),
    ("Yellow", 0xfee75c),
    ("Purple", 0x9b59b6),
    ("LuminousVividPink", 0xe91e63),
    ("Fuchsia", 0xeb459e),
    ("Gold", 0xf1c40f),
    ("Orange", 0xe67e22),
    ("Red", 0xed4245),
    ("Grey", 0x95a5a6),
    ("Navy", 0x34495e),
    ("DarkAqua", 0x11806a),
    ("DarkGreen", 0x1f8b4c),
    ("DarkBlue", 0x206694),
    ("DarkPurple", 0x71368a),
    ("DarkVividPink", 0xad1457),
    ("DarkGold", 0xc27c0e),
    ("DarkOrange", 0xa84300),
    ("DarkRed", 0x992d22),
    ("DarkGrey", 0x979c9f),
    ("DarkerGrey", 0x7f8c8d),
    ("LightGrey", 0xbcc0c0),
    ("DarkNavy", 0x2c3e50),
    ("Blurple", 0x5865f2),
    ("Greyple", 0x99aab5),
    ("DarkButNotBlack", 0x2c2f33),
    ("NotQuiteBlack", 0x23272a),
];

/// Colors offered by the /settings me picker
#[derive(Debug, Clone, Copy)]
pub struct PredefinedColor {
    pub name: &'static str,
    pub hex: &'static str,
}

pub const PREDEFINED_COLORS: &[PredefinedColor] = &[
    PredefinedColor { name: "Discord Blurple", hex: "#5865F2" },
    PredefinedColor { name: "Classic Red", hex: "#ED4245" },
    PredefinedColor { name: "Vibrant Green", hex: "#57F287" },
    PredefinedColor { name: "Sunny Yellow", hex: "#FEE75C" },
    PredefinedColor { name: "Cool Blue", hex: "#3498DB" },
    PredefinedColor { name: "Deep Purple", hex: "#9B59B6" },
    PredefinedColor { name: "Default (Reset)", hex: DEFAULT_ROLL_EMBED_COLOR },
];

impl PredefinedColor {
    pub fn value(&self) -> EmbedColor {
        EmbedColor::Text(self.hex.to_string())
    }
}

/// Parse user input as a hex code (3, 6 or 8 digits, `#` optional) or a
/// named color. Returns `None` for anything else.
pub fn parse_color_string(input: &str) -> Option<EmbedColor> {
    let s = input.trim().to_uppercase();
    if s.is_empty() {
        return None;
    }

    let digits = s.strip_prefix('#').unwrap_or(&s);
    if matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(EmbedColor::Text(format!("#{}", digits)));
    }

    named_color(&s).map(EmbedColor::Code)
}

fn named_color(name: &str) -> Option<u32> {
    NAMED_COLORS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, value)| value)
}

/// Numeric value of a `#RGB`, `#RRGGBB` or `#RRGGBBAA` string; alpha is dropped
fn hex_value(text: &str) -> Option<u32> {
    let digits = text.trim().strip_prefix('#').unwrap_or(text.trim());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
            u32::from_str_radix(&expanded, 16).ok()
        }
        6 => u32::from_str_radix(digits, 16).ok(),
        8 => u32::from_str_radix(&digits[..6], 16).ok(),
        _ => None,
    }
}

/// Turn a stored color into something an embed accepts
pub fn resolve_colour(color: &EmbedColor) -> serenity::Colour {
    let value = match color {
        EmbedColor::Code(code) => Some(*code & 0xffffff),
        EmbedColor::Text(text) => hex_value(text).or_else(|| named_color(text.trim())),
    };
    serenity::Colour::new(value.unwrap_or(0xffffff))
}
