// Formatting utilities

/// Discord's limit for an embed field value
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Truncate string to max length (in characters) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Replace literal `\n` escapes typed into a slash command with real newlines
pub fn normalize_newlines(input: &str) -> String {
    input.replace("\\n", "\n")
}

/// "Enabled" / "Disabled"
pub fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}
