// Bot features
pub mod events;
pub mod roll_formatter;
pub mod settings_store;
