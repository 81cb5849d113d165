// Slash commands
pub mod echo;
pub mod help;
pub mod ping;
pub mod roll;
pub mod settings;
