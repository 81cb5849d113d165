// Utility functions module
pub mod color_parser;
pub mod config;
pub mod formatters;
