pub mod config;
pub mod language;
