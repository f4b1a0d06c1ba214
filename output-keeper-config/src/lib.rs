//! Configuration system for output-keeper.
//!
//! This crate provides configuration loading, saving, and default values
//! for the window keeper. It includes:
//!
//! - The [`Config`] struct with the `remember_state` and `minimize` options
//! - YAML persistence with atomic writes
//! - [`SettingChange`] notifications derived by diffing two configs
//! - Configuration file watching

pub mod config;
pub mod defaults;
pub mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{LogLevel, SettingChange};
