//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so that partial YAML files fill in the missing options.

pub fn remember_state() -> bool {
    true
}

pub fn minimize() -> bool {
    true
}

pub fn log_level() -> crate::types::LogLevel {
    crate::types::LogLevel::Off
}

/// Debounce window for config hot reload, in milliseconds.
pub fn watch_debounce_ms() -> u64 {
    100
}
