use serde::{Deserialize, Serialize};

/// Log level for the debug log file.
///
/// Controls the verbosity of log output written to the debug log file.
/// Environment variable `RUST_LOG` and the `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's filter type.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// A discrete change to one of the options the window keeper reacts to.
///
/// Produced by [`Config::diff`](crate::Config::diff) and delivered to the
/// tracker as a notification rather than being polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "option", content = "enabled")]
pub enum SettingChange {
    /// `remember_state` was toggled.
    RememberState(bool),
    /// `minimize` was toggled.
    Minimize(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_filter_mapping() {
        assert_eq!(LogLevel::Off.to_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_setting_change_yaml_shape() {
        let yaml = serde_yaml_ng::to_string(&SettingChange::RememberState(false)).unwrap();
        assert!(yaml.contains("option: remember_state"));
        assert!(yaml.contains("enabled: false"));

        let parsed: SettingChange =
            serde_yaml_ng::from_str("option: minimize\nenabled: true\n").unwrap();
        assert_eq!(parsed, SettingChange::Minimize(true));
    }
}
