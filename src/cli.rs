//! Command-line interface for output-keeper.
//!
//! This module handles CLI argument parsing and the `replay` and `config`
//! subcommands.

use crate::replay::{self, ReplayScript};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use output_keeper_config::Config;
use output_keeper_config::watcher::SettingsWatcher;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a single watch iteration blocks waiting for a reload.
const WATCH_TICK: Duration = Duration::from_millis(250);

/// output-keeper - keep windows in place across monitor hotplug
#[derive(Parser, Debug)]
#[command(name = "output-keeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (overrides RUST_LOG and the config file)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<CliLogLevel>,

    /// Config file to use instead of ~/.config/output-keeper/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a replay script against a simulated desktop and print the report
    Replay {
        /// Path to the replay script (YAML)
        script: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },

    /// Inspect or manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Watch the config file and print each setting change
    Watch {
        /// Stop after this many seconds (default: run until interrupted)
        #[arg(long, value_name = "SECONDS")]
        seconds: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Off => LevelFilter::Off,
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }
}

/// Load the config at `path`, falling back to defaults when it does not exist.
///
/// Unlike [`Config::load_or_create`], never writes a file.
fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load_from(path).with_context(|| format!("Failed to load config {:?}", path))?
    } else {
        log::info!("No config at {:?}, using defaults", path);
        Config::default()
    };
    crate::debug::set_level(config.log_level.to_level_filter());
    Ok(config)
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    match cli.command {
        Commands::Replay { script, format } => {
            let config = load_config(&config_path)?;
            let script = ReplayScript::load(&script)?;
            let report = replay::run(&script, &config)?;
            let rendered = match format {
                ReportFormat::Yaml => serde_yaml_ng::to_string(&report)?,
                ReportFormat::Json => serde_json::to_string_pretty(&report)?,
            };
            println!("{}", rendered.trim_end());
            Ok(())
        }
        Commands::Config { action } => run_config(action, &config_path),
    }
}

fn run_config(action: ConfigCommand, path: &Path) -> Result<()> {
    match action {
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(path)?;
            print!("{}", serde_yaml_ng::to_string(&config)?);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default()
                .save_to(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        ConfigCommand::Watch { seconds } => watch_config(path, seconds),
    }
}

fn watch_config(path: &Path, seconds: Option<u64>) -> Result<()> {
    // The watcher needs a file to watch.
    let config = Config::load_or_create(path)
        .with_context(|| format!("Failed to load config {:?}", path))?;
    crate::debug::set_level(config.log_level.to_level_filter());
    let mut watcher = SettingsWatcher::new(path, config)?;
    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));

    println!("Watching {} for setting changes", path.display());
    loop {
        for change in watcher.wait(WATCH_TICK) {
            println!("{}", serde_json::to_string(&change)?);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(());
        }
    }
}
