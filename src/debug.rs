//! Logging infrastructure for output-keeper
//!
//! All `log::*` output is routed to a single debug log file:
//! `/tmp/output_keeper_debug.log` on Unix/macOS, `%TEMP%\output_keeper_debug.log`
//! on Windows. When `RUST_LOG` is set the lines are mirrored to stderr.
//!
//! Level precedence: `--log-level` CLI flag, then `RUST_LOG`, then the
//! `log_level` config option (applied after the config is loaded).
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bridge from the `log` facade to the debug log file.
struct FileLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl FileLogger {
    fn write_line(&self, line: &str) {
        let mut guard = self.file.lock();
        if guard.is_none() {
            *guard = open_log_file();
        }
        if let Some(file) = guard.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        self.write_line(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Set once the level came from the CLI or `RUST_LOG`; config may not override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/output_keeper_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("output_keeper_debug.log")
    }
}

fn open_log_file() -> Option<File> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(log_path())
        .ok()?;
    let rule = "=".repeat(80);
    let _ = write!(
        file,
        "\n{rule}\noutput-keeper debug session started at {}\n{rule}\n",
        get_timestamp()
    );
    Some(file)
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_line(level: Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", get_timestamp(), level, target, msg)
}

/// Parse a `RUST_LOG`-style value. Only plain level names are understood.
fn parse_env_level(value: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(value.trim()).ok()
}

/// Install the log bridge.
///
/// `cli_level` takes precedence over `RUST_LOG`. Calling this more than once
/// only updates the level.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_value = std::env::var("RUST_LOG").ok();
    let env_level = env_value.as_deref().and_then(parse_env_level);

    let logger = LOGGER.get_or_init(|| FileLogger {
        file: Mutex::new(None),
        mirror_stderr: env_value.is_some(),
    });
    // Fails only if another logger is already installed (e.g. in tests).
    let _ = log::set_logger(logger);

    match cli_level.or(env_level) {
        Some(level) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            log::set_max_level(level);
        }
        None => log::set_max_level(LevelFilter::Off),
    }
}

/// Apply the level from the config file unless the CLI or `RUST_LOG` pinned one.
pub fn set_level(level: LevelFilter) {
    if LEVEL_PINNED.load(Ordering::Relaxed) {
        log::debug!("Ignoring config log level {level}; pinned by CLI or RUST_LOG");
        return;
    }
    log::set_max_level(level);
}

// Category logging macros. The category becomes the log target so lines read
// `[..] [INFO ] [TRACKER] message`.
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        log::log!(target: $category, log::Level::Error, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_warn {
    ($category:expr, $($arg:tt)*) => {
        log::log!(target: $category, log::Level::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        log::log!(target: $category, log::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        log::log!(target: $category, log::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        log::log!(target: $category, log::Level::Trace, $($arg)*)
    };
}
