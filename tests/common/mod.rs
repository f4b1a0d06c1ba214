//! Shared integration test helpers for output-keeper.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{desktop_with, LEFT, RIGHT};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use output_keeper::geometry::MonitorRect;
use output_keeper::sim::{SimGeometry, SimWindow, SimulatedDesktop};
use output_keeper::tracker::StateTracker;
use output_keeper::window::{OutputName, Timestamp, WindowId};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Primary monitor at the desktop origin.
pub const LEFT: MonitorRect = MonitorRect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

/// Secondary monitor to the right of [`LEFT`].
pub const RIGHT: MonitorRect = MonitorRect {
    x: 1920,
    y: 0,
    width: 1920,
    height: 1080,
};

pub fn output(name: &str) -> OutputName {
    OutputName::new(name)
}

pub fn at(ms: u64) -> Timestamp {
    Timestamp::from_millis(ms)
}

/// A desktop holding 800x600 windows at the given `(id, x, y)` positions.
pub fn desktop_with(windows: &[(u64, i32, i32)]) -> SimulatedDesktop {
    let mut desktop = SimulatedDesktop::new();
    for &(id, x, y) in windows {
        assert!(
            desktop.add_window(SimWindow::new(id, x, y, 800, 600)),
            "duplicate test window id {id}"
        );
    }
    desktop
}

/// A tracker with both options enabled.
pub fn tracker() -> StateTracker<SimGeometry> {
    StateTracker::default()
}

pub fn position(desktop: &SimulatedDesktop, id: u64) -> (i32, i32) {
    let w = desktop
        .window(WindowId(id))
        .unwrap_or_else(|| panic!("window {id} missing"));
    (w.x, w.y)
}

/// Writes `contents` to `config.yaml` inside a fresh temp dir.
///
/// The `TempDir` must be kept alive for the duration of the test.
pub fn config_file(contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, contents).expect("Failed to write config");
    (path, temp_dir)
}
