//! In-memory desktop used by replays and tests.
//!
//! [`SimulatedDesktop`] implements [`WindowHost`] over a plain list of
//! windows, records every restore and minimize it performs, and can be told
//! to fail captures or restores for specific windows.

use crate::codec::{WindowHost, WindowStateCodec};
use crate::error::{CaptureError, RestoreError};
use crate::geometry::MonitorRect;
use crate::window::{WindowId, WindowState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn yes() -> bool {
    true
}

/// A simulated top-level window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimWindow {
    pub id: WindowId,
    #[serde(default)]
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default = "yes")]
    pub movable: bool,
    #[serde(default = "yes")]
    pub minimizable: bool,
    #[serde(default)]
    pub minimized: bool,
    /// Make `save` fail for this window.
    #[serde(default)]
    pub fail_capture: bool,
    /// Make `restore` fail for this window.
    #[serde(default)]
    pub fail_restore: bool,
}

impl SimWindow {
    pub fn new(id: u64, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            id: WindowId(id),
            title: String::new(),
            x,
            y,
            width,
            height,
            movable: true,
            minimizable: true,
            minimized: false,
            fail_capture: false,
            fail_restore: false,
        }
    }
}

/// Payload the simulated codec carries next to the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimGeometry {
    pub width: u32,
    pub height: u32,
}

/// One successful restore, as observed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRecord {
    pub window: WindowId,
    pub x: i32,
    pub y: i32,
    pub rect: MonitorRect,
}

#[derive(Debug, Default)]
pub struct SimulatedDesktop {
    windows: BTreeMap<WindowId, SimWindow>,
    restores: Vec<RestoreRecord>,
    minimized: Vec<WindowId>,
}

impl SimulatedDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window. Returns `false` (and leaves the desktop unchanged) if
    /// the id is already taken.
    pub fn add_window(&mut self, window: SimWindow) -> bool {
        if self.windows.contains_key(&window.id) {
            return false;
        }
        self.windows.insert(window.id, window);
        true
    }

    pub fn remove_window(&mut self, id: WindowId) -> Option<SimWindow> {
        self.windows.remove(&id)
    }

    pub fn window(&self, id: WindowId) -> Option<&SimWindow> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut SimWindow> {
        self.windows.get_mut(&id)
    }

    /// Move a window as if the user dragged it. Returns `false` for unknown ids.
    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        match self.windows.get_mut(&id) {
            Some(window) => {
                window.x = x;
                window.y = y;
                true
            }
            None => false,
        }
    }

    /// Windows in id order.
    pub fn all_windows(&self) -> impl Iterator<Item = &SimWindow> {
        self.windows.values()
    }

    pub fn restores(&self) -> &[RestoreRecord] {
        &self.restores
    }

    pub fn minimized(&self) -> &[WindowId] {
        &self.minimized
    }
}

impl WindowStateCodec for SimulatedDesktop {
    type Payload = SimGeometry;

    fn is_inside(&self, window: WindowId, rect: &MonitorRect) -> bool {
        self.windows
            .get(&window)
            .is_some_and(|w| rect.contains(w.x, w.y))
    }

    fn allows_move(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.movable)
    }

    fn save(&self, window: WindowId) -> Result<WindowState<SimGeometry>, CaptureError> {
        let w = self
            .windows
            .get(&window)
            .ok_or(CaptureError::WindowGone(window))?;
        if w.fail_capture {
            return Err(CaptureError::Unreadable {
                window,
                reason: "simulated capture failure".to_string(),
            });
        }
        Ok(WindowState {
            x: w.x,
            y: w.y,
            payload: SimGeometry {
                width: w.width,
                height: w.height,
            },
        })
    }

    fn restore(
        &mut self,
        window: WindowId,
        state: &WindowState<SimGeometry>,
        rect: &MonitorRect,
    ) -> Result<(), RestoreError> {
        let w = self
            .windows
            .get_mut(&window)
            .ok_or(RestoreError::WindowGone(window))?;
        if w.fail_restore {
            return Err(RestoreError::Rejected {
                window,
                reason: "simulated restore failure".to_string(),
            });
        }
        w.x = state.x;
        w.y = state.y;
        w.width = state.payload.width;
        w.height = state.payload.height;
        w.minimized = false;
        self.restores.push(RestoreRecord {
            window,
            x: state.x,
            y: state.y,
            rect: *rect,
        });
        Ok(())
    }
}

impl WindowHost for SimulatedDesktop {
    fn windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    fn can_minimize(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.minimizable)
    }

    fn minimize(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.minimized = true;
            self.minimized.push(window);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut desktop = SimulatedDesktop::new();
        assert!(desktop.add_window(SimWindow::new(1, 0, 0, 100, 100)));
        assert!(!desktop.add_window(SimWindow::new(1, 50, 50, 100, 100)));
        assert_eq!(desktop.window(WindowId(1)).map(|w| w.x), Some(0));
    }

    #[test]
    fn test_save_reports_absolute_position() {
        let mut desktop = SimulatedDesktop::new();
        desktop.add_window(SimWindow::new(1, 2020, 50, 800, 600));
        let state = desktop.save(WindowId(1)).unwrap();
        assert_eq!((state.x, state.y), (2020, 50));
        assert_eq!(state.payload, SimGeometry { width: 800, height: 600 });
    }

    #[test]
    fn test_fault_injection() {
        let mut desktop = SimulatedDesktop::new();
        let mut w = SimWindow::new(1, 0, 0, 10, 10);
        w.fail_capture = true;
        w.fail_restore = true;
        desktop.add_window(w);

        assert!(matches!(
            desktop.save(WindowId(1)),
            Err(CaptureError::Unreadable { .. })
        ));
        let state = WindowState {
            x: 5,
            y: 5,
            payload: SimGeometry { width: 10, height: 10 },
        };
        let rect = MonitorRect::new(0, 0, 100, 100);
        assert!(matches!(
            desktop.restore(WindowId(1), &state, &rect),
            Err(RestoreError::Rejected { .. })
        ));
        assert!(desktop.restores().is_empty());
        assert_eq!(
            desktop.save(WindowId(9)),
            Err(CaptureError::WindowGone(WindowId(9)))
        );
    }

    #[test]
    fn test_restore_unminimizes() {
        let mut desktop = SimulatedDesktop::new();
        desktop.add_window(SimWindow::new(3, 0, 0, 10, 10));
        desktop.minimize(WindowId(3));
        assert!(desktop.window(WindowId(3)).unwrap().minimized);

        let state = WindowState {
            x: 40,
            y: 60,
            payload: SimGeometry { width: 10, height: 10 },
        };
        desktop
            .restore(WindowId(3), &state, &MonitorRect::new(0, 0, 100, 100))
            .unwrap();
        let w = desktop.window(WindowId(3)).unwrap();
        assert!(!w.minimized);
        assert_eq!((w.x, w.y), (40, 60));
    }
}
