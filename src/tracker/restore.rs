//! Restoring saved states when a monitor is loaded.

use super::StateTracker;
use crate::codec::WindowHost;
use crate::geometry::MonitorRect;
use crate::window::{OutputName, WindowId, WindowState};

impl<P> StateTracker<P> {
    /// A monitor was attached to `output` at `rect`.
    ///
    /// Each window with a save for `output` is restored to that save, moved
    /// onto `rect`. Saves the same window holds for other outputs that are
    /// as new as or newer than the restored one are dropped: the window
    /// cannot have gone to both places afterwards, and this restore wins.
    pub fn on_monitor_loaded<H>(&mut self, host: &mut H, output: &OutputName, rect: &MonitorRect)
    where
        H: WindowHost<Payload = P>,
    {
        crate::debug_info!("TRACKER", "Monitor loaded on {} at {}", output, rect);

        let mut windows: Vec<WindowId> = self.saved.keys().copied().collect();
        windows.sort();

        let mut restored = 0usize;
        for window in windows {
            let Some(states) = self.saved.get_mut(&window) else {
                continue;
            };
            let Some(entry) = states.remove(output) else {
                continue;
            };

            let before = states.len();
            states.retain(|_, other| other.time < entry.time);
            let superseded = before - states.len();
            if superseded > 0 {
                crate::debug_log!(
                    "TRACKER",
                    "Dropped {} newer saves of {} superseded by {}",
                    superseded,
                    window,
                    output
                );
            }
            if states.is_empty() {
                self.saved.remove(&window);
            }

            let (x, y) = rect.to_absolute(entry.window_state.x, entry.window_state.y);
            let state = WindowState {
                x,
                y,
                payload: entry.window_state.payload,
            };
            match host.restore(window, &state, rect) {
                Ok(()) => {
                    restored += 1;
                    crate::debug_log!("TRACKER", "Restored {} to ({}, {})", window, x, y);
                }
                Err(e) => {
                    crate::debug_warn!(
                        "TRACKER",
                        "Could not restore {} on {}: {}",
                        window,
                        output,
                        e
                    );
                }
            }
        }

        crate::debug_info!("TRACKER", "Restored {} windows on {}", restored, output);
    }
}
