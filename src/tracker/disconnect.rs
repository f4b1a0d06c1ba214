//! Disconnect, connect and unload handling.

use super::StateTracker;
use crate::codec::WindowHost;
use crate::geometry::MonitorRect;
use crate::window::{OutputName, SavedStateEntry, Timestamp, WindowId, WindowState};
use std::collections::HashSet;
use std::collections::hash_map::Entry;

impl<P> StateTracker<P> {
    /// An output lost its signal.
    ///
    /// Every window inside `rect` becomes stranded on `output`. When
    /// `remember_state` is on, movable windows also get their state captured
    /// relative to `rect`. A capture only lands if the window has no pending
    /// save for this output yet; the earlier snapshot wins.
    pub fn on_output_disconnected<H>(
        &mut self,
        host: &H,
        output: &OutputName,
        rect: &MonitorRect,
        now: Timestamp,
    ) where
        H: WindowHost<Payload = P>,
    {
        crate::debug_info!("TRACKER", "Output {} disconnected at {}", output, rect);

        let mut stranded = HashSet::new();
        for window in host.windows() {
            if !host.is_inside(window, rect) {
                continue;
            }
            if self.settings.remember_state && host.allows_move(window) {
                self.capture(host, window, output, rect, now);
            }
            stranded.insert(window);
        }

        crate::debug_log!(
            "TRACKER",
            "{} windows stranded on {}",
            stranded.len(),
            output
        );
        if self.stranded.insert(output.clone(), stranded).is_some() {
            crate::debug_warn!(
                "TRACKER",
                "Replaced an unresolved stranded set for {}",
                output
            );
        }
    }

    fn capture<H>(
        &mut self,
        host: &H,
        window: WindowId,
        output: &OutputName,
        rect: &MonitorRect,
        now: Timestamp,
    ) where
        H: WindowHost<Payload = P>,
    {
        let state = match host.save(window) {
            Ok(state) => state,
            Err(e) => {
                crate::debug_warn!(
                    "TRACKER",
                    "Could not save {} on {}: {}",
                    window,
                    output,
                    e
                );
                return;
            }
        };

        let (x, y) = rect.to_relative(state.x, state.y);
        let entry = SavedStateEntry {
            window_state: WindowState {
                x,
                y,
                payload: state.payload,
            },
            time: now,
        };

        match self.saved.entry(window).or_default().entry(output.clone()) {
            Entry::Occupied(existing) => {
                crate::debug_log!(
                    "TRACKER",
                    "Keeping earlier save of {} on {} from {} ms",
                    window,
                    output,
                    existing.get().time.as_millis()
                );
            }
            Entry::Vacant(slot) => {
                crate::debug_log!(
                    "TRACKER",
                    "Saved {} on {} at relative ({}, {})",
                    window,
                    output,
                    x,
                    y
                );
                slot.insert(entry);
            }
        }
    }

    /// An output regained its signal. Its stranded set is discarded.
    pub fn on_output_connected(&mut self, output: &OutputName, rect: &MonitorRect) {
        if let Some(windows) = self.stranded.remove(output) {
            crate::debug_info!(
                "TRACKER",
                "Output {} reconnected at {}, {} windows no longer stranded",
                output,
                rect,
                windows.len()
            );
        }
    }

    /// The monitor on `output` went away for good.
    ///
    /// Windows stranded on it are minimized when the `minimize` option is on
    /// and the host allows it.
    pub fn on_monitor_unloaded<H>(&mut self, host: &mut H, output: &OutputName, rect: &MonitorRect)
    where
        H: WindowHost<Payload = P>,
    {
        let Some(stranded) = self.stranded.remove(output) else {
            return;
        };
        crate::debug_info!(
            "TRACKER",
            "Monitor on {} ({}) unloaded with {} stranded windows",
            output,
            rect,
            stranded.len()
        );
        if !self.settings.minimize {
            return;
        }

        let mut windows: Vec<WindowId> = stranded.into_iter().collect();
        windows.sort();
        for window in windows {
            if host.can_minimize(window) {
                crate::debug_log!("TRACKER", "Minimizing {}", window);
                host.minimize(window);
            }
        }
    }
}
