//! Window state tracking across monitor topology changes.
//!
//! [`StateTracker`] owns two maps:
//!
//! - saved states: window → (output → state captured when that output disconnected)
//! - stranded windows: output → windows that were on it when it disconnected
//!
//! and reacts to the four monitor events plus window removal and settings
//! changes. Handlers never fail: codec errors are logged per window and the
//! loop moves on.
//!
//! # Sub-modules
//!
//! - [`disconnect`]: `impl StateTracker` for disconnect / connect / unload
//! - [`restore`]: `impl StateTracker` for monitor-loaded restoration
//! - [`snapshot`]: [`TrackerSnapshot`], a sorted read-only view for reports

pub mod disconnect;
pub mod restore;
pub mod snapshot;

pub use snapshot::{
    SavedOutputSnapshot, SavedWindowSnapshot, StrandedOutputSnapshot, TrackerSnapshot,
};

use crate::window::{OutputName, PerWindowSavedStates, WindowId};
use std::collections::{HashMap, HashSet};

/// The two options the tracker is gated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Capture state on disconnect. Disabling forgets every pending save.
    pub remember_state: bool,
    /// Minimize stranded windows when their monitor is unloaded.
    pub minimize: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            remember_state: true,
            minimize: true,
        }
    }
}

impl From<&output_keeper_config::Config> for TrackerSettings {
    fn from(config: &output_keeper_config::Config) -> Self {
        Self {
            remember_state: config.remember_state,
            minimize: config.minimize,
        }
    }
}

/// Tracks saved window states and stranded windows per output.
///
/// `P` is the codec payload stored alongside each saved position.
#[derive(Debug)]
pub struct StateTracker<P> {
    settings: TrackerSettings,
    /// Pending saved states. A window is present only while it has at least one.
    saved: HashMap<WindowId, PerWindowSavedStates<P>>,
    /// Windows left behind on each disconnected output.
    stranded: HashMap<OutputName, HashSet<WindowId>>,
}

impl<P> StateTracker<P> {
    /// Create a tracker with empty maps.
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            saved: HashMap::new(),
            stranded: HashMap::new(),
        }
    }

    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    /// Abandon both maps, as when the tracker is stopped.
    pub fn reset(&mut self) {
        crate::debug_info!(
            "TRACKER",
            "Resetting tracker ({} saved windows, {} stranded outputs)",
            self.saved.len(),
            self.stranded.len()
        );
        self.saved.clear();
        self.stranded.clear();
    }

    /// Forget everything about a destroyed window.
    pub fn on_window_removed(&mut self, window: WindowId) {
        let had_saves = self.saved.remove(&window).is_some();
        let mut stranded_on = 0usize;
        for windows in self.stranded.values_mut() {
            if windows.remove(&window) {
                stranded_on += 1;
            }
        }
        if had_saves || stranded_on > 0 {
            crate::debug_log!(
                "TRACKER",
                "Dropped {} (saved states: {}, stranded on {} outputs)",
                window,
                had_saves,
                stranded_on
            );
        }
    }

    /// React to the `remember_state` option changing.
    pub fn on_remember_state_change(&mut self, enabled: bool) {
        self.settings.remember_state = enabled;
        if !enabled {
            crate::debug_info!(
                "TRACKER",
                "remember_state disabled, forgetting {} saved windows",
                self.saved.len()
            );
            self.saved.clear();
        }
    }

    /// React to the `minimize` option changing.
    pub fn on_minimize_change(&mut self, enabled: bool) {
        self.settings.minimize = enabled;
    }

    /// Returns `true` if `window` has a pending saved state for `output`.
    pub fn has_saved_state(&self, window: WindowId, output: &OutputName) -> bool {
        self.saved
            .get(&window)
            .is_some_and(|states| states.contains_key(output))
    }

    /// Returns `true` if `window` is in `output`'s stranded set.
    pub fn is_stranded(&self, window: WindowId, output: &OutputName) -> bool {
        self.stranded
            .get(output)
            .is_some_and(|windows| windows.contains(&window))
    }

    /// Number of windows with at least one pending saved state.
    pub fn saved_window_count(&self) -> usize {
        self.saved.len()
    }

    /// Outputs that currently have a stranded set, sorted by name.
    pub fn stranded_outputs(&self) -> Vec<&OutputName> {
        let mut outputs: Vec<_> = self.stranded.keys().collect();
        outputs.sort();
        outputs
    }
}

impl<P> Default for StateTracker<P> {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{SavedStateEntry, Timestamp, WindowState};

    fn seed(tracker: &mut StateTracker<()>, window: u64, output: &str, time: u64) {
        tracker
            .saved
            .entry(WindowId(window))
            .or_default()
            .insert(
                OutputName::from(output),
                SavedStateEntry {
                    window_state: WindowState {
                        x: 0,
                        y: 0,
                        payload: (),
                    },
                    time: Timestamp(time),
                },
            );
    }

    fn strand(tracker: &mut StateTracker<()>, window: u64, output: &str) {
        tracker
            .stranded
            .entry(OutputName::from(output))
            .or_default()
            .insert(WindowId(window));
    }

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker: StateTracker<()> = StateTracker::default();
        assert_eq!(tracker.saved_window_count(), 0);
        assert!(tracker.stranded_outputs().is_empty());
        assert_eq!(tracker.settings(), TrackerSettings::default());
    }

    #[test]
    fn test_window_removed_clears_both_maps() {
        let mut tracker = StateTracker::default();
        seed(&mut tracker, 1, "HDMI-1", 10);
        seed(&mut tracker, 1, "DP-2", 20);
        strand(&mut tracker, 1, "HDMI-1");
        strand(&mut tracker, 1, "DP-2");
        strand(&mut tracker, 2, "DP-2");

        tracker.on_window_removed(WindowId(1));

        assert_eq!(tracker.saved_window_count(), 0);
        assert!(!tracker.is_stranded(WindowId(1), &"HDMI-1".into()));
        assert!(!tracker.is_stranded(WindowId(1), &"DP-2".into()));
        assert!(tracker.is_stranded(WindowId(2), &"DP-2".into()));
    }

    #[test]
    fn test_remember_state_toggle_clears_saves_only() {
        let mut tracker = StateTracker::default();
        seed(&mut tracker, 1, "HDMI-1", 10);
        strand(&mut tracker, 1, "HDMI-1");

        tracker.on_remember_state_change(true);
        assert_eq!(tracker.saved_window_count(), 1);

        tracker.on_remember_state_change(false);
        assert_eq!(tracker.saved_window_count(), 0);
        assert!(tracker.is_stranded(WindowId(1), &"HDMI-1".into()));
        assert!(!tracker.settings().remember_state);
    }

    #[test]
    fn test_reset_abandons_everything() {
        let mut tracker = StateTracker::default();
        seed(&mut tracker, 1, "HDMI-1", 10);
        strand(&mut tracker, 2, "DP-1");
        tracker.reset();
        assert_eq!(tracker.saved_window_count(), 0);
        assert!(tracker.stranded_outputs().is_empty());
    }
}
