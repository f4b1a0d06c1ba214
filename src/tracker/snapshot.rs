//! Sorted, serializable view of the tracker's maps.

use super::StateTracker;
use crate::window::{OutputName, Timestamp, WindowId};
use serde::{Deserialize, Serialize};

/// One pending save of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedOutputSnapshot {
    pub output: OutputName,
    /// Position relative to the output's rect at capture time.
    pub x: i32,
    pub y: i32,
    pub time: Timestamp,
}

/// All pending saves of one window, sorted by capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedWindowSnapshot {
    pub window: WindowId,
    pub states: Vec<SavedOutputSnapshot>,
}

/// Windows stranded on one output, sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandedOutputSnapshot {
    pub output: OutputName,
    pub windows: Vec<WindowId>,
}

/// Point-in-time copy of the tracker state, without payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub saved: Vec<SavedWindowSnapshot>,
    pub stranded: Vec<StrandedOutputSnapshot>,
}

impl<P> StateTracker<P> {
    pub fn snapshot(&self) -> TrackerSnapshot {
        let mut saved: Vec<SavedWindowSnapshot> = self
            .saved
            .iter()
            .map(|(window, states)| {
                let mut states: Vec<SavedOutputSnapshot> = states
                    .iter()
                    .map(|(output, entry)| SavedOutputSnapshot {
                        output: output.clone(),
                        x: entry.window_state.x,
                        y: entry.window_state.y,
                        time: entry.time,
                    })
                    .collect();
                states.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.output.cmp(&b.output)));
                SavedWindowSnapshot {
                    window: *window,
                    states,
                }
            })
            .collect();
        saved.sort_by_key(|s| s.window);

        let mut stranded: Vec<StrandedOutputSnapshot> = self
            .stranded
            .iter()
            .map(|(output, windows)| {
                let mut windows: Vec<WindowId> = windows.iter().copied().collect();
                windows.sort();
                StrandedOutputSnapshot {
                    output: output.clone(),
                    windows,
                }
            })
            .collect();
        stranded.sort_by(|a, b| a.output.cmp(&b.output));

        TrackerSnapshot { saved, stranded }
    }
}
