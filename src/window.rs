//! Identity and saved-state types shared by the tracker and its hosts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Surrogate identity of a host window.
///
/// Issued by the host; two distinct windows never share an id during a session.
/// The tracker only ever stores ids, never the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Name of a physical video output slot, e.g. `HDMI-1`.
///
/// Stable across disconnect/reconnect of the same slot within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputName(String);

impl OutputName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OutputName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for OutputName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milliseconds on a monotonic clock. Only used to order captures.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

/// A captured window state.
///
/// `x`/`y` are absolute when produced by the codec and relative to the
/// monitor origin while stored by the tracker. `payload` is whatever else
/// the codec needs to re-apply the state; the tracker never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState<P> {
    pub x: i32,
    pub y: i32,
    pub payload: P,
}

/// A saved state together with the time it was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedStateEntry<P> {
    pub window_state: WindowState<P>,
    pub time: Timestamp,
}

/// Pending saved states of one window, at most one per output.
pub type PerWindowSavedStates<P> = HashMap<OutputName, SavedStateEntry<P>>;
