//! Capability traits the tracker consumes from the host desktop.
//!
//! The tracker never talks to a windowing system directly. Everything it
//! needs (reading and applying geometry, enumerating windows, minimizing)
//! goes through these traits, so the core can be driven by a real shell
//! integration or by [`SimulatedDesktop`](crate::sim::SimulatedDesktop) in
//! tests and replays.

use crate::error::{CaptureError, RestoreError};
use crate::geometry::MonitorRect;
use crate::window::{WindowId, WindowState};
use std::fmt::Debug;

// ── WindowStateCodec ─────────────────────────────────────────────────────────

/// Reads and re-applies window geometry.
///
/// `save` returns absolute coordinates; `restore` receives absolute
/// coordinates together with the rect of the monitor being restored to.
pub trait WindowStateCodec {
    /// Opaque per-window data carried alongside the position.
    type Payload: Clone + Debug;

    /// Returns `true` if the window's position lies inside `rect`.
    fn is_inside(&self, window: WindowId, rect: &MonitorRect) -> bool;

    /// Returns `true` if the window may be moved (not pinned, not a panel).
    fn allows_move(&self, window: WindowId) -> bool;

    /// Capture the window's current state.
    ///
    /// # Errors
    /// [`CaptureError`] when the window is gone or its geometry is unreadable.
    fn save(&self, window: WindowId) -> Result<WindowState<Self::Payload>, CaptureError>;

    /// Apply a previously captured state to the window.
    ///
    /// # Errors
    /// [`RestoreError`] when the window is gone or the host rejects the geometry.
    fn restore(
        &mut self,
        window: WindowId,
        state: &WindowState<Self::Payload>,
        rect: &MonitorRect,
    ) -> Result<(), RestoreError>;
}

// ── WindowHost ───────────────────────────────────────────────────────────────

/// Window enumeration and minimizing, on top of the codec.
pub trait WindowHost: WindowStateCodec {
    /// All windows the host currently manages.
    fn windows(&self) -> Vec<WindowId>;

    /// Returns `true` if the window can be minimized.
    fn can_minimize(&self, window: WindowId) -> bool;

    /// Minimize the window. Unknown windows are ignored.
    fn minimize(&mut self, window: WindowId);
}
