//! Events the window keeper reacts to.
//!
//! Monitor topology events come from the host's monitor manager, window
//! removal from its window tracker, and setting changes from the config
//! watcher. All of them are delivered serially through the
//! [`EventDispatcher`](crate::dispatch::EventDispatcher).

use crate::geometry::MonitorRect;
use crate::window::{OutputName, WindowId};
use output_keeper_config::SettingChange;
use serde::{Deserialize, Serialize};

/// An event delivered to the keeper.
///
/// Tagged with `event` so replay scripts read naturally:
///
/// ```yaml
/// event: output_disconnected
/// output: HDMI-1
/// rect: { x: 0, y: 0, width: 1920, height: 1080 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KeeperEvent {
    /// The output lost its signal.
    OutputDisconnected {
        output: OutputName,
        rect: MonitorRect,
    },
    /// The output regained its signal.
    OutputConnected {
        output: OutputName,
        rect: MonitorRect,
    },
    /// The logical monitor on the output was detached.
    MonitorUnloaded {
        output: OutputName,
        rect: MonitorRect,
    },
    /// A logical monitor was attached to the output.
    MonitorLoaded {
        output: OutputName,
        rect: MonitorRect,
    },
    /// The host destroyed a window.
    WindowRemoved { window: WindowId },
    /// A tracked option changed.
    SettingChanged { change: SettingChange },
}

/// Discriminant of [`KeeperEvent`], used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OutputDisconnected,
    OutputConnected,
    MonitorUnloaded,
    MonitorLoaded,
    WindowRemoved,
    SettingChanged,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::OutputDisconnected,
            EventKind::OutputConnected,
            EventKind::MonitorUnloaded,
            EventKind::MonitorLoaded,
            EventKind::WindowRemoved,
            EventKind::SettingChanged,
        ]
    }

    /// snake_case name, matching the serialized `event` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OutputDisconnected => "output_disconnected",
            EventKind::OutputConnected => "output_connected",
            EventKind::MonitorUnloaded => "monitor_unloaded",
            EventKind::MonitorLoaded => "monitor_loaded",
            EventKind::WindowRemoved => "window_removed",
            EventKind::SettingChanged => "setting_changed",
        }
    }
}

impl KeeperEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            KeeperEvent::OutputDisconnected { .. } => EventKind::OutputDisconnected,
            KeeperEvent::OutputConnected { .. } => EventKind::OutputConnected,
            KeeperEvent::MonitorUnloaded { .. } => EventKind::MonitorUnloaded,
            KeeperEvent::MonitorLoaded { .. } => EventKind::MonitorLoaded,
            KeeperEvent::WindowRemoved { .. } => EventKind::WindowRemoved,
            KeeperEvent::SettingChanged { .. } => EventKind::SettingChanged,
        }
    }
}
