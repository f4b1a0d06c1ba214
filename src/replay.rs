//! Replay scripts: drive the keeper through a simulated session.
//!
//! A script declares the initial windows of a [`SimulatedDesktop`] and a list
//! of steps. Each step may set the clock (`at_ms`) and then performs exactly
//! one action:
//!
//! ```yaml
//! settings:
//!   remember_state: true
//! windows:
//!   - { id: 1, title: editor, x: 100, y: 50, width: 800, height: 600 }
//! steps:
//!   - at_ms: 1000
//!     send:
//!       event: output_disconnected
//!       output: HDMI-1
//!       rect: { x: 0, y: 0, width: 1920, height: 1080 }
//!   - move_window: { window: 1, x: 2200, y: 10 }
//!   - at_ms: 2000
//!     send:
//!       event: monitor_loaded
//!       output: HDMI-1
//!       rect: { x: 1920, y: 0, width: 1920, height: 1080 }
//! ```
//!
//! `send` dispatches a [`KeeperEvent`], `move_window` moves a window on the
//! simulated host, and `close_window` destroys one and dispatches the
//! matching `window_removed` event.

use crate::clock::ManualClock;
use crate::controller::KeeperController;
use crate::dispatch::EventDispatcher;
use crate::error::ReplayError;
use crate::events::KeeperEvent;
use crate::sim::{RestoreRecord, SimWindow, SimulatedDesktop};
use crate::tracker::TrackerSnapshot;
use crate::window::WindowId;
use output_keeper_config::Config;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaySettings {
    #[serde(default)]
    pub remember_state: Option<bool>,
    #[serde(default)]
    pub minimize: Option<bool>,
}

/// A user moving a window on the simulated host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveWindow {
    pub window: WindowId,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayStep {
    /// Clock time for this step; omitted means "same time as the previous step".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<KeeperEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_window: Option<MoveWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_window: Option<WindowId>,
}

/// The action a step performs, once validated.
enum StepAction<'a> {
    Send(&'a KeeperEvent),
    Move(MoveWindow),
    Close(WindowId),
}

impl ReplayStep {
    fn action(&self, index: usize) -> Result<StepAction<'_>, ReplayError> {
        match (&self.send, self.move_window, self.close_window) {
            (Some(event), None, None) => Ok(StepAction::Send(event)),
            (None, Some(mv), None) => Ok(StepAction::Move(mv)),
            (None, None, Some(window)) => Ok(StepAction::Close(window)),
            _ => Err(ReplayError::InvalidStep {
                step: index,
                reason: "expected exactly one of send, move_window, close_window".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    #[serde(default)]
    pub settings: ReplaySettings,
    #[serde(default)]
    pub windows: Vec<SimWindow>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn from_yaml(contents: &str) -> Result<Self, ReplayError> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        crate::debug_info!("REPLAY", "Loading replay script from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&contents)
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Number of steps executed.
    pub steps: usize,
    /// Final state of every window still open.
    pub windows: Vec<SimWindow>,
    /// Restores performed, in order.
    pub restores: Vec<RestoreRecord>,
    /// Windows minimized, in order.
    pub minimized: Vec<WindowId>,
    /// Tracker state after the last step.
    pub tracker: TrackerSnapshot,
}

/// Run `script` against a fresh simulated desktop.
///
/// `base` provides the settings; the script's `settings` block overrides them.
pub fn run(script: &ReplayScript, base: &Config) -> Result<ReplayReport, ReplayError> {
    let mut desktop = SimulatedDesktop::new();
    for window in &script.windows {
        if !desktop.add_window(window.clone()) {
            return Err(ReplayError::DuplicateWindow(window.id.0));
        }
    }

    let mut config = base.clone();
    if let Some(enabled) = script.settings.remember_state {
        config.remember_state = enabled;
    }
    if let Some(enabled) = script.settings.minimize {
        config.minimize = enabled;
    }

    let clock = ManualClock::new(0);
    let controller = Rc::new(RefCell::new(KeeperController::new(
        desktop,
        config,
        Box::new(clock.clone()),
    )));
    let dispatcher = EventDispatcher::new();
    let subscriptions = KeeperController::enable(&controller, &dispatcher);

    let mut previous_ms = 0u64;
    for (index, step) in script.steps.iter().enumerate() {
        if let Some(at_ms) = step.at_ms {
            if at_ms < previous_ms {
                return Err(ReplayError::ClockWentBackwards {
                    step: index,
                    at_ms,
                    previous_ms,
                });
            }
            previous_ms = at_ms;
            clock.set(at_ms);
        }

        match step.action(index)? {
            StepAction::Send(event) => {
                crate::debug_log!("REPLAY", "Step {}: {}", index, event.kind().as_str());
                dispatcher.dispatch(event);
            }
            StepAction::Move(mv) => {
                crate::debug_log!(
                    "REPLAY",
                    "Step {}: move {} to ({}, {})",
                    index,
                    mv.window,
                    mv.x,
                    mv.y
                );
                if !controller
                    .borrow_mut()
                    .host_mut()
                    .move_window(mv.window, mv.x, mv.y)
                {
                    return Err(ReplayError::UnknownWindow {
                        step: index,
                        window: mv.window.0,
                    });
                }
            }
            StepAction::Close(window) => {
                crate::debug_log!("REPLAY", "Step {}: close {}", index, window);
                if controller.borrow_mut().host_mut().remove_window(window).is_none() {
                    return Err(ReplayError::UnknownWindow {
                        step: index,
                        window: window.0,
                    });
                }
                dispatcher.dispatch(&KeeperEvent::WindowRemoved { window });
            }
        }
    }

    let report = {
        let controller = controller.borrow();
        let host = controller.host();
        ReplayReport {
            steps: script.steps.len(),
            windows: host.all_windows().cloned().collect(),
            restores: host.restores().to_vec(),
            minimized: host.minimized().to_vec(),
            tracker: controller.tracker().snapshot(),
        }
    };
    controller.borrow_mut().disable(subscriptions);

    crate::debug_info!(
        "REPLAY",
        "Replay finished: {} steps, {} restores, {} minimized",
        report.steps,
        report.restores.len(),
        report.minimized.len()
    );
    Ok(report)
}
