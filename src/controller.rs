//! Glue between the host, the settings, and the [`StateTracker`].
//!
//! [`KeeperController`] owns the tracker together with the host capability
//! and a clock, and routes every [`KeeperEvent`] to the matching tracker
//! operation. Enabling it subscribes to the dispatcher; disabling it drops
//! the subscriptions and abandons the tracker's maps.

use crate::clock::Clock;
use crate::codec::WindowHost;
use crate::dispatch::{EventDispatcher, MonitorObserver, Subscriptions};
use crate::events::{EventKind, KeeperEvent};
use crate::tracker::{StateTracker, TrackerSettings};
use output_keeper_config::{Config, SettingChange};
use std::cell::RefCell;
use std::rc::Rc;

pub struct KeeperController<H: WindowHost> {
    tracker: StateTracker<H::Payload>,
    host: H,
    clock: Box<dyn Clock>,
    config: Config,
}

impl<H: WindowHost> KeeperController<H> {
    pub fn new(host: H, config: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            tracker: StateTracker::new(TrackerSettings::from(&config)),
            host,
            clock,
            config,
        }
    }

    pub fn tracker(&self) -> &StateTracker<H::Payload> {
        &self.tracker
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Route one event to the tracker.
    pub fn handle(&mut self, event: &KeeperEvent) {
        match event {
            KeeperEvent::OutputDisconnected { output, rect } => {
                let now = self.clock.now();
                self.tracker
                    .on_output_disconnected(&self.host, output, rect, now);
            }
            KeeperEvent::OutputConnected { output, rect } => {
                self.tracker.on_output_connected(output, rect);
            }
            KeeperEvent::MonitorUnloaded { output, rect } => {
                self.tracker.on_monitor_unloaded(&mut self.host, output, rect);
            }
            KeeperEvent::MonitorLoaded { output, rect } => {
                self.tracker.on_monitor_loaded(&mut self.host, output, rect);
            }
            KeeperEvent::WindowRemoved { window } => {
                self.tracker.on_window_removed(*window);
            }
            KeeperEvent::SettingChanged { change } => {
                self.apply_setting(*change);
            }
        }
    }

    /// Deliver a single option change.
    pub fn apply_setting(&mut self, change: SettingChange) {
        crate::debug_info!("CONTROLLER", "Setting changed: {:?}", change);
        match change {
            SettingChange::RememberState(enabled) => {
                self.config.remember_state = enabled;
                self.tracker.on_remember_state_change(enabled);
            }
            SettingChange::Minimize(enabled) => {
                self.config.minimize = enabled;
                self.tracker.on_minimize_change(enabled);
            }
        }
    }

    /// Replace the configuration, delivering a change for each option that differs.
    pub fn apply_config(&mut self, config: Config) -> Vec<SettingChange> {
        let changes = Config::diff(&self.config, &config);
        for change in &changes {
            self.apply_setting(*change);
        }
        self.config = config;
        changes
    }

    /// Stop reacting to events and abandon all tracked state.
    pub fn disable(&mut self, subscriptions: Subscriptions) {
        crate::debug_info!(
            "CONTROLLER",
            "Disabling, releasing {} subscriptions",
            subscriptions.len()
        );
        drop(subscriptions);
        self.tracker.reset();
    }
}

impl<H: WindowHost + 'static> KeeperController<H> {
    /// Subscribe `controller` to every event kind on `dispatcher`.
    ///
    /// One subscription per source: monitor manager, window tracker, settings.
    pub fn enable(controller: &Rc<RefCell<Self>>, dispatcher: &EventDispatcher) -> Subscriptions {
        const MONITOR_EVENTS: [EventKind; 4] = [
            EventKind::OutputDisconnected,
            EventKind::OutputConnected,
            EventKind::MonitorUnloaded,
            EventKind::MonitorLoaded,
        ];

        let mut subscriptions = Subscriptions::new();
        subscriptions.push(dispatcher.subscribe(&MONITOR_EVENTS, Rc::clone(controller)));
        subscriptions.push(
            dispatcher.subscribe(&[EventKind::WindowRemoved], Rc::clone(controller)),
        );
        subscriptions.push(
            dispatcher.subscribe(&[EventKind::SettingChanged], Rc::clone(controller)),
        );
        crate::debug_info!("CONTROLLER", "Enabled with {} subscriptions", subscriptions.len());
        subscriptions
    }
}

impl<H: WindowHost> MonitorObserver for KeeperController<H> {
    fn on_event(&mut self, event: &KeeperEvent) {
        self.handle(event);
    }
}
