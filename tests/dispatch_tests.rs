//! Tests for event dispatch, subscription lifetimes and the controller wiring.

mod common;

use common::{LEFT, RIGHT, desktop_with, output, position};
use output_keeper::clock::ManualClock;
use output_keeper::config::{Config, SettingChange};
use output_keeper::controller::KeeperController;
use output_keeper::dispatch::{EventDispatcher, Subscriptions};
use output_keeper::events::{EventKind, KeeperEvent};
use output_keeper::sim::SimulatedDesktop;
use output_keeper::window::WindowId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn disconnected(name: &str) -> KeeperEvent {
    KeeperEvent::OutputDisconnected {
        output: output(name),
        rect: LEFT,
    }
}

fn loaded(name: &str) -> KeeperEvent {
    KeeperEvent::MonitorLoaded {
        output: output(name),
        rect: RIGHT,
    }
}

fn controller(
    desktop: SimulatedDesktop,
    clock: &ManualClock,
) -> Rc<RefCell<KeeperController<SimulatedDesktop>>> {
    Rc::new(RefCell::new(KeeperController::new(
        desktop,
        Config::default(),
        Box::new(clock.clone()),
    )))
}

#[test]
fn test_enable_registers_one_subscription_per_source() {
    let dispatcher = EventDispatcher::new();
    let clock = ManualClock::new(0);
    let keeper = controller(desktop_with(&[]), &clock);

    let subscriptions = KeeperController::enable(&keeper, &dispatcher);
    assert_eq!(subscriptions.len(), 3);
    assert_eq!(dispatcher.subscriber_count(), 3);

    drop(subscriptions);
    assert_eq!(dispatcher.subscriber_count(), 0);
}

#[test]
fn test_events_reach_tracker_through_dispatcher() {
    let dispatcher = EventDispatcher::new();
    let clock = ManualClock::new(1000);
    let keeper = controller(desktop_with(&[(1, 100, 50)]), &clock);
    let _subscriptions = KeeperController::enable(&keeper, &dispatcher);

    assert_eq!(dispatcher.dispatch(&disconnected("HDMI-1")), 1);
    {
        let keeper = keeper.borrow();
        let snapshot = keeper.tracker().snapshot();
        let saved = &snapshot.saved[0].states[0];
        assert_eq!(saved.time.as_millis(), 1000);
    }

    clock.set(2000);
    dispatcher.dispatch(&loaded("HDMI-1"));
    assert_eq!(position(keeper.borrow().host(), 1), (2020, 50));
}

#[test]
fn test_window_removed_event_cleans_up() {
    let dispatcher = EventDispatcher::new();
    let clock = ManualClock::new(0);
    let keeper = controller(desktop_with(&[(1, 100, 50)]), &clock);
    let _subscriptions = KeeperController::enable(&keeper, &dispatcher);

    dispatcher.dispatch(&disconnected("HDMI-1"));
    dispatcher.dispatch(&KeeperEvent::WindowRemoved { window: WindowId(1) });

    let keeper = keeper.borrow();
    assert_eq!(keeper.tracker().saved_window_count(), 0);
    assert!(!keeper.tracker().is_stranded(WindowId(1), &output("HDMI-1")));
}

#[test]
fn test_setting_change_event_clears_saves() {
    let dispatcher = EventDispatcher::new();
    let clock = ManualClock::new(0);
    let keeper = controller(desktop_with(&[(1, 100, 50)]), &clock);
    let _subscriptions = KeeperController::enable(&keeper, &dispatcher);

    dispatcher.dispatch(&disconnected("HDMI-1"));
    dispatcher.dispatch(&KeeperEvent::SettingChanged {
        change: SettingChange::RememberState(false),
    });

    let keeper = keeper.borrow();
    assert_eq!(keeper.tracker().saved_window_count(), 0);
    assert!(!keeper.config().remember_state);
    assert!(keeper.tracker().is_stranded(WindowId(1), &output("HDMI-1")));
}

#[test]
fn test_disable_releases_subscriptions_and_state() {
    let dispatcher = EventDispatcher::new();
    let clock = ManualClock::new(0);
    let keeper = controller(desktop_with(&[(1, 100, 50)]), &clock);
    let subscriptions = KeeperController::enable(&keeper, &dispatcher);

    dispatcher.dispatch(&disconnected("HDMI-1"));
    keeper.borrow_mut().disable(subscriptions);

    assert_eq!(dispatcher.subscriber_count(), 0);
    assert_eq!(dispatcher.dispatch(&loaded("HDMI-1")), 0);
    let keeper = keeper.borrow();
    assert_eq!(keeper.tracker().saved_window_count(), 0);
    assert!(keeper.tracker().stranded_outputs().is_empty());
    assert!(keeper.host().restores().is_empty());
}

#[test]
fn test_apply_config_reports_changes() {
    let clock = ManualClock::new(0);
    let keeper = controller(desktop_with(&[]), &clock);

    let changes = keeper
        .borrow_mut()
        .apply_config(Config::default().with_minimize(false));
    assert_eq!(changes, vec![SettingChange::Minimize(false)]);
    assert!(!keeper.borrow().tracker().settings().minimize);

    let unchanged = keeper
        .borrow_mut()
        .apply_config(Config::default().with_minimize(false));
    assert!(unchanged.is_empty());
}

#[test]
fn test_subscriptions_aggregate_releases_everything() {
    let dispatcher = EventDispatcher::new();
    let hits = Rc::new(Cell::new(0usize));
    let mut subscriptions = Subscriptions::new();
    for _ in 0..4 {
        let hits = Rc::clone(&hits);
        let observer = Rc::new(RefCell::new(move |_: &KeeperEvent| hits.set(hits.get() + 1)));
        subscriptions.push(dispatcher.subscribe(&[EventKind::OutputDisconnected], observer));
    }

    assert_eq!(dispatcher.dispatch(&disconnected("DP-1")), 4);
    subscriptions.clear();
    assert!(subscriptions.is_empty());
    assert_eq!(dispatcher.dispatch(&disconnected("DP-1")), 0);
    assert_eq!(hits.get(), 4);
}

#[test]
fn test_reentrant_dispatch_skips_running_observer() {
    let dispatcher = EventDispatcher::new();
    let inner_delivered = Rc::new(Cell::new(usize::MAX));
    let calls = Rc::new(Cell::new(0usize));

    let observer = {
        let dispatcher = dispatcher.clone();
        let inner_delivered = Rc::clone(&inner_delivered);
        let calls = Rc::clone(&calls);
        Rc::new(RefCell::new(move |event: &KeeperEvent| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                inner_delivered.set(dispatcher.dispatch(event));
            }
        }))
    };
    let _sub = dispatcher.subscribe(EventKind::all(), observer);

    assert_eq!(dispatcher.dispatch(&disconnected("DP-1")), 1);
    assert_eq!(inner_delivered.get(), 0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_unsubscribe_during_dispatch_stops_later_delivery() {
    let dispatcher = EventDispatcher::new();
    let second_hits = Rc::new(Cell::new(0usize));
    let victim: Rc<RefCell<Option<output_keeper::dispatch::Subscription>>> =
        Rc::new(RefCell::new(None));

    let first = {
        let victim = Rc::clone(&victim);
        Rc::new(RefCell::new(move |_: &KeeperEvent| {
            victim.borrow_mut().take();
        }))
    };
    let second = {
        let hits = Rc::clone(&second_hits);
        Rc::new(RefCell::new(move |_: &KeeperEvent| hits.set(hits.get() + 1)))
    };

    let _first_sub = dispatcher.subscribe(EventKind::all(), first);
    *victim.borrow_mut() = Some(dispatcher.subscribe(EventKind::all(), second));

    assert_eq!(dispatcher.dispatch(&disconnected("DP-1")), 1);
    assert_eq!(second_hits.get(), 0);
    assert_eq!(dispatcher.subscriber_count(), 1);
}
