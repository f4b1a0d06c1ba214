//! Single-threaded event dispatch with disposable subscriptions.
//!
//! Observers register with an [`EventDispatcher`] for a set of
//! [`EventKind`]s and get back a [`Subscription`]. Dropping the handle (or
//! calling [`Subscription::unsubscribe`]) detaches the observer. A
//! [`Subscriptions`] aggregate holds every handle a component owns so that
//! tearing the component down releases all of them at once.
//!
//! Dispatch is serial: each observer runs to completion before the next one
//! is called, in registration order. Nothing here is `Send`; the host's event
//! loop owns the dispatcher.

use crate::events::{EventKind, KeeperEvent};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// Receives events from an [`EventDispatcher`].
pub trait MonitorObserver {
    fn on_event(&mut self, event: &KeeperEvent);
}

impl<F> MonitorObserver for F
where
    F: FnMut(&KeeperEvent),
{
    fn on_event(&mut self, event: &KeeperEvent) {
        self(event)
    }
}

/// Unique identifier of a registration within one dispatcher.
pub type SubscriptionId = u64;

struct Registration {
    id: SubscriptionId,
    kinds: HashSet<EventKind>,
    observer: Rc<RefCell<dyn MonitorObserver>>,
}

#[derive(Default)]
struct Registry {
    next_id: SubscriptionId,
    registrations: Vec<Registration>,
}

impl Registry {
    fn contains(&self, id: SubscriptionId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }
}

/// Registry of observers and the entry point for delivering events.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` for the given event kinds.
    ///
    /// The observer stays registered until the returned handle is dropped.
    pub fn subscribe<O>(&self, kinds: &[EventKind], observer: Rc<RefCell<O>>) -> Subscription
    where
        O: MonitorObserver + 'static,
    {
        let observer: Rc<RefCell<dyn MonitorObserver>> = observer;
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.registrations.push(Registration {
            id,
            kinds: kinds.iter().copied().collect(),
            observer,
        });
        crate::debug_trace!("DISPATCH", "Subscription {} registered for {:?}", id, kinds);

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .try_borrow()
            .map(|r| r.registrations.len())
            .unwrap_or(0)
    }

    /// Deliver `event` to every observer subscribed to its kind.
    ///
    /// Returns the number of observers that received it. An observer that is
    /// already running (an event dispatched from inside a handler) is skipped
    /// rather than re-entered.
    pub fn dispatch(&self, event: &KeeperEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<(SubscriptionId, Rc<RefCell<dyn MonitorObserver>>)> = {
            let registry = self.registry.borrow();
            registry
                .registrations
                .iter()
                .filter(|r| r.kinds.contains(&kind))
                .map(|r| (r.id, Rc::clone(&r.observer)))
                .collect()
        };

        let mut delivered = 0;
        for (id, observer) in targets {
            // An earlier observer may have dropped this subscription.
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match observer.try_borrow_mut() {
                Ok(mut observer) => {
                    observer.on_event(event);
                    delivered += 1;
                }
                Err(_) => {
                    crate::debug_warn!(
                        "DISPATCH",
                        "Skipping re-entrant delivery of {} to subscription {}",
                        kind.as_str(),
                        id
                    );
                }
            }
        }
        delivered
    }
}

/// Disposal handle for one registration. Detaches on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Detach now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    fn detach(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut registry) => {
                registry.registrations.retain(|r| r.id != self.id);
                crate::debug_trace!("DISPATCH", "Subscription {} released", self.id);
            }
            Err(_) => {
                crate::debug_error!(
                    "DISPATCH",
                    "Registry busy, subscription {} could not be released",
                    self.id
                );
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Every subscription a component holds; releases them all on drop.
#[derive(Debug, Default)]
#[must_use = "dropping Subscriptions unsubscribes everything it holds"]
pub struct Subscriptions {
    handles: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.handles.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Unsubscribe everything.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

impl Extend<Subscription> for Subscriptions {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}
