// Library exports for testing and embedding.
//
// The crate is single-threaded: the tracker, the dispatcher, and the
// controller all live on the host's event-loop thread and use `Rc`/`RefCell`.
// Only the config watcher crosses threads (notify's callback), and it uses
// `parking_lot` inside the config crate.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod clock;
pub mod codec;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod geometry;
pub mod replay;
pub mod sim;
pub mod tracker;
pub mod window;

/// Configuration re-exports from the output-keeper-config crate.
pub mod config {
    pub use output_keeper_config::*;
}

pub use codec::{WindowHost, WindowStateCodec};
pub use controller::KeeperController;
pub use dispatch::{EventDispatcher, MonitorObserver, Subscription, Subscriptions};
pub use events::{EventKind, KeeperEvent};
pub use geometry::MonitorRect;
pub use tracker::{StateTracker, TrackerSettings};
pub use window::{OutputName, Timestamp, WindowId, WindowState};
