//! Typed error types for output-keeper.
//!
//! Capture and restore failures come from the host's geometry primitives and
//! are never fatal: the tracker logs them and moves on to the next window.

use crate::window::WindowId;
use thiserror::Error;

/// Reading a window's state failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The window no longer exists on the host.
    #[error("{0} no longer exists")]
    WindowGone(WindowId),

    /// The host refused or failed to report the window geometry.
    #[error("could not read state of {window}: {reason}")]
    Unreadable {
        /// Window whose state could not be read.
        window: WindowId,
        /// Host-provided detail.
        reason: String,
    },
}

/// Applying a saved state to a window failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RestoreError {
    /// The window no longer exists on the host.
    #[error("{0} no longer exists")]
    WindowGone(WindowId),

    /// The host rejected the geometry.
    #[error("geometry rejected for {window}: {reason}")]
    Rejected {
        /// Window the state was applied to.
        window: WindowId,
        /// Host-provided detail.
        reason: String,
    },
}

/// Errors produced while loading or running a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file could not be read.
    #[error("failed to read replay script '{path}': {source}")]
    Read {
        /// Script path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The script is not valid YAML for the replay format.
    #[error("failed to parse replay script: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// Two windows in the script share an id.
    #[error("duplicate window id {0} in replay script")]
    DuplicateWindow(u64),

    /// A step references a window the script never declared.
    #[error("step {step} references unknown window id {window}")]
    UnknownWindow {
        /// Zero-based step index.
        step: usize,
        /// Referenced window id.
        window: u64,
    },

    /// A step does not name exactly one action.
    #[error("step {step} is invalid: {reason}")]
    InvalidStep {
        /// Zero-based step index.
        step: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Step timestamps went backwards.
    #[error("step {step} moves the clock backwards ({at_ms} ms < {previous_ms} ms)")]
    ClockWentBackwards {
        /// Zero-based step index.
        step: usize,
        /// Requested time.
        at_ms: u64,
        /// Time of the previous step.
        previous_ms: u64,
    },
}
