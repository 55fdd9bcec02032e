//! Top-level fault barrier.
//!
//! Wraps view rendering and intent handling so an unexpected panic replaces
//! the affected view with a recovery screen instead of ending the process.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

/// Hint shown on the recovery screen.
pub const RESET_HINT: &str = "Reset the board to reload your tasks from the server.";

/// What to show in place of a view that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryScreen {
    message: String,
    bug_report_url: String,
}

impl RecoveryScreen {
    /// Returns a description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the static bug-report link.
    #[must_use]
    pub fn bug_report_url(&self) -> &str {
        &self.bug_report_url
    }

    /// Returns the manual-reset hint.
    #[must_use]
    pub const fn reset_hint(&self) -> &'static str {
        RESET_HINT
    }
}

/// Catches panics escaping a guarded closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultBarrier {
    bug_report_url: String,
}

impl FaultBarrier {
    /// Creates a barrier whose recovery screens link to `bug_report_url`.
    #[must_use]
    pub fn new(bug_report_url: impl Into<String>) -> Self {
        Self {
            bug_report_url: bug_report_url.into(),
        }
    }

    /// Runs `view`, turning a panic into a [`RecoveryScreen`].
    ///
    /// # Errors
    ///
    /// Returns the recovery screen when `view` panics.
    pub fn guard<T>(&self, view: impl FnOnce() -> T) -> Result<T, RecoveryScreen> {
        panic::catch_unwind(AssertUnwindSafe(view)).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            error!(error = %message, "view failed; showing recovery screen");
            RecoveryScreen {
                message,
                bug_report_url: self.bug_report_url.clone(),
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        return (*text).to_owned();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| "unexpected failure".to_owned())
}
