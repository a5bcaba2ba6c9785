//! Cancellable execution context threaded through every vault operation.
//!
//! A `Context` is created once per command by the caller and cloned
//! freely; all clones share the same cancel flag.  It trips either when
//! `cancel` is called (e.g. from a Ctrl-C handler) or when its optional
//! deadline passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{MaultError, Result};

#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context with no deadline that only trips on `cancel`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Trip the context for every clone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// The shared flag, for wiring into a signal handler.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `true` once cancelled or past the deadline.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Return `Err(MaultError::Cancelled)` if the context has tripped.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            log::debug!("context cancelled");
            return Err(MaultError::Cancelled);
        }
        Ok(())
    }
}
