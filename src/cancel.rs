//! Cooperative cancellation shared between the Ctrl+C handler and long-running
//! operations (paginated listing, batch deletion, consistency polling).

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::Error;

/// Granularity at which sleeping operations re-check the cancellation flag
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cloneable flag that signals an operator abort.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that is flipped when the process receives Ctrl+C.
    pub fn install_ctrlc_handler() -> Result<Self> {
        let token = Self::new();
        let flag = token.cancelled.clone();

        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            eprintln!("interrupt received, cancelling remaining work...");
        })
        .context("Failed to set Ctrl+C handler")?;

        Ok(token)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Err(Error::Cancelled)` once the token has been flipped.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    /// Sleep for `duration`, waking early if the token is cancelled.
    pub fn sleep(&self, duration: Duration) -> Result<(), Error> {
        let deadline = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
