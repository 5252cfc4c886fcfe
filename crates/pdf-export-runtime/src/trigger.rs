//! Single-flight guard for the export control
//!
//! The control that starts an export stays disabled while a guard is alive.
//! Dropping the guard, on success or failure, enables it again.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("An export is already in progress")]
pub struct ExportBusy;

#[derive(Debug, Clone, Default)]
pub struct ExportTrigger {
    in_flight: Arc<AtomicBool>,
}

impl ExportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the trigger; fails while another export holds it
    pub fn try_begin(&self) -> Result<TriggerGuard, ExportBusy> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| TriggerGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
            .map_err(|_| ExportBusy)
    }

    /// Whether a new export may start
    pub fn is_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the lifetime of one export
#[derive(Debug)]
pub struct TriggerGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
