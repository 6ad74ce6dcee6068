//! Capture trigger state machine.
//!
//! ```text
//! Idle ──begin──▶ Capturing ──┬─ succeed ─▶ Succeeded ─┐
//!                             └─ fail/drop ─▶ Failed ──┴─▶ (re-armed)
//! ```
//!
//! Only one OCR or voice capture may be in flight. The trigger stays disabled
//! while a [`CaptureGuard`] is alive, and dropping an unsettled guard records a
//! failure, so every exit path (including `?` and panics) re-enables it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where captured text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureSource {
    /// Photographed label sent to OCR
    Ocr,
    /// Spoken query from the platform recognizer
    Voice,
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSource::Ocr => f.write_str("label scan"),
            CaptureSource::Voice => f.write_str("voice"),
        }
    }
}

/// Snapshot of the trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Capturing {
        source: CaptureSource,
        started_at: DateTime<Utc>,
    },
    Succeeded {
        source: CaptureSource,
    },
    Failed {
        source: CaptureSource,
        reason: String,
    },
}

/// Returned when a capture is requested while another is in flight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("A {0} capture is already in progress")]
pub struct CaptureBusy(pub CaptureSource);

/// Shared handle to the single capture slot.
#[derive(Debug, Clone)]
pub struct CaptureTrigger {
    state: Arc<Mutex<CaptureState>>,
}

impl Default for CaptureTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureTrigger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::Idle)),
        }
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        lock(&self.state).clone()
    }

    /// Whether a new capture may start.
    pub fn is_enabled(&self) -> bool {
        !matches!(*lock(&self.state), CaptureState::Capturing { .. })
    }

    /// Disable the trigger and start a capture.
    pub fn begin(&self, source: CaptureSource) -> Result<CaptureGuard, CaptureBusy> {
        let mut state = lock(&self.state);
        if let CaptureState::Capturing { source: active, .. } = *state {
            debug!("Rejected {} capture, {} already in flight", source, active);
            return Err(CaptureBusy(active));
        }

        let started_at = Utc::now();
        *state = CaptureState::Capturing { source, started_at };
        debug!("Started {} capture", source);

        Ok(CaptureGuard {
            state: Arc::clone(&self.state),
            source,
            started_at,
            settled: false,
        })
    }

    /// Return a settled trigger to `Idle`. No effect while capturing.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        if !matches!(*state, CaptureState::Capturing { .. }) {
            *state = CaptureState::Idle;
        }
    }
}

/// Proof that a capture is in flight. Settle it with [`succeed`](Self::succeed)
/// or [`fail`](Self::fail); dropping it unsettled counts as a failure.
#[derive(Debug)]
pub struct CaptureGuard {
    state: Arc<Mutex<CaptureState>>,
    source: CaptureSource,
    started_at: DateTime<Utc>,
    settled: bool,
}

impl CaptureGuard {
    pub fn source(&self) -> CaptureSource {
        self.source
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Mark the capture as completed.
    pub fn succeed(mut self) {
        self.settle(CaptureState::Succeeded {
            source: self.source,
        });
    }

    /// Mark the capture as failed.
    pub fn fail(mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.settle(CaptureState::Failed {
            source: self.source,
            reason,
        });
    }

    fn settle(&mut self, next: CaptureState) {
        let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds();
        match &next {
            CaptureState::Failed { reason, .. } => {
                warn!("{} capture failed after {}ms: {}", self.source, elapsed_ms, reason)
            }
            _ => info!("{} capture finished in {}ms", self.source, elapsed_ms),
        }
        *lock(&self.state) = next;
        self.settled = true;
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(CaptureState::Failed {
                source: self.source,
                reason: "capture abandoned".into(),
            });
        }
    }
}

fn lock(state: &Mutex<CaptureState>) -> MutexGuard<'_, CaptureState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
