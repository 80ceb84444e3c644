// crates/parcel-gate-providers/src/poll.rs
// ============================================================================
// Module: Shipment Polling
// Description: Bounded wait for asynchronous rate computation.
// Purpose: Share the poll loop between provider bindings.
// Dependencies: parcel-gate-core, tracing
// ============================================================================

//! ## Overview
//! Providers compute rates asynchronously after a shipment is created. The
//! poll loop re-fetches the shipment at a fixed interval until it is ready,
//! fails, or the wait budget runs out. The loop never sleeps past the budget.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;
use std::time::Instant;

use parcel_gate_core::ProviderError;
use parcel_gate_core::Shipment;
use parcel_gate_core::ShipmentStatus;
use tracing::debug;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Default interval between shipment polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between shipment fetches.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollSettings {
    /// Creates settings polling every `interval_ms` milliseconds.
    #[must_use]
    pub const fn from_millis(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
        }
    }

    /// Fetches the shipment until it leaves the queued state.
    ///
    /// The first fetch happens immediately. A budget of zero still fetches
    /// once.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, [`ProviderError::ShipmentFailed`] when the
    /// provider reports failure, or [`ProviderError::Timeout`] when the
    /// budget elapses while the shipment is still queued.
    pub fn wait_until_ready<F>(
        &self,
        shipment_id: &str,
        budget: Duration,
        mut fetch: F,
    ) -> Result<Shipment, ProviderError>
    where
        F: FnMut() -> Result<Shipment, ProviderError>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            let shipment = fetch()?;
            match shipment.status {
                ShipmentStatus::Ready => {
                    debug!(shipment_id, attempts, "shipment ready");
                    return Ok(shipment);
                }
                ShipmentStatus::Failed => return Err(failed(shipment)),
                ShipmentStatus::Queued => {}
            }
            let elapsed = started.elapsed();
            if elapsed >= budget {
                return Err(ProviderError::Timeout {
                    shipment_id: shipment_id.to_string(),
                    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                });
            }
            thread::sleep(self.interval.min(budget.saturating_sub(elapsed)));
        }
    }
}

/// Converts a failed shipment into an error carrying its messages.
fn failed(shipment: Shipment) -> ProviderError {
    let message = if shipment.messages.is_empty() {
        "provider reported an error without details".to_string()
    } else {
        shipment.messages.join("; ")
    };
    ProviderError::ShipmentFailed {
        shipment_id: shipment.id,
        message,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
