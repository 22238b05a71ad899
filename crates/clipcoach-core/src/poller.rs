//! Readiness polling for uploaded assets.
//!
//! After upload the remote service processes the clip asynchronously. The
//! poller re-fetches the asset state at a fixed interval until it reaches a
//! terminal state or the attempt budget runs out.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use clipcoach_models::{AssetState, ReadyAsset, RemoteAsset};

use crate::error::{CoachError, CoachResult};
use crate::service::RemoteAssetService;

/// Fixed-interval polling policy with an attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each state fetch
    pub interval: Duration,
    /// Maximum number of state fetches before giving up
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Derive the attempt limit from a total wait budget (rounded up, at least one).
    pub fn from_max_wait(interval: Duration, max_wait: Duration) -> Self {
        let interval_ms = interval.as_millis().max(1);
        let attempts = max_wait.as_millis().div_ceil(interval_ms).max(1);
        Self {
            interval,
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
        }
    }
}

/// A ready asset plus how many state fetches it took.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub asset: ReadyAsset,
    pub polls: u32,
}

/// Wait until `asset` leaves the processing state.
///
/// Returns the ready asset on `ACTIVE`, [`CoachError::ProcessingFailed`] on
/// `FAILED`, and [`CoachError::Timeout`] once `max_attempts` fetches have been
/// made without reaching a terminal state. An asset that is already active is
/// returned without sleeping.
pub async fn await_ready(
    service: &dyn RemoteAssetService,
    asset: RemoteAsset,
    policy: &PollPolicy,
) -> CoachResult<PollOutcome> {
    let started = Instant::now();
    let mut polls = 0u32;
    let mut current = asset;

    loop {
        current = match current.into_ready() {
            Ok(ready) => {
                debug!(asset = %ready.name(), polls, "Asset ready");
                return Ok(PollOutcome { asset: ready, polls });
            }
            Err(pending) => pending,
        };

        if current.state == AssetState::Failed {
            return Err(CoachError::ProcessingFailed {
                reason: current
                    .error
                    .unwrap_or_else(|| "remote processing failed".to_string()),
                asset: current.name,
            });
        }

        if polls >= policy.max_attempts {
            return Err(CoachError::Timeout {
                asset: current.name,
                attempts: polls,
                waited: started.elapsed(),
            });
        }

        tokio::time::sleep(policy.interval).await;
        current = service.get_state(&current.name).await?;
        polls += 1;

        debug!(asset = %current.name, state = %current.state, polls, "Polled asset state");
    }
}
