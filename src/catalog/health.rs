//! Upstream health tracker.
//!
//! A cooldown breaker shared by all in-flight requests. After an upstream
//! failure the provider is skipped until the cooldown expires; any success
//! (including a fallback-served listing, which proves the serving chain is
//! healthy) clears the streak early. The tracker is an optimization, not a
//! correctness gate, so last-writer-wins under concurrent updates is fine.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

#[derive(Debug, Default)]
struct HealthState {
    failure_streak: u32,
    disabled_until: Option<Instant>,
}

/// Process-wide upstream availability state.
///
/// All operations take an explicit `now` so the cooldown window is
/// testable without sleeping.
#[derive(Debug, Default)]
pub struct UpstreamHealth {
    state: Mutex<HealthState>,
    cooldown: Duration,
}

impl UpstreamHealth {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(HealthState::default()),
            cooldown,
        }
    }

    /// Whether the upstream may be attempted at `now`
    pub fn is_eligible(&self, now: Instant) -> bool {
        let state = self.state.lock().unwrap();
        match state.disabled_until {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    /// Record an upstream failure and arm the cooldown.
    ///
    /// The breaker disables the upstream on every failure (threshold 1),
    /// matching the observed policy; the streak is kept for reporting.
    pub fn record_failure(&self, now: Instant) {
        let mut state = self.state.lock().unwrap();
        state.failure_streak += 1;
        state.disabled_until = Some(now + self.cooldown);
        warn!(
            failure_streak = state.failure_streak,
            cooldown_ms = self.cooldown.as_millis() as u64,
            "Upstream failure recorded, provider disabled for cooldown"
        );
    }

    /// Clear the streak and the cooldown window
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap();
        if state.failure_streak > 0 {
            debug!(
                cleared_streak = state.failure_streak,
                "Upstream breaker reset"
            );
        }
        state.failure_streak = 0;
        state.disabled_until = None;
    }

    /// Clear only the failure streak, leaving any armed cooldown in place.
    /// Called when a fallback tier (store or seed) serves successfully: a
    /// recovery signal for reporting, but not grounds to retry the
    /// upstream early.
    pub fn record_recovery(&self) {
        let mut state = self.state.lock().unwrap();
        state.failure_streak = 0;
    }

    /// Current consecutive-failure count (reporting only)
    pub fn failure_streak(&self) -> u32 {
        self.state.lock().unwrap().failure_streak
    }

    /// Breaker state label for health reporting
    pub fn state_label(&self, now: Instant) -> &'static str {
        if self.is_eligible(now) { "closed" } else { "open" }
    }
}
