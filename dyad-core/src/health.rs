//! Cross-core health flag and indicator policy.
//!
//! The producer core publishes a one-bit health summary outside the message
//! channel; the consumer core's main loop reads it to pick which indicator
//! channel blinks. An earlier revision shared a plain boolean with no
//! synchronization at all - a single-word write, so never torn, but with
//! formally unordered visibility. The flag is now an atomic with
//! release/acquire pairing. Staleness remains: the consumer only samples
//! once per blink cycle, and nothing bounds the lag tighter than the two
//! loop periods.

use core::sync::atomic::{AtomicBool, Ordering};

/// Duration of one blink phase; a full selection cycle is two phases
pub const BLINK_PHASE_MS: u64 = 500;

/// Producer-written, consumer-read health summary.
///
/// Plain load/store atomics only, so this works on thumbv6-m (no CAS) and
/// is safe to touch from interrupt context.
pub struct HealthFlag(AtomicBool);

impl HealthFlag {
    /// Starts pessimistic: not ok until the first good cycle reports in
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Publish the producer's verdict for this cycle
    pub fn store(&self, ok: bool) {
        self.0.store(ok, Ordering::Release);
    }

    /// Observe the most recently published verdict
    pub fn load(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for HealthFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Which indicator channel is active. Exactly two states exist; the flag is
/// the sole selector and there is no hysteresis - one flip changes the
/// indicator on the very next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Sensors healthy: blink the OK channel
    Ok,
    /// Last cycle had a failed or implausible read: blink the fault channel
    Fault,
}

impl Indicator {
    pub fn for_health(ok: bool) -> Self {
        if ok {
            Indicator::Ok
        } else {
            Indicator::Fault
        }
    }
}
