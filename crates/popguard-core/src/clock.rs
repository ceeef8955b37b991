//! Time source for the engine.
//!
//! The engine never reads the wall clock directly. Every timestamp it
//! compares comes from the [`Clock`] it was constructed with, which keeps
//! grant-period arithmetic deterministic under test.

use std::fmt;

/// Milliseconds since the Unix epoch.
pub type Millis = u64;

/// A source of "now" in milliseconds.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> Millis;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // Pre-epoch clocks clamp to zero, which only ever shrinks trust.
        u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

impl fmt::Display for SystemClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system")
    }
}

/// Elapsed time since `since`, or `None` when the clock reads earlier.
#[must_use]
pub fn elapsed_since(now: Millis, since: Millis) -> Option<Millis> {
    now.checked_sub(since)
}
