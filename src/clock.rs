//! Monotonic clock the adjudicator evaluates deadlines against.
//!
//! The adjudicator only ever reads the clock. Advancing it is an explicit
//! operator action on the concrete clock type.

use core::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Read-only view of a monotonically non-decreasing tick counter (block
/// height, ledger sequence, ...).
pub trait Clock {
    fn now(&self) -> u64;
}

/// Clock that only moves when told to. Starts at 0.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at `ticks` instead of 0.
    pub fn starting_at(ticks: u64) -> Self {
        Self {
            ticks: AtomicU64::new(ticks),
        }
    }

    /// Advances by one tick and returns the new value.
    pub fn advance(&self) -> u64 {
        self.advance_by(1)
    }

    /// Advances by `ticks` and returns the new value. Saturates at `u64::MAX`.
    pub fn advance_by(&self, ticks: u64) -> u64 {
        let prev = self
            .ticks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(ticks))
            })
            .unwrap_or_else(|t| t);
        let now = prev.saturating_add(ticks);
        debug!(now, "clock advanced");
        now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(ManualClock::new().now(), 0);
    }

    #[test]
    fn advance_returns_new_value() {
        let clock = ManualClock::new();
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance_by(143), 144);
        assert_eq!(clock.now(), 144);
    }

    #[test]
    fn advance_saturates() {
        let clock = ManualClock::starting_at(u64::MAX - 1);
        assert_eq!(clock.advance_by(10), u64::MAX);
        assert_eq!(clock.now(), u64::MAX);
    }
}
