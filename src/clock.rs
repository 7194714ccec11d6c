//! Wall-clock access for the clock-driven event source.
//!
//! The accounting engine never reads the time itself. [`ClockEventSource`]
//! asks a [`Clock`] for "now", so tests and replays can substitute a
//! [`ManualClock`] for the real [`SystemClock`].
//!
//! [`ClockEventSource`]: crate::sources::ClockEventSource

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of the current wall-clock time.
pub trait Clock {
    /// Returns the current point in time.
    fn now(&self) -> SystemTime;
}

/// Reads [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline(always)]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// Stored as nanoseconds since the Unix epoch; points before the epoch are
/// clamped to the epoch. Wrap it in an [`Arc`] to keep a handle while a
/// bucket owns the other one.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use token_bucket_gate::{Clock, ManualClock};
///
/// let clock = Arc::new(ManualClock::at_epoch());
/// let handle = Arc::clone(&clock);
/// handle.advance(Duration::from_secs(2));
/// assert_eq!(clock.now(), std::time::UNIX_EPOCH + Duration::from_secs(2));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos_since_epoch: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        ManualClock {
            nanos_since_epoch: AtomicU64::new(to_nanos(start)),
        }
    }

    /// Creates a clock frozen at the Unix epoch.
    pub fn at_epoch() -> Self {
        Self::default()
    }

    /// Creates a clock frozen at the current system time.
    pub fn starting_now() -> Self {
        Self::new(SystemTime::now())
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let step = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let mut current = self.nanos_since_epoch.load(Ordering::Relaxed);
        loop {
            match self.nanos_since_epoch.compare_exchange_weak(
                current,
                current.saturating_add(step),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Moves the clock forward by a fractional number of seconds.
    pub fn advance_secs_f64(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs.max(0.0)));
    }

    /// Jumps the clock to `to`, which may be in the past.
    pub fn set(&self, to: SystemTime) {
        self.nanos_since_epoch.store(to_nanos(to), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.nanos_since_epoch.load(Ordering::Relaxed))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline(always)]
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

fn to_nanos(time: SystemTime) -> u64 {
    let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::at_epoch();
        assert_eq!(clock.now(), UNIX_EPOCH);
        assert_eq!(clock.now(), UNIX_EPOCH);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_millis(1500));
    }

    #[test]
    fn test_manual_clock_can_be_set_backwards() {
        let start = UNIX_EPOCH + Duration::from_secs(100);
        let clock = ManualClock::new(start);
        clock.set(UNIX_EPOCH + Duration::from_secs(40));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_secs(40));
    }

    #[test]
    fn test_pre_epoch_start_is_clamped() {
        let clock = ManualClock::new(UNIX_EPOCH - Duration::from_secs(5));
        assert_eq!(clock.now(), UNIX_EPOCH);
    }

    #[test]
    fn test_advance_saturates_at_the_end_of_time() {
        let clock = ManualClock::at_epoch();
        clock.advance(Duration::from_nanos(u64::MAX - 10));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn test_shared_clock_sees_advances() {
        let clock = Arc::new(ManualClock::at_epoch());
        let handle = Arc::clone(&clock);
        handle.advance_secs_f64(0.25);
        assert_eq!(clock.now(), UNIX_EPOCH + Duration::from_millis(250));
    }
}
