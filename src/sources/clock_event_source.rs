use std::time::SystemTime;

use crate::clock::{Clock, SystemClock};
use crate::event_source::EventSource;

/// Event source where every elapsed wall-clock second is one event.
///
/// Time is the implicit occurrence stream, so
/// [`record_occurrence`](EventSource::record_occurrence) does nothing.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::{Duration, UNIX_EPOCH};
/// use token_bucket_gate::{EventSource, ManualClock};
/// use token_bucket_gate::sources::ClockEventSource;
///
/// let clock = Arc::new(ManualClock::at_epoch());
/// let mut source = ClockEventSource::with_clock(Arc::clone(&clock));
///
/// clock.advance(Duration::from_millis(1500));
/// assert_eq!(source.elapsed_events(), 1.5);
///
/// source.reset();
/// assert_eq!(source.elapsed_events(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClockEventSource<C = SystemClock> {
    clock: C,
    /// Last moment the bucket banked whole tokens.
    last_reset: SystemTime,
}

impl ClockEventSource<SystemClock> {
    /// Creates a source reading the system clock, with its baseline at now.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a source reading the system clock, with an explicit baseline.
    pub fn since(last_reset: SystemTime) -> Self {
        Self::with_clock_since(SystemClock, last_reset)
    }
}

impl Default for ClockEventSource<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ClockEventSource<C> {
    /// Creates a source reading `clock`, with its baseline at the clock's now.
    pub fn with_clock(clock: C) -> Self {
        let last_reset = clock.now();
        ClockEventSource { clock, last_reset }
    }

    /// Creates a source reading `clock`, with an explicit baseline.
    pub fn with_clock_since(clock: C, last_reset: SystemTime) -> Self {
        ClockEventSource { clock, last_reset }
    }

    /// Builder-style baseline override.
    pub fn with_last_reset(mut self, last_reset: SystemTime) -> Self {
        self.last_reset = last_reset;
        self
    }

    /// Returns the current baseline.
    pub fn last_reset(&self) -> SystemTime {
        self.last_reset
    }

    /// Overrides the baseline, for tests and replays.
    pub fn set_last_reset(&mut self, last_reset: SystemTime) {
        self.last_reset = last_reset;
    }

    /// Returns the clock this source reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> EventSource for ClockEventSource<C> {
    /// Seconds between the clock's now and the baseline. A baseline in the
    /// future counts as zero elapsed seconds.
    #[inline]
    fn elapsed_events(&self) -> f64 {
        self.clock
            .now()
            .duration_since(self.last_reset)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0)
    }

    #[inline]
    fn reset(&mut self) {
        self.last_reset = self.clock.now();
    }

    #[inline(always)]
    fn record_occurrence(&mut self) {}
}
