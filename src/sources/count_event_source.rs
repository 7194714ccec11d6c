use crate::event_source::EventSource;
use crate::types::Uint;

/// Event source driven by occurrences the caller records by hand.
///
/// Keeps two counters: events since the last reset, which feed token accrual,
/// and a lifetime total that is never reset.
///
/// # Example
///
/// ```rust
/// use token_bucket_gate::EventSource;
/// use token_bucket_gate::sources::CountEventSource;
///
/// let mut source = CountEventSource::new();
/// source.record_occurrence();
/// source.record_occurrence();
/// assert_eq!(source.elapsed_events(), 2.0);
///
/// source.reset();
/// assert_eq!(source.elapsed_events(), 0.0);
/// assert_eq!(source.total_event_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountEventSource {
    events_since_reset: Uint,
    total_event_count: Uint,
}

impl CountEventSource {
    /// Creates a source with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occurrences recorded since the last reset.
    pub fn events_since_reset(&self) -> Uint {
        self.events_since_reset
    }

    /// Number of occurrences recorded over the source's lifetime.
    pub fn total_event_count(&self) -> Uint {
        self.total_event_count
    }
}

impl EventSource for CountEventSource {
    #[inline(always)]
    fn elapsed_events(&self) -> f64 {
        self.events_since_reset as f64
    }

    /// Zeroes the since-reset counter. The lifetime total is untouched.
    #[inline(always)]
    fn reset(&mut self) {
        self.events_since_reset = 0;
    }

    #[inline(always)]
    fn record_occurrence(&mut self) {
        self.events_since_reset = self.events_since_reset.saturating_add(1);
        self.total_event_count = self.total_event_count.saturating_add(1);
    }
}
