//! Core trait for the progress signal that refills a bucket.
//!
//! A [`TokenBucket`](crate::TokenBucket) does not know whether its tokens
//! accrue with real seconds or with occurrences the caller records. It only
//! asks its event source how many events have elapsed since the last reset.

/// The capability set a [`TokenBucket`](crate::TokenBucket) needs from its
/// notion of "time passing".
///
/// Implementors count abstract events since a baseline. The bucket reads the
/// count on every recomputation and resets the baseline once it has banked
/// whole tokens from it.
pub trait EventSource {
    /// Returns the number of events that elapsed since the last [`reset`](Self::reset).
    ///
    /// Fractional values are allowed (e.g. seconds). Never negative.
    fn elapsed_events(&self) -> f64;

    /// Moves the baseline to "now" so that [`elapsed_events`](Self::elapsed_events)
    /// starts again from zero.
    fn reset(&mut self);

    /// Records a single occurrence.
    ///
    /// Sources where progress happens on its own, such as the clock-driven
    /// one, treat this as a no-op.
    fn record_occurrence(&mut self);
}

impl<E: EventSource + ?Sized> EventSource for Box<E> {
    #[inline(always)]
    fn elapsed_events(&self) -> f64 {
        (**self).elapsed_events()
    }

    #[inline(always)]
    fn reset(&mut self) {
        (**self).reset()
    }

    #[inline(always)]
    fn record_occurrence(&mut self) {
        (**self).record_occurrence()
    }
}
