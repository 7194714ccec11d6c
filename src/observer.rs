//! Hooks for watching a bucket's state transitions.
//!
//! The bucket never prints or logs by itself. Callers that want diagnostics
//! inject a [`BucketObserver`]; with the `tracing` feature enabled,
//! [`TracingObserver`] forwards every transition as a `tracing` event.

use crate::types::Uint;

/// Point-in-time view of a bucket's accounting state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSnapshot<'a> {
    /// Diagnostic label of the bucket.
    pub name: &'a str,
    /// Tokens currently banked.
    pub tokens: Uint,
    /// Maximum tokens the bucket refills up to.
    pub capacity: Uint,
    /// Tokens accrued per elapsed event.
    pub fill_rate: f64,
}

/// Receives bucket state transitions.
///
/// Every method has an empty default, so implementors only override what
/// they care about. Observers run synchronously inside the bucket call.
pub trait BucketObserver {
    /// Called after a recomputation that read the event source.
    ///
    /// Not called when the bucket is already full and skips the read.
    fn on_recalculate(&mut self, snapshot: &BucketSnapshot<'_>, elapsed_events: f64) {
        let _ = (snapshot, elapsed_events);
    }

    /// Called after `tokens` were deducted.
    fn on_consume(&mut self, snapshot: &BucketSnapshot<'_>, tokens: Uint) {
        let _ = (snapshot, tokens);
    }

    /// Called after a request for `tokens` was denied.
    fn on_reject(&mut self, snapshot: &BucketSnapshot<'_>, tokens: Uint) {
        let _ = (snapshot, tokens);
    }
}

/// Emits bucket transitions as `tracing` events.
///
/// Recalculations are logged at `TRACE`, consumes and rejections at `DEBUG`.
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl BucketObserver for TracingObserver {
    fn on_recalculate(&mut self, snapshot: &BucketSnapshot<'_>, elapsed_events: f64) {
        tracing::trace!(
            name = snapshot.name,
            tokens = snapshot.tokens as u64,
            capacity = snapshot.capacity as u64,
            fill_rate = snapshot.fill_rate,
            elapsed_events,
            "token bucket recalculated"
        );
    }

    fn on_consume(&mut self, snapshot: &BucketSnapshot<'_>, tokens: Uint) {
        tracing::debug!(
            name = snapshot.name,
            consumed = tokens as u64,
            tokens = snapshot.tokens as u64,
            capacity = snapshot.capacity as u64,
            "token bucket tokens consumed"
        );
    }

    fn on_reject(&mut self, snapshot: &BucketSnapshot<'_>, tokens: Uint) {
        tracing::debug!(
            name = snapshot.name,
            requested = tokens as u64,
            tokens = snapshot.tokens as u64,
            capacity = snapshot.capacity as u64,
            "token bucket request denied"
        );
    }
}
