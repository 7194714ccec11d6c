//! Event source implementations.
//!
//! Each source decides what one "event" means for token accrual.
//!
//! # Available Sources
//!
//! - **[`ClockEventSource`]** - one event per elapsed wall-clock second
//! - **[`CountEventSource`]** - one event per occurrence the caller records
//!
//! # Source Comparison
//!
//! | Source | Progress | `record_occurrence` | `reset` |
//! |--------|----------|---------------------|---------|
//! | Clock | Automatic | No-op | Baseline = now |
//! | Count | Manual | Increments counters | Zeroes since-reset counter |

pub mod clock_event_source;
pub use clock_event_source::ClockEventSource;

pub mod count_event_source;
pub use count_event_source::CountEventSource;
