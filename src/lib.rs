//! A token bucket rate limiter driven by time or by recorded events.
//!
//! Each [`TokenBucket`] decides, for one named resource, whether a unit of
//! work may proceed right now. It holds its state in memory, needs no central
//! coordinator and performs no I/O: callers use its boolean verdict to decide
//! whether to go ahead with, say, a call to a remote API.
//!
//! # Quick Start
//!
//! ```rust
//! use token_bucket_gate::{TokenBucket, TokenBucketConfig};
//!
//! // Capacity 3, one token banked, refilling 3 tokens per second
//! let config = TokenBucketConfig::new(3, 1, 3.0, "remote api");
//! let mut limiter = TokenBucket::clock_driven(config).unwrap();
//!
//! if limiter.consume() {
//!     println!("Request allowed");
//! } else {
//!     println!("Retry in {}", limiter.time_until_next_token());
//! }
//! ```
//!
//! # Event Sources
//!
//! Tokens accrue per "event". What an event is depends on the bucket's
//! [`EventSource`]:
//!
//! ## [Clock](sources::ClockEventSource)
//! Every elapsed wall-clock second is one event:
//! ```rust
//! # use token_bucket_gate::{TokenBucket, TokenBucketConfig};
//! let limiter = TokenBucket::clock_driven(TokenBucketConfig::named("search")).unwrap();
//! ```
//!
//! ## [Count](sources::CountEventSource)
//! Every occurrence recorded with [`TokenBucket::record_occurrence`] is one event:
//! ```rust
//! # use token_bucket_gate::{TokenBucket, TokenBucketConfig};
//! let mut limiter = TokenBucket::count_driven(TokenBucketConfig::new(1, 0, 0.5, "retries")).unwrap();
//! limiter.record_events(2);
//! assert!(limiter.consume());
//! ```
//!
//! # Core Concepts
//!
//! ## Lazy Accounting
//! Nothing refills in the background. Each [`consume`](TokenBucket::consume)
//! or [`can_consume`](TokenBucket::can_consume) recomputes the banked tokens
//! from the events elapsed since the last baseline, rounding down, and resets
//! the baseline once whole tokens were banked.
//!
//! ## Error Handling
//! The happy path is a boolean verdict. [`TokenBucket::try_consume`] explains
//! denials with a [`ConsumeError`]:
//! - **[`InsufficientTokens`](ConsumeError::InsufficientTokens)** - not enough tokens yet
//! - **[`BeyondCapacity`](ConsumeError::BeyondCapacity)** - the request can never succeed
//!
//! Invalid configuration is rejected at construction with a [`ConfigError`].
//!
//! ## Observing
//! The bucket does not log. Attach a [`BucketObserver`] to watch recalculations,
//! consumes and rejections; the `tracing` feature provides `TracingObserver`.
//!
//! ## Thread Safety
//! Buckets are not synchronized. All mutating calls take `&mut self`, so a
//! bucket shared across threads has to be wrapped in a lock by the caller.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod error;
pub mod event_source;
pub mod format;
pub mod observer;
pub mod sources;
pub mod token_bucket;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, ConfigResult, ConsumeError, ConsumeResult};
pub use event_source::EventSource;
pub use observer::{BucketObserver, BucketSnapshot};
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use token_bucket::{
    TokenBucket, TokenBucketConfig, DEFAULT_CAPACITY, DEFAULT_CONSUMPTION_RATE, DEFAULT_FILL_RATE,
    MAX_BURST_CONSUMPTION_RATE,
};
pub use types::Uint;
