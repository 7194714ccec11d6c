use std::fmt;
use std::time::SystemTime;

use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, ConfigResult, ConsumeError, ConsumeResult};
use crate::event_source::EventSource;
use crate::format::humanize_seconds;
use crate::observer::{BucketObserver, BucketSnapshot};
use crate::sources::{ClockEventSource, CountEventSource};
use crate::types::Uint;

/// Capacity used by [`TokenBucketConfig::default`].
pub const DEFAULT_CAPACITY: Uint = 30;
/// Fill rate used by [`TokenBucketConfig::default`].
pub const DEFAULT_FILL_RATE: f64 = 2.0;
/// Tokens requested by a bare [`TokenBucket::consume`] unless configured otherwise.
pub const DEFAULT_CONSUMPTION_RATE: Uint = 1;
/// Suggested upper bound for a single burst against a default-sized bucket.
pub const MAX_BURST_CONSUMPTION_RATE: Uint = DEFAULT_CAPACITY / 2;

/// Token bucket accounting engine.
///
/// The bucket holds up to `capacity` tokens and accrues `fill_rate` tokens per
/// event reported by its [`EventSource`]. Tokens are never refilled in the
/// background: every [`consume`](Self::consume) or
/// [`can_consume`](Self::can_consume) first recomputes the banked tokens from
/// the events elapsed since the last baseline, then answers.
///
/// # Algorithm Behavior
///
/// - A full bucket skips the recomputation and leaves the event source alone
/// - Otherwise `tokens = min(capacity, floor(tokens + fill_rate * elapsed))`
/// - Once at least one whole token is banked, the source baseline is reset and
///   the fractional remainder is dropped
/// - Fractional progress towards the first token is kept across calls
/// - A successful deduction resets the source baseline as well
/// - The initial seed may exceed `capacity`; such a bucket only drains until
///   it drops below capacity again
///
/// # Concurrency
///
/// There is no internal locking. Every mutating call takes `&mut self`; wrap
/// the bucket in a `Mutex` when several threads share it.
///
/// # Example
///
/// ```rust
/// use token_bucket_gate::{TokenBucket, TokenBucketConfig};
///
/// // Capacity 2, empty, one token per two recorded events
/// let config = TokenBucketConfig::new(2, 0, 0.5, "remote api");
/// let mut bucket = TokenBucket::count_driven(config).unwrap();
///
/// assert!(!bucket.consume());
/// bucket.record_events(4);
/// assert!(bucket.consume());
/// assert!(bucket.consume());
/// assert!(!bucket.consume());
/// ```
pub struct TokenBucket<E> {
    name: String,
    /// Maximum number of tokens a refill can reach
    capacity: Uint,
    /// Tokens accrued per elapsed event
    fill_rate: f64,
    /// Tokens currently banked
    tokens_accrued: Uint,
    default_consumption_rate: Uint,
    source: E,
    observer: Option<Box<dyn BucketObserver + Send>>,
}

impl<E: EventSource> TokenBucket<E> {
    /// Creates a bucket from `config`, accruing tokens from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity or default consumption rate is
    /// zero, or the fill rate is not a finite positive number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use token_bucket_gate::{TokenBucket, TokenBucketConfig, ConfigError};
    /// use token_bucket_gate::sources::CountEventSource;
    ///
    /// let config = TokenBucketConfig::new(0, 0, 1.0, "broken");
    /// let result = TokenBucket::new(config, CountEventSource::new());
    /// assert_eq!(result.err(), Some(ConfigError::ZeroCapacity));
    /// ```
    pub fn new(config: TokenBucketConfig, source: E) -> ConfigResult<Self> {
        config.validate()?;

        Ok(TokenBucket {
            name: config.name,
            capacity: config.capacity,
            fill_rate: config.fill_rate,
            tokens_accrued: config.initial_tokens,
            default_consumption_rate: config.default_consumption_rate,
            source,
            observer: None,
        })
    }

    /// Attaches an observer that is told about every state transition.
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: BucketObserver + Send + 'static,
    {
        self.set_observer(observer);
        self
    }

    /// Replaces the current observer.
    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: BucketObserver + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Detaches the current observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Attempts to consume the default consumption rate worth of tokens.
    ///
    /// See [`consume_tokens`](Self::consume_tokens).
    #[inline]
    pub fn consume(&mut self) -> bool {
        self.consume_tokens(self.default_consumption_rate)
    }

    /// Attempts to check-and-deduct `tokens` from the bucket.
    ///
    /// # Returns
    /// * `true` - the recomputed token count covered the request and exactly
    ///   `tokens` were deducted
    /// * `false` - the request was denied; the token count is only affected by
    ///   the recomputation
    #[inline]
    pub fn consume_tokens(&mut self, tokens: Uint) -> bool {
        self.try_consume(tokens).is_ok()
    }

    /// Attempts to consume `tokens`, returning why the request was denied.
    ///
    /// A zero-token request always succeeds without touching any state. A
    /// request for more than `capacity` tokens can never be satisfied by a
    /// refill and is denied up front, without a recomputation.
    ///
    /// # Returns
    /// * `Ok(())` - the tokens were deducted and the event baseline reset
    /// * `Err(ConsumeError::BeyondCapacity)` - the request exceeds capacity
    /// * `Err(ConsumeError::InsufficientTokens)` - not enough tokens have accrued
    ///
    /// # Example
    ///
    /// ```rust
    /// use token_bucket_gate::{ConsumeError, TokenBucket, TokenBucketConfig};
    ///
    /// let mut bucket = TokenBucket::count_driven(TokenBucketConfig::new(5, 2, 1.0, "db")).unwrap();
    ///
    /// assert_eq!(
    ///     bucket.try_consume(3),
    ///     Err(ConsumeError::InsufficientTokens { acquiring: 3, available: 2 })
    /// );
    /// assert_eq!(
    ///     bucket.try_consume(6),
    ///     Err(ConsumeError::BeyondCapacity { acquiring: 6, capacity: 5 })
    /// );
    /// assert_eq!(bucket.try_consume(2), Ok(()));
    /// ```
    pub fn try_consume(&mut self, tokens: Uint) -> ConsumeResult {
        if tokens == 0 {
            return Ok(());
        }

        if tokens > self.capacity {
            self.notify(|observer, snapshot| observer.on_reject(snapshot, tokens));
            return Err(ConsumeError::BeyondCapacity {
                acquiring: tokens,
                capacity: self.capacity,
            });
        }

        let available = self.recalculate_tokens();
        if tokens > available {
            self.notify(|observer, snapshot| observer.on_reject(snapshot, tokens));
            return Err(ConsumeError::InsufficientTokens {
                acquiring: tokens,
                available,
            });
        }

        self.tokens_accrued -= tokens;
        self.source.reset();
        self.notify(|observer, snapshot| observer.on_consume(snapshot, tokens));
        Ok(())
    }

    /// Reports whether `tokens` could be consumed right now, without deducting.
    ///
    /// Performs the same recomputation as [`consume_tokens`](Self::consume_tokens),
    /// so it may bank accrued tokens and reset the event baseline.
    pub fn can_consume(&mut self, tokens: Uint) -> bool {
        if tokens == 0 {
            return true;
        }
        if tokens > self.capacity {
            return false;
        }
        tokens <= self.recalculate_tokens()
    }

    /// Shorthand for `can_consume(1)`.
    #[inline]
    pub fn can_consume_one(&mut self) -> bool {
        self.can_consume(1)
    }

    /// Ratio of banked tokens to capacity, as of the last recomputation.
    ///
    /// Exceeds `1.0` only while an over-capacity initial seed is draining.
    #[inline]
    pub fn capacity_remaining(&self) -> f32 {
        self.tokens_accrued as f32 / self.capacity as f32
    }

    /// Tokens banked as of the last recomputation.
    #[inline(always)]
    pub fn tokens_accrued(&self) -> Uint {
        self.tokens_accrued
    }

    /// Maximum number of tokens a refill can reach.
    #[inline(always)]
    pub fn capacity(&self) -> Uint {
        self.capacity
    }

    /// Reconfigures the capacity; effective from the next recomputation.
    ///
    /// Banked tokens above the new capacity are dropped.
    pub fn set_capacity(&mut self, capacity: Uint) -> ConfigResult<()> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        self.capacity = capacity;
        self.tokens_accrued = self.tokens_accrued.min(capacity);
        Ok(())
    }

    /// Tokens accrued per elapsed event.
    #[inline(always)]
    pub fn fill_rate(&self) -> f64 {
        self.fill_rate
    }

    /// Reconfigures the fill rate; effective from the next recomputation.
    pub fn set_fill_rate(&mut self, fill_rate: f64) -> ConfigResult<()> {
        validate_fill_rate(fill_rate)?;
        self.fill_rate = fill_rate;
        Ok(())
    }

    /// Tokens requested by a bare [`consume`](Self::consume).
    #[inline(always)]
    pub fn default_consumption_rate(&self) -> Uint {
        self.default_consumption_rate
    }

    pub fn set_default_consumption_rate(&mut self, rate: Uint) -> ConfigResult<()> {
        if rate == 0 {
            return Err(ConfigError::ZeroConsumptionRate);
        }
        self.default_consumption_rate = rate;
        Ok(())
    }

    /// Diagnostic label of the bucket.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Records a single occurrence on the event source.
    #[inline]
    pub fn record_occurrence(&mut self) {
        self.source.record_occurrence();
    }

    /// Records `count` occurrences, one at a time.
    pub fn record_events(&mut self, count: Uint) {
        let mut recorded: Uint = 0;
        while recorded < count {
            self.source.record_occurrence();
            recorded += 1;
        }
    }

    /// Resets the event source baseline without touching the banked tokens.
    #[inline]
    pub fn reset_event_baseline(&mut self) {
        self.source.reset();
    }

    pub fn event_source(&self) -> &E {
        &self.source
    }

    pub fn event_source_mut(&mut self) -> &mut E {
        &mut self.source
    }

    /// Current accounting state, for external loggers.
    pub fn snapshot(&self) -> BucketSnapshot<'_> {
        BucketSnapshot {
            name: &self.name,
            tokens: self.tokens_accrued,
            capacity: self.capacity,
            fill_rate: self.fill_rate,
        }
    }

    /// Banks the tokens accrued since the last baseline and returns the total.
    fn recalculate_tokens(&mut self) -> Uint {
        if self.tokens_accrued >= self.capacity {
            return self.tokens_accrued;
        }

        let elapsed_events = self.source.elapsed_events();
        let delta = self.fill_rate * elapsed_events;
        let refilled = (self.tokens_accrued as f64 + delta).floor();

        self.tokens_accrued = if refilled >= self.capacity as f64 {
            self.capacity
        } else {
            refilled as Uint
        };

        // Whole tokens banked: drop the fractional remainder with the old baseline
        if self.tokens_accrued > 0 {
            self.source.reset();
        }

        self.notify(|observer, snapshot| observer.on_recalculate(snapshot, elapsed_events));
        self.tokens_accrued
    }

    fn notify<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn BucketObserver, &BucketSnapshot<'_>),
    {
        if let Some(observer) = self.observer.as_deref_mut() {
            let snapshot = BucketSnapshot {
                name: &self.name,
                tokens: self.tokens_accrued,
                capacity: self.capacity,
                fill_rate: self.fill_rate,
            };
            f(observer, &snapshot);
        }
    }
}

impl TokenBucket<ClockEventSource<SystemClock>> {
    /// Creates a bucket refilled by the system clock, with its baseline at now.
    pub fn clock_driven(config: TokenBucketConfig) -> ConfigResult<Self> {
        Self::new(config, ClockEventSource::new())
    }

    /// Creates a bucket refilled by the system clock, with an explicit baseline.
    ///
    /// A baseline in the past lets tokens accrue for time that already passed.
    pub fn clock_driven_since(config: TokenBucketConfig, last_reset: SystemTime) -> ConfigResult<Self> {
        Self::new(config, ClockEventSource::since(last_reset))
    }
}

impl<C: Clock> TokenBucket<ClockEventSource<C>> {
    /// Seconds until the fractional accrual since the baseline crosses the
    /// next whole token.
    ///
    /// A pure projection: nothing is recomputed and no state changes. It does
    /// not account for tokens already banked. Exactly on a whole-token
    /// boundary, including right after a reset, the next token is a full
    /// `1 / fill_rate` seconds away.
    pub fn seconds_until_next_token(&self) -> f64 {
        let accrued = self.fill_rate * self.source.elapsed_events();
        (1.0 - accrued.fract()) / self.fill_rate
    }

    /// [`seconds_until_next_token`](Self::seconds_until_next_token) rendered
    /// for humans, e.g. `"30 seconds"`.
    pub fn time_until_next_token(&self) -> String {
        humanize_seconds(self.seconds_until_next_token())
    }

    /// The moment the bucket last banked whole tokens or consumed.
    pub fn last_reset(&self) -> SystemTime {
        self.source.last_reset()
    }

    /// Overrides the event baseline, for tests and replays.
    pub fn override_last_reset(&mut self, last_reset: SystemTime) {
        self.source.set_last_reset(last_reset);
    }
}

impl TokenBucket<CountEventSource> {
    /// Creates a bucket refilled by recorded occurrences.
    pub fn count_driven(config: TokenBucketConfig) -> ConfigResult<Self> {
        Self::new(config, CountEventSource::new())
    }

    /// Occurrences recorded over the bucket's lifetime.
    pub fn total_event_count(&self) -> Uint {
        self.source.total_event_count()
    }
}

impl<E: fmt::Debug> fmt::Debug for TokenBucket<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBucket")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("fill_rate", &self.fill_rate)
            .field("tokens_accrued", &self.tokens_accrued)
            .field("default_consumption_rate", &self.default_consumption_rate)
            .field("source", &self.source)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

/// Configuration structure for creating a [`TokenBucket`].
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBucketConfig {
    /// Diagnostic label.
    pub name: String,
    /// Maximum number of tokens a refill can reach.
    pub capacity: Uint,
    /// Tokens banked at creation. May exceed `capacity`.
    pub initial_tokens: Uint,
    /// Tokens accrued per elapsed event.
    pub fill_rate: f64,
    /// Tokens requested by a bare `consume()`.
    pub default_consumption_rate: Uint,
}

impl TokenBucketConfig {
    /// Creates a new configuration instance.
    pub fn new(capacity: Uint, initial_tokens: Uint, fill_rate: f64, name: impl Into<String>) -> Self {
        TokenBucketConfig {
            name: name.into(),
            capacity,
            initial_tokens,
            fill_rate,
            default_consumption_rate: DEFAULT_CONSUMPTION_RATE,
        }
    }

    /// A full bucket with [`DEFAULT_CAPACITY`] and [`DEFAULT_FILL_RATE`].
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_CAPACITY, DEFAULT_FILL_RATE, name)
    }

    pub fn with_initial_tokens(mut self, initial_tokens: Uint) -> Self {
        self.initial_tokens = initial_tokens;
        self
    }

    pub fn with_default_consumption_rate(mut self, rate: Uint) -> Self {
        self.default_consumption_rate = rate;
        self
    }

    /// Checks the configuration without building a bucket.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        validate_fill_rate(self.fill_rate)?;
        if self.default_consumption_rate == 0 {
            return Err(ConfigError::ZeroConsumptionRate);
        }
        Ok(())
    }
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self::named("token bucket")
    }
}

impl<E: EventSource + Default> TryFrom<TokenBucketConfig> for TokenBucket<E> {
    type Error = ConfigError;

    /// Builds a bucket with a default-constructed event source.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::convert::TryFrom;
    /// use token_bucket_gate::{TokenBucket, TokenBucketConfig};
    /// use token_bucket_gate::sources::CountEventSource;
    ///
    /// let bucket: TokenBucket<CountEventSource> =
    ///     TokenBucket::try_from(TokenBucketConfig::named("search")).unwrap();
    /// assert_eq!(bucket.capacity(), 30);
    /// ```
    fn try_from(config: TokenBucketConfig) -> ConfigResult<Self> {
        TokenBucket::new(config, E::default())
    }
}

fn validate_fill_rate(fill_rate: f64) -> ConfigResult<()> {
    if fill_rate.is_finite() && fill_rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFillRate(fill_rate))
    }
}
