use token_bucket_gate::sources::CountEventSource;
use token_bucket_gate::{ConsumeError, EventSource, TokenBucket, TokenBucketConfig, Uint};

fn new_count_bucket(capacity: Uint, initial_tokens: Uint, fill_rate: f64) -> TokenBucket<CountEventSource> {
    TokenBucket::count_driven(TokenBucketConfig::new(capacity, initial_tokens, fill_rate, "Test meter"))
        .expect("valid config")
}

#[test]
fn test_high_initial_tokens_drain_then_refill() {
    let mut bucket = new_count_bucket(1, 3, 0.1);

    // Over-capacity seed is spent first
    assert!(bucket.consume());
    assert!(bucket.consume());
    assert!(bucket.consume());
    assert!(!bucket.consume());

    // 9 events * 0.1 = 0.9 tokens, still nothing whole
    bucket.record_events(9);
    assert!(!bucket.consume());

    bucket.record_occurrence();
    assert!(bucket.consume());
    assert!(!bucket.consume());
}

#[test]
fn test_no_initial_tokens() {
    let mut bucket = new_count_bucket(1, 0, 0.5);

    assert!(!bucket.consume());
    bucket.record_occurrence();
    assert!(!bucket.consume());
    bucket.record_occurrence();
    assert!(bucket.consume());
    assert!(!bucket.consume());

    assert_eq!(bucket.total_event_count(), 2);
}

#[test]
fn test_accrue_multiple_tokens() {
    let mut bucket = new_count_bucket(2, 0, 0.5);

    assert!(!bucket.consume());
    bucket.record_occurrence();
    bucket.record_occurrence();
    bucket.record_occurrence();
    bucket.record_occurrence();
    assert!(bucket.consume());
    assert!(bucket.consume());
    assert!(!bucket.consume());

    assert_eq!(bucket.total_event_count(), 4);
}

#[test]
fn test_record_multiple_events() {
    let mut bucket = new_count_bucket(2, 0, 0.5);

    assert!(!bucket.consume());
    bucket.record_events(2);
    assert!(bucket.consume());
}

#[test]
fn test_refill_is_capped_at_capacity() {
    let mut bucket = new_count_bucket(3, 0, 1.0);

    bucket.record_events(10);
    assert!(bucket.can_consume(3));
    assert_eq!(bucket.tokens_accrued(), 3);

    assert!(bucket.consume_tokens(3));
    assert!(!bucket.consume());
}

#[test]
fn test_successful_consume_drains_exactly_requested_tokens() {
    let mut bucket = new_count_bucket(10, 10, 1.0);

    assert!(bucket.consume_tokens(4));
    assert_eq!(bucket.tokens_accrued(), 6);

    assert!(bucket.consume_tokens(6));
    assert_eq!(bucket.tokens_accrued(), 0);
}

#[test]
fn test_starved_consume_leaves_tokens_untouched() {
    let mut bucket = new_count_bucket(10, 3, 1.0);

    assert!(!bucket.consume_tokens(5));
    assert_eq!(bucket.tokens_accrued(), 3);

    assert_eq!(
        bucket.try_consume(4),
        Err(ConsumeError::InsufficientTokens {
            acquiring: 4,
            available: 3,
        })
    );
    assert_eq!(bucket.tokens_accrued(), 3);
}

#[test]
fn test_can_consume_is_stable_without_new_events() {
    let mut bucket = new_count_bucket(4, 0, 0.5);
    bucket.record_occurrence();

    let first = bucket.can_consume_one();
    for _ in 0..10 {
        assert_eq!(bucket.can_consume_one(), first);
    }
    assert!(!first);

    bucket.record_occurrence();
    let first = bucket.can_consume(1);
    for _ in 0..10 {
        assert_eq!(bucket.can_consume(1), first);
    }
    assert!(first);
    assert_eq!(bucket.tokens_accrued(), 1);
}

#[test]
fn test_can_consume_never_deducts() {
    let mut bucket = new_count_bucket(2, 2, 1.0);

    assert!(bucket.can_consume(2));
    assert!(bucket.can_consume(2));
    assert_eq!(bucket.tokens_accrued(), 2);
}

#[test]
fn test_fractional_progress_towards_first_token_is_kept() {
    let mut bucket = new_count_bucket(5, 0, 0.25);

    for _ in 0..3 {
        bucket.record_occurrence();
        assert!(!bucket.can_consume_one());
    }
    assert_eq!(bucket.event_source().events_since_reset(), 3);

    bucket.record_occurrence();
    assert!(bucket.can_consume_one());
    assert_eq!(bucket.event_source().events_since_reset(), 0);
}

#[test]
fn test_fractional_remainder_is_dropped_once_tokens_are_banked() {
    let mut bucket = new_count_bucket(5, 0, 0.5);

    // 3 events = 1.5 tokens, banks 1 and drops the half
    bucket.record_events(3);
    assert!(bucket.can_consume(1));
    assert_eq!(bucket.tokens_accrued(), 1);

    // 1 more event = 0.5 tokens; 1.5 floors to 1
    bucket.record_occurrence();
    assert!(!bucket.can_consume(2));
    assert_eq!(bucket.tokens_accrued(), 1);
}

#[test]
fn test_request_beyond_capacity_is_always_denied() {
    let mut bucket = new_count_bucket(2, 5, 1.0);

    assert_eq!(
        bucket.try_consume(3),
        Err(ConsumeError::BeyondCapacity {
            acquiring: 3,
            capacity: 2,
        })
    );
    assert!(!bucket.can_consume(3));
    assert_eq!(bucket.tokens_accrued(), 5);
}

#[test]
fn test_zero_token_request_always_succeeds() {
    let mut bucket = new_count_bucket(2, 0, 1.0);

    assert!(bucket.consume_tokens(0));
    assert!(bucket.can_consume(0));
    assert_eq!(bucket.tokens_accrued(), 0);
}

#[test]
fn test_reset_event_baseline_discards_pending_events() {
    let mut bucket = new_count_bucket(2, 0, 0.5);

    bucket.record_occurrence();
    bucket.reset_event_baseline();
    bucket.record_occurrence();
    assert!(!bucket.consume());

    assert_eq!(bucket.total_event_count(), 2);
}

#[test]
fn test_tokens_never_exceed_capacity_after_refill() {
    let mut bucket = new_count_bucket(4, 0, 0.7);

    for round in 0..50 {
        bucket.record_events(round % 4);
        let _ = bucket.consume_tokens((round % 3) as Uint);
        assert!(bucket.tokens_accrued() <= bucket.capacity());
    }
}

#[test]
fn test_capacity_remaining_reports_last_computed_ratio() {
    let mut bucket = new_count_bucket(4, 2, 1.0);
    assert_eq!(bucket.capacity_remaining(), 0.5);

    // Not recomputed until the next query
    bucket.record_events(2);
    assert_eq!(bucket.capacity_remaining(), 0.5);

    assert!(bucket.can_consume_one());
    assert_eq!(bucket.capacity_remaining(), 1.0);
}

#[test]
fn test_count_source_reset_keeps_lifetime_total() {
    let mut source = CountEventSource::new();
    source.record_occurrence();
    source.record_occurrence();
    source.record_occurrence();
    source.reset();

    assert_eq!(source.elapsed_events(), 0.0);
    assert_eq!(source.events_since_reset(), 0);
    assert_eq!(source.total_event_count(), 3);
}

#[test]
fn test_custom_default_consumption_rate() {
    let config = TokenBucketConfig::new(4, 4, 1.0, "pairs").with_default_consumption_rate(2);
    let mut bucket = TokenBucket::count_driven(config).unwrap();

    assert!(bucket.consume());
    assert!(bucket.consume());
    assert!(!bucket.consume());
    assert_eq!(bucket.tokens_accrued(), 0);
}
