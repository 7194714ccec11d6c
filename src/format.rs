//! Human-readable rendering of wait times.

/// Renders a number of seconds as e.g. `"30 seconds"` or `"1 hour 2 minutes"`.
///
/// The value is rounded to the nearest whole second; negative and non-finite
/// inputs render as `"0 seconds"`. Zero components are left out.
///
/// # Example
///
/// ```rust
/// use token_bucket_gate::format::humanize_seconds;
///
/// assert_eq!(humanize_seconds(29.8), "30 seconds");
/// assert_eq!(humanize_seconds(1.0), "1 second");
/// assert_eq!(humanize_seconds(125.0), "2 minutes 5 seconds");
/// ```
pub fn humanize_seconds(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    if total == 0 {
        return "0 seconds".to_string();
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::with_capacity(3);
    for (amount, unit) in [(hours, "hour"), (minutes, "minute"), (secs, "second")] {
        match amount {
            0 => {}
            1 => parts.push(format!("1 {}", unit)),
            n => parts.push(format!("{} {}s", n, unit)),
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::humanize_seconds;

    #[test]
    fn test_zero_and_garbage_render_as_zero_seconds() {
        assert_eq!(humanize_seconds(0.0), "0 seconds");
        assert_eq!(humanize_seconds(0.4), "0 seconds");
        assert_eq!(humanize_seconds(-3.0), "0 seconds");
        assert_eq!(humanize_seconds(f64::NAN), "0 seconds");
        assert_eq!(humanize_seconds(f64::INFINITY), "0 seconds");
    }

    #[test]
    fn test_singular_units() {
        assert_eq!(humanize_seconds(1.0), "1 second");
        assert_eq!(humanize_seconds(60.0), "1 minute");
        assert_eq!(humanize_seconds(3661.0), "1 hour 1 minute 1 second");
    }

    #[test]
    fn test_skips_zero_components() {
        assert_eq!(humanize_seconds(7200.0), "2 hours");
        assert_eq!(humanize_seconds(7205.0), "2 hours 5 seconds");
        assert_eq!(humanize_seconds(29.6), "30 seconds");
    }
}
