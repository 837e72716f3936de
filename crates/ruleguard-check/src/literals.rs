//! Resolution of duration and timestamp literals to comparable magnitudes.

use ruleguard_ir::{DurationValue, TimestampValue};

const MAX_DURATION_SECONDS: i64 = 315_576_000_000;
const MAX_NANOS: i32 = 999_999_999;
/// 0001-01-01T00:00:00Z
const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

/// Resolve a duration to signed nanoseconds, or describe why it is malformed.
pub fn resolve_duration(d: DurationValue) -> Result<i128, String> {
    if !(-MAX_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&d.seconds) {
        return Err(format!("duration seconds out of range: {}", d.seconds));
    }
    if !(-MAX_NANOS..=MAX_NANOS).contains(&d.nanos) {
        return Err(format!("duration nanos out of range: {}", d.nanos));
    }
    if (d.seconds < 0 && d.nanos > 0) || (d.seconds > 0 && d.nanos < 0) {
        return Err(format!(
            "duration seconds and nanos have different signs: {}s {}ns",
            d.seconds, d.nanos
        ));
    }
    Ok(d.total_nanos())
}

/// Resolve a timestamp to nanoseconds since the epoch.
pub fn resolve_timestamp(ts: TimestampValue) -> Result<i128, String> {
    if !(MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&ts.seconds) {
        return Err(format!("timestamp seconds out of range: {}", ts.seconds));
    }
    if !(0..=MAX_NANOS).contains(&ts.nanos) {
        return Err(format!("timestamp nanos out of range: {}", ts.nanos));
    }
    Ok(ts.total_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(resolve_duration(DurationValue::new(2, 5)), Ok(2_000_000_005));
        assert_eq!(resolve_duration(DurationValue::new(-2, -5)), Ok(-2_000_000_005));
        assert_eq!(resolve_duration(DurationValue::new(0, -5)), Ok(-5));
        assert!(resolve_duration(DurationValue::new(-1, 5)).is_err());
        assert!(resolve_duration(DurationValue::new(0, 1_000_000_000)).is_err());
        assert!(resolve_duration(DurationValue::new(MAX_DURATION_SECONDS + 1, 0)).is_err());
    }

    #[test]
    fn timestamps() {
        assert_eq!(resolve_timestamp(TimestampValue::new(10, 1)), Ok(10_000_000_001));
        assert!(resolve_timestamp(TimestampValue::new(10, -1)).is_err());
        assert!(resolve_timestamp(TimestampValue::new(MIN_TIMESTAMP_SECONDS - 1, 0)).is_err());
    }
}
