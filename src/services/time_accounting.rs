use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MINUTES_PER_HOUR: i64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("End time must not be before start time")]
    EndBeforeStart,
    #[error("Break time must not be negative")]
    NegativeBreak,
    #[error("Break time exceeds the elapsed time")]
    BreakExceedsElapsed,
}

fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn raw_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let millis = (end - start).num_milliseconds();
    Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
}

/// Hours between `start` and `end`, two decimals. A start in the future
/// yields zero so live readouts never go negative.
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    if end <= start {
        return Decimal::ZERO;
    }
    round_hours(raw_hours(start, end))
}

/// `(end - start) - break`, in hours rounded to two decimals.
pub fn total_hours(start: DateTime<Utc>, end: DateTime<Utc>, break_minutes: i32) -> Result<Decimal, TimeError> {
    if end < start {
        return Err(TimeError::EndBeforeStart);
    }
    if break_minutes < 0 {
        return Err(TimeError::NegativeBreak);
    }
    let elapsed = raw_hours(start, end);
    let break_hours = Decimal::from(break_minutes) / Decimal::from(MINUTES_PER_HOUR);
    if break_hours > elapsed {
        return Err(TimeError::BreakExceedsElapsed);
    }
    Ok(round_hours(elapsed - break_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
    }

    #[test]
    fn ninety_minutes_minus_fifteen_break() {
        let end = t0() + Duration::minutes(90);
        assert_eq!(total_hours(t0(), end, 15).unwrap(), Decimal::new(125, 2));
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 20 minutes = 0.3333...
        let end = t0() + Duration::minutes(20);
        assert_eq!(total_hours(t0(), end, 0).unwrap(), Decimal::new(33, 2));
        // 50 minutes = 0.8333...
        let end = t0() + Duration::minutes(50);
        assert_eq!(total_hours(t0(), end, 0).unwrap(), Decimal::new(83, 2));
        // 3 seconds short of 1h = 0.99916...
        let end = t0() + Duration::seconds(3597);
        assert_eq!(total_hours(t0(), end, 0).unwrap(), Decimal::new(100, 2));
    }

    #[test]
    fn rejects_inverted_ranges_and_bad_breaks() {
        let end = t0() + Duration::minutes(30);
        assert_eq!(total_hours(end, t0(), 0), Err(TimeError::EndBeforeStart));
        assert_eq!(total_hours(t0(), end, -1), Err(TimeError::NegativeBreak));
        assert_eq!(total_hours(t0(), end, 31), Err(TimeError::BreakExceedsElapsed));
        assert_eq!(total_hours(t0(), end, 30).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn elapsed_clamps_at_zero() {
        assert_eq!(elapsed_hours(t0(), t0() - Duration::minutes(5)), Decimal::ZERO);
        assert_eq!(elapsed_hours(t0(), t0() + Duration::minutes(45)), Decimal::new(75, 2));
    }
}
