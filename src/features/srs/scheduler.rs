//! SM-2 style scheduling.
//!
//! Maps a recall rating and a card's current memory parameters onto the
//! next ease factor, interval and due instant. Pure: the reference instant
//! is passed in, nothing is read from the clock or the database.
//!
//! Ratings:
//! - 0 (again): forgot; interval resets to one day
//! - 1 (hard): recalled with difficulty
//! - 2 (good): recalled with some effort
//! - 3 (easy): perfect recall

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

/// Lower bound for the ease factor. There is no upper bound.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a card that has never been reviewed
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval of a card that has never been reviewed
pub const DEFAULT_INTERVAL_DAYS: i32 = 0;

const HARD_INTERVAL_FACTOR: f64 = 1.2;
const EASY_INTERVAL_BONUS: f64 = 1.3;
const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("rating must be 0 (again), 1 (hard), 2 (good), or 3 (easy), got {0}")]
    InvalidRating(i64),
    #[error("next review is too far in the future ({0} days)")]
    IntervalOverflow(i64),
}

/// Recall quality reported by the reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Rating {
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Again),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(SchedulerError::InvalidRating(other)),
        }
    }
}

/// Memory parameters after applying one rating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub ease_factor: f64,
    pub interval_days: i32,
    pub due_at: DateTime<Utc>,
}

/// Interval (days) each rating would produce for a card, shown before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalPreview {
    pub again: i32,
    pub hard: i32,
    pub good: i32,
    pub easy: i32,
}

/// Computes the next ease factor, interval and due instant.
///
/// `ease_factor` is expected to be at least [`MIN_EASE_FACTOR`] and
/// `interval_days` non-negative, which every previous call guarantees.
/// Fails only for a rating outside `0..=3` (or an interval that cannot be
/// represented as a calendar date).
pub fn schedule(
    rating: i64,
    ease_factor: f64,
    interval_days: i32,
    now: DateTime<Utc>,
) -> Result<Schedule, SchedulerError> {
    schedule_rating(Rating::try_from(rating)?, ease_factor, interval_days, now)
}

fn schedule_rating(
    rating: Rating,
    ease_factor: f64,
    interval_days: i32,
    now: DateTime<Utc>,
) -> Result<Schedule, SchedulerError> {
    let (ease_factor, interval) = next_parameters(rating, ease_factor, interval_days);

    let interval_days =
        i32::try_from(interval).map_err(|_| SchedulerError::IntervalOverflow(interval))?;
    let due_at = now
        .checked_add_signed(Duration::days(i64::from(interval_days)))
        .ok_or(SchedulerError::IntervalOverflow(interval))?;

    Ok(Schedule {
        ease_factor: round_to_hundredths(ease_factor),
        interval_days,
        due_at,
    })
}

pub fn preview(
    ease_factor: f64,
    interval_days: i32,
    now: DateTime<Utc>,
) -> Result<IntervalPreview, SchedulerError> {
    let interval_for =
        |rating| schedule_rating(rating, ease_factor, interval_days, now).map(|s| s.interval_days);

    Ok(IntervalPreview {
        again: interval_for(Rating::Again)?,
        hard: interval_for(Rating::Hard)?,
        good: interval_for(Rating::Good)?,
        easy: interval_for(Rating::Easy)?,
    })
}

fn next_parameters(rating: Rating, ease_factor: f64, interval_days: i32) -> (f64, i64) {
    // A card that was never reviewed starts the clock at one day
    let interval = if interval_days == 0 { 1.0 } else { f64::from(interval_days) };

    match rating {
        Rating::Again => (lower_ease(ease_factor, AGAIN_EASE_PENALTY), 1),
        Rating::Hard => (
            lower_ease(ease_factor, HARD_EASE_PENALTY),
            truncate_interval(interval * HARD_INTERVAL_FACTOR),
        ),
        Rating::Good => (ease_factor, truncate_interval(interval * ease_factor)),
        Rating::Easy => (
            ease_factor + EASY_EASE_BONUS,
            truncate_interval(interval * ease_factor * EASY_INTERVAL_BONUS),
        ),
    }
}

fn lower_ease(ease_factor: f64, penalty: f64) -> f64 {
    (ease_factor - penalty).max(MIN_EASE_FACTOR)
}

// Truncates first, then clamps: a rated card never gets a zero-day interval.
fn truncate_interval(days: f64) -> i64 {
    (days.trunc() as i64).max(1)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    fn assert_ease(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "ease factor {actual} != {expected}"
        );
    }

    #[test]
    fn test_new_card_good() {
        let result = schedule(2, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL_DAYS, now()).unwrap();

        // working interval 1, floor(1 * 2.5) = 2
        assert_eq!(result.interval_days, 2);
        assert_ease(result.ease_factor, 2.5);
        assert_eq!(result.due_at, now() + Duration::days(2));
    }

    #[test]
    fn test_again_resets_interval() {
        let result = schedule(0, 2.5, 2, now()).unwrap();

        assert_eq!(result.interval_days, 1);
        assert_ease(result.ease_factor, 2.3);
        assert_eq!(result.due_at, now() + Duration::days(1));
    }

    #[test]
    fn test_hard() {
        let result = schedule(1, 2.5, 10, now()).unwrap();

        assert_eq!(result.interval_days, 12);
        assert_ease(result.ease_factor, 2.35);
    }

    #[test]
    fn test_easy() {
        let result = schedule(3, 2.0, 5, now()).unwrap();

        // floor(5 * 2.0 * 1.3) = 13
        assert_eq!(result.interval_days, 13);
        assert_ease(result.ease_factor, 2.15);
    }

    #[test]
    fn test_small_products_truncate_to_one_day() {
        let result = schedule(2, MIN_EASE_FACTOR, 1, now()).unwrap();
        assert_eq!(result.interval_days, 1);

        // floor(1 * 1.2) = 1
        let result = schedule(1, 2.5, 1, now()).unwrap();
        assert_eq!(result.interval_days, 1);

        // floor(3 * 1.3) = 3, not round(3.9) = 4
        let result = schedule(2, 1.3, 3, now()).unwrap();
        assert_eq!(result.interval_days, 3);
    }

    #[test]
    fn test_ease_factor_floor() {
        let result = schedule(0, 1.4, 10, now()).unwrap();
        assert_ease(result.ease_factor, MIN_EASE_FACTOR);

        let result = schedule(1, MIN_EASE_FACTOR, 10, now()).unwrap();
        assert_ease(result.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_easy_has_no_ease_ceiling() {
        let mut ease_factor = DEFAULT_EASE_FACTOR;
        let mut interval_days = DEFAULT_INTERVAL_DAYS;
        for _ in 0..10 {
            let result = schedule(3, ease_factor, interval_days, now()).unwrap();
            ease_factor = result.ease_factor;
            interval_days = result.interval_days;
        }
        assert_ease(ease_factor, 4.0);
    }

    #[test]
    fn test_ease_rounded_once_at_the_end() {
        // 2.37 - 0.15 = 2.22; intermediate values are not rounded
        let result = schedule(1, 2.37, 4, now()).unwrap();
        assert_ease(result.ease_factor, 2.22);
        // floor(4 * 1.2) = 4
        assert_eq!(result.interval_days, 4);

        // the unrounded ease factor drives the interval: floor(10 * 2.456) = 24
        let result = schedule(2, 2.456, 10, now()).unwrap();
        assert_eq!(result.interval_days, 24);
        assert_ease(result.ease_factor, 2.46);
    }

    #[test]
    fn test_invalid_ratings() {
        assert_eq!(
            schedule(4, 2.5, 0, now()),
            Err(SchedulerError::InvalidRating(4))
        );
        assert_eq!(
            schedule(-1, 2.5, 0, now()),
            Err(SchedulerError::InvalidRating(-1))
        );
    }

    #[test]
    fn test_invariants_hold_for_all_ratings() {
        let eases = [1.3, 1.31, 1.45, 2.0, 2.5, 3.1, 5.0];
        let intervals = [0, 1, 2, 3, 7, 30, 365, 3650];

        for rating in 0..=3 {
            for &ease_factor in &eases {
                for &interval_days in &intervals {
                    let result = schedule(rating, ease_factor, interval_days, now()).unwrap();

                    assert!(result.ease_factor >= MIN_EASE_FACTOR);
                    assert!(result.interval_days >= 1);
                    assert_eq!(
                        result.due_at,
                        now() + Duration::days(result.interval_days as i64)
                    );
                    if rating == 0 {
                        assert_eq!(result.interval_days, 1);
                    }
                }
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let first = schedule(3, 2.65, 17, now()).unwrap();
        for _ in 0..5 {
            let again = schedule(3, 2.65, 17, now()).unwrap();
            assert_eq!(again.ease_factor.to_bits(), first.ease_factor.to_bits());
            assert_eq!(again.interval_days, first.interval_days);
            assert_eq!(again.due_at, first.due_at);
        }
    }

    #[test]
    fn test_overflowing_interval_is_an_error() {
        let result = schedule(3, 1000.0, i32::MAX / 2, now());
        assert!(matches!(result, Err(SchedulerError::IntervalOverflow(_))));
    }

    #[test]
    fn test_preview() {
        let preview = preview(2.5, 10, now()).unwrap();
        assert_eq!(
            preview,
            IntervalPreview {
                again: 1,
                hard: 12,
                good: 25,
                easy: 32,
            }
        );
    }

    #[test]
    fn test_rating_names() {
        let names: Vec<_> = (0..=3)
            .map(|value| Rating::try_from(value).unwrap().name())
            .collect();
        assert_eq!(names, ["again", "hard", "good", "easy"]);
        assert_eq!(Rating::try_from(2).unwrap().value(), 2);
        assert_eq!(
            Rating::try_from(4_294_967_296),
            Err(SchedulerError::InvalidRating(4_294_967_296))
        );
    }
}
