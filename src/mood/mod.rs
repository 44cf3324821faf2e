//! Daily mood/stress check-ins and the wellness insight endpoints.

pub mod handlers;

use chrono::NaiveDate;

use crate::error::AppError;

pub const MAX_LIST_LIMIT: i64 = 365;

pub fn validate_mood(mood: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&mood) {
        return Err(AppError::ValidationError("mood must be between 1 and 5".into()));
    }
    Ok(())
}

pub fn validate_stress(stress: i16) -> Result<(), AppError> {
    if !(1..=10).contains(&stress) {
        return Err(AppError::ValidationError(
            "stress must be between 1 and 10".into(),
        ));
    }
    Ok(())
}

pub fn validate_energy(energy: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&energy) {
        return Err(AppError::ValidationError(
            "energy must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

/// Length of the consecutive-day run ending today. `dates` must be sorted
/// newest first (the order the database hands them back).
pub fn checkin_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut expected = today;
    for date in dates {
        if *date == expected {
            streak += 1;
            expected = expected.pred_opt().unwrap_or(expected);
        } else {
            break;
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_bounds() {
        assert!(validate_mood(1).is_ok());
        assert!(validate_mood(5).is_ok());
        assert!(validate_mood(0).is_err());
        assert!(validate_mood(6).is_err());

        assert!(validate_stress(10).is_ok());
        assert!(validate_stress(11).is_err());

        assert!(validate_energy(3).is_ok());
        assert!(validate_energy(0).is_err());
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let today = d(2025, 6, 10);
        let dates = vec![d(2025, 6, 10), d(2025, 6, 9), d(2025, 6, 8), d(2025, 6, 5)];
        assert_eq!(checkin_streak(&dates, today), 3);
    }

    #[test]
    fn test_streak_requires_today() {
        let today = d(2025, 6, 10);
        let dates = vec![d(2025, 6, 9), d(2025, 6, 8)];
        assert_eq!(checkin_streak(&dates, today), 0);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(checkin_streak(&[], d(2025, 6, 10)), 0);
    }
}
