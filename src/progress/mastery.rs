//! Mastery tracking and spaced-review scheduling.
//!
//! Mastery is an exponential moving average over section quiz scores,
//! clamped to 0-100. The review interval ladders up with mastery so
//! well-known material comes back less often.

use chrono::{DateTime, Duration, Utc};

/// Weight given to the newest quiz score.
const EMA_ALPHA: f32 = 0.3;

/// Score credited for completing a section that has no quiz.
const NO_QUIZ_SCORE: f32 = 70.0;

pub fn update_mastery(current: f32, quiz_score: Option<i32>) -> f32 {
    let observed = quiz_score
        .map(|s| s.clamp(0, 100) as f32)
        .unwrap_or(NO_QUIZ_SCORE);
    let current = current.clamp(0.0, 100.0);
    (current + EMA_ALPHA * (observed - current)).clamp(0.0, 100.0)
}

pub fn review_interval_days(mastery: f32) -> i64 {
    match mastery {
        m if m < 20.0 => 1,
        m if m < 40.0 => 3,
        m if m < 60.0 => 7,
        m if m < 80.0 => 14,
        _ => 30,
    }
}

pub fn next_review_at(completed_at: DateTime<Utc>, mastery: f32) -> DateTime<Utc> {
    completed_at + Duration::days(review_interval_days(mastery))
}

/// Completion percentage, clamped to 0-100. A module with no sections
/// counts as 0% until content exists.
pub fn percent_complete(completed_sections: i64, total_sections: i64) -> i32 {
    if total_sections <= 0 {
        return 0;
    }
    let percent = (completed_sections as f64 / total_sections as f64 * 100.0).round() as i64;
    percent.clamp(0, 100) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mastery_moves_toward_score() {
        let updated = update_mastery(50.0, Some(100));
        assert!((updated - 65.0).abs() < 1e-4);

        let updated = update_mastery(50.0, Some(0));
        assert!((updated - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_mastery_without_quiz_uses_default_credit() {
        let updated = update_mastery(0.0, None);
        assert!((updated - 21.0).abs() < 1e-4);
    }

    #[test]
    fn test_mastery_clamps_inputs() {
        assert_eq!(update_mastery(150.0, Some(200)), 100.0);
        let updated = update_mastery(-10.0, Some(0));
        assert_eq!(updated, 0.0);
    }

    #[test]
    fn test_review_ladder() {
        assert_eq!(review_interval_days(0.0), 1);
        assert_eq!(review_interval_days(19.9), 1);
        assert_eq!(review_interval_days(20.0), 3);
        assert_eq!(review_interval_days(40.0), 7);
        assert_eq!(review_interval_days(60.0), 14);
        assert_eq!(review_interval_days(80.0), 30);
        assert_eq!(review_interval_days(100.0), 30);
    }

    #[test]
    fn test_next_review_at() {
        let completed = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let next = next_review_at(completed, 50.0);
        assert_eq!(next - completed, Duration::days(7));
    }

    #[test]
    fn test_percent_complete_clamped() {
        assert_eq!(percent_complete(0, 10), 0);
        assert_eq!(percent_complete(5, 10), 50);
        assert_eq!(percent_complete(10, 10), 100);
        assert_eq!(percent_complete(12, 10), 100);
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(3, -1), 0);
    }
}
