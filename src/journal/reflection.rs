//! The 5-step reflective-thinking flow. A linear wizard: one row, one step
//! counter, answers fill in one at a time until the session completes.

use chrono::Utc;

use crate::db::models::ReflectionSession;
use crate::error::AppError;

pub const TOTAL_STEPS: i16 = 5;

pub const STEP_TITLES: [&str; TOTAL_STEPS as usize] = [
    "Describe the situation",
    "Name the feelings involved",
    "Evaluate what went well and what didn't",
    "Work out why it played out that way",
    "Decide what you'll do differently",
];

pub fn step_title(step: i16) -> Option<&'static str> {
    if (1..=TOTAL_STEPS).contains(&step) {
        Some(STEP_TITLES[(step - 1) as usize])
    } else {
        None
    }
}

/// Stores the answer for the current step and advances the counter.
/// Answering the final step completes the session.
pub fn record_answer(session: &mut ReflectionSession, answer: String) -> Result<(), AppError> {
    if session.is_completed() {
        return Err(AppError::ValidationError(
            "reflection session is already completed".into(),
        ));
    }
    if answer.trim().is_empty() {
        return Err(AppError::ValidationError("answer must not be empty".into()));
    }

    match session.current_step {
        1 => session.step1_answer = Some(answer),
        2 => session.step2_answer = Some(answer),
        3 => session.step3_answer = Some(answer),
        4 => session.step4_answer = Some(answer),
        5 => session.step5_answer = Some(answer),
        step => {
            return Err(AppError::InternalError(format!(
                "reflection session in impossible step {}",
                step
            )))
        }
    }

    if session.current_step == TOTAL_STEPS {
        session.completed_at = Some(Utc::now());
    } else {
        session.current_step += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_wizard_walks_all_five_steps() {
        let mut session = ReflectionSession::new(Uuid::new_v4(), "Overspending".into());

        for step in 1..=5i16 {
            assert_eq!(session.current_step, step);
            assert!(!session.is_completed());
            record_answer(&mut session, format!("answer {}", step)).unwrap();
        }

        assert!(session.is_completed());
        assert_eq!(session.current_step, 5);
        assert_eq!(session.step1_answer.as_deref(), Some("answer 1"));
        assert_eq!(session.step5_answer.as_deref(), Some("answer 5"));
    }

    #[test]
    fn test_completed_session_rejects_more_answers() {
        let mut session = ReflectionSession::new(Uuid::new_v4(), "Budgeting".into());
        for _ in 0..5 {
            record_answer(&mut session, "something".into()).unwrap();
        }
        assert!(record_answer(&mut session, "one more".into()).is_err());
    }

    #[test]
    fn test_empty_answer_rejected() {
        let mut session = ReflectionSession::new(Uuid::new_v4(), "Saving".into());
        assert!(record_answer(&mut session, "   ".into()).is_err());
        assert_eq!(session.current_step, 1);
    }

    #[test]
    fn test_step_titles() {
        assert_eq!(step_title(1), Some("Describe the situation"));
        assert!(step_title(0).is_none());
        assert!(step_title(6).is_none());
    }
}
