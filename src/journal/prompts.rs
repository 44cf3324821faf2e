//! Mood-based journal prompt selection.
//!
//! A mood/stress reading maps onto a prompt category; within the category
//! selection rotates by day-of-year so consecutive days see different
//! prompts without any stored state.

use crate::db::models::JournalPrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptCategory {
    Gratitude,
    Reflection,
    Planning,
    StressRelief,
}

impl PromptCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptCategory::Gratitude => "gratitude",
            PromptCategory::Reflection => "reflection",
            PromptCategory::Planning => "planning",
            PromptCategory::StressRelief => "stress_relief",
        }
    }
}

/// Picks a category from the latest check-in. High stress wins over
/// everything; low mood asks for gratitude; a good day invites planning.
pub fn category_for(mood: Option<i16>, stress: Option<i16>) -> PromptCategory {
    if let Some(stress) = stress {
        if stress >= 7 {
            return PromptCategory::StressRelief;
        }
    }
    match mood {
        Some(mood) if mood <= 2 => PromptCategory::Gratitude,
        Some(mood) if mood >= 4 && stress.map_or(true, |s| s <= 3) => PromptCategory::Planning,
        _ => PromptCategory::Reflection,
    }
}

pub fn rotation_index(day_of_year: u32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    day_of_year as usize % len
}

pub fn select_prompt(prompts: &[JournalPrompt], day_of_year: u32) -> Option<&JournalPrompt> {
    if prompts.is_empty() {
        return None;
    }
    Some(&prompts[rotation_index(day_of_year, prompts.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn prompt(text: &str) -> JournalPrompt {
        JournalPrompt {
            id: Uuid::new_v4(),
            category: "reflection".into(),
            text: text.into(),
            display_order: 0,
        }
    }

    #[test]
    fn test_high_stress_wins() {
        assert_eq!(category_for(Some(5), Some(9)), PromptCategory::StressRelief);
        assert_eq!(category_for(Some(1), Some(7)), PromptCategory::StressRelief);
    }

    #[test]
    fn test_low_mood_asks_for_gratitude() {
        assert_eq!(category_for(Some(1), Some(4)), PromptCategory::Gratitude);
        assert_eq!(category_for(Some(2), None), PromptCategory::Gratitude);
    }

    #[test]
    fn test_thriving_invites_planning() {
        assert_eq!(category_for(Some(5), Some(2)), PromptCategory::Planning);
        assert_eq!(category_for(Some(4), None), PromptCategory::Planning);
    }

    #[test]
    fn test_middle_ground_reflects() {
        assert_eq!(category_for(Some(3), Some(5)), PromptCategory::Reflection);
        assert_eq!(category_for(None, None), PromptCategory::Reflection);
        // Good mood but moderate stress is not a planning day
        assert_eq!(category_for(Some(4), Some(5)), PromptCategory::Reflection);
    }

    #[test]
    fn test_rotation_is_deterministic() {
        let prompts = vec![prompt("a"), prompt("b"), prompt("c")];
        let first = select_prompt(&prompts, 10).unwrap().text.clone();
        assert_eq!(select_prompt(&prompts, 10).unwrap().text, first);
        // Consecutive days rotate
        assert_ne!(select_prompt(&prompts, 11).unwrap().text, first);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        assert!(select_prompt(&[], 42).is_none());
        assert_eq!(rotation_index(42, 0), 0);
    }
}
