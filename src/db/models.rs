use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        email: String,
        password_hash: String,
        password_salt: String,
        display_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            password_salt,
            display_name,
            role: "user".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: Uuid, token: String, expires_in_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires_at: now + chrono::Duration::hours(expires_in_hours),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub financial_experience: Option<String>,
    pub monthly_income_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn empty(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            bio: None,
            avatar_url: None,
            financial_experience: None,
            monthly_income_cents: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferences {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email_notifications: bool,
    pub theme: String,
    pub reminder_hour: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    pub fn defaults(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            email_notifications: true,
            theme: "light".to_string(),
            reminder_hour: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A unit of financial-literacy course content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub difficulty: String,
    pub estimated_minutes: i32,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModuleContent {
    pub id: Uuid,
    pub module_id: Uuid,
    pub section_index: i32,
    pub title: String,
    pub body_markdown: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user completion state for a module.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub completed_sections: i32,
    pub total_sections: i32,
    pub percent_complete: i32,
    pub mastery: f32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub section_index: i32,
    pub quiz_score: Option<i32>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount_cents: i64,
    pub saved_amount_cents: i64,
    pub deadline: Option<NaiveDate>,
    pub achieved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserGoal {
    pub fn new(
        user_id: Uuid,
        name: String,
        target_amount_cents: i64,
        deadline: Option<NaiveDate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_amount_cents,
            saved_amount_cents: 0,
            deadline,
            achieved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_achieved(&self) -> bool {
        self.saved_amount_cents >= self.target_amount_cents
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prompt_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<i16>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(
        user_id: Uuid,
        prompt_id: Option<Uuid>,
        title: Option<String>,
        content: String,
        mood: Option<i16>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            prompt_id,
            title,
            content,
            mood,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A templated reflective-writing question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JournalPrompt {
    pub id: Uuid,
    pub category: String,
    pub text: String,
    pub display_order: i32,
}

/// One pass through the 5-step reflective-thinking wizard.
/// A plain row with a step counter; step answers fill in one at a time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReflectionSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub current_step: i16,
    pub step1_answer: Option<String>,
    pub step2_answer: Option<String>,
    pub step3_answer: Option<String>,
    pub step4_answer: Option<String>,
    pub step5_answer: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReflectionSession {
    pub fn new(user_id: Uuid, topic: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            topic,
            current_step: 1,
            step1_answer: None,
            step2_answer: None,
            step3_answer: None,
            step4_answer: None,
            step5_answer: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A daily self-reported wellness data point. Mood 1-5, stress 1-10.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub mood: i16,
    pub stress: i16,
    pub energy: Option<i16>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiConversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiConversation {
    pub fn new(user_id: Uuid, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl AiMessage {
    pub fn new(conversation_id: Uuid, sender: &str, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            sender: sender.to_string(),
            content,
            created_at: Utc::now(),
        }
    }
}

/// Encrypted per-user provider API key. Ciphertext and nonce are base64.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProviderKey {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub encrypted_key: String,
    #[serde(skip_serializing)]
    pub nonce: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(
            "a@b.com".into(),
            "hash".into(),
            "salt".into(),
            Some("A".into()),
        );
        assert_eq!(user.role, "user");
        assert!(user.is_active);
        assert!(!user.is_admin());
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_session_expiry() {
        let session = UserSession::new(Uuid::new_v4(), "token".into(), 1);
        assert!(!session.is_expired());

        let expired = UserSession::new(Uuid::new_v4(), "token".into(), -1);
        assert!(expired.is_expired());
    }

    #[test]
    fn test_goal_achievement() {
        let mut goal = UserGoal::new(Uuid::new_v4(), "Emergency fund".into(), 100_000, None);
        assert!(!goal.is_achieved());
        goal.saved_amount_cents = 100_000;
        assert!(goal.is_achieved());
    }

    #[test]
    fn test_reflection_starts_at_step_one() {
        let session = ReflectionSession::new(Uuid::new_v4(), "Impulse spending".into());
        assert_eq!(session.current_step, 1);
        assert!(!session.is_completed());
    }
}
