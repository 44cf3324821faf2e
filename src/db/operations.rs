use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use sqlx::FromRow;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::models::{
    Achievement, AiConversation, AiMessage, JournalEntry, JournalPrompt, Module, ModuleContent,
    MoodEntry, ProviderKey, ReflectionSession, SectionProgress, User, UserAchievement, UserGoal,
    UserPreferences, UserProfile, UserProgress, UserSession,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub async fn get_pool_status(&self) -> Result<DbPoolStatus, AppError> {
        let size = self.pool.size();
        let idle = self.pool.num_idle() as u32;
        let active = size.saturating_sub(idle);

        Ok(DbPoolStatus {
            total_connections: size,
            active_connections: active,
            idle_connections: idle,
        })
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>, AppError> {
        Ok(self.pool.as_ref().begin().await?)
    }

    // ---- users ----

    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, password_salt, display_name, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(&user.display_name)
        .bind(&user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(user)
    }

    pub async fn update_last_login(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = $1, updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn set_user_role(&self, email: &str, role: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE users SET role = $1, updated_at = $2 WHERE email = $3")
            .bind(role)
            .bind(Utc::now())
            .bind(email)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    // ---- sessions ----

    pub async fn create_session(&self, session: &UserSession) -> Result<UserSession, AppError> {
        let session = sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_sessions (id, user_id, token, expires_at, created_at, last_activity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.last_activity)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(session)
    }

    pub async fn get_session_by_token(&self, token: &str) -> Result<Option<UserSession>, AppError> {
        let session =
            sqlx::query_as::<_, UserSession>("SELECT * FROM user_sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(session)
    }

    pub async fn update_session_activity(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE user_sessions SET last_activity = $1 WHERE token = $2")
            .bind(Utc::now())
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AppError> {
        let mut transaction = self.begin_transaction().await?;

        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&mut *transaction)
            .await;

        match result {
            Ok(result) => {
                transaction.commit().await?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                transaction.rollback().await?;
                Err(e.into())
            }
        }
    }

    // ---- profiles and preferences ----

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let profile =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(profile)
    }

    pub async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (id, user_id, bio, avatar_url, financial_experience, monthly_income_cents, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                bio = $3,
                avatar_url = $4,
                financial_experience = $5,
                monthly_income_cents = $6,
                updated_at = $8
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.bio)
        .bind(&profile.avatar_url)
        .bind(&profile.financial_experience)
        .bind(profile.monthly_income_cents)
        .bind(profile.created_at)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(profile)
    }

    pub async fn get_preferences(&self, user_id: Uuid) -> Result<Option<UserPreferences>, AppError> {
        let prefs = sqlx::query_as::<_, UserPreferences>(
            "SELECT * FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(prefs)
    }

    pub async fn upsert_preferences(
        &self,
        prefs: &UserPreferences,
    ) -> Result<UserPreferences, AppError> {
        let prefs = sqlx::query_as::<_, UserPreferences>(
            r#"
            INSERT INTO user_preferences (id, user_id, email_notifications, theme, reminder_hour, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                email_notifications = $3,
                theme = $4,
                reminder_hour = $5,
                updated_at = $7
            RETURNING *
            "#,
        )
        .bind(prefs.id)
        .bind(prefs.user_id)
        .bind(prefs.email_notifications)
        .bind(&prefs.theme)
        .bind(prefs.reminder_hour)
        .bind(prefs.created_at)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(prefs)
    }

    // ---- course modules ----

    pub async fn list_modules(&self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            "SELECT * FROM modules WHERE is_published ORDER BY display_order, title",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(modules)
    }

    pub async fn get_module(&self, id: Uuid) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(module)
    }

    pub async fn list_module_contents(
        &self,
        module_id: Uuid,
    ) -> Result<Vec<ModuleContent>, AppError> {
        let contents = sqlx::query_as::<_, ModuleContent>(
            "SELECT * FROM module_contents WHERE module_id = $1 ORDER BY section_index",
        )
        .bind(module_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(contents)
    }

    pub async fn count_module_sections(&self, module_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM module_contents WHERE module_id = $1",
        )
        .bind(module_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    // ---- progress ----

    pub async fn get_progress(
        &self,
        user_id: Uuid,
        module_id: Uuid,
    ) -> Result<Option<UserProgress>, AppError> {
        let progress = sqlx::query_as::<_, UserProgress>(
            "SELECT * FROM user_progress WHERE user_id = $1 AND module_id = $2",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(progress)
    }

    pub async fn list_progress(&self, user_id: Uuid) -> Result<Vec<UserProgress>, AppError> {
        let progress = sqlx::query_as::<_, UserProgress>(
            "SELECT * FROM user_progress WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(progress)
    }

    pub async fn upsert_progress(&self, progress: &UserProgress) -> Result<UserProgress, AppError> {
        let progress = sqlx::query_as::<_, UserProgress>(
            r#"
            INSERT INTO user_progress
                (id, user_id, module_id, completed_sections, total_sections, percent_complete,
                 mastery, next_review_at, completed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, module_id) DO UPDATE SET
                completed_sections = $4,
                total_sections = $5,
                percent_complete = $6,
                mastery = $7,
                next_review_at = $8,
                completed_at = $9,
                updated_at = $11
            RETURNING *
            "#,
        )
        .bind(progress.id)
        .bind(progress.user_id)
        .bind(progress.module_id)
        .bind(progress.completed_sections)
        .bind(progress.total_sections)
        .bind(progress.percent_complete)
        .bind(progress.mastery)
        .bind(progress.next_review_at)
        .bind(progress.completed_at)
        .bind(progress.created_at)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(progress)
    }

    pub async fn upsert_section_progress(
        &self,
        user_id: Uuid,
        module_id: Uuid,
        section_index: i32,
        quiz_score: Option<i32>,
    ) -> Result<SectionProgress, AppError> {
        let section = sqlx::query_as::<_, SectionProgress>(
            r#"
            INSERT INTO section_progress (id, user_id, module_id, section_index, quiz_score, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, module_id, section_index) DO UPDATE SET
                quiz_score = $5
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(module_id)
        .bind(section_index)
        .bind(quiz_score)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(section)
    }

    pub async fn list_section_progress(
        &self,
        user_id: Uuid,
        module_id: Uuid,
    ) -> Result<Vec<SectionProgress>, AppError> {
        let sections = sqlx::query_as::<_, SectionProgress>(
            "SELECT * FROM section_progress WHERE user_id = $1 AND module_id = $2 ORDER BY section_index",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(sections)
    }

    pub async fn list_due_reviews(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<UserProgress>, AppError> {
        let due = sqlx::query_as::<_, UserProgress>(
            r#"
            SELECT * FROM user_progress
            WHERE user_id = $1 AND next_review_at IS NOT NULL AND next_review_at <= $2
            ORDER BY next_review_at
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(due)
    }

    pub async fn count_completed_modules(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_progress WHERE user_id = $1 AND completed_at IS NOT NULL",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    /// Hour-of-day histogram of section completions, for the optimal-time heuristic.
    pub async fn completion_hour_histogram(&self, user_id: Uuid) -> Result<[u32; 24], AppError> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT CAST(EXTRACT(HOUR FROM completed_at) AS INT4), COUNT(*)
            FROM section_progress
            WHERE user_id = $1
            GROUP BY 1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut histogram = [0u32; 24];
        for (hour, count) in rows {
            if (0..24).contains(&hour) {
                histogram[hour as usize] = count as u32;
            }
        }

        Ok(histogram)
    }

    // ---- goals ----

    pub async fn create_goal(&self, goal: &UserGoal) -> Result<UserGoal, AppError> {
        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            INSERT INTO user_goals
                (id, user_id, name, target_amount_cents, saved_amount_cents, deadline, achieved_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(&goal.name)
        .bind(goal.target_amount_cents)
        .bind(goal.saved_amount_cents)
        .bind(goal.deadline)
        .bind(goal.achieved_at)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(goal)
    }

    pub async fn list_goals(&self, user_id: Uuid) -> Result<Vec<UserGoal>, AppError> {
        let goals = sqlx::query_as::<_, UserGoal>(
            "SELECT * FROM user_goals WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(goals)
    }

    pub async fn get_goal(&self, id: Uuid, user_id: Uuid) -> Result<Option<UserGoal>, AppError> {
        let goal =
            sqlx::query_as::<_, UserGoal>("SELECT * FROM user_goals WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(goal)
    }

    pub async fn update_goal(&self, goal: &UserGoal) -> Result<UserGoal, AppError> {
        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            UPDATE user_goals SET
                name = $3,
                target_amount_cents = $4,
                saved_amount_cents = $5,
                deadline = $6,
                achieved_at = $7,
                updated_at = $8
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(&goal.name)
        .bind(goal.target_amount_cents)
        .bind(goal.saved_amount_cents)
        .bind(goal.deadline)
        .bind(goal.achieved_at)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(goal)
    }

    pub async fn delete_goal(&self, id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM user_goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    // ---- journal ----

    pub async fn create_journal_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries
                (id, user_id, prompt_id, title, content, mood, deleted_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.prompt_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.mood)
        .bind(entry.deleted_at)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(entry)
    }

    pub async fn list_journal_entries(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JournalEntry>, AppError> {
        let entries = sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(entries)
    }

    pub async fn get_journal_entry(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<JournalEntry>, AppError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(entry)
    }

    pub async fn update_journal_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, AppError> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries SET
                title = $3,
                content = $4,
                mood = $5,
                updated_at = $6
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.mood)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(entry)
    }

    pub async fn soft_delete_journal_entry(&self, id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE journal_entries SET deleted_at = $3 WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_journal_entries(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM journal_entries WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    pub async fn list_prompts(&self) -> Result<Vec<JournalPrompt>, AppError> {
        let prompts = sqlx::query_as::<_, JournalPrompt>(
            "SELECT * FROM journal_prompts ORDER BY category, display_order",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(prompts)
    }

    pub async fn list_prompts_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<JournalPrompt>, AppError> {
        let prompts = sqlx::query_as::<_, JournalPrompt>(
            "SELECT * FROM journal_prompts WHERE category = $1 ORDER BY display_order",
        )
        .bind(category)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(prompts)
    }

    // ---- reflection sessions ----

    pub async fn create_reflection(
        &self,
        session: &ReflectionSession,
    ) -> Result<ReflectionSession, AppError> {
        let session = sqlx::query_as::<_, ReflectionSession>(
            r#"
            INSERT INTO reflection_sessions
                (id, user_id, topic, current_step, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.topic)
        .bind(session.current_step)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(session)
    }

    pub async fn get_reflection(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReflectionSession>, AppError> {
        let session = sqlx::query_as::<_, ReflectionSession>(
            "SELECT * FROM reflection_sessions WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(session)
    }

    pub async fn list_reflections(&self, user_id: Uuid) -> Result<Vec<ReflectionSession>, AppError> {
        let sessions = sqlx::query_as::<_, ReflectionSession>(
            "SELECT * FROM reflection_sessions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(sessions)
    }

    pub async fn update_reflection(
        &self,
        session: &ReflectionSession,
    ) -> Result<ReflectionSession, AppError> {
        let session = sqlx::query_as::<_, ReflectionSession>(
            r#"
            UPDATE reflection_sessions SET
                current_step = $3,
                step1_answer = $4,
                step2_answer = $5,
                step3_answer = $6,
                step4_answer = $7,
                step5_answer = $8,
                completed_at = $9,
                updated_at = $10
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.current_step)
        .bind(&session.step1_answer)
        .bind(&session.step2_answer)
        .bind(&session.step3_answer)
        .bind(&session.step4_answer)
        .bind(&session.step5_answer)
        .bind(session.completed_at)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(session)
    }

    // ---- mood ----

    pub async fn upsert_mood_entry(
        &self,
        user_id: Uuid,
        entry_date: NaiveDate,
        mood: i16,
        stress: i16,
        energy: Option<i16>,
        note: Option<String>,
    ) -> Result<MoodEntry, AppError> {
        let now = Utc::now();
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (id, user_id, entry_date, mood, stress, energy, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id, entry_date) DO UPDATE SET
                mood = $4,
                stress = $5,
                energy = $6,
                note = $7,
                updated_at = $8
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry_date)
        .bind(mood)
        .bind(stress)
        .bind(energy)
        .bind(note)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(entry)
    }

    pub async fn list_mood_entries(
        &self,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<MoodEntry>, AppError> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
              AND ($2::DATE IS NULL OR entry_date >= $2)
              AND ($3::DATE IS NULL OR entry_date <= $3)
            ORDER BY entry_date DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(entries)
    }

    pub async fn recent_mood_entries(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MoodEntry>, AppError> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            "SELECT * FROM mood_entries WHERE user_id = $1 ORDER BY entry_date DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(entries)
    }

    // ---- achievements ----

    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, AppError> {
        let achievements =
            sqlx::query_as::<_, Achievement>("SELECT * FROM achievements ORDER BY points, code")
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(achievements)
    }

    pub async fn list_earned_achievements(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EarnedAchievement>, AppError> {
        let earned = sqlx::query_as::<_, EarnedAchievement>(
            r#"
            SELECT a.code, a.title, a.description, a.points, ua.earned_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(earned)
    }

    /// Awards the achievement with the given code. Idempotent; returns the
    /// number of rows inserted (0 when already earned or code unknown).
    pub async fn award_achievement(&self, user_id: Uuid, code: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_achievements (id, user_id, achievement_id, earned_at)
            SELECT $1, $2, a.id, $4 FROM achievements a WHERE a.code = $3
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(code)
        .bind(Utc::now())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_user_achievement(
        &self,
        user_id: Uuid,
        achievement_id: Uuid,
    ) -> Result<Option<UserAchievement>, AppError> {
        let row = sqlx::query_as::<_, UserAchievement>(
            "SELECT * FROM user_achievements WHERE user_id = $1 AND achievement_id = $2",
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    // ---- AI conversations ----

    pub async fn create_conversation(
        &self,
        conversation: &AiConversation,
    ) -> Result<AiConversation, AppError> {
        let conversation = sqlx::query_as::<_, AiConversation>(
            r#"
            INSERT INTO ai_conversations (id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(conversation)
    }

    pub async fn list_conversations(&self, user_id: Uuid) -> Result<Vec<AiConversation>, AppError> {
        let conversations = sqlx::query_as::<_, AiConversation>(
            "SELECT * FROM ai_conversations WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(conversations)
    }

    pub async fn get_conversation(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AiConversation>, AppError> {
        let conversation = sqlx::query_as::<_, AiConversation>(
            "SELECT * FROM ai_conversations WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(conversation)
    }

    pub async fn touch_conversation(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE ai_conversations SET updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    pub async fn delete_conversation(&self, id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM ai_conversations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_message(&self, message: &AiMessage) -> Result<AiMessage, AppError> {
        let message = sqlx::query_as::<_, AiMessage>(
            r#"
            INSERT INTO ai_messages (id, conversation_id, sender, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(&message.sender)
        .bind(&message.content)
        .bind(message.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(message)
    }

    pub async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<AiMessage>, AppError> {
        let messages = sqlx::query_as::<_, AiMessage>(
            "SELECT * FROM ai_messages WHERE conversation_id = $1 ORDER BY created_at",
        )
        .bind(conversation_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(messages)
    }

    // ---- provider keys ----

    pub async fn get_provider_key(&self, user_id: Uuid) -> Result<Option<ProviderKey>, AppError> {
        let key = sqlx::query_as::<_, ProviderKey>(
            "SELECT * FROM provider_keys WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(key)
    }

    pub async fn upsert_provider_key(
        &self,
        user_id: Uuid,
        encrypted_key: &str,
        nonce: &str,
    ) -> Result<ProviderKey, AppError> {
        let now = Utc::now();
        let key = sqlx::query_as::<_, ProviderKey>(
            r#"
            INSERT INTO provider_keys (id, user_id, encrypted_key, nonce, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                encrypted_key = $3,
                nonce = $4,
                updated_at = $5
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(encrypted_key)
        .bind(nonce)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(key)
    }
}

#[derive(Debug, Clone)]
pub struct DbPoolStatus {
    pub total_connections: u32,
    pub active_connections: u32,
    pub idle_connections: u32,
}

/// Catalog entry joined with the user's earn timestamp.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EarnedAchievement {
    pub code: String,
    pub title: String,
    pub description: String,
    pub points: i32,
    pub earned_at: DateTime<Utc>,
}
