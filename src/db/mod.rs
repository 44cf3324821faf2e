//! Persistence layer: row models and the Postgres operations facade.

pub mod models;
pub mod operations;

pub use models::{
    Achievement, AiConversation, AiMessage, JournalEntry, JournalPrompt, Module, ModuleContent,
    MoodEntry, ProviderKey, ReflectionSession, SectionProgress, User, UserAchievement, UserGoal,
    UserPreferences, UserProfile, UserProgress, UserSession,
};
pub use operations::{DbOperations, DbPoolStatus, EarnedAchievement};
