use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::achievements;
use crate::auth::current_user;
use crate::db::models::{JournalEntry, ReflectionSession};
use crate::error::{AppError, DatabaseError};
use crate::journal::prompts::{category_for, select_prompt};
use crate::journal::reflection::{record_answer, step_title};
use crate::mood::{validate_mood, MAX_LIST_LIMIT};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<i16>,
    pub prompt_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub content: String,
    pub mood: Option<i16>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub async fn create_entry(
    req: HttpRequest,
    body: web::Json<CreateEntryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if body.content.trim().is_empty() {
        return Err(AppError::ValidationError("content must not be empty".into()));
    }
    if let Some(mood) = body.mood {
        validate_mood(mood)?;
    }

    let entry = JournalEntry::new(
        user.id,
        body.prompt_id,
        body.title.clone(),
        body.content.clone(),
        body.mood,
    );
    let entry = state.db.create_journal_entry(&entry).await?;
    info!("Journal entry {} created for user {}", entry.id, user.id);

    if state.db.count_journal_entries(user.id).await? == 1 {
        achievements::try_award(&state.db, user.id, "first_journal_entry").await;
    }

    Ok(HttpResponse::Created().json(entry))
}

pub async fn list_entries(
    req: HttpRequest,
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let limit = query.limit.unwrap_or(50).clamp(1, MAX_LIST_LIMIT);
    let entries = state.db.list_journal_entries(user.id, limit).await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn get_entry(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let entry = state
        .db
        .get_journal_entry(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;
    Ok(HttpResponse::Ok().json(entry))
}

pub async fn update_entry(
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateEntryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if body.content.trim().is_empty() {
        return Err(AppError::ValidationError("content must not be empty".into()));
    }
    if let Some(mood) = body.mood {
        validate_mood(mood)?;
    }

    let mut entry = state
        .db
        .get_journal_entry(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    entry.title = body.title.clone();
    entry.content = body.content.clone();
    entry.mood = body.mood;

    let entry = state.db.update_journal_entry(&entry).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Journal entries are soft-deleted so reflective history can be restored.
pub async fn delete_entry(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let deleted = state
        .db
        .soft_delete_journal_entry(path.into_inner(), user.id)
        .await?;
    if deleted == 0 {
        return Err(AppError::DatabaseError(DatabaseError::NotFound));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_prompts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user(&req, &state).await?;
    let prompts = state.db.list_prompts().await?;
    Ok(HttpResponse::Ok().json(prompts))
}

/// Suggests a prompt based on the user's latest check-in: the mood/stress
/// reading picks a category, the day of year rotates within it.
pub async fn suggested_prompt(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    let latest = state.db.recent_mood_entries(user.id, 1).await?;
    let (mood, stress) = latest
        .first()
        .map(|e| (Some(e.mood), Some(e.stress)))
        .unwrap_or((None, None));

    let category = category_for(mood, stress);
    let pool = state.db.list_prompts_by_category(category.as_str()).await?;
    let prompt = select_prompt(&pool, Utc::now().ordinal());

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "category": category.as_str(),
        "prompt": prompt,
    })))
}

// ---- reflection sessions ----

#[derive(Debug, Deserialize)]
pub struct CreateReflectionRequest {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct StepAnswerRequest {
    pub answer: String,
}

pub async fn create_reflection(
    req: HttpRequest,
    body: web::Json<CreateReflectionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if body.topic.trim().is_empty() {
        return Err(AppError::ValidationError("topic must not be empty".into()));
    }

    let session = ReflectionSession::new(user.id, body.topic.clone());
    let session = state.db.create_reflection(&session).await?;

    Ok(HttpResponse::Created().json(reflection_view(&session)))
}

pub async fn list_reflections(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let sessions = state.db.list_reflections(user.id).await?;
    Ok(HttpResponse::Ok().json(sessions))
}

pub async fn get_reflection(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let session = state
        .db
        .get_reflection(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;
    Ok(HttpResponse::Ok().json(reflection_view(&session)))
}

pub async fn answer_step(
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<StepAnswerRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let mut session = state
        .db
        .get_reflection(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    record_answer(&mut session, body.answer.clone())?;
    let session = state.db.update_reflection(&session).await?;

    if session.is_completed() {
        info!("Reflection session {} completed by user {}", session.id, user.id);
        achievements::try_award(&state.db, user.id, "first_reflection_complete").await;
    }

    Ok(HttpResponse::Ok().json(reflection_view(&session)))
}

/// Session plus the title of the step the client should render next.
fn reflection_view(session: &ReflectionSession) -> serde_json::Value {
    let next_step = if session.is_completed() {
        None
    } else {
        step_title(session.current_step)
    };
    serde_json::json!({
        "session": session,
        "next_step_title": next_step,
    })
}
