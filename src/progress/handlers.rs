use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::achievements;
use crate::auth::current_user;
use crate::db::models::UserProgress;
use crate::error::{AppError, DatabaseError};
use crate::progress::mastery::{next_review_at, percent_complete, update_mastery};
use crate::wellness::{engagement_dropoff_risk, optimal_study_time};
use crate::AppState;

pub async fn list_progress(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let progress = state.db.list_progress(user.id).await?;
    Ok(HttpResponse::Ok().json(progress))
}

pub async fn module_progress(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let module_id = path.into_inner();

    let progress = state.db.get_progress(user.id, module_id).await?;
    let sections = state.db.list_section_progress(user.id, module_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "progress": progress,
        "sections": sections,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CompleteSectionRequest {
    pub quiz_score: Option<i32>,
}

/// Records a section completion and recomputes the module roll-up:
/// percentage (clamped 0-100), mastery EMA and the next review date.
pub async fn complete_section(
    req: HttpRequest,
    path: web::Path<(Uuid, i32)>,
    body: web::Json<CompleteSectionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let (module_id, section_index) = path.into_inner();

    if let Some(score) = body.quiz_score {
        if !(0..=100).contains(&score) {
            return Err(AppError::ValidationError(
                "quiz score must be between 0 and 100".into(),
            ));
        }
    }

    let module = state
        .db
        .get_module(module_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    let total_sections = state.db.count_module_sections(module_id).await?;
    if section_index < 0 || section_index as i64 >= total_sections {
        return Err(AppError::ValidationError(format!(
            "section index out of range; module has {} sections",
            total_sections
        )));
    }

    state
        .db
        .upsert_section_progress(user.id, module_id, section_index, body.quiz_score)
        .await?;

    let completed = state.db.list_section_progress(user.id, module_id).await?.len() as i64;
    let percent = percent_complete(completed, total_sections);

    let existing = state.db.get_progress(user.id, module_id).await?;
    let now = Utc::now();
    let mastery = update_mastery(
        existing.as_ref().map(|p| p.mastery).unwrap_or(0.0),
        body.quiz_score,
    );

    let completed_at = if percent >= 100 {
        existing.as_ref().and_then(|p| p.completed_at).or(Some(now))
    } else {
        None
    };
    let newly_completed = completed_at == Some(now);

    let progress = UserProgress {
        id: existing.as_ref().map(|p| p.id).unwrap_or_else(Uuid::new_v4),
        user_id: user.id,
        module_id,
        completed_sections: completed as i32,
        total_sections: total_sections as i32,
        percent_complete: percent,
        mastery,
        next_review_at: Some(next_review_at(now, mastery)),
        completed_at,
        created_at: existing.as_ref().map(|p| p.created_at).unwrap_or(now),
        updated_at: now,
    };
    let progress = state.db.upsert_progress(&progress).await?;

    if newly_completed {
        info!("User {} completed module {}", user.id, module.slug);
        let completed_modules = state.db.count_completed_modules(user.id).await?;
        if completed_modules >= 1 {
            achievements::try_award(&state.db, user.id, "first_module_complete").await;
        }
        if completed_modules >= 5 {
            achievements::try_award(&state.db, user.id, "five_modules_complete").await;
        }
    }

    Ok(HttpResponse::Ok().json(progress))
}

/// Modules whose spaced-review date has come due.
pub async fn due_reviews(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let due = state.db.list_due_reviews(user.id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(due))
}

#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    pub days_since_last_activity: u32,
    pub active_days_last_14: u32,
    #[serde(default)]
    pub avg_session_minutes: f32,
}

/// Stateless engagement drop-off scoring over caller-supplied metrics.
pub async fn engagement_risk(body: web::Json<EngagementRequest>) -> Result<HttpResponse, AppError> {
    if body.active_days_last_14 > 14 {
        return Err(AppError::ValidationError(
            "active_days_last_14 cannot exceed 14".into(),
        ));
    }
    let prediction = engagement_dropoff_risk(
        body.days_since_last_activity,
        body.active_days_last_14,
        body.avg_session_minutes,
    );
    Ok(HttpResponse::Ok().json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct OptimalTimeRequest {
    /// Completion counts per hour of day; exactly 24 bins.
    pub completions_by_hour: Vec<u32>,
}

pub async fn optimal_time(body: web::Json<OptimalTimeRequest>) -> Result<HttpResponse, AppError> {
    if body.completions_by_hour.len() != 24 {
        return Err(AppError::ValidationError(
            "completions_by_hour must have exactly 24 entries".into(),
        ));
    }
    let mut histogram = [0u32; 24];
    histogram.copy_from_slice(&body.completions_by_hour);

    let window = optimal_study_time(&histogram);
    Ok(HttpResponse::Ok().json(window))
}

/// Same detection, derived from the user's stored completion history.
pub async fn optimal_time_from_history(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let histogram = state.db.completion_hour_histogram(user.id).await?;
    let window = optimal_study_time(&histogram);
    Ok(HttpResponse::Ok().json(window))
}
