use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::achievements;
use crate::auth::current_user;
use crate::error::AppError;
use crate::mood::{checkin_streak, validate_energy, validate_mood, validate_stress};
use crate::wellness::{predict_stress, MoodSample};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub entry_date: Option<NaiveDate>,
    pub mood: i16,
    pub stress: i16,
    pub energy: Option<i16>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Upserts today's check-in (one row per user per day).
pub async fn checkin(
    req: HttpRequest,
    body: web::Json<CheckinRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    validate_mood(body.mood)?;
    validate_stress(body.stress)?;
    if let Some(energy) = body.energy {
        validate_energy(energy)?;
    }

    let entry_date = body.entry_date.unwrap_or_else(|| Utc::now().date_naive());
    let entry = state
        .db
        .upsert_mood_entry(
            user.id,
            entry_date,
            body.mood,
            body.stress,
            body.energy,
            body.note.clone(),
        )
        .await?;
    info!("Mood check-in for user {} on {}", user.id, entry_date);

    let recent = state.db.recent_mood_entries(user.id, 30).await?;
    let dates: Vec<NaiveDate> = recent.iter().map(|e| e.entry_date).collect();
    let streak = checkin_streak(&dates, Utc::now().date_naive());
    if streak >= 7 {
        achievements::try_award(&state.db, user.id, "week_of_checkins").await;
    }

    Ok(HttpResponse::Created().json(serde_json::json!({
        "entry": entry,
        "streak_days": streak,
    })))
}

pub async fn list_entries(
    req: HttpRequest,
    query: web::Query<RangeQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let entries = state
        .db
        .list_mood_entries(user.id, query.start_date, query.end_date)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    /// Check-in samples, oldest first.
    pub samples: Vec<MoodSample>,
}

/// Stateless stress prediction over caller-supplied samples.
pub async fn insights(body: web::Json<InsightsRequest>) -> Result<HttpResponse, AppError> {
    for sample in &body.samples {
        validate_mood(sample.mood)?;
        validate_stress(sample.stress)?;
    }
    let prediction = predict_stress(&body.samples);
    Ok(HttpResponse::Ok().json(prediction))
}

/// Same prediction, derived from the user's stored check-ins (last 14 days).
pub async fn insights_from_history(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    let mut entries = state.db.recent_mood_entries(user.id, 14).await?;
    entries.reverse(); // oldest first for the trend component
    let samples: Vec<MoodSample> = entries
        .iter()
        .map(|e| MoodSample {
            mood: e.mood,
            stress: e.stress,
        })
        .collect();

    let prediction = predict_stress(&samples);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "sample_count": samples.len(),
        "prediction": prediction,
    })))
}
