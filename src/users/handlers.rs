use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::current_user;
use crate::db::models::{UserPreferences, UserProfile};
use crate::error::AppError;
use crate::AppState;

const EXPERIENCE_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];
const THEMES: [&str; 2] = ["light", "dark"];

pub async fn get_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    let profile = match state.db.get_profile(user.id).await? {
        Some(profile) => profile,
        // Accounts created before profiles existed get one lazily
        None => state.db.upsert_profile(&UserProfile::empty(user.id)).await?,
    };

    Ok(HttpResponse::Ok().json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub financial_experience: Option<String>,
    pub monthly_income_cents: Option<i64>,
}

pub async fn update_profile(
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if let Some(experience) = &body.financial_experience {
        if !EXPERIENCE_LEVELS.contains(&experience.as_str()) {
            return Err(AppError::ValidationError(format!(
                "financial_experience must be one of {:?}",
                EXPERIENCE_LEVELS
            )));
        }
    }
    if let Some(income) = body.monthly_income_cents {
        if income < 0 {
            return Err(AppError::ValidationError(
                "monthly income must not be negative".into(),
            ));
        }
    }

    let mut profile = state
        .db
        .get_profile(user.id)
        .await?
        .unwrap_or_else(|| UserProfile::empty(user.id));

    profile.bio = body.bio.clone();
    profile.avatar_url = body.avatar_url.clone();
    profile.financial_experience = body.financial_experience.clone();
    profile.monthly_income_cents = body.monthly_income_cents;

    let profile = state.db.upsert_profile(&profile).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn get_preferences(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    let prefs = match state.db.get_preferences(user.id).await? {
        Some(prefs) => prefs,
        None => {
            state
                .db
                .upsert_preferences(&UserPreferences::defaults(user.id))
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(prefs))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub email_notifications: bool,
    pub theme: String,
    pub reminder_hour: Option<i16>,
}

pub async fn update_preferences(
    req: HttpRequest,
    body: web::Json<UpdatePreferencesRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if !THEMES.contains(&body.theme.as_str()) {
        return Err(AppError::ValidationError(format!(
            "theme must be one of {:?}",
            THEMES
        )));
    }
    if let Some(hour) = body.reminder_hour {
        if !(0..=23).contains(&hour) {
            return Err(AppError::ValidationError(
                "reminder hour must be between 0 and 23".into(),
            ));
        }
    }

    let mut prefs = state
        .db
        .get_preferences(user.id)
        .await?
        .unwrap_or_else(|| UserPreferences::defaults(user.id));

    prefs.email_notifications = body.email_notifications;
    prefs.theme = body.theme.clone();
    prefs.reminder_hour = body.reminder_hour;

    let prefs = state.db.upsert_preferences(&prefs).await?;
    Ok(HttpResponse::Ok().json(prefs))
}
