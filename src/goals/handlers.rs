use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::achievements;
use crate::auth::current_user;
use crate::db::models::UserGoal;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount_cents: i64,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub name: Option<String>,
    pub target_amount_cents: Option<i64>,
    pub saved_amount_cents: Option<i64>,
    pub deadline: Option<NaiveDate>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name.len() > 200 {
        return Err(AppError::ValidationError(
            "goal name must be between 1 and 200 characters".into(),
        ));
    }
    Ok(())
}

pub async fn create_goal(
    req: HttpRequest,
    body: web::Json<CreateGoalRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    validate_name(&body.name)?;
    if body.target_amount_cents <= 0 {
        return Err(AppError::ValidationError(
            "target amount must be positive".into(),
        ));
    }

    let goal = UserGoal::new(user.id, body.name.clone(), body.target_amount_cents, body.deadline);
    let goal = state.db.create_goal(&goal).await?;
    info!("Goal {} created for user {}", goal.id, user.id);

    if state.db.list_goals(user.id).await?.len() == 1 {
        achievements::try_award(&state.db, user.id, "first_goal_created").await;
    }

    Ok(HttpResponse::Created().json(goal))
}

pub async fn list_goals(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let goals = state.db.list_goals(user.id).await?;
    Ok(HttpResponse::Ok().json(goals))
}

pub async fn get_goal(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let goal = state
        .db
        .get_goal(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;
    Ok(HttpResponse::Ok().json(goal))
}

pub async fn update_goal(
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateGoalRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let mut goal = state
        .db
        .get_goal(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    if let Some(name) = &body.name {
        validate_name(name)?;
        goal.name = name.clone();
    }
    if let Some(target) = body.target_amount_cents {
        if target <= 0 {
            return Err(AppError::ValidationError(
                "target amount must be positive".into(),
            ));
        }
        goal.target_amount_cents = target;
    }
    if let Some(saved) = body.saved_amount_cents {
        if saved < 0 {
            return Err(AppError::ValidationError(
                "saved amount must not be negative".into(),
            ));
        }
        goal.saved_amount_cents = saved;
    }
    if body.deadline.is_some() {
        goal.deadline = body.deadline;
    }

    let newly_achieved = goal.is_achieved() && goal.achieved_at.is_none();
    if newly_achieved {
        goal.achieved_at = Some(Utc::now());
    } else if !goal.is_achieved() {
        goal.achieved_at = None;
    }

    let goal = state.db.update_goal(&goal).await?;

    if newly_achieved {
        info!("Goal {} achieved by user {}", goal.id, user.id);
        achievements::try_award(&state.db, user.id, "goal_achieved").await;
    }

    Ok(HttpResponse::Ok().json(goal))
}

/// Goals are hard-deleted; there is no undo.
pub async fn delete_goal(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let deleted = state.db.delete_goal(path.into_inner(), user.id).await?;
    if deleted == 0 {
        return Err(AppError::DatabaseError(DatabaseError::NotFound));
    }
    Ok(HttpResponse::NoContent().finish())
}
