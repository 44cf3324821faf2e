use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::current_user;
use crate::error::AppError;
use crate::AppState;

pub async fn list_achievements(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user(&req, &state).await?;
    let achievements = state.db.list_achievements().await?;
    Ok(HttpResponse::Ok().json(achievements))
}

pub async fn earned_achievements(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let earned = state.db.list_earned_achievements(user.id).await?;
    let total_points: i32 = earned.iter().map(|a| a.points).sum();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "earned": earned,
        "total_points": total_points,
    })))
}
