use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::auth::current_user;
use crate::error::{AppError, DatabaseError};
use crate::AppState;

pub async fn list_modules(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    current_user(&req, &state).await?;
    let modules = state.db.list_modules().await?;
    Ok(HttpResponse::Ok().json(modules))
}

pub async fn get_module(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let module = state
        .db
        .get_module(path.into_inner())
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    // Unpublished modules are only visible to admins
    if !module.is_published && !user.is_admin() {
        return Err(AppError::DatabaseError(DatabaseError::NotFound));
    }

    Ok(HttpResponse::Ok().json(module))
}

pub async fn module_content(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let module_id = path.into_inner();

    let module = state
        .db
        .get_module(module_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;
    if !module.is_published && !user.is_admin() {
        return Err(AppError::DatabaseError(DatabaseError::NotFound));
    }

    let contents = state.db.list_module_contents(module_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "module": module,
        "sections": contents,
    })))
}
