use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::ai::{ChatTurn, COACH_SYSTEM_PROMPT};
use crate::auth::current_user;
use crate::db::models::{AiConversation, AiMessage};
use crate::error::{AppError, AuthError, DatabaseError, ProviderError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PutKeyRequest {
    pub api_key: String,
}

/// Stores (or replaces) the user's provider API key, encrypted at rest.
pub async fn put_key(
    req: HttpRequest,
    body: web::Json<PutKeyRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if body.api_key.trim().is_empty() {
        return Err(AppError::ValidationError("api_key must not be empty".into()));
    }

    let sealed = state.key_vault.seal(&body.api_key)?;
    state
        .db
        .upsert_provider_key(user.id, &sealed.ciphertext, &sealed.nonce)
        .await?;
    info!("Provider key updated for user {}", user.id);

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

pub async fn create_conversation(
    req: HttpRequest,
    body: web::Json<CreateConversationRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let conversation = AiConversation::new(user.id, body.title.clone());
    let conversation = state.db.create_conversation(&conversation).await?;
    Ok(HttpResponse::Created().json(conversation))
}

pub async fn list_conversations(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let conversations = state.db.list_conversations(user.id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

pub async fn get_conversation(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let conversation = state
        .db
        .get_conversation(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;
    let messages = state.db.list_messages(conversation.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "conversation": conversation,
        "messages": messages,
    })))
}

pub async fn delete_conversation(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;
    let deleted = state
        .db
        .delete_conversation(path.into_inner(), user.id)
        .await?;
    if deleted == 0 {
        return Err(AppError::DatabaseError(DatabaseError::NotFound));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Sends a message to the coach: persists the user turn, calls the
/// provider with the full history, persists and returns the reply.
pub async fn post_message(
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<PostMessageRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&req, &state).await?;

    if body.content.trim().is_empty() {
        return Err(AppError::ValidationError("content must not be empty".into()));
    }

    // Provider calls are the expensive path; rate limit them per user
    if !state.rate_limiter.check_rate_limit(user.id, &user.role).await {
        return Err(AppError::AuthError(AuthError::RateLimited));
    }

    let conversation = state
        .db
        .get_conversation(path.into_inner(), user.id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    let stored = state
        .db
        .get_provider_key(user.id)
        .await?
        .ok_or(AppError::ProviderError(ProviderError::MissingApiKey))?;
    let api_key = state.key_vault.open(&stored.encrypted_key, &stored.nonce)?;

    let history = state.db.list_messages(conversation.id).await?;
    let mut turns: Vec<ChatTurn> = history
        .iter()
        .map(|m| ChatTurn {
            role: m.sender.clone(),
            content: m.content.clone(),
        })
        .collect();
    turns.push(ChatTurn {
        role: "user".to_string(),
        content: body.content.clone(),
    });

    let reply = state
        .provider
        .complete(&api_key, COACH_SYSTEM_PROMPT, &turns)
        .await?;

    let user_message = state
        .db
        .insert_message(&AiMessage::new(conversation.id, "user", body.content.clone()))
        .await?;
    let assistant_message = state
        .db
        .insert_message(&AiMessage::new(conversation.id, "assistant", reply))
        .await?;
    state.db.touch_conversation(conversation.id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "user_message": user_message,
        "assistant_message": assistant_message,
    })))
}
