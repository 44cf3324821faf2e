pub mod achievements;
pub mod ai;
pub mod auth;
pub mod calculators;
pub mod config;
pub mod db;
pub mod error;
pub mod goals;
pub mod journal;
pub mod modules;
pub mod mood;
pub mod progress;
pub mod users;
pub mod wellness;

use actix_web::{web, HttpResponse};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, RateLimitConfig, RateLimiter};
pub use db::{DbOperations, User, UserSession};

use ai::{CompletionProvider, HttpCompletionProvider, KeyVault};
use error::DatabaseError;

/// Health check endpoint handler
/// Returns a JSON response with server status and connection pool stats
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let pool = state.db.get_pool_status().await.ok();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.environment,
        "db_pool": pool.map(|p| serde_json::json!({
            "total": p.total_connections,
            "active": p.active_connections,
            "idle": p.idle_connections,
        })),
    }))
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: Arc<PgPool>,
    pub db: DbOperations,
    pub auth: Arc<AuthService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub key_vault: Arc<KeyVault>,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        // Lazy pool: the server comes up even when the database is still
        // starting; individual queries fail until it is reachable.
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_lazy(&config.database.url)
            .map_err(|e| {
                AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string()))
            })?;
        let db_pool = Arc::new(pool);

        let db = DbOperations::new(db_pool.clone());
        let auth = Arc::new(AuthService::new(
            db.clone(),
            config.auth.jwt_secret.clone(),
            config.auth.token_expiry_hours,
        ));
        let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
        let key_vault = Arc::new(KeyVault::from_base64_key(&config.ai.key_encryption_key)?);
        let provider: Arc<dyn CompletionProvider> = Arc::new(HttpCompletionProvider::new(
            &config.ai.base_url,
            config.ai.model.clone(),
            config.ai.max_tokens,
        )?);

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            db,
            auth,
            rate_limiter,
            key_vault,
            provider,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Close database connections
        self.db_pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn cleanup_env() {
        env::remove_var("APP_DATABASE__URL");
        env::remove_var("DATABASE_URL");
    }

    #[tokio::test]
    async fn test_app_state_creation() {
        cleanup_env();
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::new(config).await;

        // The pool is lazy, so construction succeeds without a database
        assert!(state.is_ok());
    }

    #[tokio::test]
    async fn test_app_state_clone() {
        cleanup_env();
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::new(config).await.expect("Failed to build state");

        let cloned = state.clone();

        // Verify Arc references are shared
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.db_pool, &cloned.db_pool));
    }
}
