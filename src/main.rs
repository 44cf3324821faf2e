use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use finwell_server::{
    achievements, ai, auth, calculators, goals, health_check, journal, modules, mood, progress,
    users, AppError, AppState, Settings,
};
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> finwell_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    // Periodic housekeeping: expired sessions and stale rate-limit windows
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(600)).await;

            match cleanup_state.db.cleanup_expired_sessions().await {
                Ok(0) => {}
                Ok(n) => info!("Removed {} expired sessions", n),
                Err(e) => warn!("Session cleanup failed: {}", e),
            }

            cleanup_state.rate_limiter.cleanup().await;
        }
    });

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    let workers = config.server.workers as usize;
    let cors_settings = config.cors.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = if cors_settings.enabled {
            let cors_config = Cors::default();

            let cors_config = if cors_settings.allow_any_origin {
                // actix-cors rejects credentials together with a wildcard origin
                cors_config
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
            } else {
                let mut restricted = cors_config
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                    .allowed_headers(vec!["Authorization", "Content-Type"])
                    .supports_credentials();
                for origin in &cors_settings.allowed_origins {
                    restricted = restricted.allowed_origin(origin);
                }
                restricted
            };

            cors_config.max_age(cors_settings.max_age as usize)
        } else {
            // CORS disabled - use most restrictive settings
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(auth::handlers::register))
                            .route("/login", web::post().to(auth::handlers::login))
                            .route("/logout", web::post().to(auth::handlers::logout))
                            .route("/me", web::get().to(auth::handlers::me)),
                    )
                    .service(
                        web::scope("/users")
                            .route("/profile", web::get().to(users::handlers::get_profile))
                            .route("/profile", web::put().to(users::handlers::update_profile))
                            .route("/preferences", web::get().to(users::handlers::get_preferences))
                            .route(
                                "/preferences",
                                web::put().to(users::handlers::update_preferences),
                            ),
                    )
                    .service(
                        web::scope("/modules")
                            .route("", web::get().to(modules::handlers::list_modules))
                            .route("/{id}", web::get().to(modules::handlers::get_module))
                            .route("/{id}/content", web::get().to(modules::handlers::module_content)),
                    )
                    .service(
                        web::scope("/progress")
                            .route("", web::get().to(progress::handlers::list_progress))
                            .route("/reviews", web::get().to(progress::handlers::due_reviews))
                            .route(
                                "/engagement-risk",
                                web::post().to(progress::handlers::engagement_risk),
                            )
                            .route(
                                "/optimal-time",
                                web::post().to(progress::handlers::optimal_time),
                            )
                            .route(
                                "/optimal-time",
                                web::get().to(progress::handlers::optimal_time_from_history),
                            )
                            .route(
                                "/{module_id}",
                                web::get().to(progress::handlers::module_progress),
                            )
                            .route(
                                "/{module_id}/sections/{index}",
                                web::put().to(progress::handlers::complete_section),
                            ),
                    )
                    .service(
                        web::scope("/calculators")
                            .route("/budget", web::post().to(calculators::handlers::budget))
                            .route(
                                "/savings-goal",
                                web::post().to(calculators::handlers::savings_goal),
                            )
                            .route(
                                "/debt-payoff",
                                web::post().to(calculators::handlers::debt_payoff),
                            )
                            .route(
                                "/compound-growth",
                                web::post().to(calculators::handlers::compound_growth),
                            ),
                    )
                    .service(
                        web::scope("/goals")
                            .route("", web::post().to(goals::handlers::create_goal))
                            .route("", web::get().to(goals::handlers::list_goals))
                            .route("/{id}", web::get().to(goals::handlers::get_goal))
                            .route("/{id}", web::put().to(goals::handlers::update_goal))
                            .route("/{id}", web::delete().to(goals::handlers::delete_goal)),
                    )
                    .service(
                        web::scope("/achievements")
                            .route("", web::get().to(achievements::handlers::list_achievements))
                            .route(
                                "/earned",
                                web::get().to(achievements::handlers::earned_achievements),
                            ),
                    )
                    .service(
                        web::scope("/ai")
                            .route("/key", web::put().to(ai::handlers::put_key))
                            .route(
                                "/conversations",
                                web::post().to(ai::handlers::create_conversation),
                            )
                            .route(
                                "/conversations",
                                web::get().to(ai::handlers::list_conversations),
                            )
                            .route(
                                "/conversations/{id}",
                                web::get().to(ai::handlers::get_conversation),
                            )
                            .route(
                                "/conversations/{id}",
                                web::delete().to(ai::handlers::delete_conversation),
                            )
                            .route(
                                "/conversations/{id}/messages",
                                web::post().to(ai::handlers::post_message),
                            ),
                    )
                    .service(
                        web::scope("/mood")
                            .route("", web::post().to(mood::handlers::checkin))
                            .route("", web::get().to(mood::handlers::list_entries))
                            .route("/insights", web::post().to(mood::handlers::insights))
                            .route(
                                "/insights",
                                web::get().to(mood::handlers::insights_from_history),
                            ),
                    )
                    .service(
                        web::scope("/journal")
                            .route("/prompts", web::get().to(journal::handlers::list_prompts))
                            .route(
                                "/prompts/suggested",
                                web::get().to(journal::handlers::suggested_prompt),
                            )
                            .route(
                                "/reflections",
                                web::post().to(journal::handlers::create_reflection),
                            )
                            .route(
                                "/reflections",
                                web::get().to(journal::handlers::list_reflections),
                            )
                            .route(
                                "/reflections/{id}",
                                web::get().to(journal::handlers::get_reflection),
                            )
                            .route(
                                "/reflections/{id}/step",
                                web::put().to(journal::handlers::answer_step),
                            )
                            .route("", web::post().to(journal::handlers::create_entry))
                            .route("", web::get().to(journal::handlers::list_entries))
                            .route("/{id}", web::get().to(journal::handlers::get_entry))
                            .route("/{id}", web::put().to(journal::handlers::update_entry))
                            .route("/{id}", web::delete().to(journal::handlers::delete_entry)),
                    ),
            )
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
