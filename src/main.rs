//! Mentor Platform Admin Console
//!
//! A headless admin console service: each session holds a view navigator driven by actions
//! and backed by the platform's admin REST API.

mod api;
mod auth;
mod backend;
mod config;
mod errors;
mod models;
mod navigator;
mod session;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backend::HttpBackend;
use config::Config;
use navigator::Navigator;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mentor Admin Console");
    tracing::info!("Platform backend: {}", config.backend_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.console_psk.is_none() {
        tracing::warn!("No console PSK configured (MENTOR_CONSOLE_PSK). Authentication is disabled!");
    }
    if config.backend_token.is_none() {
        tracing::warn!("No backend token configured (MENTOR_BACKEND_TOKEN). Admin calls will be rejected upstream");
    }

    let backend = HttpBackend::new(&config)?;

    let sessions = Arc::new(SessionStore::new(config.session_ttl));
    session::spawn_sweeper(sessions.clone());

    let state = AppState {
        navigator: Arc::new(Navigator::new(Arc::new(backend))),
        sessions,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.console_psk.clone();

    let api_routes = Router::new()
        .route("/sessions", post(api::create_session))
        .route(
            "/sessions/{id}",
            get(api::get_session).delete(api::delete_session),
        )
        .route("/sessions/{id}/actions", post(api::dispatch_action))
        .route(
            "/sessions/{id}/students/{student_id}/cv",
            get(api::download_cv),
        )
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
