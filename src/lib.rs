pub mod appresult;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod profiles;
pub mod rooms;
pub mod session;

use std::sync::Arc;

use axum::{Json, Router, extract::FromRef, routing::get};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

pub use appresult::{AppError, AppResult, JsonBody};

use cache::SharedCache;
use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub cache: SharedCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, cache: SharedCache, config: Config) -> Self {
        Self {
            db_pool,
            cache,
            config: Arc::new(config),
        }
    }
}

/// The whole HTTP surface, mounted under `/api`, with sessions attached.
pub fn app(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(app_state.config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(i64::from(
            app_state.config.session_idle_minutes.get(),
        ))));

    let api = Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(profiles::router())
        .merge(rooms::router());

    Router::new()
        .nest("/api", api)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::NotFound("route")
}
