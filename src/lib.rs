pub mod config;
pub mod drive;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::drive::RemoteDrive;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub drive: Arc<dyn RemoteDrive>,
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/drive/auth-url", get(handlers::auth::auth_url))
        .route("/drive/refresh", post(handlers::auth::refresh_session))
        .route("/drive/disconnect", post(handlers::auth::disconnect))
        .route("/drive/files", get(handlers::file::list_files))
        .route("/drive/files/upload", post(handlers::file::upload_file))
        .route("/drive/files/{id}", get(handlers::file::get_file));

    Router::new()
        .nest("/api/v1", api_routes)
        // Registered with the provider; stays outside the /api/v1 nest
        .route(
            "/api/auth/callback/google",
            get(handlers::auth::google_callback),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
