//! HTTP surface: JSON endpoints plus the static front end.

use std::path::Path;

use axum::{
    extract::FromRequest,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::AppError;
use crate::AppState;

pub mod assistant;
pub mod health;

/// `Json` extractor whose rejections answer with the usual `{detail}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Build the full application router.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // ============ Assistant API ============
        .route("/api/generate-questions", post(assistant::generate_questions))
        .route("/api/refresh-question", post(assistant::refresh_question))
        .route("/api/generate-tz", post(assistant::generate_tz))
        // ============ Health Check ============
        .route("/api/health", get(health::health_check))
        // ============ Front end ============
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
