//! Router assembly: API endpoints, media files, CORS allow-list, and HTTP tracing.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::state::AppState;

pub mod http;
pub mod upload;

/// Build the application router with:
/// - JSON API under `/api/...` (trailing-slash variants the web client uses included)
/// - multipart upload at `POST /api/videos` with its own body ceiling
/// - uploaded media under `/media`
/// - CORS restricted to the configured origins
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "paryavaran", origin = %o, error = %e, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    let media = ServeDir::new(&state.config.media_dir);

    let api = Router::new()
        .route("/health", get(http::http_health))
        // Auth
        .route("/register", post(http::http_register))
        .route("/login", post(http::http_login))
        // Leaderboard + rank
        .route("/leaderboard", get(http::http_leaderboard))
        .route("/leaderboard/update", post(http::http_update_points))
        .route("/current-rank", get(http::http_current_rank))
        // Videos
        .route(
            "/videos",
            post(upload::http_upload_video).layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT)),
        )
        .route("/videos/theme/:theme", get(http::http_videos_by_theme))
        .route("/user/videos/progress/:theme", get(http::http_user_video_progress))
        .route("/user/videos/progressUpdate/:theme", get(http::http_save_video_progress))
        // Quiz
        .route("/questions", get(http::http_questions))
        .route("/questions/", get(http::http_questions))
        .route("/questions/:id", get(http::http_question_detail))
        .route("/store_quiz_result", get(http::http_store_quiz_result))
        .route("/store_quiz_result/", get(http::http_store_quiz_result));

    Router::new()
        .route("/", get(http::http_root))
        .nest("/api", api)
        .nest_service("/media", media)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
