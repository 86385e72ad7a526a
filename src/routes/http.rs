//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{FromRequest, Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  Json,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::error::{AppError, AppResult};
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;
use crate::util::request_origin;

/// `Json` extractor whose rejections become `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[instrument(level = "info")]
pub async fn http_root() -> impl IntoResponse {
  Json(json!({ "message": "Adventure Learning API is running" }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

// -------- auth --------

#[instrument(level = "info", skip_all)]
pub async fn http_register(
  State(state): State<Arc<AppState>>,
  AppJson(body): AppJson<RegisterIn>,
) -> AppResult<impl IntoResponse> {
  let out = logic::register(&state, body).await?;
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip_all)]
pub async fn http_login(
  State(state): State<Arc<AppState>>,
  AppJson(body): AppJson<LoginIn>,
) -> AppResult<impl IntoResponse> {
  Ok(Json(logic::login(&state, body).await?))
}

// -------- leaderboard --------

#[instrument(level = "info", skip(state))]
pub async fn http_leaderboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let rows = logic::leaderboard(&state).await;
  info!(target: "leaderboard", entries = rows.len(), "HTTP leaderboard served");
  Json(rows)
}

#[instrument(level = "info", skip_all)]
pub async fn http_update_points(
  State(state): State<Arc<AppState>>,
  AppJson(body): AppJson<UpdatePointsIn>,
) -> AppResult<impl IntoResponse> {
  Ok(Json(logic::update_points(&state, body).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_current_rank(
  State(state): State<Arc<AppState>>,
  Query(q): Query<EmailQuery>,
) -> AppResult<impl IntoResponse> {
  Ok(Json(logic::current_rank(&state, q.email.as_deref()).await?))
}

// -------- videos --------

#[instrument(level = "info", skip(state, headers))]
pub async fn http_videos_by_theme(
  State(state): State<Arc<AppState>>,
  Path(theme): Path<String>,
  headers: HeaderMap,
) -> impl IntoResponse {
  let videos = logic::videos_by_theme(&state, &theme, &request_origin(&headers)).await;
  info!(target: "video", %theme, count = videos.len(), "HTTP theme videos served");
  Json(videos)
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_user_video_progress(
  State(state): State<Arc<AppState>>,
  Path(theme): Path<String>,
  Query(q): Query<EmailQuery>,
  headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
  let origin = request_origin(&headers);
  Ok(Json(logic::user_video_progress(&state, &theme, q.email.as_deref(), &origin).await?))
}

// Side-effecting GET kept for client compatibility.
#[instrument(level = "info", skip(state, headers))]
pub async fn http_save_video_progress(
  State(state): State<Arc<AppState>>,
  Path(theme): Path<String>,
  Query(q): Query<ProgressUpdateQuery>,
  headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
  let origin = request_origin(&headers);
  Ok(Json(logic::save_or_get_user_video_progress(&state, &theme, q, &origin).await?))
}

// -------- quiz --------

#[instrument(level = "info", skip(state))]
pub async fn http_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(logic::questions(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_question_detail(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
  Ok(Json(logic::question(&state, &id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_store_quiz_result(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizResultQuery>,
) -> AppResult<impl IntoResponse> {
  Ok(Json(logic::store_quiz_result(&state, q).await?))
}
