//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - registration / login (bcrypt hashing on a blocking thread)
//!   - leaderboard reads and point awards
//!   - the current-rank projection
//!   - quiz questions and idempotent quiz-result storage
//!   - video listings with per-account progress and the watch-threshold award

use tracing::{debug, info, instrument, warn};

use crate::domain::LeaderboardEntry;
use crate::error::{AppError, AppResult};
use crate::protocol::*;
use crate::state::AppState;
use crate::store::{NewAccount, ProgressUpdate, QuizRecord};
use crate::util::{coerce_points, non_blank, normalize_email, parse_progress};

const MAX_NAME: usize = 100;
const MAX_ROLE: usize = 50;
const MAX_INSTITUTION: usize = 100;
const MAX_QUIZ_NAME: usize = 255;
const MAX_THEME: usize = 100;

fn required<'a>(v: &'a Option<String>, field: &'static str) -> AppResult<&'a str> {
  non_blank(v.as_deref()).ok_or(AppError::MissingField(field))
}

fn bounded<'a>(v: &'a str, field: &'static str, max: usize) -> AppResult<&'a str> {
  if v.chars().count() > max {
    return Err(AppError::InvalidField { field, reason: format!("longer than {max} characters") });
  }
  Ok(v)
}

// -------- auth --------

#[instrument(level = "info", skip(state, body), fields(email = body.email.as_deref().unwrap_or("")))]
pub async fn register(state: &AppState, body: RegisterIn) -> AppResult<MessageOut> {
  let name = bounded(required(&body.name, "Name")?, "name", MAX_NAME)?.to_string();
  let email = normalize_email(required(&body.email, "Email")?);
  let role = bounded(required(&body.role, "Role")?, "role", MAX_ROLE)?.to_string();
  let institution = bounded(required(&body.institution, "Institution")?, "institution", MAX_INSTITUTION)?.to_string();
  // Passwords are taken verbatim; only emptiness is rejected.
  let password = body.password.filter(|p| !p.is_empty()).ok_or(AppError::MissingField("Password"))?;

  if state.store.find_account(&email).await.is_some() {
    return Err(AppError::DuplicateEmail);
  }

  let cost = state.config.bcrypt_cost;
  let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
    .await
    .map_err(|e| AppError::internal("hash task", e))?
    .map_err(|e| AppError::internal("bcrypt", e))?;

  let account = state
    .store
    .register(NewAccount { name, email, role, institution, password_hash })
    .await?;
  info!(target: "auth", email = %account.email, id = %account.id, "Account registered");
  Ok(MessageOut { message: "User registered successfully".into() })
}

#[instrument(level = "info", skip(state, body), fields(email = body.email.as_deref().unwrap_or("")))]
pub async fn login(state: &AppState, body: LoginIn) -> AppResult<LoginOut> {
  let email = non_blank(body.email.as_deref()).ok_or(AppError::InvalidCredentials)?;
  let password = body.password.unwrap_or_default();
  let account = state.store.find_account(email).await.ok_or(AppError::InvalidCredentials)?;

  let hash = account.password_hash.clone();
  let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
    .await
    .map_err(|e| AppError::internal("verify task", e))?;
  if !ok {
    warn!(target: "auth", email = %account.email, "Password mismatch");
    return Err(AppError::InvalidCredentials);
  }

  info!(target: "auth", email = %account.email, "Login succeeded");
  Ok(LoginOut { message: "Login successful".into(), user: UserOut::from(&account) })
}

// -------- leaderboard --------

pub async fn leaderboard(state: &AppState) -> Vec<LeaderboardRowOut> {
  state
    .store
    .leaderboard()
    .await
    .into_iter()
    .map(|r| LeaderboardRowOut { name: r.name, points: r.points })
    .collect()
}

#[instrument(level = "info", skip(state, body), fields(email = body.email.as_deref().unwrap_or("")))]
pub async fn update_points(state: &AppState, body: UpdatePointsIn) -> AppResult<Vec<LeaderboardEntry>> {
  let email = required(&body.email, "Email")?;
  let delta = coerce_points(body.points.as_ref());
  let board = state.store.add_points(email, delta).await?;
  info!(target: "leaderboard", %email, delta, entries = board.len(), "Points awarded");
  Ok(board)
}

pub async fn current_rank(state: &AppState, email: Option<&str>) -> AppResult<CurrentRankOut> {
  let email = non_blank(email).ok_or(AppError::MissingField("Email"))?;
  let snap = state.store.rank_snapshot(email).await?;
  Ok(CurrentRankOut {
    name: snap.account.name,
    points: snap.entry.points,
    level: snap.progress.level,
    xp: snap.progress.xp,
    xp_next_level: snap.progress.xp_next_level,
    xp_progress_percent: snap.progress.xp_progress_percent(),
    streak_days: snap.progress.streak_days,
    badge: snap.progress.badge,
  })
}

// -------- quiz --------

pub async fn questions(state: &AppState) -> Vec<QuestionOut> {
  state.store.questions().await.iter().map(QuestionOut::from).collect()
}

pub async fn question(state: &AppState, id: &str) -> AppResult<QuestionOut> {
  state.store.question(id).await.map(|q| QuestionOut::from(&q))
}

#[instrument(level = "info", skip(state))]
pub async fn store_quiz_result(state: &AppState, q: QuizResultQuery) -> AppResult<QuizResultOut> {
  let (email, quiz_name) = match (non_blank(q.email.as_deref()), non_blank(q.quiz_name.as_deref())) {
    (Some(e), Some(n)) => (e, n),
    _ => return Err(AppError::MissingField("Email and quiz_name")),
  };
  let quiz_name = bounded(quiz_name, "quiz_name", MAX_QUIZ_NAME)?;

  let record = state.store.record_quiz_result(email, quiz_name).await?;
  let message = match &record {
    QuizRecord::Created(_) => {
      info!(target: "quiz", %email, %quiz_name, "Quiz result stored; xp awarded");
      "Quiz result stored and progress updated"
    }
    QuizRecord::AlreadyRecorded(_) => {
      debug!(target: "quiz", %email, %quiz_name, "Quiz result already present");
      "Quiz result already exists, progress not updated"
    }
  };
  let r = record.result();
  Ok(QuizResultOut { message: message.into(), quiz_name: r.quiz_name.clone(), taken_at: r.taken_at })
}

// -------- videos --------

pub async fn videos_by_theme(state: &AppState, theme: &str, origin: &str) -> Vec<VideoOut> {
  state
    .store
    .videos_by_theme(theme)
    .await
    .iter()
    .map(|v| VideoOut::from_video(v, origin))
    .collect()
}

pub async fn user_video_progress(
  state: &AppState,
  theme: &str,
  email: Option<&str>,
  origin: &str,
) -> AppResult<Vec<VideoProgressOut>> {
  let email = non_blank(email).ok_or(AppError::MissingField("Email"))?;
  let rows = state.store.video_progress(email, theme).await?;
  Ok(with_progress(rows, origin))
}

/// Apply an optional progress submission (`video` + `progress`) and list the theme.
#[instrument(level = "info", skip(state, origin))]
pub async fn save_or_get_user_video_progress(
  state: &AppState,
  theme: &str,
  q: ProgressUpdateQuery,
  origin: &str,
) -> AppResult<Vec<VideoProgressOut>> {
  let email = non_blank(q.email.as_deref()).ok_or(AppError::MissingField("Email"))?;
  let theme = bounded(theme, "theme", MAX_THEME)?;

  let update = match (non_blank(q.video.as_deref()), q.progress.as_deref()) {
    (Some(video), Some(raw)) => {
      let progress = parse_progress(raw).ok_or_else(|| AppError::InvalidField {
        field: "progress",
        reason: format!("'{raw}' is not a number"),
      })?;
      Some(ProgressUpdate { video: video.to_string(), progress })
    }
    _ => None,
  };

  let rows = state.store.save_video_progress(email, theme, update).await?;
  Ok(with_progress(rows, origin))
}

fn with_progress(rows: Vec<(crate::domain::Video, f64)>, origin: &str) -> Vec<VideoProgressOut> {
  rows
    .iter()
    .map(|(v, progress)| VideoProgressOut { video: VideoOut::from_video(v, origin), progress: *progress })
    .collect()
}
