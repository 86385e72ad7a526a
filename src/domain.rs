//! Domain models persisted by the store: accounts, leaderboard, progress, quizzes and videos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// XP granted the first time an account records a result for a quiz.
pub const QUIZ_XP_AWARD: i64 = 100;
/// XP granted when an account's progress on a video first rises above the watch threshold.
pub const VIDEO_XP_AWARD: i64 = 10;
/// Watch percentage a video must exceed before it counts as watched.
pub const VIDEO_WATCH_THRESHOLD: f64 = 70.0;

pub const INITIAL_LEVEL: i64 = 1;
pub const INITIAL_XP_NEXT_LEVEL: i64 = 1000;

/// Registered user. Keyed by (normalized) email.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub role: String,
  pub institution: String,
  /// bcrypt hash, never leaves the store through an API payload.
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Running point total per email.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
  pub email: String,
  pub points: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl LeaderboardEntry {
  pub fn new(email: String, now: DateTime<Utc>) -> Self {
    Self { email, points: 0, created_at: now, updated_at: now }
  }
}

/// Gamification state, one per account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProgress {
  pub user: Uuid,
  pub level: i64,
  pub xp: i64,
  pub xp_next_level: i64,
  pub streak_days: i64,
  pub last_active: DateTime<Utc>,
  #[serde(default)] pub badge: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl UserProgress {
  pub fn new(user: Uuid, now: DateTime<Utc>) -> Self {
    Self {
      user,
      level: INITIAL_LEVEL,
      xp: 0,
      xp_next_level: INITIAL_XP_NEXT_LEVEL,
      streak_days: 0,
      last_active: now,
      badge: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// XP as a whole percentage of the next level requirement, capped at 100.
  pub fn xp_progress_percent(&self) -> i64 {
    if self.xp_next_level <= 0 {
      return 0;
    }
    let pct = (self.xp as f64 / self.xp_next_level as f64 * 100.0).floor() as i64;
    pct.min(100)
  }

  pub fn award_xp(&mut self, amount: i64, now: DateTime<Utc>) {
    self.xp += amount;
    self.updated_at = now;
  }
}

/// One multiple-choice question. `correct_answer` is one of "1".."4".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub id: Uuid,
  pub quiz_name: String,
  pub quiz_question: String,
  pub quiz_option_1: String,
  pub quiz_option_2: String,
  pub quiz_option_3: String,
  pub quiz_option_4: String,
  pub correct_answer: String,
  pub created_at: DateTime<Utc>,
}

/// Marks that an account completed (passed) a quiz. Unique per (user, quiz_name).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
  pub user: Uuid,
  pub quiz_name: String,
  pub taken_at: DateTime<Utc>,
}

/// Catalog entry for a lesson video.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Video {
  pub id: Uuid,
  pub title: String,
  pub theme: String,
  #[serde(default)] pub description: Option<String>,
  /// File name under `<media>/thumbnails`.
  #[serde(default)] pub thumbnail: Option<String>,
  /// File name under `<media>/videos`.
  #[serde(default)] pub video: Option<String>,
  #[serde(default)] pub video_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Per-account watch progress for a video. Unique per (user, video).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoProgress {
  pub user: Uuid,
  pub video: Uuid,
  pub theme: String,
  pub progress: f64,
  pub updated_at: DateTime<Utc>,
}

/// True when moving from `previous` to `next` crosses the watch threshold.
/// A video with no stored progress starts at zero.
pub fn crosses_watch_threshold(previous: Option<f64>, next: f64) -> bool {
  previous.unwrap_or(0.0) <= VIDEO_WATCH_THRESHOLD && next > VIDEO_WATCH_THRESHOLD
}

/// Case-insensitive exact match used for theme grouping.
pub fn same_theme(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}
