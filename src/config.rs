//! Server settings from the environment, plus the optional TOML content bank.
//!
//! The content bank (`CONTENT_CONFIG_PATH`) lets deployments ship extra quiz
//! questions and catalog videos without touching the built-in seeds:
//!
//! ```toml
//! [[questions]]
//! quiz_name = "Water"
//! quiz_question = "Which is the largest source of fresh water?"
//! options = ["Rivers", "Glaciers", "Lakes", "Rain"]
//! correct_answer = "2"
//!
//! [[videos]]
//! title = "Flood Diaries"
//! theme = "disasters"
//! video_url = "https://example.org/flood.mp4"
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
/// Origins always allowed next to `CORS_ORIGIN`.
pub const EXTRA_CORS_ORIGINS: [&str; 2] = [
  "http://localhost:5174",
  "https://paryavaran-rakshak-cosmohack.vercel.app",
];

#[derive(Clone, Debug)]
pub struct ServerConfig {
  pub port: u16,
  pub cors_origins: Vec<String>,
  /// Root of the uploads tree served under `/media`.
  pub media_dir: PathBuf,
  /// JSON snapshot file; `None` keeps everything in memory only.
  pub data_path: Option<PathBuf>,
  pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      cors_origins: default_cors_origins(DEFAULT_CORS_ORIGIN),
      media_dir: PathBuf::from("uploads"),
      data_path: None,
      bcrypt_cost: DEFAULT_BCRYPT_COST,
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Self {
    let defaults = Self::default();
    let primary = std::env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into());
    Self {
      port: parse_env("PORT", defaults.port),
      cors_origins: default_cors_origins(&primary),
      media_dir: std::env::var("MEDIA_DIR").map(PathBuf::from).unwrap_or(defaults.media_dir),
      data_path: std::env::var("DATA_PATH").ok().filter(|s| !s.is_empty()).map(PathBuf::from),
      bcrypt_cost: parse_env("BCRYPT_COST", defaults.bcrypt_cost),
    }
  }
}

fn default_cors_origins(primary: &str) -> Vec<String> {
  let mut out = vec![primary.to_string()];
  for o in EXTRA_CORS_ORIGINS {
    if o != primary {
      out.push(o.to_string());
    }
  }
  out
}

fn parse_env<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
  match std::env::var(key) {
    Ok(raw) => match raw.parse::<T>() {
      Ok(v) => v,
      Err(_) => {
        warn!(target: "paryavaran", %key, %raw, %default, "Invalid value, using default");
        default
      }
    },
    Err(_) => default,
  }
}

/// Extra content accepted from TOML.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentConfig {
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
  #[serde(default)]
  pub videos: Vec<VideoCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub quiz_name: String,
  pub quiz_question: String,
  pub options: [String; 4],
  pub correct_answer: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VideoCfg {
  pub title: String,
  pub theme: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub thumbnail: Option<String>,
  #[serde(default)] pub video: Option<String>,
  #[serde(default)] pub video_url: Option<String>,
}

/// Attempt to load `ContentConfig` from CONTENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_content_config_from_env() -> Option<ContentConfig> {
  let path = std::env::var("CONTENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ContentConfig>(&s) {
      Ok(cfg) => {
        info!(target: "paryavaran", %path, questions = cfg.questions.len(), videos = cfg.videos.len(), "Loaded content config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "paryavaran", %path, error = %e, "Failed to parse TOML content config");
        None
      }
    },
    Err(e) => {
      error!(target: "paryavaran", %path, error = %e, "Failed to read TOML content config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cors_list_keeps_primary_first_without_duplicates() {
    let list = default_cors_origins("http://localhost:5174");
    assert_eq!(list[0], "http://localhost:5174");
    assert_eq!(list.len(), 2);
    assert_eq!(default_cors_origins(DEFAULT_CORS_ORIGIN).len(), 3);
  }

  #[test]
  fn content_bank_parses_from_toml() {
    let raw = r#"
      [[questions]]
      quiz_name = "Water"
      quiz_question = "Largest fresh water store?"
      options = ["Rivers", "Glaciers", "Lakes", "Rain"]
      correct_answer = "2"

      [[videos]]
      title = "Flood Diaries"
      theme = "disasters"
      video_url = "https://example.org/flood.mp4"
    "#;
    let cfg: ContentConfig = toml::from_str(raw).expect("toml");
    assert_eq!(cfg.questions[0].options[1], "Glaciers");
    assert_eq!(cfg.videos[0].video_url.as_deref(), Some("https://example.org/flood.mp4"));
    assert!(cfg.videos[0].thumbnail.is_none());
  }
}
