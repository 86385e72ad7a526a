//! Minimal HTTP client for the API, used by the quiz flow and by tooling.
//!
//! Requests are instrumented and log status codes and sizes (never passwords).

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::protocol::{QuestionOut, QuizResultOut, VideoOut};
use crate::quiz::QuizScore;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("API returned {status}: {message}")]
  Api { status: StatusCode, message: String },
}

/// A file to attach to an upload.
pub struct MediaFile {
  pub file_name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

/// Catalog fields for `upload_video`.
#[derive(Default)]
pub struct UploadForm {
  pub title: String,
  pub theme: String,
  pub description: Option<String>,
  pub video_url: Option<String>,
  pub thumbnail: Option<MediaFile>,
  pub video: Option<MediaFile>,
}

#[derive(Clone)]
pub struct ApiClient {
  pub client: reqwest::Client,
  /// e.g. `http://localhost:8000/api`
  pub base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent("paryavaran-client/0.1")
      .build()?;
    Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp.json::<T>().await?);
    }
    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    let message = body
      .get("error")
      .and_then(|v| v.as_str())
      .unwrap_or("unknown error")
      .to_string();
    Err(ClientError::Api { status, message })
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn questions(&self) -> Result<Vec<QuestionOut>, ClientError> {
    let resp = self.client.get(self.url("questions")).send().await?;
    let out: Vec<QuestionOut> = Self::decode(resp).await?;
    debug!(target: "quiz", count = out.len(), "Fetched questions");
    Ok(out)
  }

  #[instrument(level = "info", skip(self))]
  pub async fn store_quiz_result(&self, email: &str, quiz_name: &str) -> Result<QuizResultOut, ClientError> {
    let resp = self
      .client
      .get(self.url("store_quiz_result"))
      .query(&[("email", email), ("quiz_name", quiz_name)])
      .send()
      .await?;
    Self::decode(resp).await
  }

  /// Fire-and-forget result storage for a passing score. Failures are only logged,
  /// so showing the result never waits on it. Returns the task for callers that want to await.
  pub fn record_if_passing(&self, email: &str, score: &QuizScore) -> Option<JoinHandle<()>> {
    if !score.passed() {
      debug!(target: "quiz", quiz = %score.quiz_name, pct = score.percentage, "Below threshold; not recording");
      return None;
    }
    let this = self.clone();
    let email = email.to_string();
    let quiz_name = score.quiz_name.clone();
    Some(tokio::spawn(async move {
      match this.store_quiz_result(&email, &quiz_name).await {
        Ok(out) => info!(target: "quiz", %quiz_name, message = %out.message, "Quiz result recorded"),
        Err(e) => warn!(target: "quiz", %quiz_name, error = %e, "Recording quiz result failed"),
      }
    }))
  }

  #[instrument(level = "info", skip(self, form), fields(title = %form.title, theme = %form.theme))]
  pub async fn upload_video(&self, form: UploadForm) -> Result<VideoOut, ClientError> {
    let mut multipart = reqwest::multipart::Form::new()
      .text("title", form.title)
      .text("theme", form.theme);
    if let Some(d) = form.description {
      multipart = multipart.text("description", d);
    }
    if let Some(u) = form.video_url {
      multipart = multipart.text("video_url", u);
    }
    for (field, file) in [("thumbnail", form.thumbnail), ("video", form.video)] {
      if let Some(f) = file {
        let part = reqwest::multipart::Part::bytes(f.bytes)
          .file_name(f.file_name)
          .mime_str(&f.mime)?;
        multipart = multipart.part(field, part);
      }
    }
    let resp = self.client.post(self.url("videos")).multipart(multipart).send().await?;
    Self::decode(resp).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use tokio::net::TcpListener;

  use crate::config::ServerConfig;
  use crate::quiz::QuizSession;
  use crate::routes::build_router;
  use crate::seeds::{seed_questions, seed_videos};
  use crate::state::AppState;
  use crate::store::{NewAccount, Store};

  async fn spawn_server() -> (ApiClient, Store, std::path::PathBuf) {
    let media = std::env::temp_dir().join(format!("paryavaran-client-{}", uuid::Uuid::new_v4()));
    for sub in ["thumbnails", "videos"] {
      std::fs::create_dir_all(media.join(sub)).expect("media dir");
    }
    let store = Store::in_memory();
    store.seed(&seed_questions(), &seed_videos()).await.expect("seed");
    store
      .register(NewAccount {
        name: "Kiran".into(),
        email: "kiran@example.com".into(),
        role: "student".into(),
        institution: "Eco Club".into(),
        password_hash: "unused".into(),
      })
      .await
      .expect("register");
    let config = ServerConfig { media_dir: media.clone(), bcrypt_cost: 4, ..ServerConfig::default() };
    let app = build_router(Arc::new(AppState::with_store(store.clone(), config)));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
      let _ = axum::serve(listener, app).await;
    });
    let client = ApiClient::new(format!("http://{addr}/api")).expect("client");
    (client, store, media)
  }

  #[tokio::test]
  async fn passing_quiz_is_recorded_in_the_background() {
    let (client, store, media) = spawn_server().await;
    let mut session = QuizSession::new(client.questions().await.expect("questions"));
    session.select("Nature").expect("select");
    let ids: Vec<_> = session.current_questions().iter().map(|q| (q.id, q.correct_answer.clone())).collect();
    for (id, answer) in ids {
      session.answer(id, &answer).expect("answer");
    }
    let score = session.submit().expect("submit").clone();
    assert!(score.passed());

    let task = client.record_if_passing("kiran@example.com", &score).expect("spawned");
    task.await.expect("join");
    assert_eq!(store.xp_of("kiran@example.com").await, Some(100));
    let _ = std::fs::remove_dir_all(media);
  }

  #[tokio::test]
  async fn failing_quiz_is_not_recorded() {
    let (client, store, media) = spawn_server().await;
    let mut session = QuizSession::new(client.questions().await.expect("questions"));
    session.select("Nature").expect("select");
    let first = session.current_questions()[0].id;
    session.answer(first, "1").expect("answer");
    let score = session.submit().expect("submit").clone();
    assert!(client.record_if_passing("kiran@example.com", &score).is_none());
    assert_eq!(store.xp_of("kiran@example.com").await, Some(0));
    let _ = std::fs::remove_dir_all(media);
  }

  #[tokio::test]
  async fn api_errors_surface_status_and_message() {
    let (client, _store, media) = spawn_server().await;
    let err = client.store_quiz_result("ghost@example.com", "Nature").await.expect_err("404");
    match err {
      ClientError::Api { status, message } => {
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "User not found");
      }
      other => panic!("unexpected error: {other}"),
    }
    let _ = std::fs::remove_dir_all(media);
  }

  #[tokio::test]
  async fn uploads_land_in_the_catalog_and_media_dir() {
    let (client, store, media) = spawn_server().await;
    let form = UploadForm {
      title: "Flood Diaries".into(),
      theme: "disasters".into(),
      description: Some("Rising rivers".into()),
      thumbnail: Some(MediaFile { file_name: "cover.png".into(), mime: "image/png".into(), bytes: vec![1, 2, 3] }),
      video: Some(MediaFile { file_name: "clip.mp4".into(), mime: "video/mp4".into(), bytes: vec![0; 64] }),
      ..UploadForm::default()
    };
    let out = client.upload_video(form).await.expect("upload");
    let video_url = out.video.expect("video url");
    assert!(video_url.contains("/media/videos/") && video_url.ends_with(".mp4"));
    let stored = video_url.rsplit('/').next().expect("file name");
    assert_eq!(std::fs::read(media.join("videos").join(stored)).expect("stored").len(), 64);
    assert_eq!(store.videos_by_theme("Disasters").await.len(), 1);

    let bad = UploadForm {
      title: "Bad".into(),
      theme: "disasters".into(),
      thumbnail: Some(MediaFile { file_name: "notes.txt".into(), mime: "text/plain".into(), bytes: vec![1] }),
      ..UploadForm::default()
    };
    match client.upload_video(bad).await {
      Err(ClientError::Api { status, .. }) => assert_eq!(status, StatusCode::BAD_REQUEST),
      other => panic!("expected rejection, got {:?}", other.map(|v| v.title)),
    }
    let _ = std::fs::remove_dir_all(media);
  }
}
