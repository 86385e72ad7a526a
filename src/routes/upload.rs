//! Multipart media upload: catalog fields plus an optional thumbnail and video file.
//!
//! Files are buffered and checked (extension, mime type, size) before anything is
//! written, so a rejected request leaves no stray files behind.

use std::{path::Path, sync::Arc};

use axum::{
  extract::{multipart::MultipartError, Multipart, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::Video;
use crate::error::{AppError, AppResult};
use crate::protocol::VideoOut;
use crate::state::AppState;
use crate::util::{non_blank, request_origin, trunc_for_log, unique_file_name};

pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const VIDEO_MAX_BYTES: usize = 100 * 1024 * 1024;
/// Whole-request ceiling: both files plus form overhead.
pub const UPLOAD_BODY_LIMIT: usize = IMAGE_MAX_BYTES + VIDEO_MAX_BYTES + 1024 * 1024;

const MAX_TITLE: usize = 200;
const MAX_THEME: usize = 100;

pub struct MediaRule {
  pub field: &'static str,
  pub folder: &'static str,
  pub max_bytes: usize,
  pub kinds: &'static [&'static str],
}

pub const THUMBNAIL_RULE: MediaRule = MediaRule {
  field: "thumbnail",
  folder: "thumbnails",
  max_bytes: IMAGE_MAX_BYTES,
  kinds: &["jpeg", "jpg", "png", "gif", "webp"],
};

pub const VIDEO_RULE: MediaRule = MediaRule {
  field: "video",
  folder: "videos",
  max_bytes: VIDEO_MAX_BYTES,
  kinds: &["mp4", "avi", "mov", "wmv", "flv", "mkv", "webm"],
};

impl MediaRule {
  /// Extension must be an allowed kind and the mime type must mention one.
  /// Returns the normalized extension.
  pub fn check(&self, file_name: &str, mime: &str) -> AppResult<String> {
    let ext = Path::new(file_name)
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_lowercase)
      .unwrap_or_default();
    let mime = mime.to_lowercase();
    if self.kinds.contains(&ext.as_str()) && self.kinds.iter().any(|k| mime.contains(k)) {
      Ok(ext)
    } else {
      let kind = if self.folder == "videos" { "video" } else { "image" };
      Err(AppError::InvalidUpload(format!("Only {kind} files are allowed!")))
    }
  }
}

struct Buffered {
  ext: String,
  bytes: Vec<u8>,
}

fn multipart_err(e: MultipartError) -> AppError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    AppError::PayloadTooLarge { field: "request", limit_bytes: UPLOAD_BODY_LIMIT }
  } else {
    AppError::InvalidUpload(e.body_text())
  }
}

async fn store_file(media_dir: &Path, rule: &MediaRule, file: Buffered) -> AppResult<String> {
  let name = unique_file_name(&file.ext);
  let path = media_dir.join(rule.folder).join(&name);
  tokio::fs::write(&path, &file.bytes).await?;
  info!(target: "media", folder = rule.folder, %name, bytes = file.bytes.len(), "Stored upload");
  Ok(name)
}

#[instrument(level = "info", skip_all)]
pub async fn http_upload_video(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
  let mut title = None;
  let mut theme = None;
  let mut description = None;
  let mut video_url = None;
  let mut thumbnail = None;
  let mut video = None;

  while let Some(mut field) = multipart.next_field().await.map_err(multipart_err)? {
    let name = field.name().unwrap_or_default().to_string();
    let rule = match name.as_str() {
      "thumbnail" => &THUMBNAIL_RULE,
      "video" => &VIDEO_RULE,
      _ => {
        let text = field.text().await.map_err(multipart_err)?;
        match name.as_str() {
          "title" => title = Some(text),
          "theme" => theme = Some(text),
          "description" => description = Some(text),
          "video_url" => video_url = Some(text),
          _ => {}
        }
        continue;
      }
    };

    let file_name = field.file_name().unwrap_or_default().to_string();
    let mime = field.content_type().unwrap_or_default().to_string();
    let ext = rule.check(&file_name, &mime)?;
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_err)? {
      if bytes.len() + chunk.len() > rule.max_bytes {
        return Err(AppError::PayloadTooLarge { field: rule.field, limit_bytes: rule.max_bytes });
      }
      bytes.extend_from_slice(&chunk);
    }
    info!(target: "media", field = rule.field, original = %trunc_for_log(&file_name, 80), bytes = bytes.len(), "Received file");
    let buffered = Some(Buffered { ext, bytes });
    if rule.field == "video" { video = buffered } else { thumbnail = buffered }
  }

  let title = non_blank(title.as_deref()).ok_or(AppError::MissingField("title"))?.to_string();
  let theme = non_blank(theme.as_deref()).ok_or(AppError::MissingField("theme"))?.to_string();
  if title.chars().count() > MAX_TITLE || theme.chars().count() > MAX_THEME {
    return Err(AppError::InvalidField { field: "title/theme", reason: "too long".into() });
  }

  let media_dir = &state.config.media_dir;
  let thumbnail = match thumbnail {
    Some(f) => Some(store_file(media_dir, &THUMBNAIL_RULE, f).await?),
    None => None,
  };
  let video_file = match video {
    Some(f) => Some(store_file(media_dir, &VIDEO_RULE, f).await?),
    None => None,
  };

  let now = Utc::now();
  let saved = state
    .store
    .insert_video(Video {
      id: Uuid::new_v4(),
      title,
      theme,
      description: description.filter(|d| !d.trim().is_empty()),
      thumbnail,
      video: video_file,
      video_url: video_url.filter(|u| !u.trim().is_empty()),
      created_at: now,
      updated_at: now,
    })
    .await?;
  info!(target: "video", id = %saved.id, title = %saved.title, theme = %saved.theme, "Video uploaded");

  Ok((StatusCode::CREATED, Json(VideoOut::from_video(&saved, &request_origin(&headers)))))
}
