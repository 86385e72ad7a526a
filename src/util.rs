//! Small utility helpers used across modules.

use axum::http::{header::HOST, HeaderMap};
use rand::Rng;
use serde_json::Value;

/// Emails are stored trimmed and lower-cased; every lookup goes through this.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// `Some(trimmed)` when the optional input carries a non-blank value.
pub fn non_blank(v: Option<&str>) -> Option<&str> {
  v.map(str::trim).filter(|s| !s.is_empty())
}

/// Leading-integer coercion for point deltas.
/// Numbers are truncated, strings use their leading `[+-]digits` prefix, anything else is zero.
pub fn coerce_points(v: Option<&Value>) -> i64 {
  match v {
    Some(Value::Number(n)) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
      .unwrap_or(0),
    Some(Value::String(s)) => leading_int(s).unwrap_or(0),
    _ => 0,
  }
}

fn leading_int(s: &str) -> Option<i64> {
  let s = s.trim_start();
  let (negative, digits) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };
  let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
  if end == 0 {
    return None;
  }
  // Out-of-range digit runs clamp, matching the saturating point totals.
  let n = digits[..end].bytes().fold(0i64, |acc, d| {
    let d = i64::from(d - b'0');
    if negative {
      acc.saturating_mul(10).saturating_sub(d)
    } else {
      acc.saturating_mul(10).saturating_add(d)
    }
  });
  Some(n)
}

/// Leading-float coercion for watch percentages. `None` when no number can be read.
pub fn parse_progress(s: &str) -> Option<f64> {
  let s = s.trim();
  if let Ok(v) = s.parse::<f64>() {
    return v.is_finite().then_some(v);
  }
  // Longest prefix that still parses, e.g. "75.5%" -> 75.5
  let mut end = 0;
  for (i, c) in s.char_indices() {
    if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
      end = i + c.len_utf8();
    } else {
      break;
    }
  }
  (1..=end)
    .rev()
    .find_map(|n| s[..n].parse::<f64>().ok())
    .filter(|v| v.is_finite())
}

/// `scheme://host` of the incoming request, honoring a reverse proxy's `X-Forwarded-Proto`.
pub fn request_origin(headers: &HeaderMap) -> String {
  let scheme = headers
    .get("x-forwarded-proto")
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(',').next())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .unwrap_or("http");
  let host = headers
    .get(HOST)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("localhost");
  format!("{scheme}://{host}")
}

/// Absolute URL of a stored media file, e.g. `http://host/media/videos/a.mp4`.
pub fn media_url(origin: &str, folder: &str, file: Option<&str>) -> Option<String> {
  file
    .filter(|f| !f.is_empty())
    .map(|f| format!("{origin}/media/{folder}/{f}"))
}

/// Collision-resistant stored file name: `<unix_millis>-<random>.<ext>`.
pub fn unique_file_name(ext: &str) -> String {
  let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
  let millis = chrono::Utc::now().timestamp_millis();
  if ext.is_empty() {
    format!("{millis}-{suffix}")
  } else {
    format!("{millis}-{suffix}.{ext}")
  }
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;
  use serde_json::json;

  #[test]
  fn points_coercion_matches_leading_integer_rules() {
    assert_eq!(coerce_points(Some(&json!(25))), 25);
    assert_eq!(coerce_points(Some(&json!(12.9))), 12);
    assert_eq!(coerce_points(Some(&json!("40"))), 40);
    assert_eq!(coerce_points(Some(&json!(" -7pts"))), -7);
    assert_eq!(coerce_points(Some(&json!("abc"))), 0);
    assert_eq!(coerce_points(Some(&json!(null))), 0);
    assert_eq!(coerce_points(None), 0);
    assert_eq!(coerce_points(Some(&json!("99999999999999999999"))), i64::MAX);
    assert_eq!(coerce_points(Some(&json!("-99999999999999999999"))), i64::MIN);
    assert_eq!(coerce_points(Some(&json!("-9223372036854775808"))), i64::MIN);
    assert_eq!(coerce_points(Some(&json!(1e30))), i64::MAX);
  }

  #[test]
  fn progress_parses_prefixes() {
    assert_eq!(parse_progress("75"), Some(75.0));
    assert_eq!(parse_progress(" 80.5 "), Some(80.5));
    assert_eq!(parse_progress("75.5%"), Some(75.5));
    assert_eq!(parse_progress("abc"), None);
    assert_eq!(parse_progress(""), None);
  }

  #[test]
  fn origin_uses_host_and_forwarded_proto() {
    let mut h = HeaderMap::new();
    h.insert(HOST, HeaderValue::from_static("api.example.org"));
    assert_eq!(request_origin(&h), "http://api.example.org");
    h.insert("x-forwarded-proto", HeaderValue::from_static("https"));
    assert_eq!(request_origin(&h), "https://api.example.org");
  }

  #[test]
  fn media_urls_skip_missing_files() {
    assert_eq!(
      media_url("http://h", "videos", Some("a.mp4")).as_deref(),
      Some("http://h/media/videos/a.mp4")
    );
    assert_eq!(media_url("http://h", "videos", None), None);
    assert_eq!(media_url("http://h", "videos", Some("")), None);
  }

  #[test]
  fn emails_are_normalized() {
    assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
  }

  #[test]
  fn unique_names_keep_extension() {
    let n = unique_file_name("mp4");
    assert!(n.ends_with(".mp4"));
    assert!(n.contains('-'));
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    assert!(trunc_for_log("पर्यावरण रक्षक", 5).contains("bytes total"));
  }
}
