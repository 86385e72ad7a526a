//! Public request/response payloads (serde ready).
//! Field names are the wire contract the web client already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Account, QuizQuestion, Video};
use crate::util::media_url;

//
// Auth
//

#[derive(Debug, Default, Deserialize)]
pub struct RegisterIn {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub institution: Option<String>,
    pub password: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct LoginIn {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageOut {
    pub message: String,
}

/// Account projection without credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOut {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub institution: String,
}

impl From<&Account> for UserOut {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            email: a.email.clone(),
            role: a.role.clone(),
            institution: a.institution.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOut {
    pub message: String,
    pub user: UserOut,
}

//
// Leaderboard / rank
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardRowOut {
    pub name: String,
    pub points: i64,
}

/// `points` may arrive as a number, a numeric string, or garbage (treated as zero).
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePointsIn {
    pub email: Option<String>,
    #[serde(default)]
    pub points: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentRankOut {
    pub name: String,
    pub points: i64,
    pub level: i64,
    pub xp: i64,
    pub xp_next_level: i64,
    pub xp_progress_percent: i64,
    pub streak_days: i64,
    pub badge: Option<String>,
}

//
// Quiz
//

/// Question payload; the answer key travels with the question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOut {
    pub id: Uuid,
    pub quiz_name: String,
    pub quiz_question: String,
    pub quiz_option_1: String,
    pub quiz_option_2: String,
    pub quiz_option_3: String,
    pub quiz_option_4: String,
    pub correct_answer: String,
}

impl From<&QuizQuestion> for QuestionOut {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            id: q.id,
            quiz_name: q.quiz_name.clone(),
            quiz_question: q.quiz_question.clone(),
            quiz_option_1: q.quiz_option_1.clone(),
            quiz_option_2: q.quiz_option_2.clone(),
            quiz_option_3: q.quiz_option_3.clone(),
            quiz_option_4: q.quiz_option_4.clone(),
            correct_answer: q.correct_answer.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuizResultQuery {
    pub email: Option<String>,
    pub quiz_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultOut {
    pub message: String,
    pub quiz_name: String,
    pub taken_at: DateTime<Utc>,
}

//
// Videos
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoOut {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub video_url: Option<String>,
    pub theme: String,
    pub uploaded_at: DateTime<Utc>,
}

impl VideoOut {
    /// Build the payload with absolute media URLs rooted at `origin` (`scheme://host`).
    pub fn from_video(v: &Video, origin: &str) -> Self {
        Self {
            id: v.id,
            title: v.title.clone(),
            description: v.description.clone(),
            thumbnail: media_url(origin, "thumbnails", v.thumbnail.as_deref()),
            video: media_url(origin, "videos", v.video.as_deref()),
            video_url: v.video_url.clone(),
            theme: v.theme.clone(),
            uploaded_at: v.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoProgressOut {
    #[serde(flatten)]
    pub video: VideoOut,
    pub progress: f64,
}

#[derive(Debug, Deserialize)]
pub struct ProgressUpdateQuery {
    pub email: Option<String>,
    pub video: Option<String>,
    pub progress: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn video_payload_carries_absolute_urls() {
        let now = Utc::now();
        let v = Video {
            id: Uuid::new_v4(),
            title: "Plastic Bag Story".into(),
            theme: "victims".into(),
            description: None,
            thumbnail: Some("bag.png".into()),
            video: None,
            video_url: Some("https://cdn.example.org/bag.mp4".into()),
            created_at: now,
            updated_at: now,
        };
        let out = VideoOut::from_video(&v, "http://localhost:8000");
        assert_eq!(out.thumbnail.as_deref(), Some("http://localhost:8000/media/thumbnails/bag.png"));
        assert!(out.video.is_none());

        let json = serde_json::to_value(VideoProgressOut { video: out, progress: 0.0 }).expect("json");
        assert_eq!(json["title"], "Plastic Bag Story");
        assert_eq!(json["progress"], 0.0);
    }

    #[test]
    fn user_projection_drops_the_hash() {
        let now = Utc::now();
        let a = Account {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            role: "student".into(),
            institution: "Green School".into(),
            password_hash: "$2b$secret".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&UserOut::from(&a)).expect("json");
        assert!(!json.contains("secret"));
        assert!(json.contains("Green School"));
    }
}
