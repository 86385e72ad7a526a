//! Document store: the seven collections behind one lock, with optional JSON snapshots.
//!
//! Every public operation takes the lock exactly once, so multi-document writes
//! (registration, quiz-result + xp, video-progress + xp) cannot interleave with
//! another request for the same account. Writes are applied to a staged copy that
//! replaces the live collections only once the snapshot has been written, so a
//! failed commit leaves nothing behind.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{QuestionCfg, VideoCfg};
use crate::domain::*;
use crate::error::{AppError, AppResult};
use crate::util::normalize_email;

/// Serialized form of the store; also the snapshot file layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Collections {
    /// Keyed by normalized email.
    pub accounts: HashMap<String, Account>,
    /// Insertion order is the tie-break for equal points.
    pub leaderboard: Vec<LeaderboardEntry>,
    pub progress: HashMap<Uuid, UserProgress>,
    pub questions: Vec<QuizQuestion>,
    pub quiz_results: Vec<QuizResult>,
    pub videos: Vec<Video>,
    pub video_progress: Vec<VideoProgress>,
}

impl Collections {
    fn leaderboard_entry_mut(&mut self, email: &str) -> Option<&mut LeaderboardEntry> {
        self.leaderboard.iter_mut().find(|e| e.email == email)
    }

    fn progress_or_default(&mut self, user: Uuid) -> &mut UserProgress {
        self.progress
            .entry(user)
            .or_insert_with(|| UserProgress::new(user, Utc::now()))
    }

    fn sorted_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut out = self.leaderboard.clone();
        // Stable: equal totals keep insertion order, which is not a ranking contract.
        out.sort_by(|a, b| b.points.cmp(&a.points));
        out
    }

    /// Theme's videos, newest first; same-instant uploads list the later insert first.
    fn videos_by_theme(&self, theme: &str) -> Vec<Video> {
        let mut out: Vec<Video> = self
            .videos
            .iter()
            .rev()
            .filter(|v| same_theme(&v.theme, theme))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    fn videos_with_progress(&self, user: Uuid, theme: &str) -> Vec<(Video, f64)> {
        let seen: HashMap<Uuid, f64> = self
            .video_progress
            .iter()
            .filter(|p| p.user == user && same_theme(&p.theme, theme))
            .map(|p| (p.video, p.progress))
            .collect();
        self.videos_by_theme(theme)
            .into_iter()
            .map(|v| {
                let progress = seen.get(&v.id).copied().unwrap_or(0.0);
                (v, progress)
            })
            .collect()
    }
}

/// Fields of a new account; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub role: String,
    pub institution: String,
    pub password_hash: String,
}

/// Leaderboard row joined to the account's display name.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedName {
    pub name: String,
    pub points: i64,
}

/// Everything the current-rank view needs, read under one lock.
#[derive(Clone, Debug)]
pub struct RankSnapshot {
    pub account: Account,
    pub entry: LeaderboardEntry,
    pub progress: UserProgress,
}

/// Outcome of an insert-if-absent quiz result write.
#[derive(Clone, Debug)]
pub enum QuizRecord {
    Created(QuizResult),
    AlreadyRecorded(QuizResult),
}

impl QuizRecord {
    pub fn result(&self) -> &QuizResult {
        match self {
            QuizRecord::Created(r) | QuizRecord::AlreadyRecorded(r) => r,
        }
    }
}

/// A single progress submission for `save_video_progress`.
#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    pub video: String,
    pub progress: f64,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
    snapshot: Option<PathBuf>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Collections::default())),
            snapshot: None,
        }
    }

    /// Open the store, loading `snapshot` when it exists. A missing file starts empty.
    #[instrument(level = "info")]
    pub async fn open(snapshot: Option<PathBuf>) -> AppResult<Self> {
        let cols = match &snapshot {
            Some(path) => match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let cols: Collections = serde_json::from_slice(&bytes)
                        .map_err(|e| AppError::internal("snapshot decode", e))?;
                    info!(target: "store", path = %path.display(), accounts = cols.accounts.len(), videos = cols.videos.len(), "Loaded snapshot");
                    cols
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!(target: "store", path = %path.display(), "No snapshot yet; starting empty");
                    Collections::default()
                }
                Err(e) => return Err(e.into()),
            },
            None => Collections::default(),
        };
        Ok(Self { inner: Arc::new(RwLock::new(cols)), snapshot })
    }

    /// Persist `staged`, then install it as the live state. Called with the write guard held;
    /// on error `live` is untouched.
    async fn commit(&self, live: &mut Collections, staged: Collections) -> AppResult<()> {
        if let Some(path) = &self.snapshot {
            let bytes = serde_json::to_vec(&staged).map_err(|e| AppError::internal("snapshot encode", e))?;
            let tmp = path.with_extension("tmp");
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, path).await?;
            debug!(target: "store", path = %path.display(), bytes = bytes.len(), "Snapshot written");
        }
        *live = staged;
        Ok(())
    }

    /// Insert seed content. Questions are only added to an empty question bank;
    /// videos are upserted by title.
    #[instrument(level = "info", skip_all, fields(questions = questions.len(), videos = videos.len()))]
    pub async fn seed(&self, questions: &[QuestionCfg], videos: &[VideoCfg]) -> AppResult<()> {
        let mut live = self.inner.write().await;
        let mut cols = live.clone();
        let now = Utc::now();

        if cols.questions.is_empty() {
            for q in questions {
                if !matches!(q.correct_answer.as_str(), "1" | "2" | "3" | "4") {
                    warn!(target: "quiz", quiz = %q.quiz_name, answer = %q.correct_answer, "Skipping seed question with invalid answer key");
                    continue;
                }
                let [o1, o2, o3, o4] = q.options.clone();
                cols.questions.push(QuizQuestion {
                    id: Uuid::new_v4(),
                    quiz_name: q.quiz_name.clone(),
                    quiz_question: q.quiz_question.clone(),
                    quiz_option_1: o1,
                    quiz_option_2: o2,
                    quiz_option_3: o3,
                    quiz_option_4: o4,
                    correct_answer: q.correct_answer.clone(),
                    created_at: now,
                });
            }
        }

        for v in videos {
            if let Some(existing) = cols.videos.iter_mut().find(|x| x.title == v.title) {
                existing.theme = v.theme.clone();
                existing.description = v.description.clone();
                existing.thumbnail = v.thumbnail.clone();
                existing.video = v.video.clone();
                existing.video_url = v.video_url.clone();
                existing.updated_at = now;
                debug!(target: "video", title = %v.title, "Updated existing seed video");
            } else {
                cols.videos.push(Video {
                    id: Uuid::new_v4(),
                    title: v.title.clone(),
                    theme: v.theme.clone(),
                    description: v.description.clone(),
                    thumbnail: v.thumbnail.clone(),
                    video: v.video.clone(),
                    video_url: v.video_url.clone(),
                    created_at: now,
                    updated_at: now,
                });
                debug!(target: "video", title = %v.title, "Inserted seed video");
            }
        }

        self.commit(&mut live, cols).await
    }

    // ---------- accounts ----------

    /// Create account, leaderboard entry and progress in one step.
    /// An existing leaderboard entry for the email (from earlier point awards) is kept.
    #[instrument(level = "info", skip(self, new), fields(email = %new.email))]
    pub async fn register(&self, new: NewAccount) -> AppResult<Account> {
        let email = normalize_email(&new.email);
        let mut live = self.inner.write().await;
        if live.accounts.contains_key(&email) {
            return Err(AppError::DuplicateEmail);
        }
        let mut cols = live.clone();

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: email.clone(),
            role: new.role,
            institution: new.institution,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        cols.accounts.insert(email.clone(), account.clone());
        if cols.leaderboard_entry_mut(&email).is_none() {
            cols.leaderboard.push(LeaderboardEntry::new(email, now));
        }
        cols.progress.insert(account.id, UserProgress::new(account.id, now));

        self.commit(&mut live, cols).await?;
        Ok(account)
    }

    pub async fn find_account(&self, email: &str) -> Option<Account> {
        self.inner.read().await.accounts.get(&normalize_email(email)).cloned()
    }

    // ---------- leaderboard ----------

    pub async fn leaderboard(&self) -> Vec<RankedName> {
        let cols = self.inner.read().await;
        cols.sorted_leaderboard()
            .into_iter()
            .map(|e| RankedName {
                name: cols
                    .accounts
                    .get(&e.email)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| e.email.clone()),
                points: e.points,
            })
            .collect()
    }

    /// Add `delta` to the email's total (creating a zero entry first) and return the sorted board.
    #[instrument(level = "info", skip(self))]
    pub async fn add_points(&self, email: &str, delta: i64) -> AppResult<Vec<LeaderboardEntry>> {
        let email = normalize_email(email);
        let mut live = self.inner.write().await;
        let mut cols = live.clone();
        let now = Utc::now();
        if cols.leaderboard_entry_mut(&email).is_none() {
            cols.leaderboard.push(LeaderboardEntry::new(email.clone(), now));
        }
        if let Some(entry) = cols.leaderboard_entry_mut(&email) {
            entry.points = entry.points.saturating_add(delta);
            entry.updated_at = now;
            debug!(target: "leaderboard", %email, total = entry.points, "Points updated");
        }
        self.commit(&mut live, cols).await?;
        Ok(live.sorted_leaderboard())
    }

    pub async fn rank_snapshot(&self, email: &str) -> AppResult<RankSnapshot> {
        let email = normalize_email(email);
        let cols = self.inner.read().await;
        let account = cols.accounts.get(&email).cloned().ok_or(AppError::AccountNotFound)?;
        let entry = cols
            .leaderboard
            .iter()
            .find(|e| e.email == email)
            .cloned()
            .ok_or(AppError::LeaderboardEntryNotFound)?;
        let progress = cols.progress.get(&account.id).cloned().ok_or(AppError::ProgressNotFound)?;
        Ok(RankSnapshot { account, entry, progress })
    }

    // ---------- quizzes ----------

    pub async fn questions(&self) -> Vec<QuizQuestion> {
        self.inner.read().await.questions.clone()
    }

    pub async fn question(&self, id: &str) -> AppResult<QuizQuestion> {
        let id = Uuid::parse_str(id).map_err(|_| AppError::QuestionNotFound)?;
        self.inner
            .read()
            .await
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or(AppError::QuestionNotFound)
    }

    /// Insert-if-absent on (account, quiz_name); only a fresh insert awards xp.
    #[instrument(level = "info", skip(self))]
    pub async fn record_quiz_result(&self, email: &str, quiz_name: &str) -> AppResult<QuizRecord> {
        let email = normalize_email(email);
        let mut live = self.inner.write().await;
        let user = live.accounts.get(&email).map(|a| a.id).ok_or(AppError::AccountNotFound)?;

        if let Some(existing) = live
            .quiz_results
            .iter()
            .find(|r| r.user == user && r.quiz_name == quiz_name)
        {
            return Ok(QuizRecord::AlreadyRecorded(existing.clone()));
        }

        let now = Utc::now();
        let result = QuizResult { user, quiz_name: quiz_name.to_string(), taken_at: now };
        let mut cols = live.clone();
        cols.quiz_results.push(result.clone());
        cols.progress_or_default(user).award_xp(QUIZ_XP_AWARD, now);

        self.commit(&mut live, cols).await?;
        Ok(QuizRecord::Created(result))
    }

    // ---------- videos ----------

    pub async fn videos_by_theme(&self, theme: &str) -> Vec<Video> {
        self.inner.read().await.videos_by_theme(theme)
    }

    pub async fn insert_video(&self, video: Video) -> AppResult<Video> {
        let mut live = self.inner.write().await;
        let mut cols = live.clone();
        cols.videos.push(video.clone());
        self.commit(&mut live, cols).await?;
        Ok(video)
    }

    pub async fn video_progress(&self, email: &str, theme: &str) -> AppResult<Vec<(Video, f64)>> {
        let cols = self.inner.read().await;
        let user = cols
            .accounts
            .get(&normalize_email(email))
            .map(|a| a.id)
            .ok_or(AppError::AccountNotFound)?;
        Ok(cols.videos_with_progress(user, theme))
    }

    /// Optionally apply one progress submission, then list the theme with the account's progress.
    ///
    /// Stored progress never decreases; the theme label is rewritten on every submission.
    /// Crossing above the watch threshold awards xp once per (account, video).
    #[instrument(level = "info", skip(self, update), fields(video = update.as_ref().map(|u| u.video.as_str()), progress = update.as_ref().map(|u| u.progress)))]
    pub async fn save_video_progress(
        &self,
        email: &str,
        theme: &str,
        update: Option<ProgressUpdate>,
    ) -> AppResult<Vec<(Video, f64)>> {
        let email = normalize_email(email);
        let mut live = self.inner.write().await;
        let user = live.accounts.get(&email).map(|a| a.id).ok_or(AppError::AccountNotFound)?;
        let now = Utc::now();
        let mut cols = live.clone();
        let mut dirty = !cols.progress.contains_key(&user);
        cols.progress_or_default(user);

        if let Some(update) = update {
            let video = Uuid::parse_str(&update.video)
                .ok()
                .filter(|id| cols.videos.iter().any(|v| v.id == *id))
                .ok_or(AppError::VideoNotFound)?;

            let previous = match cols
                .video_progress
                .iter_mut()
                .find(|p| p.user == user && p.video == video)
            {
                Some(row) => {
                    let prev = row.progress;
                    row.progress = prev.max(update.progress);
                    row.theme = theme.to_string();
                    row.updated_at = now;
                    Some(prev)
                }
                None => {
                    cols.video_progress.push(VideoProgress {
                        user,
                        video,
                        theme: theme.to_string(),
                        progress: update.progress,
                        updated_at: now,
                    });
                    None
                }
            };

            if crosses_watch_threshold(previous, update.progress) {
                cols.progress_or_default(user).award_xp(VIDEO_XP_AWARD, now);
                info!(target: "video", %email, %video, award = VIDEO_XP_AWARD, "Watch threshold crossed");
            }
            dirty = true;
        }

        if dirty {
            self.commit(&mut live, cols).await?;
        }
        Ok(live.videos_with_progress(user, theme))
    }

    /// Current xp for an account.
    #[allow(dead_code)]
    pub async fn xp_of(&self, email: &str) -> Option<i64> {
        let cols = self.inner.read().await;
        let user = cols.accounts.get(&normalize_email(email))?.id;
        cols.progress.get(&user).map(|p| p.xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::{seed_questions, seed_videos};

    fn account(email: &str, name: &str) -> NewAccount {
        NewAccount {
            name: name.into(),
            email: email.into(),
            role: "student".into(),
            institution: "Green School".into(),
            password_hash: "hash".into(),
        }
    }

    async fn seeded() -> Store {
        let store = Store::in_memory();
        store.seed(&seed_questions(), &seed_videos()).await.expect("seed");
        store
    }

    async fn first_video_id(store: &Store) -> String {
        store.videos_by_theme("victims").await[0].id.to_string()
    }

    async fn submit(store: &Store, email: &str, video: &str, progress: f64) -> Vec<(Video, f64)> {
        store
            .save_video_progress(email, "victims", Some(ProgressUpdate { video: video.into(), progress }))
            .await
            .expect("progress")
    }

    #[tokio::test]
    async fn registration_creates_entry_and_progress_together() {
        let store = Store::in_memory();
        let acc = store.register(account("Asha@Example.com ", "Asha")).await.expect("register");
        assert_eq!(acc.email, "asha@example.com");

        let snap = store.rank_snapshot("asha@example.com").await.expect("snapshot");
        assert_eq!(snap.entry.points, 0);
        assert_eq!(snap.progress.user, acc.id);
        assert_eq!(snap.progress.level, 1);
        assert_eq!(snap.progress.xp_next_level, 1000);

        let dup = store.register(account("asha@example.com", "Other")).await;
        assert!(matches!(dup, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn registration_keeps_points_awarded_before_signup() {
        let store = Store::in_memory();
        store.add_points("late@example.com", 30).await.expect("points");
        store.register(account("late@example.com", "Late")).await.expect("register");
        let snap = store.rank_snapshot("late@example.com").await.expect("snapshot");
        assert_eq!(snap.entry.points, 30);
        assert_eq!(store.leaderboard().await.len(), 1);
    }

    #[tokio::test]
    async fn point_deltas_commute() {
        let a = Store::in_memory();
        let b = Store::in_memory();
        for d in [5, -3, 40] {
            a.add_points("x@example.com", d).await.expect("points");
        }
        for d in [40, 5, -3] {
            b.add_points("x@example.com", d).await.expect("points");
        }
        assert_eq!(a.leaderboard().await, b.leaderboard().await);
        assert_eq!(a.leaderboard().await[0].points, 42);
    }

    #[tokio::test]
    async fn leaderboard_sorts_descending_with_name_fallback() {
        let store = Store::in_memory();
        store.register(account("a@example.com", "A")).await.expect("register");
        store.add_points("a@example.com", 50).await.expect("points");
        store.add_points("b@example.com", 80).await.expect("points");
        let board = store.add_points("c@example.com", 80).await.expect("points");
        assert_eq!(board.len(), 3);
        assert_eq!(board[2].email, "a@example.com");
        assert!(board[..2].iter().all(|e| e.points == 80));

        let named = store.leaderboard().await;
        assert_eq!(named[2], RankedName { name: "A".into(), points: 50 });
        // No account behind b/c: the email stands in for the name.
        assert!(named[..2].iter().all(|r| r.name.ends_with("@example.com")));
    }

    #[tokio::test]
    async fn quiz_result_is_recorded_once_and_awards_once() {
        let store = seeded().await;
        store.register(account("q@example.com", "Q")).await.expect("register");

        let first = store.record_quiz_result("q@example.com", "Nature").await.expect("record");
        assert!(matches!(first, QuizRecord::Created(_)));
        let second = store.record_quiz_result("q@example.com", "Nature").await.expect("record");
        assert!(matches!(second, QuizRecord::AlreadyRecorded(_)));
        assert_eq!(first.result().taken_at, second.result().taken_at);
        assert_eq!(store.xp_of("q@example.com").await, Some(QUIZ_XP_AWARD));

        let missing = store.record_quiz_result("nobody@example.com", "Nature").await;
        assert!(matches!(missing, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn concurrent_quiz_results_award_exactly_once() {
        let store = seeded().await;
        store.register(account("race@example.com", "R")).await.expect("register");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = store.clone();
                tokio::spawn(async move { s.record_quiz_result("race@example.com", "Nature").await })
            })
            .collect();
        let mut created = 0;
        for h in handles {
            if let QuizRecord::Created(_) = h.await.expect("join").expect("record") {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.xp_of("race@example.com").await, Some(QUIZ_XP_AWARD));
    }

    #[tokio::test]
    async fn video_award_fires_once_when_crossing_threshold() {
        let store = seeded().await;
        store.register(account("v@example.com", "V")).await.expect("register");
        let vid = first_video_id(&store).await;

        submit(&store, "v@example.com", &vid, 50.0).await;
        submit(&store, "v@example.com", &vid, 60.0).await;
        assert_eq!(store.xp_of("v@example.com").await, Some(0));
        submit(&store, "v@example.com", &vid, 75.0).await;
        assert_eq!(store.xp_of("v@example.com").await, Some(VIDEO_XP_AWARD));
        submit(&store, "v@example.com", &vid, 80.0).await;
        assert_eq!(store.xp_of("v@example.com").await, Some(VIDEO_XP_AWARD));
    }

    #[tokio::test]
    async fn fresh_row_above_threshold_counts_as_crossing() {
        let store = seeded().await;
        store.register(account("f@example.com", "F")).await.expect("register");
        let vid = first_video_id(&store).await;

        submit(&store, "f@example.com", &vid, 80.0).await;
        submit(&store, "f@example.com", &vid, 90.0).await;
        assert_eq!(store.xp_of("f@example.com").await, Some(VIDEO_XP_AWARD));
    }

    #[tokio::test]
    async fn progress_never_regresses_but_theme_label_follows_last_call() {
        let store = seeded().await;
        store.register(account("m@example.com", "M")).await.expect("register");
        let vid = first_video_id(&store).await;

        let listed = submit(&store, "m@example.com", &vid, 65.0).await;
        let p = listed.iter().find(|(v, _)| v.id.to_string() == vid).map(|(_, p)| *p);
        assert_eq!(p, Some(65.0));

        let listed = submit(&store, "m@example.com", &vid, 20.0).await;
        let p = listed.iter().find(|(v, _)| v.id.to_string() == vid).map(|(_, p)| *p);
        assert_eq!(p, Some(65.0));

        // Saved under a different label, the row drops out of the "victims" view.
        store
            .save_video_progress("m@example.com", "archive", Some(ProgressUpdate { video: vid.clone(), progress: 10.0 }))
            .await
            .expect("progress");
        let listed = store.video_progress("m@example.com", "victims").await.expect("list");
        assert!(listed.iter().all(|(_, p)| *p == 0.0));
    }

    #[tokio::test]
    async fn unknown_video_is_rejected() {
        let store = seeded().await;
        store.register(account("u@example.com", "U")).await.expect("register");
        for bad in ["not-a-uuid", &Uuid::new_v4().to_string()] {
            let res = store
                .save_video_progress("u@example.com", "victims", Some(ProgressUpdate { video: bad.into(), progress: 10.0 }))
                .await;
            assert!(matches!(res, Err(AppError::VideoNotFound)));
        }
    }

    #[tokio::test]
    async fn theme_listing_is_case_insensitive_and_unseen_is_zero() {
        let store = seeded().await;
        store.register(account("t@example.com", "T")).await.expect("register");
        assert_eq!(store.videos_by_theme("VICTIMS").await.len(), 2);
        assert!(store.videos_by_theme("victim").await.is_empty());
        let listed = store.video_progress("t@example.com", "Victims").await.expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|(_, p)| *p == 0.0));
    }

    #[tokio::test]
    async fn reseeding_upserts_videos_and_keeps_questions() {
        let store = seeded().await;
        store.seed(&seed_questions(), &seed_videos()).await.expect("reseed");
        assert_eq!(store.questions().await.len(), 3);
        assert_eq!(store.videos_by_theme("victims").await.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("paryavaran-{}.json", Uuid::new_v4()));
        {
            let store = Store::open(Some(path.clone())).await.expect("open");
            store.register(account("d@example.com", "D")).await.expect("register");
            store.add_points("d@example.com", 7).await.expect("points");
        }
        let reopened = Store::open(Some(path.clone())).await.expect("reopen");
        let snap = reopened.rank_snapshot("d@example.com").await.expect("snapshot");
        assert_eq!(snap.entry.points, 7);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_no_partial_state() {
        let missing = std::env::temp_dir().join(format!("paryavaran-missing-{}", Uuid::new_v4()));
        let store = Store::open(Some(missing.join("snap.json"))).await.expect("open");
        for _ in 0..2 {
            let res = store.register(account("p@example.com", "P")).await;
            assert!(matches!(res, Err(AppError::Internal(_))));
        }
        assert!(store.find_account("p@example.com").await.is_none());
        assert!(store.leaderboard().await.is_empty());

        let dir = std::env::temp_dir().join(format!("paryavaran-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let store = Store::open(Some(dir.join("snap.json"))).await.expect("open");
        store.register(account("p@example.com", "P")).await.expect("register");
        std::fs::remove_dir_all(&dir).expect("rmdir");

        for _ in 0..2 {
            let res = store.record_quiz_result("p@example.com", "Nature").await;
            assert!(matches!(res, Err(AppError::Internal(_))));
        }
        assert_eq!(store.xp_of("p@example.com").await, Some(0));
        assert!(store.add_points("p@example.com", 5).await.is_err());
        assert_eq!(store.leaderboard().await[0].points, 0);
    }
}
