//! Application state: the document store plus server settings.

use tracing::{info, instrument};

use crate::config::{load_content_config_from_env, ServerConfig};
use crate::error::AppResult;
use crate::seeds::{seed_questions, seed_videos};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: ServerConfig,
}

impl AppState {
    /// Build state from config: open the store, create media folders, seed built-in and TOML content.
    #[instrument(level = "info", skip_all)]
    pub async fn new(config: ServerConfig) -> AppResult<Self> {
        let store = Store::open(config.data_path.clone()).await?;

        for sub in ["thumbnails", "videos"] {
            tokio::fs::create_dir_all(config.media_dir.join(sub)).await?;
        }

        let mut questions = seed_questions();
        let mut videos = seed_videos();
        if let Some(cfg) = load_content_config_from_env() {
            questions.extend(cfg.questions);
            videos.extend(cfg.videos);
        }
        store.seed(&questions, &videos).await?;

        info!(
            target: "paryavaran",
            media_dir = %config.media_dir.display(),
            persistent = config.data_path.is_some(),
            origins = ?config.cors_origins,
            "State ready"
        );
        Ok(Self { store, config })
    }

    /// Wrap an already-opened store; used by tests that seed their own content.
    #[cfg(test)]
    pub fn with_store(store: Store, config: ServerConfig) -> Self {
        Self { store, config }
    }
}
