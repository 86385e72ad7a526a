//! Paryavaran Rakshak · environmental-education API
//!
//! - Axum HTTP API: accounts, leaderboard, quizzes, lesson videos and watch progress
//! - Uploaded media served from `/media`
//! - In-memory document store with optional JSON snapshot persistence
//!
//! Important env variables:
//!   PORT                : u16 (default 8000)
//!   CORS_ORIGIN         : primary allowed origin (default "http://localhost:5173")
//!   MEDIA_DIR           : uploads root served under /media (default "uploads")
//!   DATA_PATH           : JSON snapshot file; unset keeps data in memory only
//!   BCRYPT_COST         : password hashing cost (default 10)
//!   CONTENT_CONFIG_PATH : TOML with extra quiz questions / catalog videos
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

// Client-side quiz flow; driven by the web client and exercised in tests.
#[allow(dead_code)]
mod client;
mod config;
mod domain;
mod error;
mod logic;
mod protocol;
#[allow(dead_code)]
mod quiz;
mod routes;
mod seeds;
mod state;
mod store;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = ServerConfig::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

  // Open the store, create media folders, seed content.
  let state = Arc::new(AppState::new(config).await?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "paryavaran", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "paryavaran", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "paryavaran", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "paryavaran", "Shutdown requested");
}
