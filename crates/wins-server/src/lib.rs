//! HTTP server for Daily Wins.
//!
//! Mounts the account endpoints under `/auth` and the journaling API from
//! [`wins_api`] under `/api`, guarded by bearer-token sessions.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::post};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use wins_core::store::WinsStore;

use handlers::{sign_in, sign_out, sign_up};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `WINS_*`
/// environment variables. Every field is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub session_ttl_hours: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_string(),
      port:              5280,
      store_path:        PathBuf::from("wins.db"),
      session_ttl_hours: 720,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: WinsStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: WinsStore + Clone + 'static,
{
  let api = wins_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_session::<S>),
  );

  Router::new()
    .route("/auth/sign-up",  post(sign_up::handler::<S>))
    .route("/auth/sign-in",  post(sign_in::handler::<S>))
    .route("/auth/sign-out", post(sign_out::handler::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
