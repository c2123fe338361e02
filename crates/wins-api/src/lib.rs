//! JSON REST API for Daily Wins.
//!
//! Exposes an axum [`Router`] backed by any [`wins_core::store::WinsStore`].
//! Every handler reads the caller's [`wins_core::session::Session`] from the
//! request extensions; authenticating the request and inserting that session
//! is the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wins_api::api_router(store.clone()).layer(auth_layer))
//! ```

pub mod entries;
pub mod error;
pub mod session;
pub mod stats;
pub mod streak;

use std::sync::Arc;

use axum::{Router, routing::get};
use wins_core::store::WinsStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WinsStore + 'static,
{
  Router::new()
    .route("/session", get(session::current))
    // Entries
    .route("/entries", get(entries::list::<S>))
    .route("/entries/{date}", get(entries::get_one::<S>).put(entries::save::<S>))
    // Dashboard
    .route("/streak", get(streak::handler::<S>))
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}
