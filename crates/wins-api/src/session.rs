//! `GET /session`: echo the authenticated session back to the client.

use axum::{Extension, Json};
use wins_core::session::Session;

/// `GET /session`
pub async fn current(Extension(session): Extension<Session>) -> Json<Session> {
  Json(session)
}
