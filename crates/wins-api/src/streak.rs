//! `GET /streak`: the current streak with its milestone and caption.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use wins_core::{session::Session, store::WinsStore, streak::StreakView};

use crate::error::ApiError;

/// `GET /streak`. A user without a streak record sees the zero state.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Extension(session): Extension<Session>,
) -> Result<Json<StreakView>, ApiError>
where
  S: WinsStore,
{
  let state = store
    .get_streak(session.user_id)
    .await
    .map_err(ApiError::store)?
    .unwrap_or_default();
  Ok(Json(state.into()))
}
