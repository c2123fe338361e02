//! `GET /stats`: aggregate counts for the dashboard.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use wins_core::{session::Session, stats::Stats, store::WinsStore};

use crate::error::ApiError;

/// `GET /stats`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Extension(session): Extension<Session>,
) -> Result<Json<Stats>, ApiError>
where
  S: WinsStore,
{
  let counts = store
    .category_counts(session.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Stats::from(counts)))
}
