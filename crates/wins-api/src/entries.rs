//! Handlers for `/entries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/entries` | Optional `?limit=` (default 7, max 100); newest first |
//! | `GET`  | `/entries/{date}` | 404 if no entry for that day |
//! | `PUT`  | `/entries/{date}` | Body: [`WinsDraft`]; 201 when created, 200 when replaced |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use wins_core::{
  entry::{DailyEntry, WinsDraft},
  journal::save_wins,
  session::Session,
  store::WinsStore,
  streak::StreakChange,
};

use crate::error::ApiError;

pub const DEFAULT_LIMIT: usize = 7;
pub const MAX_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /entries[?limit=<n>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Extension(session): Extension<Session>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<DailyEntry>>, ApiError>
where
  S: WinsStore,
{
  let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
  let entries = store
    .list_recent_entries(session.user_id, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /entries/{date}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Extension(session): Extension<Session>,
  Path(date): Path<NaiveDate>,
) -> Result<Json<DailyEntry>, ApiError>
where
  S: WinsStore,
{
  let entry = store
    .get_entry(session.user_id, date)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no entry for {date}")))?;
  Ok(Json(entry))
}

// ─── Save ─────────────────────────────────────────────────────────────────────

/// `PUT /entries/{date}`: record the day's wins and advance the streak.
///
/// Clients send their own local date. Anything more than a day ahead of the
/// server's UTC date cannot be "today" in any timezone and is rejected.
pub async fn save<S>(
  State(store): State<Arc<S>>,
  Extension(session): Extension<Session>,
  Path(date): Path<NaiveDate>,
  Json(draft): Json<WinsDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WinsStore,
{
  let latest = Utc::now().date_naive() + Days::new(1);
  if date > latest {
    return Err(ApiError::BadRequest(format!("{date} is in the future")));
  }

  let outcome = save_wins(store.as_ref(), session.user_id, date, draft).await?;

  match outcome.change {
    StreakChange::Backdated { last_entry_date } => tracing::warn!(
      user_id = %session.user_id,
      %date,
      %last_entry_date,
      "entry saved before the last entry date; streak left unchanged"
    ),
    change => tracing::info!(
      user_id = %session.user_id,
      %date,
      created = outcome.created,
      ?change,
      current_streak = outcome.streak.current_streak,
      "wins saved"
    ),
  }

  let status = if outcome.created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(outcome)))
}
