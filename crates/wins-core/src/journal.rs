//! The save flow: record a day's wins, then advance the streak.
//!
//! The entry write and the streak write are two separate store calls. If the
//! second fails the entry stays recorded with a stale streak; callers report
//! that as an ordinary save failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  entry::{DailyEntry, NewEntry, WinsDraft},
  store::WinsStore,
  streak::{StreakChange, StreakState},
};

#[derive(Debug, Error)]
pub enum SaveError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Invalid(#[from] crate::Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

/// Everything the caller needs to report a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
  pub entry:   DailyEntry,
  /// `false` when an existing entry for the date was replaced.
  pub created: bool,
  pub streak:  StreakState,
  pub change:  StreakChange,
}

/// Validate `draft`, upsert it as the entry for `(user_id, date)` and advance
/// the user's streak.
pub async fn save_wins<S: WinsStore>(
  store: &S,
  user_id: Uuid,
  date: NaiveDate,
  draft: WinsDraft,
) -> Result<SaveOutcome, SaveError<S::Error>> {
  let input = NewEntry::new(user_id, date, draft)?;

  let upserted = store.upsert_entry(input).await.map_err(SaveError::Store)?;

  let previous = store
    .get_streak(user_id)
    .await
    .map_err(SaveError::Store)?
    .unwrap_or_default();

  let change = previous.classify(date);
  let streak = previous.transition(date);

  if change.is_write() {
    store
      .update_streak(user_id, streak)
      .await
      .map_err(SaveError::Store)?;
  }

  Ok(SaveOutcome {
    entry: upserted.entry,
    created: upserted.created,
    streak,
    change,
  })
}
