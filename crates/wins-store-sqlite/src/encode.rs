//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar days as `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;
use wins_core::{entry::DailyEntry, session::User, streak::StreakState};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Fixed-width UTC form, so stored timestamps compare correctly as text.
pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counters ─────────────────────────────────────────────────────────────────

fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::InvalidColumn { column, value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `daily_wins` row.
pub struct RawEntry {
  pub id:           String,
  pub user_id:      String,
  pub date:         String,
  pub work_win:     Option<String>,
  pub personal_win: Option<String>,
  pub growth_win:   Option<String>,
}

impl RawEntry {
  /// Column list matching [`RawEntry::from_row`].
  pub const COLUMNS: &'static str =
    "id, user_id, date, work_win, personal_win, growth_win";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      user_id:      row.get(1)?,
      date:         row.get(2)?,
      work_win:     row.get(3)?,
      personal_win: row.get(4)?,
      growth_win:   row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<DailyEntry> {
    Ok(DailyEntry {
      id:           decode_uuid(&self.id)?,
      user_id:      decode_uuid(&self.user_id)?,
      date:         decode_date(&self.date)?,
      work_win:     self.work_win,
      personal_win: self.personal_win,
      growth_win:   self.growth_win,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub full_name:     Option<String>,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub const COLUMNS: &'static str =
    "user_id, email, full_name, password_hash, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      full_name:     row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      full_name:     self.full_name,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `streaks` row.
pub struct RawStreak {
  pub current_streak:  i64,
  pub longest_streak:  i64,
  pub last_entry_date: Option<String>,
}

impl RawStreak {
  pub fn into_state(self) -> Result<StreakState> {
    Ok(StreakState {
      current_streak:  decode_count("current_streak", self.current_streak)?,
      longest_streak:  decode_count("longest_streak", self.longest_streak)?,
      last_entry_date: self.last_entry_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_column_format() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
    assert_eq!(encode_date(d), "2024-02-09");
    assert_eq!(decode_date("2024-02-09").unwrap(), d);
    assert!(decode_date("09/02/2024").is_err());
  }

  #[test]
  fn negative_counter_is_rejected() {
    let raw = RawStreak { current_streak: -1, longest_streak: 0, last_entry_date: None };
    assert!(matches!(
      raw.into_state(),
      Err(Error::InvalidColumn { column: "current_streak", value: -1 })
    ));
  }
}
