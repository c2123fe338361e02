//! The `WinsStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `wins-store-sqlite`).
//! Higher layers (`wins-api`, `wins-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  entry::{DailyEntry, NewEntry, Upserted},
  session::{NewUser, Session, User},
  stats::CategoryCounts,
  streak::StreakState,
};

/// Abstraction over a Daily Wins store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WinsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Register a user and provision their zero streak record.
  /// Returns `None` if the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user by normalised email.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Persist a session. Only the digest of the bearer token is stored.
  fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a token digest to its session. Expired sessions yield `None`.
  fn find_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Delete a session. Returns `false` if no such session existed.
  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Entries ───────────────────────────────────────────────────────────

  fn get_entry(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DailyEntry>, Self::Error>> + Send + '_;

  /// Insert or replace the entry for `(user_id, date)`. An existing entry
  /// keeps its id.
  fn upsert_entry(
    &self,
    entry: NewEntry,
  ) -> impl Future<Output = Result<Upserted, Self::Error>> + Send + '_;

  /// The `limit` most recent entries, newest first.
  fn list_recent_entries(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<DailyEntry>, Self::Error>> + Send + '_;

  fn category_counts(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<CategoryCounts, Self::Error>> + Send + '_;

  // ── Streaks ───────────────────────────────────────────────────────────

  fn get_streak(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<StreakState>, Self::Error>> + Send + '_;

  /// Write the streak record for `user_id`, creating it if absent.
  fn update_streak(
    &self,
    user_id: Uuid,
    next: StreakState,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
