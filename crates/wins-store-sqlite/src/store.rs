//! [`SqliteStore`]: the SQLite implementation of [`WinsStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use wins_core::{
  entry::{DailyEntry, NewEntry, Upserted},
  session::{NewUser, Session, User},
  stats::CategoryCounts,
  store::WinsStore,
  streak::StreakState,
};

use crate::{
  encode::{
    decode_dt, decode_uuid, encode_date, encode_dt, encode_uuid, RawEntry, RawStreak,
    RawUser,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Daily Wins store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) async fn session_rows(&self) -> Result<i64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))?))
      .await?;
    Ok(n)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── WinsStore impl ──────────────────────────────────────────────────────────

impl WinsStore for SqliteStore {
  type Error = crate::Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      email:         input.email,
      full_name:     input.full_name,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(user.user_id);
    let email     = user.email.clone();
    let full_name = user.full_name.clone();
    let hash      = user.password_hash.clone();
    let at_str    = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let rows = tx.execute(
          "INSERT INTO users (user_id, email, full_name, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![id_str, email, full_name, hash, at_str],
        )?;
        if rows == 0 {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO streaks (user_id) VALUES (?1)",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", RawUser::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![email], RawUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id:    Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let user_str    = encode_uuid(user_id);
    let created_str = encode_dt(Utc::now());
    let expires_str = encode_dt(expires_at);

    // Expired sessions are swept whenever the same user signs in again.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM sessions WHERE user_id = ?1 AND expires_at <= ?2",
          rusqlite::params![user_str, created_str],
        )?;
        tx.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, user_str, created_str, expires_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_session<'a>(&'a self, token_hash: &'a str) -> Result<Option<Session>> {
    let token_hash = token_hash.to_owned();

    let row: Option<(String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, s.expires_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token_hash = ?1",
              rusqlite::params![token_hash],
              |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((user_id, email, expires_at)) = row else {
      return Ok(None);
    };
    if decode_dt(&expires_at)? <= Utc::now() {
      return Ok(None);
    }
    Ok(Some(Session { user_id: decode_uuid(&user_id)?, email }))
  }

  async fn delete_session<'a>(&'a self, token_hash: &'a str) -> Result<bool> {
    let token_hash = token_hash.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?)
      })
      .await?;
    Ok(rows > 0)
  }

  // ── Entries ───────────────────────────────────────────────────────────────

  async fn get_entry(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyEntry>> {
    let user_str = encode_uuid(user_id);
    let date_str = encode_date(date);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM daily_wins WHERE user_id = ?1 AND date = ?2",
          RawEntry::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![user_str, date_str], RawEntry::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn upsert_entry(&self, entry: NewEntry) -> Result<Upserted> {
    let new_id   = Uuid::new_v4();
    let id_str   = encode_uuid(new_id);
    let user_str = encode_uuid(entry.user_id);
    let date_str = encode_date(entry.date);
    let now_str  = encode_dt(Utc::now());

    let raw: RawEntry = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO daily_wins (
             id, user_id, date, work_win, personal_win, growth_win,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
           ON CONFLICT (user_id, date) DO UPDATE SET
             work_win     = excluded.work_win,
             personal_win = excluded.personal_win,
             growth_win   = excluded.growth_win,
             updated_at   = excluded.updated_at
           RETURNING {}",
          RawEntry::COLUMNS
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            id_str,
            user_str,
            date_str,
            entry.work_win,
            entry.personal_win,
            entry.growth_win,
            now_str,
          ],
          RawEntry::from_row,
        )?)
      })
      .await?;

    let entry = raw.into_entry()?;
    let created = entry.id == new_id;
    Ok(Upserted { entry, created })
  }

  async fn list_recent_entries(&self, user_id: Uuid, limit: usize) -> Result<Vec<DailyEntry>> {
    let user_str  = encode_uuid(user_id);
    let limit_val = limit as i64;

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM daily_wins
           WHERE user_id = ?1
           ORDER BY date DESC
           LIMIT ?2",
          RawEntry::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, limit_val], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn category_counts(&self, user_id: Uuid) -> Result<CategoryCounts> {
    let user_str = encode_uuid(user_id);

    // COUNT(column) skips NULLs; empty wins are always stored as NULL.
    let (total, work, personal, growth): (i64, i64, i64, i64) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), COUNT(work_win), COUNT(personal_win), COUNT(growth_win)
           FROM daily_wins WHERE user_id = ?1",
          rusqlite::params![user_str],
          |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?)
      })
      .await?;

    Ok(CategoryCounts {
      total_entries: total as u64,
      work:          work as u64,
      personal:      personal as u64,
      growth:        growth as u64,
    })
  }

  // ── Streaks ───────────────────────────────────────────────────────────────

  async fn get_streak(&self, user_id: Uuid) -> Result<Option<StreakState>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawStreak> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT current_streak, longest_streak, last_entry_date
               FROM streaks WHERE user_id = ?1",
              rusqlite::params![user_str],
              |r| {
                Ok(RawStreak {
                  current_streak:  r.get(0)?,
                  longest_streak:  r.get(1)?,
                  last_entry_date: r.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStreak::into_state).transpose()
  }

  async fn update_streak(&self, user_id: Uuid, next: StreakState) -> Result<()> {
    let user_str = encode_uuid(user_id);
    let last_str = next.last_entry_date.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO streaks (user_id, current_streak, longest_streak, last_entry_date)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id) DO UPDATE SET
             current_streak  = excluded.current_streak,
             longest_streak  = excluded.longest_streak,
             last_entry_date = excluded.last_entry_date",
          rusqlite::params![
            user_str,
            next.current_streak,
            next.longest_streak,
            last_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
