//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use uuid::Uuid;
use wins_core::{
  entry::{DailyEntry, NewEntry, Upserted, WinsDraft},
  journal::{save_wins, SaveError},
  session::{NewUser, Session, User},
  stats::CategoryCounts,
  store::WinsStore,
  streak::{StreakChange, StreakState},
};

use crate::{Error, Result, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> User {
  s.create_user(NewUser {
    email:         email.into(),
    full_name:     None,
    password_hash: "$argon2id$stub".into(),
  })
  .await
  .unwrap()
  .expect("fresh email")
}

fn day(n: u64) -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + Days::new(n)
}

fn draft(work: &str, personal: &str, growth: &str) -> WinsDraft {
  let f = |s: &str| Some(s.to_string());
  WinsDraft {
    work_win:     f(work),
    personal_win: f(personal),
    growth_win:   f(growth),
  }
}

fn entry(user_id: Uuid, date: NaiveDate, work: &str) -> NewEntry {
  NewEntry::new(user_id, date, draft(work, "", "")).unwrap()
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let created = user(&s, "ada@example.com").await;

  let found = s.find_user_by_email("ada@example.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, created.user_id);
  assert_eq!(found.password_hash, "$argon2id$stub");

  assert!(s.find_user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_returns_none() {
  let s = store().await;
  user(&s, "ada@example.com").await;

  let again = s
    .create_user(NewUser {
      email:         "ada@example.com".into(),
      full_name:     Some("Someone Else".into()),
      password_hash: "x".into(),
    })
    .await
    .unwrap();
  assert!(again.is_none());
}

#[tokio::test]
async fn new_user_gets_zero_streak() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let streak = s.get_streak(u.user_id).await.unwrap();
  assert_eq!(streak, Some(StreakState::default()));
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_lifecycle() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  s.create_session(u.user_id, "digest".into(), Utc::now() + Duration::hours(1))
    .await
    .unwrap();

  let session = s.find_session("digest").await.unwrap().unwrap();
  assert_eq!(session.user_id, u.user_id);
  assert_eq!(session.email, "ada@example.com");

  assert!(s.delete_session("digest").await.unwrap());
  assert!(s.find_session("digest").await.unwrap().is_none());
  assert!(!s.delete_session("digest").await.unwrap());
}

#[tokio::test]
async fn expired_session_is_not_found() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  s.create_session(u.user_id, "old".into(), Utc::now() - Duration::minutes(1))
    .await
    .unwrap();
  assert!(s.find_session("old").await.unwrap().is_none());
}

#[tokio::test]
async fn new_session_sweeps_the_users_expired_ones() {
  let s = store().await;
  let ada = user(&s, "ada@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  let past = Utc::now() - Duration::minutes(1);
  s.create_session(ada.user_id, "ada-old".into(), past).await.unwrap();
  s.create_session(bob.user_id, "bob-old".into(), past).await.unwrap();
  assert_eq!(s.session_rows().await.unwrap(), 2);

  s.create_session(ada.user_id, "ada-new".into(), Utc::now() + Duration::hours(1))
    .await
    .unwrap();
  assert_eq!(s.session_rows().await.unwrap(), 2);
  assert!(!s.delete_session("ada-old").await.unwrap());
  assert!(s.delete_session("bob-old").await.unwrap());
  assert!(s.find_session("ada-new").await.unwrap().is_some());
}

// ─── Entries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_replaces_in_place() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let first = s.upsert_entry(entry(u.user_id, day(0), "draft")).await.unwrap();
  assert!(first.created);

  let second = s.upsert_entry(entry(u.user_id, day(0), "final")).await.unwrap();
  assert!(!second.created);
  assert_eq!(second.entry.id, first.entry.id);
  assert_eq!(second.entry.work_win.as_deref(), Some("final"));

  let stored = s.get_entry(u.user_id, day(0)).await.unwrap().unwrap();
  assert_eq!(stored, second.entry);
  assert_eq!(s.list_recent_entries(u.user_id, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cleared_field_is_stored_as_null() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let with_growth = NewEntry::new(u.user_id, day(0), draft("w", "", "g")).unwrap();
  s.upsert_entry(with_growth).await.unwrap();
  s.upsert_entry(entry(u.user_id, day(0), "w")).await.unwrap();

  let stored = s.get_entry(u.user_id, day(0)).await.unwrap().unwrap();
  assert_eq!(stored.growth_win, None);
  assert_eq!(s.category_counts(u.user_id).await.unwrap().growth, 0);
}

#[tokio::test]
async fn get_entry_missing_returns_none() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;
  assert!(s.get_entry(u.user_id, day(3)).await.unwrap().is_none());
}

#[tokio::test]
async fn recent_entries_newest_first_and_limited() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  for n in [3, 0, 5, 1, 4, 2, 7, 6, 8] {
    s.upsert_entry(entry(u.user_id, day(n), "w")).await.unwrap();
  }

  let recent = s.list_recent_entries(u.user_id, 7).await.unwrap();
  let dates: Vec<_> = recent.iter().map(|e| e.date).collect();
  assert_eq!(dates, (2..=8).rev().map(day).collect::<Vec<_>>());
}

#[tokio::test]
async fn entries_are_scoped_to_user() {
  let s = store().await;
  let ada = user(&s, "ada@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  s.upsert_entry(entry(ada.user_id, day(0), "ada's")).await.unwrap();

  assert!(s.list_recent_entries(bob.user_id, 7).await.unwrap().is_empty());
  assert!(s.get_entry(bob.user_id, day(0)).await.unwrap().is_none());
  assert_eq!(s.category_counts(bob.user_id).await.unwrap().total_entries, 0);
}

#[tokio::test]
async fn category_counts_skip_empty_slots() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let drafts = [draft("a", "b", ""), draft("c", "", ""), draft("", "", "d")];
  for (n, d) in drafts.into_iter().enumerate() {
    let input = NewEntry::new(u.user_id, day(n as u64), d).unwrap();
    s.upsert_entry(input).await.unwrap();
  }

  let counts = s.category_counts(u.user_id).await.unwrap();
  assert_eq!(counts.total_entries, 3);
  assert_eq!(counts.work, 2);
  assert_eq!(counts.personal, 1);
  assert_eq!(counts.growth, 1);
}

// ─── Streaks ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_streak_round_trips() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let next = StreakState { current_streak: 3, longest_streak: 9, last_entry_date: Some(day(2)) };
  s.update_streak(u.user_id, next).await.unwrap();
  assert_eq!(s.get_streak(u.user_id).await.unwrap(), Some(next));
}

// ─── Save flow ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_flow_tracks_streak_across_a_gap() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let one = save_wins(&s, u.user_id, day(0), draft("A", "", "")).await.unwrap();
  assert!(one.created);
  assert_eq!(one.change, StreakChange::Started);
  assert_eq!((one.streak.current_streak, one.streak.longest_streak), (1, 1));

  let two = save_wins(&s, u.user_id, day(1), draft("", "B", "")).await.unwrap();
  assert_eq!((two.streak.current_streak, two.streak.longest_streak), (2, 2));

  let again = save_wins(&s, u.user_id, day(1), draft("", "B2", "")).await.unwrap();
  assert!(!again.created);
  assert_eq!(again.change, StreakChange::SameDay);
  assert_eq!(again.streak, two.streak);

  let four = save_wins(&s, u.user_id, day(3), draft("", "", "C")).await.unwrap();
  assert_eq!(four.change, StreakChange::Broken { missed_days: 1 });
  assert_eq!((four.streak.current_streak, four.streak.longest_streak), (1, 2));

  let stored = s.get_streak(u.user_id).await.unwrap().unwrap();
  assert_eq!(stored, four.streak);
  assert_eq!(stored.last_entry_date, Some(day(3)));
}

#[tokio::test]
async fn backdated_save_records_entry_but_not_streak() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  save_wins(&s, u.user_id, day(5), draft("A", "", "")).await.unwrap();
  let before = s.get_streak(u.user_id).await.unwrap().unwrap();

  let old = save_wins(&s, u.user_id, day(2), draft("late", "", "")).await.unwrap();
  assert_eq!(old.change, StreakChange::Backdated { last_entry_date: day(5) });
  assert_eq!(s.get_streak(u.user_id).await.unwrap().unwrap(), before);
  assert!(s.get_entry(u.user_id, day(2)).await.unwrap().is_some());
}

#[tokio::test]
async fn invalid_draft_writes_nothing() {
  let s = store().await;
  let u = user(&s, "ada@example.com").await;

  let err = save_wins(&s, u.user_id, day(0), draft(" ", "", "")).await.unwrap_err();
  assert!(matches!(err, SaveError::Invalid(wins_core::Error::NoWins)));

  assert!(s.get_entry(u.user_id, day(0)).await.unwrap().is_none());
  assert_eq!(s.get_streak(u.user_id).await.unwrap(), Some(StreakState::default()));
}

/// Delegates to SQLite but refuses every streak write.
struct StreakWritesFail(SqliteStore);

impl WinsStore for StreakWritesFail {
  type Error = Error;

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    self.0.create_user(input).await
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    self.0.find_user_by_email(email).await
  }

  async fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    self.0.create_session(user_id, token_hash, expires_at).await
  }

  async fn find_session<'a>(&'a self, token_hash: &'a str) -> Result<Option<Session>> {
    self.0.find_session(token_hash).await
  }

  async fn delete_session<'a>(&'a self, token_hash: &'a str) -> Result<bool> {
    self.0.delete_session(token_hash).await
  }

  async fn get_entry(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<DailyEntry>> {
    self.0.get_entry(user_id, date).await
  }

  async fn upsert_entry(&self, entry: NewEntry) -> Result<Upserted> {
    self.0.upsert_entry(entry).await
  }

  async fn list_recent_entries(&self, user_id: Uuid, limit: usize) -> Result<Vec<DailyEntry>> {
    self.0.list_recent_entries(user_id, limit).await
  }

  async fn category_counts(&self, user_id: Uuid) -> Result<CategoryCounts> {
    self.0.category_counts(user_id).await
  }

  async fn get_streak(&self, user_id: Uuid) -> Result<Option<StreakState>> {
    self.0.get_streak(user_id).await
  }

  async fn update_streak(&self, _user_id: Uuid, _next: StreakState) -> Result<()> {
    Err(Error::DateParse("streak write refused".into()))
  }
}

#[tokio::test]
async fn failed_streak_write_keeps_the_entry_and_the_old_streak() {
  let s = StreakWritesFail(store().await);
  let u = user(&s.0, "ada@example.com").await;

  let err = save_wins(&s, u.user_id, day(0), draft("shipped", "", "")).await.unwrap_err();
  assert!(matches!(err, SaveError::Store(Error::DateParse(_))));

  let stored = s.get_entry(u.user_id, day(0)).await.unwrap().unwrap();
  assert_eq!(stored.work_win.as_deref(), Some("shipped"));
  assert_eq!(s.get_streak(u.user_id).await.unwrap(), Some(StreakState::default()));
}
