//! Application state machine and event dispatcher.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::{
  sync::{mpsc, watch},
  task::JoinHandle,
};
use wins_core::{entry::DailyEntry, journal::SaveOutcome, stats::Stats, streak::StreakView};

use crate::{
  client::ApiClient,
  form::{AuthForm, AuthMode, EntryForm},
  session::{SessionContext, SessionFile, SignedIn},
};

/// How many entries the recent-wins list shows.
pub const RECENT_LIMIT: usize = 7;

const TOAST_TTL: Duration = Duration::from_secs(4);

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Auth,
  Dashboard,
}

// ─── Toasts ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
  Success,
  Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
  pub kind:     ToastKind,
  pub title:    String,
  pub detail:   Option<String>,
  pub shown_at: Instant,
}

impl Toast {
  pub fn success(title: impl Into<String>) -> Self { Self::new(ToastKind::Success, title) }

  pub fn error(title: impl Into<String>) -> Self { Self::new(ToastKind::Error, title) }

  fn new(kind: ToastKind, title: impl Into<String>) -> Self {
    Self { kind, title: title.into(), detail: None, shown_at: Instant::now() }
  }

  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }

  fn expired(&self) -> bool { self.shown_at.elapsed() >= TOAST_TTL }
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

/// A widget's data: still loading, or loaded (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
  Loading,
  Ready(T),
}

impl<T> Loadable<T> {
  pub fn ready(&self) -> Option<&T> {
    match self {
      Self::Loading => None,
      Self::Ready(v) => Some(v),
    }
  }
}

/// Results delivered by background tasks to the dashboard.
#[derive(Debug)]
pub enum DashboardEvent {
  /// The stored entry for the given day, if any.
  Today(NaiveDate, Option<DailyEntry>),
  Streak(StreakView),
  Stats(Stats),
  Recent(Vec<DailyEntry>),
  Saved(Result<SaveOutcome, String>),
}

/// State of the signed-in view. Dropping it aborts every task it spawned, so
/// no result lands after sign-out.
pub struct Dashboard {
  pub today:  NaiveDate,
  pub entry:  EntryForm,
  pub streak: Loadable<StreakView>,
  pub stats:  Loadable<Stats>,
  pub recent: Loadable<Vec<DailyEntry>>,
  events_tx:  mpsc::UnboundedSender<DashboardEvent>,
  events_rx:  mpsc::UnboundedReceiver<DashboardEvent>,
  tasks:      Vec<JoinHandle<()>>,
  /// The in-flight reload; a newer refresh aborts it.
  refreshing: Option<JoinHandle<()>>,
}

impl Dashboard {
  fn new(today: NaiveDate) -> Self {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    Self {
      today,
      entry: EntryForm::default(),
      streak: Loadable::Loading,
      stats: Loadable::Loading,
      recent: Loadable::Loading,
      events_tx,
      events_rx,
      tasks: Vec::new(),
      refreshing: None,
    }
  }

  fn spawn<F>(&mut self, fut: F)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    self.tasks.retain(|t| !t.is_finished());
    self.tasks.push(tokio::spawn(fut));
  }

  /// Reload every widget concurrently. Each widget updates as soon as its own
  /// request finishes; a failed read degrades to the empty state.
  fn refresh(&mut self, client: &ApiClient, auth: &SignedIn) {
    self.streak = Loadable::Loading;
    self.stats = Loadable::Loading;
    self.recent = Loadable::Loading;

    let client = client.clone();
    let auth = auth.clone();
    let tx = self.events_tx.clone();
    let today = self.today;

    if let Some(stale) = self.refreshing.take() {
      stale.abort();
    }
    self.refreshing = Some(tokio::spawn(async move {
      let (client, auth, tx) = (&client, &auth, &tx);
      tokio::join!(
        async move {
          let entry = or_default("today's entry", client.get_entry(auth, today).await);
          tx.send(DashboardEvent::Today(today, entry)).ok();
        },
        async move {
          let streak = or_default("streak", client.streak(auth).await);
          tx.send(DashboardEvent::Streak(streak)).ok();
        },
        async move {
          let stats = or_default("stats", client.stats(auth).await);
          tx.send(DashboardEvent::Stats(stats)).ok();
        },
        async move {
          let recent = or_default("recent wins", client.recent_entries(auth, RECENT_LIMIT).await);
          tx.send(DashboardEvent::Recent(recent)).ok();
        },
      );
    }));
  }

  /// Move to a new calendar day: the form starts empty and every widget
  /// reloads. Returns `false` if `today` is already the current day.
  fn roll_over(&mut self, today: NaiveDate, client: &ApiClient, auth: &SignedIn) -> bool {
    if today == self.today {
      return false;
    }
    tracing::info!(from = %self.today, to = %today, "day changed");
    self.today = today;
    self.entry = EntryForm::default();
    self.refresh(client, auth);
    true
  }

  fn save(&mut self, client: &ApiClient, auth: &SignedIn) {
    self.entry.saving = true;

    let client = client.clone();
    let auth = auth.clone();
    let tx = self.events_tx.clone();
    let today = self.today;
    let draft = self.entry.draft();

    self.spawn(async move {
      let result = client
        .save_entry(&auth, today, &draft)
        .await
        .map_err(|e| format!("{e:#}"));
      tx.send(DashboardEvent::Saved(result)).ok();
    });
  }
}

impl Drop for Dashboard {
  fn drop(&mut self) {
    for task in self.tasks.iter().chain(&self.refreshing) {
      task.abort();
    }
  }
}

fn or_default<T: Default>(what: &str, result: anyhow::Result<T>) -> T {
  result.unwrap_or_else(|e| {
    tracing::warn!(error = %format!("{e:#}"), "failed to load {what}");
    T::default()
  })
}

// ─── Pending actions ──────────────────────────────────────────────────────────

/// Network actions started by a key press. They run after the next frame is
/// drawn so their "in progress" state is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
  SubmitAuth,
  SignOut,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub auth:      AuthForm,
  /// Present exactly while a session is active.
  pub dashboard: Option<Dashboard>,
  pub toast:     Option<Toast>,
  pub pending:   Option<Pending>,

  client:       ApiClient,
  sessions:     SessionContext,
  session_rx:   watch::Receiver<Option<SignedIn>>,
  session_file: Option<SessionFile>,
}

impl App {
  pub fn new(client: ApiClient, sessions: SessionContext, session_file: Option<SessionFile>) -> Self {
    let session_rx = sessions.subscribe();
    let mut app = Self {
      auth: AuthForm::default(),
      dashboard: None,
      toast: None,
      pending: None,
      client,
      sessions,
      session_rx,
      session_file,
    };
    if let Some(auth) = app.sessions.current() {
      app.open_dashboard(&auth);
    }
    app
  }

  pub fn screen(&self) -> Screen {
    if self.dashboard.is_some() { Screen::Dashboard } else { Screen::Auth }
  }

  pub fn signed_in(&self) -> Option<SignedIn> { self.sessions.current() }

  fn open_dashboard(&mut self, auth: &SignedIn) {
    let mut dashboard = Dashboard::new(Local::now().date_naive());
    dashboard.refresh(&self.client, auth);
    // Replacing the old dashboard drops it, aborting its tasks.
    self.dashboard = Some(dashboard);
  }

  // ── Background updates ────────────────────────────────────────────────────

  /// Apply session changes and finished background work. Called once per
  /// frame.
  pub fn tick(&mut self) {
    if self.session_rx.has_changed().unwrap_or(false) {
      let current = self.session_rx.borrow_and_update().clone();
      match current {
        Some(auth) => self.open_dashboard(&auth),
        None => self.dashboard = None,
      }
    }

    if let (Some(dashboard), Some(auth)) = (&mut self.dashboard, self.sessions.current()) {
      dashboard.roll_over(Local::now().date_naive(), &self.client, &auth);
    }

    let mut events = Vec::new();
    if let Some(dashboard) = &mut self.dashboard {
      while let Ok(event) = dashboard.events_rx.try_recv() {
        events.push(event);
      }
    }
    for event in events {
      self.apply(event);
    }

    if self.toast.as_ref().is_some_and(Toast::expired) {
      self.toast = None;
    }
  }

  fn apply(&mut self, event: DashboardEvent) {
    let Some(dashboard) = &mut self.dashboard else { return };

    match event {
      DashboardEvent::Today(date, entry) if date == dashboard.today => {
        dashboard.entry.load(entry.as_ref())
      }
      DashboardEvent::Today(..) => {}
      DashboardEvent::Streak(streak) => dashboard.streak = Loadable::Ready(streak),
      DashboardEvent::Stats(stats) => dashboard.stats = Loadable::Ready(stats),
      DashboardEvent::Recent(recent) => dashboard.recent = Loadable::Ready(recent),
      DashboardEvent::Saved(Ok(outcome)) => {
        dashboard.entry.saving = false;
        dashboard.entry.existing |= outcome.entry.date == dashboard.today;
        let title = if outcome.created { "Today's wins saved! 🎉" } else { "Wins updated! 🎉" };
        self.toast = Some(Toast::success(title).with_detail("Keep the momentum going!"));
        if let Some(auth) = self.sessions.current() {
          dashboard.refresh(&self.client, &auth);
        }
      }
      DashboardEvent::Saved(Err(e)) => {
        dashboard.entry.saving = false;
        tracing::error!(error = %e, "failed to save wins");
        self.toast = Some(Toast::error("Failed to save wins. Please try again."));
      }
    }
  }

  // ── Pending actions ───────────────────────────────────────────────────────

  /// Run the action queued by the last key press, if any.
  pub async fn run_pending(&mut self) {
    match self.pending.take() {
      Some(Pending::SubmitAuth) => self.submit_auth().await,
      Some(Pending::SignOut) => self.sign_out().await,
      None => {}
    }
  }

  async fn submit_auth(&mut self) {
    let creds = match self.auth.credentials() {
      Ok(creds) => creds,
      Err(e) => {
        self.auth.submitting = false;
        self.toast = Some(Toast::error(e.to_string()));
        return;
      }
    };

    let (result, welcome) = match self.auth.mode {
      AuthMode::SignIn => (self.client.sign_in(&creds).await, "Welcome back!"),
      AuthMode::SignUp => {
        let full_name = self.auth.full_name();
        (
          self.client.sign_up(&creds, full_name.as_deref()).await,
          "Account created! Welcome to Daily Wins! 🎉",
        )
      }
    };
    self.auth.submitting = false;

    match result {
      Ok(signed_in) => {
        if let Some(file) = &self.session_file
          && let Err(e) = file.save(&signed_in)
        {
          tracing::warn!(error = %format!("{e:#}"), "could not persist session");
        }
        tracing::info!(user_id = %signed_in.session.user_id, "signed in");
        self.auth.clear_secret();
        self.sessions.sign_in(signed_in);
        self.toast = Some(Toast::success(welcome));
      }
      Err(e) => {
        tracing::warn!(error = %format!("{e:#}"), "authentication failed");
        self.toast = Some(Toast::error(e.to_string()));
      }
    }
  }

  async fn sign_out(&mut self) {
    let Some(auth) = self.sessions.current() else { return };

    match self.client.sign_out(&auth).await {
      Ok(()) => {
        if let Some(file) = &self.session_file
          && let Err(e) = file.clear()
        {
          tracing::warn!(error = %format!("{e:#}"), "could not remove session file");
        }
        self.sessions.sign_out();
        self.toast = Some(Toast::success("Signed out successfully"));
      }
      Err(e) => {
        tracing::error!(error = %format!("{e:#}"), "sign-out failed");
        self.toast = Some(Toast::error("Failed to sign out"));
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global: Ctrl-C and Esc quit from anywhere.
    if (ctrl && key.code == KeyCode::Char('c')) || key.code == KeyCode::Esc {
      return false;
    }
    if self.pending.is_some() {
      return true;
    }

    match self.screen() {
      Screen::Auth => self.handle_auth_key(key, ctrl),
      Screen::Dashboard => self.handle_dashboard_key(key, ctrl),
    }
    true
  }

  fn handle_auth_key(&mut self, key: KeyEvent, ctrl: bool) {
    if self.auth.submitting {
      return;
    }
    match key.code {
      KeyCode::F(2) => self.auth.toggle_mode(),
      KeyCode::Char('t') if ctrl => self.auth.toggle_mode(),
      KeyCode::Tab | KeyCode::Down => self.auth.next_field(),
      KeyCode::BackTab | KeyCode::Up => self.auth.prev_field(),
      KeyCode::Backspace => self.auth.backspace(),
      KeyCode::Enter => {
        self.auth.submitting = true;
        self.pending = Some(Pending::SubmitAuth);
      }
      KeyCode::Char(c) if !ctrl => self.auth.type_char(c),
      _ => {}
    }
  }

  fn handle_dashboard_key(&mut self, key: KeyEvent, ctrl: bool) {
    let Some(dashboard) = &mut self.dashboard else { return };

    match key.code {
      KeyCode::Char('o') if ctrl => self.pending = Some(Pending::SignOut),
      KeyCode::Char('r') if ctrl => {
        if let Some(auth) = self.sessions.current() {
          dashboard.refresh(&self.client, &auth);
        }
      }
      KeyCode::Char('s') if ctrl => self.request_save(),
      KeyCode::Enter => self.request_save(),
      KeyCode::Tab | KeyCode::Down => dashboard.entry.next_field(),
      KeyCode::BackTab | KeyCode::Up => dashboard.entry.prev_field(),
      KeyCode::Backspace => dashboard.entry.backspace(),
      KeyCode::Char(c) if !ctrl => {
        dashboard.entry.type_char(c);
      }
      _ => {}
    }
  }

  fn request_save(&mut self) {
    let Some(auth) = self.sessions.current() else { return };
    let Some(dashboard) = &mut self.dashboard else { return };

    if dashboard.entry.saving {
      return;
    }
    // Past midnight the form belongs to a day that is over; start afresh
    // rather than overwrite it.
    if dashboard.roll_over(Local::now().date_naive(), &self.client, &auth) {
      return;
    }
    if !dashboard.entry.has_any_win() {
      self.toast = Some(Toast::error(wins_core::Error::NoWins.to_string()));
      return;
    }
    dashboard.save(&self.client, &auth);
  }
}
