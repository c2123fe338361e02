//! `wins`: terminal client for Daily Wins.
//!
//! # Usage
//!
//! ```
//! wins --url http://localhost:5280
//! wins --session-file ~/.config/wins/session.json --log-file /tmp/wins.log
//! wins --config ~/.config/wins/config.toml
//! ```

mod app;
mod client;
mod form;
mod session;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::ApiClient;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use session::{SessionContext, SessionFile, SignedIn};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://127.0.0.1:5280";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wins", about = "Terminal client for Daily Wins")]
struct Args {
  /// Path to a TOML config file (url, session_file, log_file).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the wins server (default: http://127.0.0.1:5280).
  #[arg(long, env = "WINS_URL")]
  url: Option<String>,

  /// Keep the session token here so it survives restarts.
  #[arg(long, value_name = "FILE")]
  session_file: Option<PathBuf>,

  /// Write logs to this file. Without it nothing is logged.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          Option<String>,
  #[serde(default)]
  session_file: Option<PathBuf>,
  #[serde(default)]
  log_file:     Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

/// Load a stored session and confirm the server still accepts its token.
async fn restore_session(client: &ApiClient, file: &SessionFile) -> Option<SignedIn> {
  let stored = match file.load() {
    Ok(stored) => stored?,
    Err(e) => {
      tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable session file");
      return None;
    }
  };

  match client.current_session(&stored).await {
    Ok(Some(session)) => {
      tracing::info!(user_id = %session.user_id, path = %file.path().display(), "session restored");
      Some(SignedIn { token: stored.token, session })
    }
    Ok(None) => {
      tracing::info!("stored session expired");
      if let Err(e) = file.clear() {
        tracing::warn!(error = %format!("{e:#}"), "could not remove session file");
      }
      None
    }
    Err(e) => {
      tracing::warn!(error = %format!("{e:#}"), "could not validate stored session");
      None
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or(file_cfg.url.filter(|u| !u.is_empty()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let session_file = args.session_file.or(file_cfg.session_file).map(SessionFile::new);
  let log_file = args.log_file.or(file_cfg.log_file);

  if let Some(path) = &log_file {
    init_logging(path)?;
  }

  let client = ApiClient::new(&base_url)?;
  let initial = match &session_file {
    Some(file) => restore_session(&client, file).await,
    None => None,
  };
  let sessions = SessionContext::new(initial);
  let mut app = App::new(client, sessions, session_file);
  tracing::info!(url = %base_url, "starting");

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The frame above shows the in-progress state; now do the work.
    if app.pending.is_some() {
      app.run_pending().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
