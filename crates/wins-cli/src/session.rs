//! The client-side session context.
//!
//! [`SessionContext`] holds the signed-in user (if any) behind a
//! [`tokio::sync::watch`] channel. Views receive it explicitly and subscribe
//! to learn when the session appears or goes away.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use wins_core::session::Session;

/// A session together with the bearer token that proves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedIn {
  pub token:   String,
  pub session: Session,
}

impl SignedIn {
  /// Upper-cased first character of the email, for the header avatar.
  pub fn initial(&self) -> char {
    self
      .session
      .email
      .chars()
      .next()
      .map(|c| c.to_ascii_uppercase())
      .unwrap_or('?')
  }
}

// ─── Context ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SessionContext {
  tx: Arc<watch::Sender<Option<SignedIn>>>,
}

impl SessionContext {
  pub fn new(initial: Option<SignedIn>) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self { tx: Arc::new(tx) }
  }

  pub fn current(&self) -> Option<SignedIn> { self.tx.borrow().clone() }

  pub fn subscribe(&self) -> watch::Receiver<Option<SignedIn>> { self.tx.subscribe() }

  pub fn sign_in(&self, signed_in: SignedIn) { self.tx.send_replace(Some(signed_in)); }

  pub fn sign_out(&self) { self.tx.send_replace(None); }
}

// ─── Session file ─────────────────────────────────────────────────────────────

/// Optional on-disk copy of the session so a token survives restarts.
#[derive(Debug, Clone)]
pub struct SessionFile {
  path: PathBuf,
}

impl SessionFile {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// `None` if the file does not exist.
  pub fn load(&self) -> Result<Option<SignedIn>> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(e).with_context(|| format!("reading {}", self.path.display()));
      }
    };
    let signed_in = serde_json::from_str(&raw)
      .with_context(|| format!("parsing {}", self.path.display()))?;
    Ok(Some(signed_in))
  }

  pub fn save(&self, signed_in: &SignedIn) -> Result<()> {
    if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("creating {}", dir.display()))?;
    }
    let raw = serde_json::to_string_pretty(signed_in).context("serialising session")?;
    std::fs::write(&self.path, raw)
      .with_context(|| format!("writing {}", self.path.display()))
  }

  pub fn clear(&self) -> Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
    }
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  fn ada() -> SignedIn {
    SignedIn {
      token:   "tok".into(),
      session: Session { user_id: Uuid::new_v4(), email: "ada@example.com".into() },
    }
  }

  #[test]
  fn subscribers_see_sign_in_and_out() {
    let ctx = SessionContext::new(None);
    let mut rx = ctx.subscribe();
    assert!(!rx.has_changed().unwrap());

    ctx.sign_in(ada());
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref(), ctx.current().as_ref());

    ctx.sign_out();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
    assert!(ctx.current().is_none());
  }

  #[test]
  fn initial_is_the_email_initial() {
    assert_eq!(ada().initial(), 'A');
  }

  #[test]
  fn session_file_round_trip() {
    let path = std::env::temp_dir()
      .join(format!("wins-session-{}", Uuid::new_v4()))
      .join("session.json");
    let file = SessionFile::new(&path);

    assert_eq!(file.load().unwrap(), None);

    let signed_in = ada();
    file.save(&signed_in).unwrap();
    assert_eq!(file.load().unwrap(), Some(signed_in));

    file.clear().unwrap();
    assert_eq!(file.load().unwrap(), None);
    file.clear().unwrap();

    if let Some(dir) = path.parent() {
      std::fs::remove_dir_all(dir).ok();
    }
  }
}
