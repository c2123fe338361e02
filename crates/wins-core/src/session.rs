//! Users, sessions and credential validation.
//!
//! A [`Session`] is the read-only view of the signed-in user that every
//! request handler and every client view receives explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

/// The authenticated user as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user_id: Uuid,
  pub email:   String,
}

/// A registered account. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct User {
  pub user_id:       Uuid,
  pub email:         String,
  pub full_name:     Option<String>,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn session(&self) -> Session {
    Session { user_id: self.user_id, email: self.email.clone() }
  }
}

/// Input to [`crate::store::WinsStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub full_name:     Option<String>,
  pub password_hash: String,
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Email/password pair submitted to sign in or sign up.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

impl Credentials {
  /// Validate both fields, returning the normalised email.
  pub fn validate(&self) -> Result<String> {
    let email = normalize_email(&self.email)?;
    validate_password(&self.password)?;
    Ok(email)
  }
}

/// Trim and lowercase an email address, rejecting anything that is not
/// shaped like `local@domain.tld`.
pub fn normalize_email(raw: &str) -> Result<String> {
  let email = raw.trim().to_lowercase();
  let (local, domain) = email.split_once('@').ok_or(Error::InvalidEmail)?;

  let domain_ok = !domain.contains('@')
    && domain.split('.').count() >= 2
    && domain.split('.').all(|label| !label.is_empty());

  if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
    return Err(Error::InvalidEmail);
  }
  Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::PasswordTooShort { min: MIN_PASSWORD_LEN });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn email_is_trimmed_and_lowercased() {
    assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
  }

  #[test]
  fn malformed_emails_are_rejected() {
    for bad in ["", "ada", "@example.com", "ada@", "ada@example", "ada@exa mple.com", "a@b@c.com", "ada@.com"] {
      assert_eq!(normalize_email(bad), Err(Error::InvalidEmail), "{bad:?}");
    }
  }

  #[test]
  fn short_password_is_rejected() {
    let creds = Credentials { email: "ada@example.com".into(), password: "12345".into() };
    assert_eq!(creds.validate(), Err(Error::PasswordTooShort { min: 6 }));
    assert_eq!(
      Error::PasswordTooShort { min: 6 }.to_string(),
      "Password must be at least 6 characters"
    );
  }

  #[test]
  fn email_checked_before_password() {
    let creds = Credentials { email: "nope".into(), password: "1".into() };
    assert_eq!(creds.validate(), Err(Error::InvalidEmail));
  }
}
