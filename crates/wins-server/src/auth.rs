//! Bearer-token sessions and argon2 password hashing.
//!
//! A session token is 32 random bytes, base64url encoded. Only its SHA-256
//! digest is ever handed to the store.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};
use wins_core::{session::User, store::WinsStore};

use crate::{AppState, error::Error};

const TOKEN_BYTES: usize = 32;

// ─── Tokens ──────────────────────────────────────────────────────────────────

pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  B64URL.encode(bytes)
}

/// Hex-encoded SHA-256 of `token`; the form sessions are stored under.
pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let token = value
    .strip_prefix("Bearer ")
    .map(str::trim)
    .ok_or(Error::Unauthorized)?;

  if token.is_empty() {
    return Err(Error::Unauthorized);
  }
  Ok(token)
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// `true` if `password` matches the PHC string `phc`. A malformed stored hash
/// never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    tracing::error!("stored password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Checked against when the email is unknown, so both sign-in failures cost
/// one argon2 verification.
static DUMMY_HASH: LazyLock<String> =
  LazyLock::new(|| hash_password("unknown-account").unwrap_or_default());

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, Error> {
  tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .map_err(|e| Error::Hash(e.to_string()))?
}

/// [`verify_password`] on the blocking pool. `None` (no such account) runs a
/// verification against [`DUMMY_HASH`] and always yields `false`.
pub async fn verify_password_blocking(password: String, phc: Option<String>) -> Result<bool, Error> {
  tokio::task::spawn_blocking(move || match phc {
    Some(phc) => verify_password(&password, &phc),
    None => {
      verify_password(&password, &DUMMY_HASH);
      false
    }
  })
  .await
  .map_err(|e| Error::Hash(e.to_string()))
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// Start a session for `user`, returning the bearer token to hand back.
pub async fn issue_session<S>(state: &AppState<S>, user: &User) -> Result<String, Error>
where
  S: WinsStore,
{
  let token = generate_token();
  let ttl = Duration::hours(i64::from(state.config.session_ttl_hours));
  let expires_at = Utc::now()
    .checked_add_signed(ttl)
    .unwrap_or(DateTime::<Utc>::MAX_UTC);

  state
    .store
    .create_session(user.user_id, hash_token(&token), expires_at)
    .await
    .map_err(Error::store)?;
  Ok(token)
}

/// Middleware guarding `/api`: resolves the bearer token to a
/// [`wins_core::session::Session`] and inserts it into the request
/// extensions.
pub async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: WinsStore,
{
  let digest = hash_token(bearer_token(req.headers())?);

  let session = state
    .store
    .find_session(&digest)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;

  req.extensions_mut().insert(session);
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn tokens_are_unique_and_url_safe() {
    let a = generate_token();
    let b = generate_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
  }

  #[test]
  fn token_digest_is_hex_sha256() {
    let digest = hash_token("abc");
    assert_eq!(
      digest,
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn bearer_header_parsing() {
    assert_eq!(bearer_token(&headers("Bearer tok123")).unwrap(), "tok123");
    assert!(matches!(bearer_token(&headers("Basic dXNlcjpwYXNz")), Err(Error::Unauthorized)));
    assert!(matches!(bearer_token(&headers("Bearer ")), Err(Error::Unauthorized)));
    assert!(matches!(bearer_token(&HeaderMap::new()), Err(Error::Unauthorized)));
  }

  #[test]
  fn password_round_trip() {
    let hash = hash_password("secret1").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret1", &hash));
    assert!(!verify_password("secret2", &hash));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }

  #[test]
  fn dummy_hash_is_a_real_phc_string() {
    assert!(PasswordHash::new(&DUMMY_HASH).is_ok());
    assert!(!verify_password("unknown-account-guess", &DUMMY_HASH));
  }

  #[tokio::test]
  async fn blocking_helpers_match_the_sync_ones() {
    let hash = hash_password_blocking("secret1".into()).await.unwrap();
    assert!(verify_password_blocking("secret1".into(), Some(hash.clone())).await.unwrap());
    assert!(!verify_password_blocking("secret2".into(), Some(hash)).await.unwrap());
  }

  #[tokio::test]
  async fn unknown_account_never_verifies() {
    assert!(!verify_password_blocking("unknown-account".into(), None).await.unwrap());
  }
}
