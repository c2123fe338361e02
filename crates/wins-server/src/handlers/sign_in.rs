//! `POST /auth/sign-in`: exchange email and password for a session token.

use axum::{Json, extract::State};
use wins_core::{session::Credentials, store::WinsStore};

use super::AuthResponse;
use crate::{
  AppState,
  auth::{issue_session, verify_password_blocking},
  error::Error,
};

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(creds): Json<Credentials>,
) -> Result<Json<AuthResponse>, Error>
where
  S: WinsStore,
{
  let email = creds.validate()?;

  let user = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(Error::store)?;

  let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
  let matched = verify_password_blocking(creds.password, stored_hash).await?;
  let Some(user) = user.filter(|_| matched) else {
    tracing::info!("sign-in rejected");
    return Err(Error::InvalidCredentials);
  };

  let token = issue_session(&state, &user).await?;
  tracing::info!(user_id = %user.user_id, "signed in");

  Ok(Json(AuthResponse { token, session: user.session() }))
}
