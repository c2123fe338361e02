//! `POST /auth/sign-out`: end the session named by the bearer token.

use axum::{extract::State, http::{HeaderMap, StatusCode}};
use wins_core::store::WinsStore;

use crate::{
  AppState,
  auth::{bearer_token, hash_token},
  error::Error,
};

/// Always `204` for a well-formed bearer header, whether or not the session
/// still existed.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, Error>
where
  S: WinsStore,
{
  let digest = hash_token(bearer_token(&headers)?);

  let existed = state
    .store
    .delete_session(&digest)
    .await
    .map_err(Error::store)?;
  tracing::debug!(existed, "session ended");

  Ok(StatusCode::NO_CONTENT)
}
