//! `POST /auth/sign-up`: register an account and start a session.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use wins_core::{
  session::{Credentials, NewUser},
  store::WinsStore,
};

use super::AuthResponse;
use crate::{
  AppState,
  auth::{hash_password_blocking, issue_session},
  error::Error,
};

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub email:     String,
  pub password:  String,
  #[serde(default)]
  pub full_name: Option<String>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignUpBody>,
) -> Result<impl IntoResponse, Error>
where
  S: WinsStore,
{
  let creds = Credentials { email: body.email, password: body.password };
  let email = creds.validate()?;

  let full_name = body
    .full_name
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty());

  let password_hash = hash_password_blocking(creds.password).await?;

  let user = state
    .store
    .create_user(NewUser { email, full_name, password_hash })
    .await
    .map_err(Error::store)?
    .ok_or(Error::EmailTaken)?;

  let token = issue_session(&state, &user).await?;
  tracing::info!(user_id = %user.user_id, "account created");

  Ok((
    StatusCode::CREATED,
    Json(AuthResponse { token, session: user.session() }),
  ))
}
