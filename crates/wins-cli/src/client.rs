//! Async HTTP client wrapping the Daily Wins JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use wins_core::{
  entry::{DailyEntry, WinsDraft},
  journal::SaveOutcome,
  session::{Credentials, Session},
  stats::Stats,
  streak::StreakView,
};

use crate::session::SignedIn;

/// Async HTTP client for the Daily Wins server.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
  email:     &'a str,
  password:  &'a str,
  full_name: Option<&'a str>,
}

#[derive(Deserialize)]
struct AuthReply {
  token:   String,
  session: Session,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  fn authed(&self, req: RequestBuilder, auth: &SignedIn) -> RequestBuilder {
    req.bearer_auth(&auth.token)
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /auth/sign-in`
  pub async fn sign_in(&self, creds: &Credentials) -> Result<SignedIn> {
    let resp = self
      .client
      .post(self.url("/auth/sign-in"))
      .json(&serde_json::json!({ "email": creds.email, "password": creds.password }))
      .send()
      .await
      .context("POST /auth/sign-in failed")?;

    let reply: AuthReply = json_or_error(resp).await?;
    Ok(SignedIn { token: reply.token, session: reply.session })
  }

  /// `POST /auth/sign-up`
  pub async fn sign_up(&self, creds: &Credentials, full_name: Option<&str>) -> Result<SignedIn> {
    let body = SignUpBody { email: &creds.email, password: &creds.password, full_name };
    let resp = self
      .client
      .post(self.url("/auth/sign-up"))
      .json(&body)
      .send()
      .await
      .context("POST /auth/sign-up failed")?;

    let reply: AuthReply = json_or_error(resp).await?;
    Ok(SignedIn { token: reply.token, session: reply.session })
  }

  /// `POST /auth/sign-out`
  pub async fn sign_out(&self, auth: &SignedIn) -> Result<()> {
    let resp = self
      .authed(self.client.post(self.url("/auth/sign-out")), auth)
      .send()
      .await
      .context("POST /auth/sign-out failed")?;

    if !resp.status().is_success() {
      return Err(error_from(resp).await);
    }
    Ok(())
  }

  /// `GET /api/session`. `None` when the token is no longer accepted.
  pub async fn current_session(&self, auth: &SignedIn) -> Result<Option<Session>> {
    let resp = self
      .authed(self.client.get(self.url("/api/session")), auth)
      .send()
      .await
      .context("GET /api/session failed")?;

    if resp.status() == StatusCode::UNAUTHORIZED {
      return Ok(None);
    }
    json_or_error(resp).await.map(Some)
  }

  // ── Entries ───────────────────────────────────────────────────────────────

  /// `GET /api/entries/{date}`
  pub async fn get_entry(&self, auth: &SignedIn, date: NaiveDate) -> Result<Option<DailyEntry>> {
    let resp = self
      .authed(self.client.get(self.url(&format!("/api/entries/{date}"))), auth)
      .send()
      .await
      .with_context(|| format!("GET /api/entries/{date} failed"))?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    json_or_error(resp).await.map(Some)
  }

  /// `PUT /api/entries/{date}`
  pub async fn save_entry(
    &self,
    auth: &SignedIn,
    date: NaiveDate,
    draft: &WinsDraft,
  ) -> Result<SaveOutcome> {
    let resp = self
      .authed(self.client.put(self.url(&format!("/api/entries/{date}"))), auth)
      .json(draft)
      .send()
      .await
      .with_context(|| format!("PUT /api/entries/{date} failed"))?;

    json_or_error(resp).await
  }

  /// `GET /api/entries?limit=<n>`
  pub async fn recent_entries(&self, auth: &SignedIn, limit: usize) -> Result<Vec<DailyEntry>> {
    let resp = self
      .authed(self.client.get(self.url("/api/entries")), auth)
      .query(&[("limit", limit.to_string())])
      .send()
      .await
      .context("GET /api/entries failed")?;

    json_or_error(resp).await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/streak`
  pub async fn streak(&self, auth: &SignedIn) -> Result<StreakView> {
    let resp = self
      .authed(self.client.get(self.url("/api/streak")), auth)
      .send()
      .await
      .context("GET /api/streak failed")?;

    json_or_error(resp).await
  }

  /// `GET /api/stats`
  pub async fn stats(&self, auth: &SignedIn) -> Result<Stats> {
    let resp = self
      .authed(self.client.get(self.url("/api/stats")), auth)
      .send()
      .await
      .context("GET /api/stats failed")?;

    json_or_error(resp).await
  }
}

// ─── Response helpers ─────────────────────────────────────────────────────────

async fn json_or_error<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
  if !resp.status().is_success() {
    return Err(error_from(resp).await);
  }
  resp.json().await.context("deserialising response")
}

/// Turn a failed response into an error carrying the server's message.
async fn error_from(resp: Response) -> anyhow::Error {
  let status = resp.status();
  match resp.json::<ErrorBody>().await {
    Ok(body) => anyhow!(body.error),
    Err(_) => anyhow!("request failed with {status}"),
  }
}
