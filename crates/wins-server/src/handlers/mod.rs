pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

use serde::Serialize;
use wins_core::session::Session;

/// Body returned by a successful sign-in or sign-up.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
  pub token:   String,
  pub session: Session,
}
