//! Error types for `wins-core`.
//!
//! Every variant is a validation failure detected before any write; the
//! display strings are the copy shown to users.

use thiserror::Error;

use crate::entry::Category;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Please enter at least one win")]
  NoWins,

  #[error("{category} win is {len} characters; the limit is {max}")]
  WinTooLong {
    category: Category,
    len:      usize,
    max:      usize,
  },

  #[error("Please enter a valid email")]
  InvalidEmail,

  #[error("Password must be at least {min} characters")]
  PasswordTooShort { min: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
