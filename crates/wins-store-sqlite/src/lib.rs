//! SQLite implementation of [`wins_core::store::WinsStore`].
//!
//! Users, sessions, daily entries and streaks live in one database file. Every
//! query runs on the [`tokio_rusqlite`] connection thread.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
