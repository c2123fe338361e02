//! Core types and trait definitions for Daily Wins.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate in the workspace depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entry;
pub mod error;
pub mod journal;
pub mod session;
pub mod stats;
pub mod store;
pub mod streak;

pub use error::{Error, Result};
