//! Data access layer for the jokes site.
//!
//! Row models plus the repository traits the services depend on, with a
//! Postgres implementation over a shared connection pool.

pub mod models;
pub mod operations;

pub use models::{Joke, JokeListItem, User};
pub use operations::{DbOperations, JokeStore, NewJoke, UserStore};
