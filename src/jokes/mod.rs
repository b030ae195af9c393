//! Joke listing, display, and submission.

pub mod handlers;
pub mod validation;

pub use validation::{validate_joke_content, validate_joke_name};
