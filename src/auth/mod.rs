//! Authentication for the jokes site.
//!
//! `service` implements register/login, session issuance, and the
//! require-auth guard; `handlers` exposes them as routes.

mod service;
pub mod handlers;

pub use service::{AuthCheck, AuthService};
