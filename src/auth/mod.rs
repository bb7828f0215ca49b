//! JWT-based session authentication.
//!
//! This module provides:
//! - session token creation and validation (`jwt`)
//! - the browser cookie transport (`session`)
//! - the `log_request` / `require_token` interceptors for protected routes
//! - the `/jwt` and `/logout` handlers

mod handlers;
pub mod jwt;
mod middleware;
mod session;

pub use handlers::{issue_token, logout};
pub use middleware::{log_request, require_token};
