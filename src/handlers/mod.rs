//! HTTP request handlers (route handlers).
//!
//! Each handler extracts request data, validates it, delegates to the
//! services held in [`AppState`](crate::routes::AppState) and returns a
//! JSON response.

/// Health check endpoint
pub mod health;
/// User account endpoints
pub mod users;
