//! Data models for users and the response envelope.

/// User records and credential payloads
pub mod user;
/// Standard response envelope
pub mod response;
