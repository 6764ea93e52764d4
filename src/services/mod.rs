//! Business logic services.
//!
//! Services sit behind traits so handlers can be exercised against mocks.

pub mod password;
pub mod user_service;
