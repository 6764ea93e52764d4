//! Error types and their HTTP mapping.
//!
//! Every error carries an HTTP status code and a message key. The key is
//! resolved against the configured [`MessageSource`](crate::messages::MessageSource)
//! when the error is rendered, so clients always receive a localized
//! message inside the standard response envelope.

use axum::http::StatusCode;

use crate::messages::MessageKey;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation Errors**: malformed input detected before any service call
/// - **Domain Errors**: duplication and not-found outcomes reported by the service
/// - **Infrastructure Errors**: database and hashing failures
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    ///
    /// The String describes what was invalid. It is logged but never sent to
    /// the client, which only sees the localized "invalid argument" message.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A user with the requested username already exists.
    #[error("Username already exists")]
    UsernameDuplicated,

    /// No user is registered with the given phone number.
    #[error("Phone number not found")]
    PhoneNumberNotFound,

    /// The supplied credential does not match any user.
    #[error("User info not found")]
    UserInfoNotFound,

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// HTTP status code for this error.
    ///
    /// - Validation and domain errors → 400 Bad Request
    /// - Hashing and database errors → 500 Internal Server Error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_)
            | AppError::UsernameDuplicated
            | AppError::PhoneNumberNotFound
            | AppError::UserInfoNotFound => StatusCode::BAD_REQUEST,
            AppError::PasswordHashing(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message key rendered to the client for this error.
    ///
    /// Infrastructure errors share a generic key so details are not leaked.
    pub fn message_key(&self) -> MessageKey {
        match self {
            AppError::InvalidArgument(_) => MessageKey::ArgumentInvalid,
            AppError::UsernameDuplicated => MessageKey::UsernameDuplicated,
            AppError::PhoneNumberNotFound => MessageKey::PhoneNumberNotFound,
            AppError::UserInfoNotFound => MessageKey::UserInfoNotFound,
            AppError::PasswordHashing(_) | AppError::Database(_) => MessageKey::InternalError,
        }
    }

    /// Whether this error was caused by the client.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}
