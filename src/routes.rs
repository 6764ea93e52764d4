//! Router construction and shared handler state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    handlers,
    messages::{MessageKey, MessageSource},
    models::response::{Reply, StandardResponse},
    services::{
        password::{PasswordEncoder, TemporaryPasswordGenerator},
        user_service::UserService,
    },
};

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub password_encoder: Arc<dyn PasswordEncoder>,
    pub password_generator: Arc<dyn TemporaryPasswordGenerator>,
    pub messages: Arc<MessageSource>,
}

impl AppState {
    /// Localized text for `key`.
    pub fn message(&self, key: MessageKey) -> String {
        self.messages.message(key)
    }

    /// Render `err` as a localized envelope with empty data.
    pub fn reject(&self, err: AppError) -> Reply {
        if err.is_client_error() {
            tracing::warn!("Request rejected: {}", err);
        } else {
            tracing::error!("Request failed: {}", err);
        }

        Reply::with_status(
            err.status(),
            StandardResponse::message_only(self.messages.message(err.message_key())),
        )
    }
}

/// Build the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/users/create", post(handlers::users::create_user))
        .route(
            "/users/usernameInquiry",
            get(handlers::users::find_username),
        )
        .route(
            "/users/password/inquiry",
            post(handlers::users::recover_password),
        )
        .route(
            "/users/password/update",
            post(handlers::users::update_password),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
