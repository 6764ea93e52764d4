//! Account Service - Main Application Entry Point
//!
//! REST API server for the account-management features of a resale
//! platform: user registration, username recovery by phone number,
//! temporary password issuance and password updates.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Password Hashing**: Argon2
//! - **Format**: JSON requests, `{message, data}` response envelopes
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Load localized messages
//! 3. Create database connection pool and run migrations
//! 4. Build HTTP router with the user service and password capabilities
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod messages;
mod models;
mod routes;
mod services;
mod validation;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    messages::MessageSource,
    routes::AppState,
    services::{
        password::{Argon2PasswordEncoder, PasswordEncoder, RandomValueStringGenerator},
        user_service::PgUserService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let messages = match &config.messages_path {
        Some(path) => MessageSource::load(&config.message_locale, path)?,
        None => MessageSource::for_locale(&config.message_locale),
    };
    tracing::info!("Messages loaded for locale {}", messages.locale());

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let password_encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2PasswordEncoder::default());

    let state = AppState {
        user_service: Arc::new(PgUserService::new(pool, password_encoder.clone())),
        password_encoder,
        password_generator: Arc::new(RandomValueStringGenerator::new(
            config.temporary_password_length,
        )),
        messages: Arc::new(messages),
    };

    let app = routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
