//! User service - account persistence behind the HTTP handlers.
//!
//! Handlers depend on the [`UserService`] trait only. [`PgUserService`] is
//! the PostgreSQL implementation used by the running server.
//!
//! # Row Counts
//!
//! Password updates return the number of affected rows. Zero means no
//! user matched the supplied credential; handlers turn that into a
//! "user info not found" response.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{LoginInfo, StrictLoginInfo, User, UserRecord},
    services::password::PasswordEncoder,
};

/// Account operations consumed by the user handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Store a new user. `user.password` must already be encoded.
    ///
    /// # Errors
    ///
    /// - `UsernameDuplicated`: the username is taken
    /// - `Database`: any other database failure
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, AppError>;

    /// Username registered with a normalized phone number.
    async fn find_username(&self, phone_number: &str) -> Result<Option<String>, AppError>;

    /// Replace the password of the user matching every field of `info`.
    async fn update_password_by_strict_info(
        &self,
        info: &StrictLoginInfo,
        encoded_password: &str,
    ) -> Result<u64, AppError>;

    /// Replace the password of the user whose current credential is `login`.
    async fn update_password(
        &self,
        login: &LoginInfo,
        encoded_password: &str,
    ) -> Result<u64, AppError>;

    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Whether `login` proves ownership of the account whose stored hash is
/// `stored`. `None` means the username is unknown.
pub fn credential_matches(
    stored: Option<&str>,
    login: &LoginInfo,
    encoder: &dyn PasswordEncoder,
) -> bool {
    match stored {
        Some(encoded) if encoder.matches(&login.password, encoded) => true,
        Some(_) => {
            tracing::warn!("Password mismatch for user {}", login.username);
            false
        }
        None => false,
    }
}

/// PostgreSQL-backed [`UserService`].
#[derive(Clone)]
pub struct PgUserService {
    pool: DbPool,
    encoder: Arc<dyn PasswordEncoder>,
}

impl PgUserService {
    pub fn new(pool: DbPool, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { pool, encoder }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, email, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, email, phone_number, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // The UNIQUE constraint on username is the only one on this table
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::UsernameDuplicated
            }
            other => AppError::Database(other),
        })?;

        tracing::info!(
            "Created user {} ({}) at {}",
            created.username,
            created.id,
            created.created_at
        );

        Ok(created.into())
    }

    async fn find_username(&self, phone_number: &str) -> Result<Option<String>, AppError> {
        let username = sqlx::query_scalar::<_, String>(
            "SELECT username FROM users WHERE phone_number = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(username)
    }

    async fn update_password_by_strict_info(
        &self,
        info: &StrictLoginInfo,
        encoded_password: &str,
    ) -> Result<u64, AppError> {
        let updated_count = sqlx::query(
            r#"
            UPDATE users
            SET password = $1,
                updated_at = NOW()
            WHERE username = $2 AND email = $3 AND phone_number = $4
            "#,
        )
        .bind(encoded_password)
        .bind(&info.username)
        .bind(&info.email)
        .bind(&info.phone_number)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated_count)
    }

    async fn update_password(
        &self,
        login: &LoginInfo,
        encoded_password: &str,
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so a concurrent update cannot slip in between the
        // credential check and the write
        let current: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE username = $1 FOR UPDATE")
                .bind(&login.username)
                .fetch_optional(&mut *tx)
                .await?;

        if !credential_matches(current.as_deref(), login, self.encoder.as_ref()) {
            tx.rollback().await?;
            return Ok(0);
        }

        let updated_count = sqlx::query(
            "UPDATE users SET password = $1, updated_at = NOW() WHERE username = $2",
        )
        .bind(encoded_password)
        .bind(&login.username)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(updated_count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
