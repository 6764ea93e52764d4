//! Password hashing and temporary password generation.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use rand::{Rng, distr::Alphanumeric};

use crate::error::AppError;

/// One-way password encoding.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordEncoder: Send + Sync {
    /// Hash `raw` for storage.
    fn encode(&self, raw: &str) -> Result<String, AppError>;

    /// Whether `raw` hashes to `encoded`.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id encoder producing PHC strings with a random salt.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::PasswordHashing(e.to_string()))
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}

/// Source of temporary passwords issued by password recovery.
#[cfg_attr(test, mockall::automock)]
pub trait TemporaryPasswordGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random alphanumeric strings of a fixed length.
#[derive(Debug, Clone)]
pub struct RandomValueStringGenerator {
    length: usize,
}

impl RandomValueStringGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomValueStringGenerator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TemporaryPasswordGenerator for RandomValueStringGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
