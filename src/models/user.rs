//! User data models and API request types.
//!
//! This module defines:
//! - `User`: Database entity representing a registered user
//! - `UserRecord`: Registration payload and the record returned to clients
//! - `LoginInfo`, `StrictLoginInfo`: credentials used by the password endpoints
//! - `PasswordUpdateRequest`, `PhoneNumberQuery`: remaining request shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::{
    error::AppError,
    validation::{require, validate_email, validate_phone_number},
};

/// Represents a user row from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `username` is unique, `password` holds an
/// argon2 PHC string and `phone_number` is stored normalized. `updated_at`
/// is maintained by the password updates and not read back.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "michael",
///   "password": "plaintext-password",
///   "email": "michael@naver.com",
///   "phoneNumber": "010-4589-0000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
}

impl UserRecord {
    /// Validate required fields and email syntax, and normalize the phone
    /// number in place.
    pub fn validate(&mut self) -> Result<(), AppError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        validate_email(&self.email)?;
        self.phone_number = validate_phone_number(&self.phone_number)?;

        Ok(())
    }

    /// Fields returned to clients. The password is never included.
    pub fn to_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("username".to_string(), json!(self.username));
        data.insert("email".to_string(), json!(self.email));
        data.insert("phoneNumber".to_string(), json!(self.phone_number));
        data
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            password: user.password,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

/// Username and password pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginInfo {
    pub username: String,
    pub password: String,
}

impl LoginInfo {
    pub fn validate(&self) -> Result<(), AppError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

/// Multi-field identity proof used for password recovery.
///
/// Every field must match the same user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrictLoginInfo {
    pub username: String,
    pub email: String,
    pub phone_number: String,
}

impl StrictLoginInfo {
    /// Validate every field and normalize the phone number in place.
    pub fn validate(&mut self) -> Result<(), AppError> {
        require("username", &self.username)?;
        validate_email(&self.email)?;
        self.phone_number = validate_phone_number(&self.phone_number)?;

        Ok(())
    }
}

/// Request body of the password update endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "michael",
///   "password": "current-password",
///   "newPassword": "next-password"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    #[serde(flatten)]
    pub login_info: LoginInfo,

    pub new_password: String,
}

impl PasswordUpdateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        self.login_info.validate()?;
        require("newPassword", &self.new_password)
    }
}

/// Query string of the username inquiry endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumberQuery {
    #[serde(default)]
    pub phone_number: String,
}
