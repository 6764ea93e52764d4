//! Localized response messages.
//!
//! Messages are addressed by a [`MessageKey`] whose code (for example
//! `user.username.duplicated`) is stable across locales. English and Korean
//! bundles are built in; a JSON file of `{"code": "text"}` pairs can
//! override individual entries.

use std::{collections::HashMap, fs, path::Path};

/// Code of every message the service can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ArgumentInvalid,
    InternalError,
    UserCreated,
    UsernameDuplicated,
    UsernameFound,
    PhoneNumberNotFound,
    TemporaryPasswordReturned,
    UserInfoNotFound,
    PasswordUpdateSucceeded,
}

impl MessageKey {
    /// Bundle code of this key.
    pub fn code(self) -> &'static str {
        match self {
            MessageKey::ArgumentInvalid => "common.argument.invalid",
            MessageKey::InternalError => "common.internal.error",
            MessageKey::UserCreated => "user.create.succeeded",
            MessageKey::UsernameDuplicated => "user.username.duplicated",
            MessageKey::UsernameFound => "user.username.found",
            MessageKey::PhoneNumberNotFound => "user.phoneNumber.notFound",
            MessageKey::TemporaryPasswordReturned => "user.temporary.password.returned",
            MessageKey::UserInfoNotFound => "user.userInfo.notFound",
            MessageKey::PasswordUpdateSucceeded => "user.password.update.succeeded",
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("common.argument.invalid", "Invalid argument."),
    ("common.internal.error", "An internal error occurred."),
    ("user.create.succeeded", "User account created."),
    ("user.username.duplicated", "Username is already taken."),
    ("user.username.found", "Username found."),
    ("user.phoneNumber.notFound", "No user is registered with this phone number."),
    ("user.temporary.password.returned", "A temporary password has been issued."),
    ("user.userInfo.notFound", "No user matches the given information."),
    ("user.password.update.succeeded", "Password updated."),
];

const KO: &[(&str, &str)] = &[
    ("common.argument.invalid", "잘못된 입력값입니다."),
    ("common.internal.error", "서버 내부 오류가 발생했습니다."),
    ("user.create.succeeded", "회원가입이 완료되었습니다."),
    ("user.username.duplicated", "이미 사용 중인 아이디입니다."),
    ("user.username.found", "아이디를 찾았습니다."),
    ("user.phoneNumber.notFound", "해당 전화번호로 가입된 회원이 없습니다."),
    ("user.temporary.password.returned", "임시 비밀번호가 발급되었습니다."),
    ("user.userInfo.notFound", "일치하는 회원 정보가 없습니다."),
    ("user.password.update.succeeded", "비밀번호가 변경되었습니다."),
];

/// Errors raised while loading a message override file.
#[derive(Debug, thiserror::Error)]
pub enum MessageSourceError {
    #[error("failed to read message file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse message file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves message keys to text in a single locale.
#[derive(Debug, Clone)]
pub struct MessageSource {
    locale: String,
    messages: HashMap<String, String>,
}

impl MessageSource {
    /// Build the message source for `locale`.
    ///
    /// Unknown locales fall back to English.
    pub fn for_locale(locale: &str) -> Self {
        let (locale, bundle) = match locale {
            "ko" | "ko-KR" | "ko_KR" => ("ko", KO),
            "en" | "en-US" | "en_US" => ("en", EN),
            other => {
                tracing::warn!("Unknown message locale {}, falling back to en", other);
                ("en", EN)
            }
        };

        let messages = bundle
            .iter()
            .map(|(code, text)| (code.to_string(), text.to_string()))
            .collect();

        Self {
            locale: locale.to_string(),
            messages,
        }
    }

    /// Build the message source for `locale` and apply the overrides in the
    /// JSON file at `path`.
    pub fn load(locale: &str, path: impl AsRef<Path>) -> Result<Self, MessageSourceError> {
        let raw = fs::read_to_string(path)?;
        let overrides: HashMap<String, String> = serde_json::from_str(&raw)?;

        Ok(Self::for_locale(locale).with_overrides(overrides))
    }

    /// Replace individual entries.
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.messages.extend(overrides);
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Text for `key`, or the key's code when no entry exists.
    pub fn message(&self, key: MessageKey) -> String {
        match self.messages.get(key.code()) {
            Some(text) => text.clone(),
            None => {
                tracing::warn!("No message registered for {}", key.code());
                key.code().to_string()
            }
        }
    }
}

impl Default for MessageSource {
    fn default() -> Self {
        Self::for_locale("en")
    }
}
