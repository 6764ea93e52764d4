//! Standard response envelope.
//!
//! Every `/users` endpoint answers with the same JSON shape, whatever the
//! outcome:
//!
//! ```json
//! {
//!   "message": "Username found.",
//!   "data": { "username": "michael" }
//! }
//! ```
//!
//! Success and failure differ only in status code and content.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response envelope with a human-readable message and a data payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResponse {
    pub message: String,
    pub data: Map<String, Value>,
}

impl StandardResponse {
    pub fn new(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    /// Envelope with an empty data object.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(message, Map::new())
    }

    /// Envelope whose data holds a single entry.
    pub fn with_entry(message: impl Into<String>, key: &str, value: impl Into<Value>) -> Self {
        let mut data = Map::new();
        data.insert(key.to_string(), value.into());
        Self::new(message, data)
    }
}

/// A status code paired with an envelope.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: StandardResponse,
}

impl Reply {
    pub fn ok(body: StandardResponse) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn with_status(status: StatusCode, body: StandardResponse) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
