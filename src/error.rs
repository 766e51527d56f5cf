// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with normalized user-facing messages.

/// Error type covering every way a client operation can fail.
///
/// The `Display` output is the message shown to users; callers above the HTTP
/// layer make decisions on the message alone, never on status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Network/connection failure before any response was obtained.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    ///
    /// `message` is drawn from the response body's `error` field when present,
    /// falling back to `"Request failed with status N"`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response whose payload did not have the expected shape.
    #[error("Malformed server response: {0}")]
    Decode(String),

    /// Session record could not be persisted.
    #[error("Session storage error: {0}")]
    Store(String),
}

impl AppError {
    /// Build an `Api` error from a status code and a decoded response body.
    pub fn from_response(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("error")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        AppError::Api { status, message }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;
