// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the wellness-tracking API.
//!
//! Handles:
//! - Attaching the session credential to outgoing requests
//! - Lenient response decoding (a malformed body never crashes a caller)
//! - Normalizing transport and server failures into `AppError`

use reqwest::{header, Method};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::SessionStore;

/// Client for the wellness-tracking service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl ApiClient {
    /// Create a client for the given API base URL.
    ///
    /// The store is only read (for the credential); this client never
    /// mutates the session.
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    /// GET a path with no query parameters.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, &[], None::<&()>).await
    }

    /// GET a path with query parameters.
    pub async fn get_with_query(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, query, None::<&()>).await
    }

    /// POST a JSON body to a path.
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Issue a request and normalize the outcome.
    ///
    /// The body is read as text and decoded leniently: a body that is not
    /// valid JSON degrades to an empty object (logged for diagnostics) while
    /// the HTTP status still decides success or failure. Failure messages
    /// come from the body's `error` field when the server provided one.
    async fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        // Read the token once per request; a login/logout racing with this
        // request can never produce a half-updated credential.
        if let Some(token) = self.store.token() {
            request = request.header(header::AUTHORIZATION, format!("Token {}", token));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let payload = decode_lenient(&text, path);

        if !status.is_success() {
            return Err(AppError::from_response(status.as_u16(), &payload));
        }

        Ok(payload)
    }
}

/// Decode a response body, degrading to an empty object on failure.
fn decode_lenient(text: &str, path: &str) -> Value {
    if text.is_empty() {
        return Value::Object(serde_json::Map::new());
    }
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, path, "Failed to decode response body, treating as empty");
            Value::Object(serde_json::Map::new())
        }
    }
}
