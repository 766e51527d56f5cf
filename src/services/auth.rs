// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication lifecycle: login, registration, logout, and startup
//! session restoration.
//!
//! This controller is the session's writer. Login installs the token/profile
//! pair atomically; logout drops it unconditionally; a failed restoration
//! clears it so a stale credential is never retained.

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{DateRangeFilter, LoginRequest, RegisterRequest, Session, UserProfile};
use crate::services::api::ApiClient;
use crate::services::dashboard::{DashboardSnapshot, DashboardSynchronizer};
use crate::store::SessionStore;

/// Result of attempting to restore a persisted session at startup.
#[derive(Debug, Clone)]
pub enum RestoreOutcome {
    /// No persisted session existed.
    Anonymous,
    /// A session existed but the server rejected it; it has been cleared.
    Expired(String),
    /// The session is live and the dashboard has been populated.
    Restored(DashboardSnapshot),
}

/// Drives authentication state transitions.
#[derive(Clone)]
pub struct AuthController {
    api: ApiClient,
    store: SessionStore,
    dashboard: DashboardSynchronizer,
}

#[derive(Deserialize)]
struct LoginEnvelope {
    token: String,
    user: UserProfile,
}

impl AuthController {
    pub fn new(api: ApiClient, store: SessionStore, dashboard: DashboardSynchronizer) -> Self {
        Self {
            api,
            store,
            dashboard,
        }
    }

    /// Sign in and populate the dashboard.
    ///
    /// The response must carry both a token and a user; they become the new
    /// session together (persisted and in-memory in one step) before the
    /// dashboard synchronization runs. Any failure leaves the existing
    /// session untouched.
    pub async fn login(&self, request: &LoginRequest) -> Result<DashboardSnapshot> {
        let payload = self.api.post("/api/auth/login", request).await?;
        let envelope: LoginEnvelope =
            serde_json::from_value(payload).map_err(|e| AppError::Decode(e.to_string()))?;

        self.store.replace(Session {
            token: envelope.token,
            user: envelope.user,
        })?;
        tracing::info!("Signed in");

        Ok(self.dashboard.refresh_all(&DateRangeFilter::default()).await)
    }

    /// Create an account. Never signs the user in; no session side effects
    /// on success or failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.api.post("/api/auth/register", request).await?;
        tracing::info!("Account registered");
        Ok(())
    }

    /// Sign out: drop the session and blank the dashboard.
    ///
    /// Unconditional and idempotent; never touches the network.
    pub fn logout(&self) {
        self.store.clear();
        self.dashboard.reset();
        tracing::info!("Signed out");
    }

    /// Restore a persisted session at startup.
    ///
    /// Runs a full dashboard synchronization. If the profile fetch is the
    /// part that failed, the token is stale or revoked: the session is
    /// cleared and the caller must re-authenticate explicitly.
    pub async fn restore(&self, filter: &DateRangeFilter) -> RestoreOutcome {
        if self.store.current().is_none() {
            return RestoreOutcome::Anonymous;
        }

        let snapshot = self.dashboard.refresh_all(filter).await;
        if let Some(message) = snapshot.profile.error() {
            let message = message.to_string();
            tracing::warn!(error = %message, "Session restoration failed, clearing stale session");
            self.store.clear();
            self.dashboard.reset();
            return RestoreOutcome::Expired(message);
        }

        RestoreOutcome::Restored(snapshot)
    }
}
