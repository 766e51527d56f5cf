// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Health-Tracker client: session and dashboard synchronization for the
//! Smart Health Tracker service.
//!
//! This crate owns the authentication-token lifecycle, issues authenticated
//! requests with uniform error normalization, and orchestrates concurrent
//! dashboard refreshes where each panel succeeds or fails independently.
//! Presentation (the `health-tracker` binary) only renders what this core
//! produces.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use config::Config;
use services::{ApiClient, AuthController, DashboardSynchronizer};
use store::SessionStore;

/// The wired-up client: one session store shared by the API client and both
/// controllers.
pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub auth: AuthController,
    pub dashboard: DashboardSynchronizer,
}

impl App {
    /// Build the client from configuration, loading any persisted session.
    pub fn new(config: Config) -> Self {
        let session = SessionStore::open(&config.session_path);
        let api = ApiClient::new(config.api_base_url.clone(), session.clone());
        let dashboard = DashboardSynchronizer::new(api.clone(), session.clone());
        let auth = AuthController::new(api, session.clone(), dashboard.clone());

        Self {
            config,
            session,
            auth,
            dashboard,
        }
    }
}
