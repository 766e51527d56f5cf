// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session and synchronization logic.

pub mod api;
pub mod auth;
pub mod dashboard;

pub use api::ApiClient;
pub use auth::{AuthController, RestoreOutcome};
pub use dashboard::{DashboardSnapshot, DashboardSynchronizer, FetchState};
