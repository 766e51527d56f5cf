// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard synchronization.
//!
//! The dashboard is three independently-fetched panels: profile, aggregate
//! summary, and the filtered metrics list. A refresh issues all three
//! requests concurrently and lets each panel succeed or fail on its own; a
//! partial dashboard always beats a blocked one. Every panel keeps only the
//! outcome of its latest-issued fetch; responses from superseded fetches are
//! discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{DateRangeFilter, MetricEntry, NewMetric, SummaryStats, UserProfile};
use crate::services::api::ApiClient;
use crate::store::SessionStore;

/// Outcome of a panel's most recent fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing fetched yet (or state was reset on sign-out)
    Idle,
    Ready(T),
    /// The fetch failed; the normalized error message
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready(_))
    }

    /// The fetched value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The three dashboard panels as last observed.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub profile: FetchState<UserProfile>,
    pub summary: FetchState<SummaryStats>,
    pub metrics: FetchState<Vec<MetricEntry>>,
}

/// One panel's state plus the ticket counter guarding it.
///
/// `begin` hands out a ticket at issue time; `complete` only records an
/// outcome whose ticket is still the latest issued. An older in-flight
/// response can therefore never overwrite a newer fetch, whatever order the
/// completions land in.
struct Panel<T> {
    state: RwLock<FetchState<T>>,
    issued: AtomicU64,
}

impl<T: Clone> Panel<T> {
    fn new() -> Self {
        Self {
            state: RwLock::new(FetchState::Idle),
            issued: AtomicU64::new(0),
        }
    }

    fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record an outcome, passing it through to the caller. Stale tickets
    /// leave the panel untouched.
    fn complete(&self, name: &str, ticket: u64, outcome: Result<T>) -> Result<T> {
        let mut state = self.state.write().expect("panel lock poisoned");
        if ticket != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(panel = name, ticket, "Discarding superseded fetch result");
            return outcome;
        }
        *state = match &outcome {
            Ok(value) => FetchState::Ready(value.clone()),
            Err(err) => FetchState::Failed(err.to_string()),
        };
        outcome
    }

    fn get(&self) -> FetchState<T> {
        self.state.read().expect("panel lock poisoned").clone()
    }

    fn reset(&self) {
        *self.state.write().expect("panel lock poisoned") = FetchState::Idle;
    }
}

struct Panels {
    profile: Panel<UserProfile>,
    summary: Panel<SummaryStats>,
    metrics: Panel<Vec<MetricEntry>>,
}

/// Orchestrates dashboard fetches against the API.
#[derive(Clone)]
pub struct DashboardSynchronizer {
    api: ApiClient,
    store: SessionStore,
    panels: Arc<Panels>,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    user: UserProfile,
}

#[derive(Deserialize)]
struct SummaryEnvelope {
    summary: SummaryStats,
}

#[derive(Deserialize)]
struct MetricsEnvelope {
    metrics: Vec<MetricEntry>,
}

impl DashboardSynchronizer {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            panels: Arc::new(Panels {
                profile: Panel::new(),
                summary: Panel::new(),
                metrics: Panel::new(),
            }),
        }
    }

    /// Refresh all three panels concurrently.
    ///
    /// The requests are issued together and joined without short-circuiting:
    /// each panel records its own outcome, and one failure neither blocks nor
    /// rolls back the others.
    pub async fn refresh_all(&self, filter: &DateRangeFilter) -> DashboardSnapshot {
        let (profile, summary, metrics) = tokio::join!(
            self.refresh_profile(),
            self.refresh_summary(),
            self.fetch_metrics(filter),
        );

        tracing::info!(
            profile_ok = profile.is_ok(),
            summary_ok = summary.is_ok(),
            metrics_ok = metrics.is_ok(),
            "Dashboard refresh finished"
        );

        self.snapshot()
    }

    /// Fetch the profile panel. On success the fresh profile also replaces
    /// the session's cached user (the entry count moves as metrics are
    /// logged).
    pub async fn refresh_profile(&self) -> Result<UserProfile> {
        let ticket = self.panels.profile.begin();
        let outcome = async {
            let payload = self.api.get("/api/user/profile").await?;
            let envelope: ProfileEnvelope =
                serde_json::from_value(payload).map_err(|e| AppError::Decode(e.to_string()))?;
            self.store.update_user(envelope.user.clone())?;
            Ok(envelope.user)
        }
        .await;
        self.panels.profile.complete("profile", ticket, outcome)
    }

    /// Fetch the aggregate-summary panel.
    pub async fn refresh_summary(&self) -> Result<SummaryStats> {
        let ticket = self.panels.summary.begin();
        let outcome = async {
            let payload = self.api.get("/api/metrics/summary").await?;
            let envelope: SummaryEnvelope =
                serde_json::from_value(payload).map_err(|e| AppError::Decode(e.to_string()))?;
            Ok(envelope.summary)
        }
        .await;
        self.panels.summary.complete("summary", ticket, outcome)
    }

    /// Fetch the metrics list, bounded by the filter.
    ///
    /// Range parameters are sent only for bounds that are present; an empty
    /// result list is a valid "no entries yet" outcome, not an error.
    pub async fn fetch_metrics(&self, filter: &DateRangeFilter) -> Result<Vec<MetricEntry>> {
        let ticket = self.panels.metrics.begin();
        let query = range_query(filter);
        let outcome = async {
            let payload = self.api.get_with_query("/api/metrics", &query).await?;
            let envelope: MetricsEnvelope =
                serde_json::from_value(payload).map_err(|e| AppError::Decode(e.to_string()))?;
            Ok(envelope.metrics)
        }
        .await;
        self.panels.metrics.complete("metrics", ticket, outcome)
    }

    /// Submit a new entry, then re-fetch metrics, summary, and profile.
    ///
    /// The entry is never inserted into local state speculatively; the
    /// re-fetch after the server accepts it is authoritative. On failure
    /// nothing already displayed changes.
    pub async fn submit_metric(
        &self,
        entry: &NewMetric,
        filter: &DateRangeFilter,
    ) -> Result<DashboardSnapshot> {
        self.api.post("/api/metrics", entry).await?;
        tracing::info!("Metric entry accepted, re-fetching dashboard");
        Ok(self.refresh_all(filter).await)
    }

    /// Current three-panel view state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            profile: self.panels.profile.get(),
            summary: self.panels.summary.get(),
            metrics: self.panels.metrics.get(),
        }
    }

    /// Return all panels to `Idle`. Used on sign-out so a later session
    /// never briefly sees the previous user's data.
    pub fn reset(&self) {
        self.panels.profile.reset();
        self.panels.summary.reset();
        self.panels.metrics.reset();
    }
}

/// Query parameters for a range-bounded metrics request.
fn range_query(filter: &DateRangeFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(start) = filter.start {
        query.push(("start", start.to_string()));
    }
    if let Some(end) = filter.end {
        query.push(("end", end.to_string()));
    }
    query
}
