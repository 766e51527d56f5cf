// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness metric models.
//!
//! Dates use the server's native `YYYY-MM-DD` representation (`NaiveDate`);
//! no timezone conversion happens on the client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded wellness entry, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Calendar day the entry is for
    pub recorded_for: NaiveDate,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub heart_rate: u32,
    #[serde(default)]
    pub sleep_hours: f64,
    /// Free-form note; the server stores an empty string when omitted
    #[serde(default)]
    pub notes: Option<String>,
}

impl MetricEntry {
    /// Note text for display, or `None` when absent/blank.
    pub fn display_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// A new entry to submit. `recorded_for` may be omitted; the server then
/// records the entry for the current day.
#[derive(Debug, Clone, Serialize)]
pub struct NewMetric {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_for: Option<NaiveDate>,
    pub steps: u32,
    pub calories: u32,
    pub heart_rate: u32,
    pub sleep_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Server-computed aggregate statistics. Opaque to the client, replaced
/// wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub entries: u32,
    #[serde(default)]
    pub avg_steps: f64,
    #[serde(default)]
    pub avg_calories: f64,
    #[serde(default)]
    pub avg_heart_rate: f64,
    #[serde(default)]
    pub avg_sleep: f64,
}

/// Inclusive date bounds for a metrics query. Transient: held only for the
/// duration of the query, never persisted. An absent bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}
