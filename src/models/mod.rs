// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the client.

pub mod metric;
pub mod user;

pub use metric::{DateRangeFilter, MetricEntry, NewMetric, SummaryStats};
pub use user::{LoginRequest, RegisterRequest, Session, UserProfile};
