// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process wellness API for integration tests.
//!
//! Serves the endpoints the client consumes on an ephemeral port, with
//! per-test toggles (summary failure, raw profile responses, one-shot
//! response delays) and a log of every request received.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use health_tracker_client::config::Config;
use health_tracker_client::models::{Session, UserProfile};
use health_tracker_client::App;

/// A registered account.
#[derive(Clone)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// One observed request.
#[derive(Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    /// Full `Authorization` header value, when sent
    pub auth: Option<String>,
}

#[derive(Default)]
pub struct ApiState {
    pub users: Vec<TestUser>,
    /// token -> index into `users`
    pub sessions: HashMap<String, usize>,
    /// (owner index, row) pairs
    pub metrics: Vec<(usize, Value)>,
    next_token: u32,

    /// Fail the summary endpoint with a 500
    pub fail_summary: bool,
    /// Verbatim (status, body) override for the profile endpoint
    pub profile_raw: Option<(u16, String)>,
    /// Delay applied to the next metrics request only
    pub metrics_delay_ms: Option<u64>,

    pub requests: Vec<RecordedRequest>,
}

impl ApiState {
    fn mint_token(&mut self, user_idx: usize) -> String {
        self.next_token += 1;
        let token = format!("tok-{}", self.next_token);
        self.sessions.insert(token.clone(), user_idx);
        token
    }

    /// Seed an account; returns its index.
    pub fn seed_user(&mut self, user: TestUser) -> usize {
        self.users.push(user);
        self.users.len() - 1
    }

    /// Seed an account and an already-valid token for it.
    #[allow(dead_code)]
    pub fn seed_session(&mut self, user: TestUser) -> String {
        let idx = self.seed_user(user);
        self.mint_token(idx)
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }
}

/// Handle to the spawned server.
pub struct TestApi {
    pub base_url: String,
    pub state: Arc<Mutex<ApiState>>,
}

impl TestApi {
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(ApiState::default()));
        let app = router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server died");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, ApiState> {
        self.state.lock().expect("test state poisoned")
    }

    /// Build a client wired to this server, persisting its session under
    /// the given directory.
    pub fn client(&self, dir: &tempfile::TempDir) -> App {
        App::new(Config {
            api_base_url: self.base_url.clone(),
            session_path: session_path(dir),
        })
    }
}

pub fn session_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("session.json")
}

#[allow(dead_code)]
pub fn ana() -> TestUser {
    TestUser {
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

/// A client already signed in as Ana, without going through login.
#[allow(dead_code)]
pub fn authed_client(api: &TestApi, dir: &tempfile::TempDir) -> App {
    let token = api.lock().seed_session(ana());
    let app = api.client(dir);
    app.session
        .replace(Session {
            token,
            user: UserProfile {
                id: 1,
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                entries: 0,
            },
        })
        .expect("seeding session should succeed");
    app
}

#[allow(dead_code)]
pub fn metric_row(date: &str, steps: u32) -> Value {
    json!({
        "recorded_for": date,
        "steps": steps,
        "calories": 2000,
        "heart_rate": 60,
        "sleep_hours": 7.5,
        "notes": "",
    })
}

type SharedState = Arc<Mutex<ApiState>>;

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/user/profile", get(handle_profile))
        .route("/api/metrics/summary", get(handle_summary))
        .route("/api/metrics", get(handle_list_metrics).post(handle_create_metric))
        .with_state(state)
}

fn record(
    state: &mut ApiState,
    method: &'static str,
    path: &str,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
) {
    state.requests.push(RecordedRequest {
        method,
        path: path.to_string(),
        query: query.clone(),
        auth: headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    });
}

/// Resolve the `Authorization: Token <token>` header to a user index.
fn authenticate(state: &ApiState, headers: &HeaderMap) -> Option<usize> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Token "))?;
    state.sessions.get(token).copied()
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Authentication required."})),
    )
}

async fn handle_register(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("test state poisoned");
    record(&mut state, "POST", "/api/auth/register", &HashMap::new(), &headers);

    let name = body["name"].as_str().unwrap_or("").trim().to_string();
    let email = body["email"].as_str().unwrap_or("").trim().to_lowercase();
    let password = body["password"].as_str().unwrap_or("").to_string();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Name, email, and password are required."})),
        );
    }
    if state.users.iter().any(|u| u.email == email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "An account with that email already exists."})),
        );
    }

    state.users.push(TestUser {
        name,
        email,
        password,
    });
    (
        StatusCode::CREATED,
        Json(json!({"message": "Registration successful."})),
    )
}

async fn handle_login(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("test state poisoned");
    record(&mut state, "POST", "/api/auth/login", &HashMap::new(), &headers);

    let email = body["email"].as_str().unwrap_or("").trim().to_lowercase();
    let password = body["password"].as_str().unwrap_or("");

    let found = state
        .users
        .iter()
        .position(|u| u.email == email && u.password == password);
    let Some(user_idx) = found else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials."})),
        );
    };

    let token = state.mint_token(user_idx);
    let user = &state.users[user_idx];
    (
        StatusCode::OK,
        Json(json!({
            "token": token,
            "user": {"id": user_idx + 1, "name": user.name, "email": user.email},
        })),
    )
}

async fn handle_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let mut state = state.lock().expect("test state poisoned");
    record(&mut state, "GET", "/api/user/profile", &HashMap::new(), &headers);

    if let Some((status, body)) = state.profile_raw.clone() {
        return (
            StatusCode::from_u16(status).expect("bad test status"),
            body,
        );
    }

    let Some(user_idx) = authenticate(&state, &headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            json!({"error": "Authentication required."}).to_string(),
        );
    };

    let entries = state.metrics.iter().filter(|(o, _)| *o == user_idx).count();
    let user = &state.users[user_idx];
    (
        StatusCode::OK,
        json!({
            "user": {
                "id": user_idx + 1,
                "name": user.name,
                "email": user.email,
                "entries": entries,
            }
        })
        .to_string(),
    )
}

async fn handle_summary(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("test state poisoned");
    record(&mut state, "GET", "/api/metrics/summary", &HashMap::new(), &headers);

    if state.fail_summary {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Summary unavailable."})),
        );
    }

    let Some(user_idx) = authenticate(&state, &headers) else {
        return unauthorized();
    };

    let rows: Vec<&Value> = state
        .metrics
        .iter()
        .filter(|(o, _)| *o == user_idx)
        .map(|(_, row)| row)
        .collect();
    let count = rows.len();
    let avg = |field: &str| -> f64 {
        if count == 0 {
            return 0.0;
        }
        rows.iter()
            .map(|r| r[field].as_f64().unwrap_or(0.0))
            .sum::<f64>()
            / count as f64
    };

    (
        StatusCode::OK,
        Json(json!({
            "summary": {
                "entries": count,
                "avg_steps": avg("steps"),
                "avg_calories": avg("calories"),
                "avg_heart_rate": avg("heart_rate"),
                "avg_sleep": avg("sleep_hours"),
            }
        })),
    )
}

async fn handle_list_metrics(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    // Snapshot rows (and the one-shot delay) at arrival, then respond after
    // the delay; a slow response must reflect the data as of its arrival.
    let (rows, delay_ms) = {
        let mut state = state.lock().expect("test state poisoned");
        record(&mut state, "GET", "/api/metrics", &query, &headers);

        let Some(user_idx) = authenticate(&state, &headers) else {
            return unauthorized();
        };

        let rows: Vec<Value> = state
            .metrics
            .iter()
            .filter(|(o, _)| *o == user_idx)
            .map(|(_, row)| row.clone())
            .collect();
        (rows, state.metrics_delay_ms.take())
    };

    if let Some(ms) = delay_ms {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }

    let start = query.get("start");
    let end = query.get("end");
    let mut rows: Vec<Value> = rows
        .into_iter()
        .filter(|row| {
            let date = row["recorded_for"].as_str().unwrap_or("");
            // ISO dates compare lexicographically
            start.map_or(true, |s| date >= s.as_str()) && end.map_or(true, |e| date <= e.as_str())
        })
        .collect();
    rows.sort_by(|a, b| b["recorded_for"].as_str().cmp(&a["recorded_for"].as_str()));

    (StatusCode::OK, Json(json!({"metrics": rows})))
}

async fn handle_create_metric(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().expect("test state poisoned");
    record(&mut state, "POST", "/api/metrics", &HashMap::new(), &headers);

    let Some(user_idx) = authenticate(&state, &headers) else {
        return unauthorized();
    };

    let row = json!({
        "recorded_for": body["recorded_for"].as_str().unwrap_or("2024-01-01"),
        "steps": body["steps"].as_u64().unwrap_or(0),
        "calories": body["calories"].as_u64().unwrap_or(0),
        "heart_rate": body["heart_rate"].as_u64().unwrap_or(0),
        "sleep_hours": body["sleep_hours"].as_f64().unwrap_or(0.0),
        "notes": body["notes"].as_str().unwrap_or(""),
    });
    state.metrics.push((user_idx, row));

    (StatusCode::CREATED, Json(json!({"message": "Metric saved."})))
}
