//! User profile and session models.

use serde::{Deserialize, Serialize};

/// User profile as reported by the server.
///
/// The login response carries only `id`/`name`/`email`; the profile endpoint
/// adds `entries`. Everything except `name` is therefore lenient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: u64,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Number of wellness entries the user has logged
    #[serde(default)]
    pub entries: u32,
}

/// An authentication token paired with the profile it authorizes.
///
/// Both fields are required: a credential without a profile (or the reverse)
/// is unrepresentable. Callers hold `Option<Session>` for the anonymous case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque server-issued token
    pub token: String,
    pub user: UserProfile,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
