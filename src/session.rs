//! Authenticated backend session context.
//!
//! The token is established once at application start and injected into the
//! API client, rather than read ad hoc from the environment at call sites.
//! Teardown happens explicitly at logout; the wizard never outlives its
//! session.

use chrono::{DateTime, Utc};
use tracing::info;

/// Bearer-token session for the EMR backend.
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: String,
    /// When this session was established
    pub established_at: DateTime<Utc>,
}

impl AuthSession {
    /// Environment variable holding the backend API token
    pub const TOKEN_ENV: &'static str = "CLINICFLOW_API_TOKEN";

    /// Create a session from an already-obtained token (e.g. a login flow)
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            established_at: Utc::now(),
        }
    }

    /// Create a session from the `CLINICFLOW_API_TOKEN` environment variable.
    /// Returns `None` if the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        match std::env::var(Self::TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Some(Self::new(token)),
            _ => None,
        }
    }

    /// The raw bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Age of this session in seconds
    pub fn age_secs(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.established_at)
            .num_seconds()
    }

    /// Tear the session down at logout. Consumes the session so no client
    /// can keep submitting with a token the user considers revoked.
    pub fn teardown(self) {
        info!(age_secs = self.age_secs(), "auth session torn down");
    }
}
