//! API error types for the EMR backend boundary

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Message patterns the backend uses for uniqueness violations. Some
/// deployments report duplicates as HTTP 400 with a descriptive message
/// instead of 409, so classification falls back to pattern matching.
static CONFLICT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(duplicate|already exists|unique constraint|same date|code .* in use)")
        .expect("conflict pattern is valid")
});

/// Errors that can occur when interacting with the EMR backend
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Uniqueness violation (duplicate record for the same entity+date, or
    /// a duplicate generated code)
    Conflict { message: String },
    /// 401 Unauthorized - token invalid or expired
    Unauthorized,
    /// 404 Not Found - record or patient does not exist
    NotFound { message: String },
    /// Network or timeout error
    Network { message: String },
    /// Other HTTP errors
    Http { status: u16, message: String },
    /// No session token available
    NotConfigured,
}

impl ApiError {
    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP response.
    ///
    /// 409 is always a conflict; 400-class responses whose body matches a
    /// known duplicate-message pattern are conflicts too.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            409 => ApiError::conflict(body),
            401 => ApiError::Unauthorized,
            404 => ApiError::not_found(body),
            400..=499 if CONFLICT_PATTERN.is_match(body) => ApiError::conflict(body),
            _ => ApiError::http(status, body),
        }
    }

    /// Check if this is a uniqueness-conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// Check if this is an authentication error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Conflict { message } => {
                write!(f, "Conflict - {}", message)
            }
            ApiError::Unauthorized => {
                write!(f, "Unauthorized (401) - token invalid or expired")
            }
            ApiError::NotFound { message } => {
                write!(f, "Not found - {}", message)
            }
            ApiError::Network { message } => {
                write!(f, "Network error - {}", message)
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {} - {}", status, message)
            }
            ApiError::NotConfigured => {
                write!(f, "Not configured (no session token)")
            }
        }
    }
}

impl std::error::Error for ApiError {}
