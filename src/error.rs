// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Every failure a domain operation can surface is an [`ApiError`]. Whether a
//! failure means "the access credential has expired" is decided once, by the
//! transport, from the HTTP status it actually received, and is carried on the
//! error as a flag rather than re-derived from rendered text.

use reqwest::StatusCode;

/// Phrase the backend puts in its detail text for invalid or expired tokens.
///
/// Some deployments answer an expired token with a non-401 status; the phrase
/// still marks the error as auth-expired.
pub const EXPIRED_TOKEN_MARKER: &str = "无效或过期";

/// Error returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status. `message` is the response body text, or
    /// `HTTP <status>` if the body was empty or unreadable.
    #[error("{message}")]
    Request {
        status: u16,
        message: String,
        auth_expired: bool,
    },

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// A credential could not be encoded as a header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// `refresh()` was called with no refresh credential stored.
    #[error("No refresh token")]
    NoRefreshToken,

    /// A credential storage backend failed to read or write.
    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build a request error from a non-success status and its body text.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let auth_expired =
            status == StatusCode::UNAUTHORIZED || body.contains(EXPIRED_TOKEN_MARKER);
        let message = if body.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            body
        };

        ApiError::Request {
            status: status.as_u16(),
            message,
            auth_expired,
        }
    }

    /// True if this error means the access credential was rejected as
    /// invalid or expired, and a refresh may recover it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            ApiError::Request {
                auth_expired: true,
                ..
            }
        )
    }

    /// HTTP status of a request error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
