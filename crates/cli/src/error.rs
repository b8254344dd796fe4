// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized API errors surfaced to callers of the client.

use serde::Serialize;
use std::fmt;

/// Fallback when a 4xx response carries no usable message field.
const GENERIC_MESSAGE: &str = "An error occurred";

/// Errors produced by the request pipeline.
///
/// `Clone` because a single refresh failure is fanned out to every caller
/// queued behind the in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 on a protected call after the refresh path was exhausted.
    AuthRequired,
    /// 403 from the server. Not retried, no state change.
    Forbidden,
    /// Any 5xx. Retry policy, if any, is the caller's concern.
    Server { status: u16 },
    /// The request never produced a response (connect failure, timeout).
    Network,
    /// Other 4xx, carrying the server-provided message when present.
    Validation { status: u16, message: String },
    /// The refresh endpoint rejected the stored refresh token.
    RefreshFailed,
}

/// Uniform wire-shaped error body: `{ message, status }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    /// HTTP status, or 0 when no response reached us.
    pub status: u16,
}

impl ApiError {
    /// Classify a non-2xx response on a protected endpoint.
    pub fn classify(status: u16, body: &str) -> Self {
        match status {
            401 => Self::AuthRequired,
            403 => Self::Forbidden,
            s if s >= 500 => Self::Server { status: s },
            s => Self::Validation { status: s, message: extract_message(body) },
        }
    }

    /// Classify a non-2xx response on a login/register/refresh endpoint.
    ///
    /// Auth endpoint failures pass through to the caller: no session-expiry
    /// mapping, no retry, no redirect. The server's own message (e.g.
    /// "Invalid username or password") survives.
    pub fn passthrough(status: u16, body: &str) -> Self {
        match status {
            s if s >= 500 => Self::Server { status: s },
            s => Self::Validation { status: s, message: extract_message(body) },
        }
    }

    /// HTTP status associated with this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthRequired | Self::RefreshFailed => Some(401),
            Self::Forbidden => Some(403),
            Self::Server { status } | Self::Validation { status, .. } => Some(*status),
            Self::Network => None,
        }
    }

    /// The uniform `{ message, status }` shape shown to users.
    pub fn body(&self) -> ErrorBody {
        ErrorBody { message: self.to_string(), status: self.status().unwrap_or(0) }
    }
}

/// Pull the `message` (or `title`) field out of a JSON error body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("title"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| GENERIC_MESSAGE.to_owned())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthRequired => f.write_str("Session expired. Please log in again."),
            Self::Forbidden => f.write_str("Access denied. Insufficient permissions."),
            Self::Server { .. } => f.write_str("Server error. Please try again later."),
            Self::Network => f.write_str("Network error. Please check your connection."),
            Self::Validation { message, .. } => f.write_str(message),
            Self::RefreshFailed => f.write_str("Session refresh failed. Please log in again."),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
