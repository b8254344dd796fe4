// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle events.
//!
//! The embedding front end subscribes to these to react to auth state
//! changes — in particular a forced logout, which is its cue to return to
//! the login entry point.

use serde::{Deserialize, Serialize};

/// Events emitted by the API client as the session changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A login completed and the session is populated.
    LoggedIn { username: String },
    /// The access/refresh token pair was rotated.
    Refreshed,
    /// The refresh endpoint rejected the stored refresh token.
    #[serde(rename = "refresh:failed")]
    RefreshFailed { error: String },
    /// The session was cleared. `forced` marks an unrecoverable auth
    /// failure rather than a user-initiated logout.
    LoggedOut { forced: bool },
}
