// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login, registration, logout, and profile.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::event::SessionEvent;
use crate::session::{Session, UserProfile};

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `{ token, refreshToken?, user }` from the login endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
}

/// Log in and populate the session: tokens, user, and the user's roles and
/// permissions (already normalized to arrays by the profile model).
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
    let body = serde_json::to_value(credentials).unwrap_or_default();
    let resp: LoginResponse = client.post("/auth/login", &body).await?;

    client.store().save(Session {
        access_token: Some(resp.token.clone()),
        refresh_token: resp.refresh_token.clone(),
        roles: resp.user.roles.clone(),
        permissions: resp.user.permissions.clone(),
        user: Some(resp.user.clone()),
    });
    client.emit(SessionEvent::LoggedIn { username: resp.user.username.clone() });
    info!(username = %resp.user.username, "logged in");
    Ok(resp)
}

/// Register a new account. The response passes through untouched and the
/// session is not affected.
pub async fn register(client: &ApiClient, user: &Value) -> Result<Value, ApiError> {
    client.post("/auth/register", user).await
}

/// Revoke the refresh token server-side and clear the session.
///
/// Local state is cleared even when the revoke call fails — a dead server
/// must not keep a client signed in.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let result = match client.store().refresh_token() {
        Some(refresh_token) => {
            client
                .post_unit("/auth/logout", &serde_json::json!({ "refreshToken": refresh_token }))
                .await
        }
        None => Ok(()),
    };
    if let Err(ref e) = result {
        warn!(err = %e, "server-side logout failed, clearing local session anyway");
    }
    client.store().clear();
    client.emit(SessionEvent::LoggedOut { forced: false });
    result
}

/// Fetch the signed-in user's profile and fold it back into the session.
pub async fn profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    let user: UserProfile = client.get("/auth/profile").await?;
    let mut session = client.store().current();
    session.roles = user.roles.clone();
    session.permissions = user.permissions.clone();
    session.user = Some(user.clone());
    client.store().save(session);
    Ok(user)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
