// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User administration. Admin only.
//!
//! The backend takes PascalCase payloads with the role as a numeric enum;
//! the mapping lives here so callers deal in role names.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

/// A user as entered in the admin front end.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub password: String,
    pub is_active: bool,
}

/// Numeric wire value for a role name. Unknown names pass through as-is,
/// letting the server decide.
fn role_code(role: &str) -> Option<u8> {
    match role {
        "Admin" => Some(1),
        "Teacher" => Some(2),
        "Staff" => Some(3),
        _ => None,
    }
}

fn role_value(role: &str) -> Value {
    match role_code(role) {
        Some(code) => Value::from(code),
        None => Value::from(role),
    }
}

pub async fn list(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/users").await
}

pub async fn create(client: &ApiClient, user: &NewUser) -> Result<Value, ApiError> {
    let payload = serde_json::json!({
        "Username": user.username,
        "FullName": user.full_name,
        "Email": user.email,
        "Role": role_value(&user.role),
        "Password": user.password,
        "IsActive": user.is_active,
    });
    client.post("/users", &payload).await
}

pub async fn update(client: &ApiClient, id: &str, user: &NewUser) -> Result<Value, ApiError> {
    let payload = serde_json::json!({
        "Username": user.username,
        "FullName": user.full_name,
        "Email": user.email,
        "Role": role_value(&user.role),
        "IsActive": user.is_active,
    });
    client.put(&format!("/users/{id}"), &payload).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/users/{id}")).await
}

pub async fn reset_password(
    client: &ApiClient,
    id: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    client
        .post_unit(&format!("/users/{id}/reset-password"), &serde_json::json!({
            "newPassword": new_password,
        }))
        .await
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
