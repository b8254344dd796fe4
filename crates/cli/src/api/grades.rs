// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grade (class) records.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

pub async fn list(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/grades").await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<Value, ApiError> {
    client.get(&format!("/grades/{id}")).await
}

pub async fn create(client: &ApiClient, grade: &Value) -> Result<Value, ApiError> {
    client.post("/grades", grade).await
}

pub async fn update(client: &ApiClient, id: &str, grade: &Value) -> Result<Value, ApiError> {
    client.put(&format!("/grades/{id}"), grade).await
}
