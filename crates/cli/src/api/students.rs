// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Student records: CRUD, archival, promotion, CSV import.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

pub async fn list(client: &ApiClient, include_archived: bool) -> Result<Vec<Value>, ApiError> {
    client.get(&format!("/students?includeArchived={include_archived}")).await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<Value, ApiError> {
    client.get(&format!("/students/{id}")).await
}

pub async fn create(client: &ApiClient, student: &Value) -> Result<Value, ApiError> {
    client.post("/students", student).await
}

pub async fn update(client: &ApiClient, id: &str, student: &Value) -> Result<Value, ApiError> {
    client.put(&format!("/students/{id}"), student).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/students/{id}")).await
}

pub async fn by_grade(client: &ApiClient, grade_id: &str) -> Result<Vec<Value>, ApiError> {
    client.get(&format!("/students/grade/{grade_id}")).await
}

pub async fn archive(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.post_bare(&format!("/students/{id}/archive")).await
}

/// Move a set of students to their next grade for the new academic year.
pub async fn promote(client: &ApiClient, promotion: &Value) -> Result<(), ApiError> {
    client.post_unit("/students/promote", promotion).await
}

/// Bulk-import students from a CSV file.
pub async fn import_csv(client: &ApiClient, file_name: &str, csv: &[u8]) -> Result<Value, ApiError> {
    client.post_csv("/students/import/csv", file_name, csv).await
}

/// Download the CSV import template.
pub async fn import_template(client: &ApiClient) -> Result<Vec<u8>, ApiError> {
    client.get_bytes("/students/import/template").await
}
