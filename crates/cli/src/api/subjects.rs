// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subjects and their assignment to grades and teachers.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

pub async fn list(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/subjects").await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<Value, ApiError> {
    client.get(&format!("/subjects/{id}")).await
}

/// Admin only.
pub async fn create(client: &ApiClient, subject: &Value) -> Result<Value, ApiError> {
    client.post("/subjects", subject).await
}

/// Attach a subject to a grade's curriculum. Admin only.
pub async fn assign_to_grade(
    client: &ApiClient,
    subject_id: &str,
    grade_id: &str,
    assignment: &Value,
) -> Result<Value, ApiError> {
    client.post(&format!("/subjects/{subject_id}/assign-to-grade/{grade_id}"), assignment).await
}

/// Assign a teacher to a subject for a specific grade. Admin only.
pub async fn assign_teacher(
    client: &ApiClient,
    subject_id: &str,
    assignment: &Value,
) -> Result<Value, ApiError> {
    client.post(&format!("/subjects/{subject_id}/assign-teacher"), assignment).await
}

/// Bulk-import subjects from a CSV file. Admin only.
pub async fn import_csv(client: &ApiClient, file_name: &str, csv: &[u8]) -> Result<Value, ApiError> {
    client.post_csv("/subjects/import/csv", file_name, csv).await
}
