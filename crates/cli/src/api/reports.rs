// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report card generation and download.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Generate (server-side) a report card for one student.
pub async fn generate_for_student(
    client: &ApiClient,
    student_id: &str,
    academic_year: i32,
    term: i32,
) -> Result<Value, ApiError> {
    client
        .post_empty(&format!(
            "/reportcards/generate/student/{student_id}?academicYear={academic_year}&term={term}"
        ))
        .await
}

/// Generate report cards for a whole class.
pub async fn generate_for_class(
    client: &ApiClient,
    grade_id: &str,
    academic_year: i32,
    term: i32,
) -> Result<Value, ApiError> {
    client
        .post_empty(&format!(
            "/reportcards/generate/class/{grade_id}?academicYear={academic_year}&term={term}"
        ))
        .await
}

/// Download a generated report card; opaque bytes (PDF).
pub async fn download(client: &ApiClient, report_card_id: &str) -> Result<Vec<u8>, ApiError> {
    client.get_bytes(&format!("/reportcards/{report_card_id}/download")).await
}

/// All generated report cards for a student.
pub async fn for_student(client: &ApiClient, student_id: &str) -> Result<Vec<Value>, ApiError> {
    client.get(&format!("/reportcards/student/{student_id}")).await
}
