// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exam scores, exam types, teacher assignments, exports, and statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

/// A score entry as submitted by a teacher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreSubmission {
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_type_id: i64,
    pub score: Option<f64>,
    pub academic_year: i32,
    pub term: i32,
}

/// Client-side sanity checks before a score goes over the wire.
///
/// Returns one message per problem; empty means submittable.
pub fn validate_score(score: &ScoreSubmission) -> Vec<String> {
    let mut problems = Vec::new();
    if score.student_id == 0 {
        problems.push("Student ID is required".to_owned());
    }
    if score.subject_id == 0 {
        problems.push("Subject ID is required".to_owned());
    }
    if score.exam_type_id == 0 {
        problems.push("Exam Type ID is required".to_owned());
    }
    match score.score {
        None => problems.push("Score is required".to_owned()),
        Some(s) if !(0.0..=100.0).contains(&s) => {
            problems.push("Score must be between 0 and 100".to_owned());
        }
        Some(_) => {}
    }
    if score.academic_year == 0 {
        problems.push("Academic Year is required".to_owned());
    }
    if !(1..=3).contains(&score.term) {
        problems.push("Term must be 1, 2, or 3".to_owned());
    }
    problems
}

pub async fn student_scores(
    client: &ApiClient,
    student_id: &str,
    academic_year: i32,
    term: i32,
) -> Result<Vec<Value>, ApiError> {
    client
        .get(&format!(
            "/exams/student/{student_id}/scores?academicYear={academic_year}&term={term}"
        ))
        .await
}

pub async fn grade_scores(
    client: &ApiClient,
    grade_id: &str,
    academic_year: i32,
    term: i32,
) -> Result<Vec<Value>, ApiError> {
    client
        .get(&format!("/exams/grade/{grade_id}/scores?academicYear={academic_year}&term={term}"))
        .await
}

/// Teachers only.
pub async fn submit_score(client: &ApiClient, score: &ScoreSubmission) -> Result<Value, ApiError> {
    let body = serde_json::to_value(score).unwrap_or_default();
    client.post("/exams/scores", &body).await
}

/// Validate locally, then submit. Problems short-circuit as a validation
/// error without a network call.
pub async fn submit_score_checked(
    client: &ApiClient,
    score: &ScoreSubmission,
) -> Result<Value, ApiError> {
    let problems = validate_score(score);
    if !problems.is_empty() {
        return Err(ApiError::Validation { status: 400, message: problems.join(", ") });
    }
    submit_score(client, score).await
}

pub async fn update_score(
    client: &ApiClient,
    score_id: &str,
    score: &ScoreSubmission,
) -> Result<Value, ApiError> {
    let body = serde_json::to_value(score).unwrap_or_default();
    client.put(&format!("/exams/scores/{score_id}"), &body).await
}

pub async fn delete_score(client: &ApiClient, score_id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/exams/scores/{score_id}")).await
}

pub async fn bulk_submit_scores(client: &ApiClient, scores: &Value) -> Result<Value, ApiError> {
    client.post("/exams/scores/bulk", scores).await
}

pub async fn exam_types(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/exams/types").await
}

/// Admin only.
pub async fn create_exam_type(client: &ApiClient, exam_type: &Value) -> Result<Value, ApiError> {
    client.post("/exams/types", exam_type).await
}

/// Admin only.
pub async fn update_exam_type(
    client: &ApiClient,
    exam_type_id: &str,
    exam_type: &Value,
) -> Result<Value, ApiError> {
    client.put(&format!("/exams/types/{exam_type_id}"), exam_type).await
}

/// Admin only.
pub async fn delete_exam_type(client: &ApiClient, exam_type_id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/exams/types/{exam_type_id}")).await
}

/// The calling teacher's subject/grade assignments.
pub async fn teacher_assignments(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/exams/teacher/assignments").await
}

pub async fn can_teacher_enter_score(
    client: &ApiClient,
    teacher_id: &str,
    subject_id: &str,
    grade_id: &str,
) -> Result<Value, ApiError> {
    client
        .get(&format!(
            "/exams/teacher/{teacher_id}/can-enter-score?subjectId={subject_id}&gradeId={grade_id}"
        ))
        .await
}

/// Export a gradebook; the payload (CSV, XLSX, ...) is opaque bytes.
pub async fn export_gradebook(
    client: &ApiClient,
    grade_id: &str,
    subject_id: Option<&str>,
    academic_year: i32,
    term: i32,
    format: &str,
) -> Result<Vec<u8>, ApiError> {
    let mut path = format!(
        "/exams/grade/{grade_id}/export?academicYear={academic_year}&term={term}&format={format}"
    );
    if let Some(subject_id) = subject_id {
        path.push_str(&format!("&subjectId={subject_id}"));
    }
    client.get_bytes(&path).await
}

/// Rendered report card for one student; opaque bytes (PDF).
pub async fn report_card(
    client: &ApiClient,
    student_id: &str,
    academic_year: i32,
    term: i32,
) -> Result<Vec<u8>, ApiError> {
    client
        .get_bytes(&format!(
            "/exams/student/{student_id}/report-card?academicYear={academic_year}&term={term}"
        ))
        .await
}

/// Score statistics, filtered by whatever keys the caller passes.
pub async fn statistics(client: &ApiClient, filters: &[(&str, String)]) -> Result<Value, ApiError> {
    let query = filters
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    client.get(&format!("/exams/statistics?{query}")).await
}

pub async fn academic_years(client: &ApiClient) -> Result<Vec<Value>, ApiError> {
    client.get("/AcademicYears").await
}

pub async fn active_academic_year(client: &ApiClient) -> Result<Value, ApiError> {
    client.get("/AcademicYears/active").await
}

#[cfg(test)]
#[path = "exams_tests.rs"]
mod tests;
