// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end session-lifecycle tests.
//!
//! Runs a mock school-information-system server (login, refresh, and a
//! protected resource) and, for smoke tests, spawns the real `registrar`
//! binary against it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Mint an unsigned JWT expiring `ttl_secs` from now.
pub fn mint_token(ttl_secs: i64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD
        .encode(json!({ "sub": "7", "exp": now + ttl_secs }).to_string().as_bytes());
    format!("{header}.{payload}.sig")
}

struct SisState {
    /// Lifetime of the token issued at login.
    login_ttl: i64,
    refresh_ok: bool,
    refresh_calls: AtomicU32,
    /// Every token the server has issued; `/students` accepts only the most
    /// recent one.
    issued: Mutex<Vec<String>>,
    /// Authorization header values seen by `/students`.
    student_bearers: Mutex<Vec<Option<String>>>,
}

/// A mock school information system listening on an ephemeral port.
pub struct MockSis {
    pub base_url: String,
    state: Arc<SisState>,
}

impl MockSis {
    /// Start with the given login-token lifetime and a working refresh
    /// endpoint.
    pub async fn start(login_ttl_secs: i64) -> Self {
        Self::start_with(login_ttl_secs, true).await
    }

    /// Start with a refresh endpoint that always rejects.
    pub async fn start_broken_refresh(login_ttl_secs: i64) -> Self {
        Self::start_with(login_ttl_secs, false).await
    }

    async fn start_with(login_ttl: i64, refresh_ok: bool) -> Self {
        let state = Arc::new(SisState {
            login_ttl,
            refresh_ok,
            refresh_calls: AtomicU32::new(0),
            issued: Mutex::new(Vec::new()),
            student_bearers: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/auth/login", post(login_route))
            .route("/auth/refresh-token", post(refresh_route))
            .route("/auth/logout", post(logout_route))
            .route("/students", get(students_route))
            .with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock sis");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn refresh_calls(&self) -> u32 {
        self.state.refresh_calls.load(Ordering::Relaxed)
    }

    /// The most recently issued access token.
    pub async fn latest_token(&self) -> Option<String> {
        self.state.issued.lock().await.last().cloned()
    }

    /// Authorization headers `/students` has seen, oldest first.
    pub async fn student_bearers(&self) -> Vec<Option<String>> {
        self.state.student_bearers.lock().await.clone()
    }
}

async fn login_route(
    State(s): State<Arc<SisState>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let username = body.get("username").and_then(serde_json::Value::as_str);
    let password = body.get("password").and_then(serde_json::Value::as_str);
    if username != Some("admin") || password != Some("passw0rd") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid username or password" })))
            .into_response();
    }
    let token = mint_token(s.login_ttl);
    s.issued.lock().await.push(token.clone());
    Json(json!({
        "token": token,
        "refreshToken": "ref-1",
        "user": {
            "id": 1,
            "username": "admin",
            "fullName": "Site Administrator",
            "email": "admin@school.example",
            "role": "Teacher",
        },
    }))
    .into_response()
}

async fn refresh_route(
    State(s): State<Arc<SisState>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    s.refresh_calls.fetch_add(1, Ordering::Relaxed);
    // Widen the in-flight window so concurrent callers pile up behind it.
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    let presented = body.get("refreshToken").and_then(serde_json::Value::as_str);
    if !s.refresh_ok || presented != Some("ref-1") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Refresh token is invalid" })))
            .into_response();
    }
    let token = mint_token(3600);
    s.issued.lock().await.push(token.clone());
    Json(json!({ "token": token, "refreshToken": "ref-1" })).into_response()
}

async fn logout_route() -> Json<serde_json::Value> {
    Json(json!({ "revoked": true }))
}

async fn students_route(
    State(s): State<Arc<SisState>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    s.student_bearers.lock().await.push(bearer.clone());

    let accepted = s
        .issued
        .lock()
        .await
        .last()
        .map(|t| format!("Bearer {t}"))
        .is_some_and(|expected| bearer.as_deref() == Some(expected.as_str()));
    if accepted {
        Json(json!([{ "id": 1, "fullName": "Dana Okafor", "gradeName": "4B" }])).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
    }
}

/// Resolve the path to the compiled `registrar` binary.
pub fn registrar_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs -> tests -> workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("registrar")
}

/// Run the registrar binary against `base_url` with an isolated state dir.
pub fn run_registrar(base_url: &str, state_dir: &Path, args: &[&str]) -> anyhow::Result<std::process::Output> {
    let binary = registrar_binary();
    anyhow::ensure!(binary.exists(), "registrar binary not found at {}", binary.display());
    let output = std::process::Command::new(binary)
        .env("REGISTRAR_URL", base_url)
        .env("REGISTRAR_STATE_DIR", state_dir)
        .args(args)
        .output()?;
    Ok(output)
}
