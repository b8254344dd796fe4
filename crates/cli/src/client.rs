// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the school information system API.
//!
//! Every outbound call goes through the same pipeline: attach a valid
//! bearer token (refreshing first when the stored one is expired or about
//! to be), send, then normalize the response — including a single
//! refresh-and-retry on 401 before giving up and forcing a logout. The
//! pre-flight path and the 401-retry path share one [`RefreshGate`], so
//! they de-duplicate against each other.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::event::SessionEvent;
use crate::refresh::{RefreshGate, RefreshOutcome, RefreshRole};
use crate::session::SessionStore;
use crate::token;

/// Fixed timeout for every outbound call. A timeout is a network error,
/// not something the auth layer retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints that never carry a bearer token and never trigger the
/// refresh/retry/logout machinery.
const AUTH_PATHS: &[&str] = &["/auth/login", "/auth/register", "/auth/refresh-token"];

/// Token pair returned by the refresh endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPair {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Request body variants the pipeline knows how to (re)build.
///
/// Kept as borrowed data so the 401-retry path can re-issue the original
/// request without the caller's involvement.
pub(crate) enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Csv { file_name: &'a str, bytes: &'a [u8] },
}

impl Payload<'_> {
    fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Payload::Empty => req,
            Payload::Json(body) => req.json(body),
            Payload::Csv { file_name, bytes } => {
                let part = reqwest::multipart::Part::bytes(bytes.to_vec())
                    .file_name(file_name.to_string());
                req.multipart(reqwest::multipart::Form::new().part("file", part))
            }
        }
    }
}

/// The API client: connection settings, session store, refresh gate, and
/// the session event channel.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    store: Arc<SessionStore>,
    gate: RefreshGate,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Build a client against `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base: base_url.trim_end_matches('/').to_owned(),
            store,
            gate: RefreshGate::default(),
            event_tx,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Subscribe to session lifecycle events (login, refresh, forced logout).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    fn is_auth_path(path: &str) -> bool {
        AUTH_PATHS.iter().any(|p| path.starts_with(p))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Pre-flight: the token to attach to `path`, refreshing first when the
    /// stored one is missing or inside the expiry margin.
    ///
    /// `None` means the call proceeds unauthenticated — either the endpoint
    /// is an auth endpoint, there is no session at all, or the refresh
    /// failed (the server will reject; we never block the request forever).
    async fn bearer_for(&self, path: &str) -> Option<String> {
        if Self::is_auth_path(path) {
            return None;
        }
        let current = self.store.access_token();
        let still_good = current
            .as_deref()
            .is_some_and(|t| !token::is_expired_or_near(t, token::EXPIRY_MARGIN_SECS));
        if still_good {
            return current;
        }
        if current.is_none() && self.store.refresh_token().is_none() {
            // Nothing to attach and nothing to refresh with.
            return None;
        }
        match self.obtain_fresh_token().await {
            Ok(fresh) => Some(fresh),
            Err(e) => {
                debug!(%path, err = %e, "proceeding unauthenticated after failed refresh");
                None
            }
        }
    }

    /// Obtain a token that is valid right now, de-duplicating concurrent
    /// refreshes: one caller drives the network call, everyone else queues
    /// on the gate and shares the outcome.
    pub async fn obtain_fresh_token(&self) -> Result<String, ApiError> {
        match self.gate.join() {
            RefreshRole::Follower(rx) => rx.await.unwrap_or(Err(ApiError::RefreshFailed)),
            RefreshRole::Leader => {
                let outcome = self.run_refresh().await;
                match &outcome {
                    Ok(_) => info!("access token refreshed"),
                    Err(e) => {
                        warn!(err = %e, "token refresh failed, clearing session");
                        self.emit(SessionEvent::RefreshFailed { error: e.to_string() });
                        self.force_logout();
                    }
                }
                // Settles on every path, success or failure: waiters must
                // never be left pending.
                self.gate.settle(&outcome);
                outcome
            }
        }
    }

    /// The actual refresh call. Leader-only.
    async fn run_refresh(&self) -> RefreshOutcome {
        let Some(refresh_token) = self.store.refresh_token() else {
            return Err(ApiError::RefreshFailed);
        };
        let resp = self
            .http
            .post(self.url("/auth/refresh-token"))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(|_| ApiError::Network)?;
        if !resp.status().is_success() {
            return Err(ApiError::RefreshFailed);
        }
        let pair: TokenPair = resp.json().await.map_err(|_| ApiError::RefreshFailed)?;
        self.store.update_tokens(pair.token.clone(), pair.refresh_token);
        self.emit(SessionEvent::Refreshed);
        Ok(pair.token)
    }

    fn force_logout(&self) {
        self.store.clear();
        self.emit(SessionEvent::LoggedOut { forced: true });
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        payload: &Payload<'_>,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut req = self.http.request(method, self.url(path));
        if let Some(tok) = bearer {
            req = req.bearer_auth(tok);
        }
        req = payload.apply(req);
        req.send().await.map_err(|_| ApiError::Network)
    }

    /// Full request pipeline: pre-flight token attach, one refresh-and-retry
    /// on 401, error normalization. Auth endpoints skip all of it except the
    /// normalization.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
    ) -> Result<reqwest::Response, ApiError> {
        let bearer = self.bearer_for(path).await;
        let resp = self.send_once(method.clone(), path, &payload, bearer.as_deref()).await?;
        let status = resp.status();
        debug!(%status, %path, "response");
        if status.is_success() {
            return Ok(resp);
        }

        if Self::is_auth_path(path) {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::passthrough(status.as_u16(), &body));
        }

        if status == StatusCode::UNAUTHORIZED {
            // One retry with a freshly obtained token; the refresh failure
            // path has already forced a logout, so just propagate.
            let fresh = self.obtain_fresh_token().await?;
            let retry = self.send_once(method, path, &payload, Some(&fresh)).await?;
            let retry_status = retry.status();
            if retry_status.is_success() {
                return Ok(retry);
            }
            if retry_status == StatusCode::UNAUTHORIZED {
                // Still rejected with a token the server just issued: the
                // session is unrecoverable. No second refresh.
                warn!(%path, "unauthorized after refresh, clearing session");
                self.force_logout();
                return Err(ApiError::AuthRequired);
            }
            let body = retry.text().await.unwrap_or_default();
            return Err(ApiError::classify(retry_status.as_u16(), &body));
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::classify(status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status().as_u16();
        resp.json().await.map_err(|_| ApiError::Validation {
            status,
            message: "Malformed response body".to_owned(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path, Payload::Empty).await?;
        Self::decode(resp).await
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.request(Method::GET, path, Payload::Empty).await?;
        Ok(resp.bytes().await.map_err(|_| ApiError::Network)?.to_vec())
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        let resp = self.request(Method::POST, path, Payload::Json(body)).await?;
        Self::decode(resp).await
    }

    /// POST where the response body is irrelevant (or empty).
    pub async fn post_unit(&self, path: &str, body: &Value) -> Result<(), ApiError> {
        self.request(Method::POST, path, Payload::Json(body)).await?;
        Ok(())
    }

    /// POST with no request body at all.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::POST, path, Payload::Empty).await?;
        Self::decode(resp).await
    }

    /// POST with no request body and no interesting response.
    pub async fn post_bare(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::POST, path, Payload::Empty).await?;
        Ok(())
    }

    /// Upload a CSV file as `multipart/form-data`.
    pub async fn post_csv<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<T, ApiError> {
        let resp = self.request(Method::POST, path, Payload::Csv { file_name, bytes }).await?;
        Self::decode(resp).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ApiError> {
        let resp = self.request(Method::PUT, path, Payload::Json(body)).await?;
        Self::decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, Payload::Empty).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
