// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end session-lifecycle tests: login, expiry-driven refresh,
//! single-flight de-duplication, and forced logout.

use std::sync::Arc;

use registrar::api::auth::{self, Credentials};
use registrar::api::students;
use registrar::client::ApiClient;
use registrar::error::ApiError;
use registrar::session::SessionStore;
use registrar_specs::MockSis;

fn admin_credentials() -> Credentials {
    Credentials { username: "admin".to_owned(), password: "passw0rd".to_owned() }
}

fn fresh_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Arc::new(SessionStore::ephemeral()))
}

#[tokio::test]
async fn near_expired_token_is_refreshed_exactly_once_and_the_call_proceeds() {
    // Login issues a token with 30s of life, inside the 60s safety margin —
    // the same state a tab reaches 59 minutes into a 60-minute token.
    let sis = MockSis::start(30).await;
    let client = fresh_client(&sis.base_url);

    let login = auth::login(&client, &admin_credentials()).await.expect("login");
    let t1 = login.token;
    assert_eq!(client.store().current().roles, vec!["Teacher".to_owned()]);

    let rows = students::list(&client, false).await.expect("students");
    assert_eq!(rows.len(), 1);

    // Exactly one refresh happened, and the request went out with the new
    // token, not the dying one.
    assert_eq!(sis.refresh_calls(), 1);
    let t2 = sis.latest_token().await.expect("refreshed token");
    assert_ne!(t1, t2);
    assert_eq!(sis.student_bearers().await, vec![Some(format!("Bearer {t2}"))]);
    assert_eq!(client.store().access_token(), Some(t2));
}

#[tokio::test]
async fn a_long_lived_token_is_used_as_is() {
    let sis = MockSis::start(3600).await;
    let client = fresh_client(&sis.base_url);

    let login = auth::login(&client, &admin_credentials()).await.expect("login");
    students::list(&client, false).await.expect("students");

    assert_eq!(sis.refresh_calls(), 0);
    assert_eq!(sis.student_bearers().await, vec![Some(format!("Bearer {}", login.token))]);
}

#[tokio::test]
async fn concurrent_callers_on_an_expired_session_share_one_refresh() {
    let sis = MockSis::start(-5).await;
    let client = fresh_client(&sis.base_url);
    auth::login(&client, &admin_credentials()).await.expect("login");

    let results = futures_util::future::join_all(
        (0..8).map(|_| students::list(&client, false)),
    )
    .await;

    assert_eq!(sis.refresh_calls(), 1, "refresh endpoint must be hit exactly once");
    for rows in results {
        assert_eq!(rows.expect("list ok").len(), 1);
    }
    // Every protected call carried the single refreshed token.
    let t2 = sis.latest_token().await.expect("refreshed token");
    for bearer in sis.student_bearers().await {
        assert_eq!(bearer, Some(format!("Bearer {t2}")));
    }
}

#[tokio::test]
async fn failed_refresh_forces_logout_and_fans_out_the_same_error() {
    let sis = MockSis::start_broken_refresh(-5).await;
    let client = fresh_client(&sis.base_url);
    auth::login(&client, &admin_credentials()).await.expect("login");

    let results = futures_util::future::join_all(
        (0..4).map(|_| students::list(&client, false)),
    )
    .await;

    for rows in results {
        assert_eq!(rows.expect_err("must fail"), ApiError::RefreshFailed);
    }
    // One network refresh; after the forced logout there is no refresh token
    // left to try with.
    assert_eq!(sis.refresh_calls(), 1);
    assert!(!client.store().is_authenticated());
}

#[tokio::test]
async fn login_failure_passes_through_untouched() {
    let sis = MockSis::start(3600).await;
    let client = fresh_client(&sis.base_url);

    let err = auth::login(
        &client,
        &Credentials { username: "admin".to_owned(), password: "nope".to_owned() },
    )
    .await
    .expect_err("wrong password");

    assert_eq!(
        err,
        ApiError::Validation { status: 401, message: "Invalid username or password".to_owned() }
    );
    assert_eq!(sis.refresh_calls(), 0);
    assert!(!client.store().is_authenticated());
}
