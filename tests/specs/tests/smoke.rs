// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Smoke tests that spawn the real `registrar` binary against the mock
//! school information system.

use registrar_specs::{run_registrar, MockSis};

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test(flavor = "multi_thread")]
async fn login_then_status_round_trips_through_the_state_dir() {
    let sis = MockSis::start(3600).await;
    let state_dir = tempfile::tempdir().expect("state dir");

    let login = run_registrar(
        &sis.base_url,
        state_dir.path(),
        &["login", "--username", "admin", "--password", "passw0rd"],
    )
    .expect("spawn registrar");
    assert!(
        login.status.success(),
        "login failed: {}",
        String::from_utf8_lossy(&login.stderr)
    );
    assert!(stdout_of(&login).contains("logged in as admin (Teacher)"));

    // A second invocation reads the persisted session back from disk.
    let status = run_registrar(&sis.base_url, state_dir.path(), &["status"]).expect("spawn");
    assert!(status.status.success());
    let out = stdout_of(&status);
    assert!(out.contains("admin"), "status output missing user: {out}");
    assert!(out.contains("Teacher"), "status output missing role: {out}");
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_clears_the_persisted_session() {
    let sis = MockSis::start(3600).await;
    let state_dir = tempfile::tempdir().expect("state dir");

    let login = run_registrar(
        &sis.base_url,
        state_dir.path(),
        &["login", "--username", "admin", "--password", "passw0rd"],
    )
    .expect("spawn");
    assert!(login.status.success());

    let logout = run_registrar(&sis.base_url, state_dir.path(), &["logout"]).expect("spawn");
    assert!(logout.status.success());

    let status = run_registrar(&sis.base_url, state_dir.path(), &["status"]).expect("spawn");
    assert!(stdout_of(&status).contains("not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_login_exits_nonzero_with_the_server_message() {
    let sis = MockSis::start(3600).await;
    let state_dir = tempfile::tempdir().expect("state dir");

    let login = run_registrar(
        &sis.base_url,
        state_dir.path(),
        &["login", "--username", "admin", "--password", "wrong"],
    )
    .expect("spawn");
    assert!(!login.status.success());
    assert!(String::from_utf8_lossy(&login.stderr).contains("Invalid username or password"));
}
