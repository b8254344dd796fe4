// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar logout` — revoke and clear the session.

use crate::api::auth;
use crate::client::ApiClient;

pub async fn run(client: &ApiClient) -> anyhow::Result<()> {
    if let Err(e) = auth::logout(client).await {
        // Local state is already cleared; the server-side revoke failing is
        // worth mentioning but not a failed command.
        println!("logged out (server revoke failed: {e})");
        return Ok(());
    }
    println!("logged out");
    Ok(())
}
