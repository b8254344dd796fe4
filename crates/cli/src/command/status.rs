// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar status` — who is signed in and how long the token lasts.

use crate::client::ApiClient;
use crate::token;

fn format_expires(secs: Option<u64>) -> String {
    match secs {
        Some(s) => {
            let m = s / 60;
            let rem = s % 60;
            format!("{m}m {rem:02}s")
        }
        None => "expired".to_owned(),
    }
}

pub fn run(client: &ApiClient) -> anyhow::Result<()> {
    let session = client.store().current();
    let Some(token) = session.access_token.as_deref() else {
        println!("not logged in");
        return Ok(());
    };

    let user = session.user.as_ref();
    println!("logged in:   {}", user.map(|u| u.username.as_str()).unwrap_or("(unknown)"));
    println!("name:        {}", user.map(|u| u.full_name.as_str()).unwrap_or("-"));
    println!("roles:       {}", session.roles.join(", "));
    if !session.permissions.is_empty() {
        println!("permissions: {}", session.permissions.join(", "));
    }

    let now = token::epoch_secs();
    let remaining = token::expiry_of(token).and_then(|exp| exp.checked_sub(now));
    println!("token:       {}", format_expires(remaining));
    if token::is_expired_or_near(token, token::EXPIRY_MARGIN_SECS) {
        println!("             (will refresh on next request)");
    }
    Ok(())
}
