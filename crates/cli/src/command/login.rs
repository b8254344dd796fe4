// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar login` — authenticate and persist the session.

use clap::Parser;

use crate::api::auth::{self, Credentials};
use crate::client::ApiClient;

#[derive(Debug, Parser)]
pub struct LoginArgs {
    /// Account username.
    #[arg(long, short = 'u')]
    pub username: String,

    /// Account password.
    #[arg(long, short = 'p', env = "REGISTRAR_PASSWORD")]
    pub password: String,
}

pub async fn run(client: &ApiClient, args: LoginArgs) -> anyhow::Result<()> {
    let credentials = Credentials { username: args.username, password: args.password };
    let resp = auth::login(client, &credentials).await?;

    println!("logged in as {} ({})", resp.user.username, resp.user.roles.join(", "));
    Ok(())
}
