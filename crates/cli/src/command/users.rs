// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `registrar users` — user administration.

use clap::Subcommand;
use serde_json::Value;

use crate::api::users::{self, NewUser};
use crate::client::ApiClient;

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users.
    List,
    /// Create a user account.
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        /// Admin, Teacher, or Staff.
        #[arg(long)]
        role: String,
        #[arg(long, env = "REGISTRAR_NEW_USER_PASSWORD")]
        password: String,
    },
    /// Reset a user's password.
    ResetPassword {
        /// User id.
        id: String,
        #[arg(long, env = "REGISTRAR_NEW_USER_PASSWORD")]
        password: String,
    },
}

fn field<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or("-")
}

pub async fn run(client: &ApiClient, command: UsersCommand) -> anyhow::Result<()> {
    match command {
        UsersCommand::List => {
            let rows = users::list(client).await?;
            for row in &rows {
                let id = row.get("id").map(Value::to_string).unwrap_or_else(|| "-".to_owned());
                println!(
                    "{id}\t{}\t{}\t{}",
                    field(row, "username"),
                    field(row, "fullName"),
                    field(row, "role"),
                );
            }
            println!("{} user(s)", rows.len());
        }
        UsersCommand::Create { username, full_name, email, role, password } => {
            let user = NewUser { username, full_name, email, role, password, is_active: true };
            users::create(client, &user).await?;
            println!("user created");
        }
        UsersCommand::ResetPassword { id, password } => {
            users::reset_password(client, &id, &password).await?;
            println!("password reset");
        }
    }
    Ok(())
}
