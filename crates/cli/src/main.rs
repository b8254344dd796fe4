// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use tracing::error;

use registrar::command::login::LoginArgs;
use registrar::command::report_card::ReportCardArgs;
use registrar::command::students::StudentsCommand;
use registrar::command::users::UsersCommand;
use registrar::command::{login, logout, report_card, status, students, users};
use registrar::config::Config;

#[derive(Parser)]
#[command(name = "registrar", version, about = "Admin console for the school information system")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and persist the session.
    Login(LoginArgs),
    /// Revoke and clear the session.
    Logout,
    /// Show the current session and token expiry.
    Status,
    /// Student records.
    Students {
        #[command(subcommand)]
        command: StudentsCommand,
    },
    /// User administration.
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Generate and download a student's report card.
    ReportCard(ReportCardArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    init_tracing(&cli.config);

    if let Err(e) = run(cli).await {
        error!("fatal: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = cli.config.client();

    match cli.command {
        Command::Login(args) => login::run(&client, args).await,
        Command::Logout => logout::run(&client).await,
        Command::Status => status::run(&client),
        Command::Students { command } => students::run(&client, command).await,
        Command::Users { command } => users::run(&client, command).await,
        Command::ReportCard(args) => report_card::run(&client, args).await,
    }
}
