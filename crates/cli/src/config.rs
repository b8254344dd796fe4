// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection and logging options shared by every subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::client::ApiClient;
use crate::session::{self, SessionStore};

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Base URL of the school information system API.
    #[arg(long, env = "REGISTRAR_URL", default_value = "http://localhost:5000/api", global = true)]
    pub url: String,

    /// Directory for persisted session state (defaults to the platform
    /// state dir).
    #[arg(long, env = "REGISTRAR_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Log filter (tracing EnvFilter syntax).
    #[arg(long, env = "REGISTRAR_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format: "plain" or "json".
    #[arg(long, default_value = "plain", global = true)]
    pub log_format: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("--url must be an http(s) URL, got: {}", self.url);
        }
        if self.log_format != "plain" && self.log_format != "json" {
            anyhow::bail!("--log-format must be \"plain\" or \"json\"");
        }
        Ok(())
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(session::state_dir)
    }

    /// Build the API client on a disk-backed session store.
    pub fn client(&self) -> ApiClient {
        let store = Arc::new(SessionStore::open(&self.state_dir()));
        ApiClient::new(&self.url, store)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
