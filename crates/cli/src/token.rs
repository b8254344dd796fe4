// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer token inspection: expiry decoding without signature validation.
//!
//! The server signs the token; the client only needs to know when it runs
//! out. Malformed input is a value (`None`), never an error — callers treat
//! unknown expiry as expired.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// A token must outlive this margin to count as valid; anything closer to
/// expiry (or past it, or undecodable) is treated as expired.
pub const EXPIRY_MARGIN_SECS: u64 = 60;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<u64>,
}

/// Decoded expiry (`exp` claim, epoch seconds) of a bearer token.
///
/// Returns `None` for anything that is not a well-formed JWT with a numeric
/// `exp` claim.
pub fn expiry_of(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

/// True when the token's expiry is unknown, in the past, or within
/// `margin_secs` of now.
pub fn is_expired_or_near(token: &str, margin_secs: u64) -> bool {
    match expiry_of(token) {
        Some(exp) => exp.saturating_sub(margin_secs) <= epoch_secs(),
        None => true,
    }
}

pub(crate) fn epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
