// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight coordination for token refresh.
//!
//! Any number of requests can discover an expired token at once; exactly one
//! of them talks to the refresh endpoint. The rest park on a oneshot channel
//! and receive the shared outcome, in the order they arrived.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// The shared result of a refresh: the new access token, or the failure
/// every queued caller sees identically.
pub type RefreshOutcome = Result<String, ApiError>;

type Waiter = oneshot::Sender<RefreshOutcome>;

/// Outcome of [`RefreshGate::join`].
pub enum RefreshRole {
    /// This caller performs the network refresh and must call
    /// [`RefreshGate::settle`] on every path.
    Leader,
    /// A refresh is already in flight; await the shared outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct GateState {
    refreshing: bool,
    /// Non-empty only while `refreshing`; drained in FIFO order.
    waiters: Vec<Waiter>,
}

/// Single-flight gate guarding the refresh endpoint.
///
/// The check of `refreshing` and the waiter registration (or the flag flip)
/// happen under one lock acquisition with no await point inside, so two
/// callers can never both become leader.
#[derive(Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    /// Join the current refresh cycle, starting one if none is in flight.
    pub fn join(&self) -> RefreshRole {
        let mut state = self.state.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshRole::Follower(rx)
        } else {
            state.refreshing = true;
            RefreshRole::Leader
        }
    }

    /// Resolve every queued waiter in FIFO order and reopen the gate.
    ///
    /// The waiter list is taken and the flag cleared in the same critical
    /// section, so no waiter can be left pending and none can be settled
    /// twice.
    pub fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            // A dropped receiver just means that caller went away.
            let _ = waiter.send(outcome.clone());
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    #[cfg(test)]
    fn waiter_count(&self) -> usize {
        self.state.lock().waiters.len()
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
