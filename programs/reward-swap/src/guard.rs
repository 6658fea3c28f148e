//! Serializes state-mutating pool operations.
//!
//! Every mutating entry point holds a [`GuardToken`] for its whole body,
//! including the collaborator calls at its end. A collaborator that calls
//! back into the pool finds the guard busy and is refused before anything
//! is read or written.

use std::cell::Cell;

use crate::error::{PoolError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    InProgress,
}

#[derive(Debug)]
pub struct TransactionGuard {
    state: Cell<GuardState>,
}

impl Default for TransactionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionGuard {
    pub fn new() -> Self {
        Self {
            state: Cell::new(GuardState::Idle),
        }
    }

    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    /// Idle → InProgress. The returned token flips the guard back on drop,
    /// on every exit path.
    pub fn enter(&self) -> Result<GuardToken<'_>> {
        match self.state.replace(GuardState::InProgress) {
            GuardState::Idle => Ok(GuardToken { guard: self }),
            GuardState::InProgress => {
                tracing::warn!("reentrant pool call rejected");
                Err(PoolError::ReentrancyDetected)
            }
        }
    }
}

/// Proof that the guard is held. Releasing is tied to `Drop`.
#[must_use = "the guard is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a TransactionGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.state.set(GuardState::Idle);
    }
}
