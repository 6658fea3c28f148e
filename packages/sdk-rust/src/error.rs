//! SDK error type.

use reward_swap::{PoolError, TransferError};

/// All errors returned by the reward-swap SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Pool ─────────────────────────────────────────────────────────────────
    /// The pool refused the operation.
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// A ledger refused a wallet operation (faucet, send).
    #[error("Ledger error: {0}")]
    Ledger(#[from] TransferError),

    /// The pool is empty, so there is no price to quote against.
    #[error("Pool has no liquidity — seed it with provide first")]
    NoLiquidity,

    // ── Provide liquidity ────────────────────────────────────────────────────
    /// Pool is empty and no `amount_b` was provided to set the initial price.
    #[error("amount_b is required when the pool is empty (first deposit sets the price)")]
    AmountBRequired,

    /// The proportional `amount_b` computed from live reserves rounded to zero.
    #[error("Computed amount_b = 0 — deposit amount_a is too small relative to reserves; \
             pass amount_b explicitly")]
    AmountBZero,

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("Integer overflow in SDK math")]
    MathOverflow,

    // ── State file ───────────────────────────────────────────────────────────
    /// The state file could not be read or written.
    #[error("State file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file is not valid JSON for a pool snapshot.
    #[error("State file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// No state file exists yet at the given path.
    #[error("No pool state at {0} — run init first")]
    StateNotFound(String),

    /// A state file already exists where a new pool was requested.
    #[error("Pool state already exists at {0}")]
    StateExists(String),

    // ── Validation ───────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;
