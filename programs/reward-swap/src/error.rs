//! Pool error type.

use crate::ledger::TransferError;

/// Every way a pool operation can be refused.
///
/// An operation that returns one of these has left the pool exactly as it
/// found it, except [`PoolError::PayoutNotReclaimed`], which is returned
/// with the operation committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    // ── Configuration ───────────────────────────────────────────────────────
    /// A token ledger (or the reward token) has not been bound to the pool.
    #[error("Pool is not configured: {0} is unset")]
    InvalidConfiguration(&'static str),

    // ── Input validation ────────────────────────────────────────────────────
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Pool has insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Output below minimum — slippage exceeded (got {actual}, minimum {minimum})")]
    SlippageExceeded { actual: u64, minimum: u64 },

    #[error("Deposit too small: minted shares round to zero")]
    ZeroSharesMinted,

    // ── Positions ───────────────────────────────────────────────────────────
    #[error("Caller holds no liquidity shares")]
    NoPosition,

    #[error("Requested {requested} shares but position holds {held}")]
    InsufficientShares { requested: u64, held: u64 },

    #[error("No rewards to claim")]
    NothingToClaim,

    // ── Guard / authorization ───────────────────────────────────────────────
    #[error("Reentrant call rejected: another pool operation is in progress")]
    ReentrancyDetected,

    #[error("Caller is not the pool owner")]
    Unauthorized,

    #[error("Reward rate {0} bps is above 10000")]
    RateOutOfRange(u16),

    // ── Collaborators ───────────────────────────────────────────────────────
    #[error("Token transfer failed: {0}")]
    CollaboratorTransferFailed(#[from] TransferError),

    /// Pool state is restored, but tokens already pulled could not all be
    /// refunded. They stay in the pool account as surplus.
    #[error("Token transfer failed and the refund did not complete: {0}")]
    RefundIncomplete(TransferError),

    /// A payout could not be reclaimed after a later transfer failed. The
    /// operation stays committed and the unpaid remainder stays in the pool
    /// account as surplus.
    #[error("Token transfer failed after a payout that could not be reclaimed; operation committed: {0}")]
    PayoutNotReclaimed(TransferError),

    // ── Arithmetic ──────────────────────────────────────────────────────────
    #[error("Math overflow")]
    MathOverflow,
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, PoolError>;
