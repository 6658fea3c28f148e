//! Collaborator interfaces: the two asset ledgers and the reward token.
//!
//! The pool never touches balances itself. It calls out through these
//! traits strictly after its own checks have passed, and a collaborator may
//! call back into the pool from inside any of them.

use std::rc::Rc;

use crate::state::Address;

/// Why a collaborator refused a transfer or mint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("{holder} holds {available}, needs {needed}")]
    InsufficientBalance { holder: Address, needed: u64, available: u64 },

    #[error("{spender} may move {allowed} of {owner}'s tokens, needs {needed}")]
    InsufficientAllowance { owner: Address, spender: Address, needed: u64, allowed: u64 },

    #[error("{0}")]
    Rejected(String),
}

/// A fungible token ledger holding one of the pool's two assets.
pub trait TokenLedger {
    /// Identity of the token itself.
    fn address(&self) -> Address;

    fn balance_of(&self, holder: &Address) -> u64;

    /// Move `amount` from `from` to `to`, authorised by `from`.
    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> Result<(), TransferError>;

    /// Move `amount` from `from` to `to`, authorised by a prior allowance
    /// granted to `spender`.
    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TransferError>;
}

/// Mintable ledger paying out LP rewards.
pub trait RewardToken {
    fn address(&self) -> Address;

    fn mint(&self, to: &Address, amount: u64) -> Result<(), TransferError>;
}

// ─── Transfer journal ──────────────────────────────────────────────────────
// Records the legs an operation has completed so a later failing leg can
// compensate them in reverse order. Pulls always precede payouts.

enum Leg {
    /// counterparty → pool
    Pull { ledger: Rc<dyn TokenLedger>, counterparty: Address, amount: u64 },
    /// pool → counterparty
    Push { ledger: Rc<dyn TokenLedger>, counterparty: Address, amount: u64 },
}

/// How far [`TransferJournal::compensate`] got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unwind {
    /// Every completed leg was reversed.
    Complete,
    /// Some pulled tokens could not be refunded. The pool still holds them,
    /// so its pre-operation books stay covered.
    PullsKept,
    /// A payout could not be reclaimed. Every earlier pull is left in place,
    /// so only the post-operation books are covered.
    PayoutKept,
}

pub(crate) struct TransferJournal<'a> {
    pool: &'a Address,
    legs: Vec<Leg>,
}

impl<'a> TransferJournal<'a> {
    pub(crate) fn new(pool: &'a Address) -> Self {
        Self { pool, legs: Vec::new() }
    }

    /// Pull `amount` from `from` into the pool using the pool's allowance.
    pub(crate) fn pull(
        &mut self,
        ledger: &Rc<dyn TokenLedger>,
        from: &Address,
        amount: u64,
    ) -> Result<(), TransferError> {
        debug_assert!(
            !self.legs.iter().any(|leg| matches!(leg, Leg::Push { .. })),
            "pull recorded after a payout"
        );
        if amount == 0 {
            return Ok(());
        }
        ledger.transfer_from(self.pool, from, self.pool, amount)?;
        self.legs.push(Leg::Pull {
            ledger: Rc::clone(ledger),
            counterparty: from.clone(),
            amount,
        });
        Ok(())
    }

    /// Pay `amount` out of the pool to `to`.
    pub(crate) fn push(
        &mut self,
        ledger: &Rc<dyn TokenLedger>,
        to: &Address,
        amount: u64,
    ) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }
        ledger.transfer(self.pool, to, amount)?;
        self.legs.push(Leg::Push {
            ledger: Rc::clone(ledger),
            counterparty: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Undo completed legs, newest first.
    ///
    /// Stops at the first payout that cannot be reclaimed, leaving every
    /// older leg in place. A refund that fails is skipped and the remaining
    /// refunds are still attempted.
    pub(crate) fn compensate(self) -> Unwind {
        let pool = self.pool;
        let mut unwind = Unwind::Complete;
        for leg in self.legs.into_iter().rev() {
            match &leg {
                Leg::Push { ledger, counterparty, amount } => {
                    if let Err(err) = ledger.transfer_from(pool, counterparty, pool, *amount) {
                        tracing::error!(%counterparty, amount, %err, "payout could not be reclaimed");
                        return Unwind::PayoutKept;
                    }
                }
                Leg::Pull { ledger, counterparty, amount } => {
                    if let Err(err) = ledger.transfer(pool, counterparty, *amount) {
                        tracing::error!(%counterparty, amount, %err, "refund failed");
                        unwind = Unwind::PullsKept;
                    }
                }
            }
        }
        unwind
    }
}
