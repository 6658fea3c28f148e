//! [`Pool`] — the orchestrator every caller goes through.
//!
//! Each mutating operation runs the same sequence:
//!   1. take the transaction guard (refuses reentrant calls)
//!   2. check configuration and preconditions
//!   3. settle and mutate pool state in one step
//!   4. call out to the token ledgers
//!   5. on a failed call, compensate completed transfers and restore the
//!      pre-call state; otherwise record an event
//!
//! If a payout cannot be reclaimed during compensation the mutated state is
//! kept and [`PoolError::PayoutNotReclaimed`] is returned, so the books
//! never claim tokens the pool account no longer holds.
//!
//! The guard is released when the operation returns, whichever way it does.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    error::{PoolError, Result},
    events::{PoolEvent, TokenSlot},
    guard::{GuardState, TransactionGuard},
    instructions::{
        claim_rewards, configure, provide_liquidity,
        remove_liquidity::{self, Burn, Withdrawal},
        reserve_math, swap, SwapPreview,
    },
    ledger::{RewardToken, TokenLedger, TransferError, TransferJournal, Unwind},
    state::{Address, Asset, Direction, PoolConfig, PoolState, PoolTotals, Position},
};

/// Ledger handles the pool calls out to.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub token_a: Option<Rc<dyn TokenLedger>>,
    pub token_b: Option<Rc<dyn TokenLedger>>,
    pub reward_token: Option<Rc<dyn RewardToken>>,
}

impl Collaborators {
    fn token(&self, asset: Asset) -> Result<Rc<dyn TokenLedger>> {
        let (slot, name) = match asset {
            Asset::A => (&self.token_a, "token A"),
            Asset::B => (&self.token_b, "token B"),
        };
        slot.clone().ok_or(PoolError::InvalidConfiguration(name))
    }

    fn pair(&self) -> Result<(Rc<dyn TokenLedger>, Rc<dyn TokenLedger>)> {
        Ok((self.token(Asset::A)?, self.token(Asset::B)?))
    }

    fn reward(&self) -> Result<Rc<dyn RewardToken>> {
        self.reward_token
            .clone()
            .ok_or(PoolError::InvalidConfiguration("reward token"))
    }
}

/// Read-only summary of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub config: PoolConfig,
    pub totals: PoolTotals,
    pub providers: usize,
}

pub struct Pool {
    guard: TransactionGuard,
    config: RefCell<PoolConfig>,
    state: RefCell<PoolState>,
    collaborators: RefCell<Collaborators>,
    events: RefCell<Vec<PoolEvent>>,
}

impl Pool {
    /// An empty pool with no ledgers bound yet.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            guard: TransactionGuard::new(),
            config: RefCell::new(config),
            state: RefCell::new(PoolState::default()),
            collaborators: RefCell::new(Collaborators::default()),
            events: RefCell::new(Vec::new()),
        }
    }

    /// Rebuild a pool from persisted parts. Every bound collaborator must be
    /// the one the config names, and the state must satisfy the pool
    /// invariants.
    pub fn restore(config: PoolConfig, state: PoolState, collaborators: Collaborators) -> Result<Self> {
        let bound_a = collaborators.token_a.as_ref().map(|l| l.address());
        let bound_b = collaborators.token_b.as_ref().map(|l| l.address());
        let bound_reward = collaborators.reward_token.as_ref().map(|r| r.address());
        if bound_a.is_some() && bound_a != config.token_a {
            return Err(PoolError::InvalidConfiguration("token A"));
        }
        if bound_b.is_some() && bound_b != config.token_b {
            return Err(PoolError::InvalidConfiguration("token B"));
        }
        if bound_reward.is_some() && bound_reward != config.reward_token {
            return Err(PoolError::InvalidConfiguration("reward token"));
        }
        if !state.invariants_hold() {
            return Err(PoolError::InvalidConfiguration("pool state"));
        }
        let pool = Self::new(config);
        *pool.state.borrow_mut() = state;
        *pool.collaborators.borrow_mut() = collaborators;
        Ok(pool)
    }

    // ── Liquidity ─────────────────────────────────────────────────────────────

    /// Deposit both assets and receive LP shares.
    pub fn add_liquidity(&self, provider: &Address, amount_a: u64, amount_b: u64) -> Result<u64> {
        self.add_liquidity_with_min(provider, amount_a, amount_b, 0)
    }

    /// As [`Pool::add_liquidity`], refusing to mint fewer than `min_shares`.
    pub fn add_liquidity_with_min(
        &self,
        provider: &Address,
        amount_a: u64,
        amount_b: u64,
        min_shares: u64,
    ) -> Result<u64> {
        let _guard = self.guard.enter()?;
        let (ledger_a, ledger_b) = self.collaborators.borrow().pair()?;

        let shares = self.transact(
            provider,
            |state| provide_liquidity::handler(state, provider, amount_a, amount_b, min_shares),
            |journal, _| {
                journal.pull(&ledger_a, provider, amount_a)?;
                journal.pull(&ledger_b, provider, amount_b)
            },
        )?;

        tracing::info!(%provider, shares, amount_a, amount_b, "liquidity added");
        self.emit(PoolEvent::LiquidityAdded {
            provider: provider.clone(),
            amount_a,
            amount_b,
            shares,
        });
        Ok(shares)
    }

    /// Burn every share `provider` holds and withdraw the proportional reserves.
    pub fn remove_liquidity(&self, provider: &Address) -> Result<(u64, u64)> {
        self.burn(provider, Burn::All, 0, 0)
    }

    /// Burn `shares` of `provider`'s position, refusing outputs below the floors.
    pub fn remove_shares(&self, provider: &Address, shares: u64, min_a: u64, min_b: u64) -> Result<(u64, u64)> {
        self.burn(provider, Burn::Exact(shares), min_a, min_b)
    }

    fn burn(&self, provider: &Address, burn: Burn, min_a: u64, min_b: u64) -> Result<(u64, u64)> {
        let _guard = self.guard.enter()?;
        let (ledger_a, ledger_b) = self.collaborators.borrow().pair()?;

        let Withdrawal { shares, amount_a, amount_b } = self.transact(
            provider,
            |state| remove_liquidity::handler(state, provider, burn, min_a, min_b),
            |journal, out| {
                journal.push(&ledger_a, provider, out.amount_a)?;
                journal.push(&ledger_b, provider, out.amount_b)
            },
        )?;

        tracing::info!(%provider, shares, amount_a, amount_b, "liquidity removed");
        self.emit(PoolEvent::LiquidityRemoved {
            provider: provider.clone(),
            amount_a,
            amount_b,
            shares,
        });
        Ok((amount_a, amount_b))
    }

    // ── Trading ───────────────────────────────────────────────────────────────

    /// Sell `amount_in` of the input asset for at least `min_amount_out` of the other.
    pub fn swap(
        &self,
        trader: &Address,
        amount_in: u64,
        direction: Direction,
        min_amount_out: u64,
    ) -> Result<u64> {
        let _guard = self.guard.enter()?;
        let (ledger_in, ledger_out) = {
            let collaborators = self.collaborators.borrow();
            (
                collaborators.token(direction.input())?,
                collaborators.token(direction.output())?,
            )
        };
        let reward_rate_bps = self.config.borrow().reward_rate_bps;

        let outcome = self.transact(
            trader,
            |state| swap::handler(&mut state.totals, amount_in, direction, min_amount_out, reward_rate_bps),
            |journal, outcome| {
                journal.pull(&ledger_in, trader, amount_in)?;
                journal.push(&ledger_out, trader, outcome.amount_out)
            },
        )?;

        tracing::info!(
            %trader,
            ?direction,
            amount_in,
            amount_out = outcome.amount_out,
            fee = outcome.fee,
            "swap"
        );
        self.emit(PoolEvent::Swapped {
            trader: trader.clone(),
            direction,
            amount_in,
            amount_out: outcome.amount_out,
            fee: outcome.fee,
        });
        Ok(outcome.amount_out)
    }

    // ── Rewards ───────────────────────────────────────────────────────────────

    /// Settle and mint every pending reward to `provider`.
    pub fn claim_rewards(&self, provider: &Address) -> Result<u64> {
        let _guard = self.guard.enter()?;
        let reward = self.collaborators.borrow().reward()?;

        let amount = self.transact(
            provider,
            |state| claim_rewards::handler(state, provider),
            |_, &amount| reward.mint(provider, amount),
        )?;

        tracing::info!(%provider, amount, "rewards claimed");
        self.emit(PoolEvent::RewardsClaimed {
            provider: provider.clone(),
            amount,
        });
        Ok(amount)
    }

    // ── Administration ────────────────────────────────────────────────────────

    pub fn set_token_a(&self, caller: &Address, ledger: Rc<dyn TokenLedger>) -> Result<()> {
        self.bind_token(caller, Asset::A, ledger)
    }

    pub fn set_token_b(&self, caller: &Address, ledger: Rc<dyn TokenLedger>) -> Result<()> {
        self.bind_token(caller, Asset::B, ledger)
    }

    fn bind_token(&self, caller: &Address, asset: Asset, ledger: Rc<dyn TokenLedger>) -> Result<()> {
        let _guard = self.guard.enter()?;
        configure::authorize(&self.config.borrow(), caller)?;

        let token = ledger.address();
        let slot = {
            let mut config = self.config.borrow_mut();
            let mut collaborators = self.collaborators.borrow_mut();
            match asset {
                Asset::A => {
                    config.token_a = Some(token.clone());
                    collaborators.token_a = Some(ledger);
                    TokenSlot::TokenA
                }
                Asset::B => {
                    config.token_b = Some(token.clone());
                    collaborators.token_b = Some(ledger);
                    TokenSlot::TokenB
                }
            }
        };

        tracing::info!(%token, ?slot, "token bound");
        self.emit(PoolEvent::TokenBound { slot, token });
        Ok(())
    }

    pub fn set_reward_token(&self, caller: &Address, token: Rc<dyn RewardToken>) -> Result<()> {
        let _guard = self.guard.enter()?;
        configure::authorize(&self.config.borrow(), caller)?;

        let address = token.address();
        self.config.borrow_mut().reward_token = Some(address.clone());
        self.collaborators.borrow_mut().reward_token = Some(token);

        tracing::info!(token = %address, "reward token bound");
        self.emit(PoolEvent::TokenBound {
            slot: TokenSlot::Reward,
            token: address,
        });
        Ok(())
    }

    pub fn set_reward_rate_bps(&self, caller: &Address, reward_rate_bps: u16) -> Result<()> {
        let _guard = self.guard.enter()?;
        configure::set_reward_rate(&mut self.config.borrow_mut(), caller, reward_rate_bps)?;

        tracing::info!(reward_rate_bps, "reward rate updated");
        self.emit(PoolEvent::RewardRateUpdated { reward_rate_bps });
        Ok(())
    }

    /// Sweep tokens the pool holds beyond its tracked reserve to the owner.
    /// Reserves themselves are never touched.
    pub fn emergency_withdraw(&self, caller: &Address, asset: Asset, amount: u64) -> Result<()> {
        let _guard = self.guard.enter()?;
        let config = self.config.borrow().clone();
        configure::authorize(&config, caller)?;
        let ledger = self.collaborators.borrow().token(asset)?;
        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }

        let reserve = self.state.borrow().totals.reserve(asset);
        let surplus = ledger.balance_of(&config.pool_address).saturating_sub(reserve);
        if amount > surplus {
            return Err(PoolError::InsufficientLiquidity);
        }
        ledger.transfer(&config.pool_address, &config.owner, amount)?;

        tracing::warn!(%asset, amount, to = %config.owner, "emergency withdrawal");
        self.emit(PoolEvent::EmergencyWithdrawal {
            asset,
            to: config.owner,
            amount,
        });
        Ok(())
    }

    // ── Queries (never guarded) ───────────────────────────────────────────────
    // Called from inside a collaborator callback, these see the in-flight
    // state of the running operation, which may still be rolled back.

    /// Output a swap of `amount_in` would receive right now.
    pub fn quote(&self, amount_in: u64, direction: Direction) -> Result<u64> {
        let totals = self.state.borrow().totals;
        reserve_math::quote(
            totals.reserve(direction.input()),
            totals.reserve(direction.output()),
            amount_in,
        )
    }

    pub fn simulate_swap(&self, amount_in: u64, direction: Direction) -> Result<SwapPreview> {
        let totals = self.state.borrow().totals;
        swap::preview(&totals, amount_in, direction, self.config.borrow().reward_rate_bps)
    }

    /// Reward `provider` could claim right now.
    pub fn pending_rewards(&self, provider: &Address) -> Result<u64> {
        claim_rewards::pending(&self.state.borrow(), provider)
    }

    pub fn position(&self, provider: &Address) -> Position {
        self.state.borrow().position(provider)
    }

    pub fn totals(&self) -> PoolTotals {
        self.state.borrow().totals
    }

    pub fn config(&self) -> PoolConfig {
        self.config.borrow().clone()
    }

    pub fn info(&self) -> PoolInfo {
        let state = self.state.borrow();
        PoolInfo {
            config: self.config(),
            totals: state.totals,
            providers: state.positions.values().filter(|p| p.shares > 0).count(),
        }
    }

    /// Copy of everything needed to [`Pool::restore`] this pool.
    pub fn snapshot(&self) -> (PoolConfig, PoolState) {
        (self.config(), self.state.borrow().clone())
    }

    /// True while a guarded operation is running.
    pub fn is_busy(&self) -> bool {
        self.guard.state() == GuardState::InProgress
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&self) -> Vec<PoolEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn emit(&self, event: PoolEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Mutate state, then run the collaborator calls. If a call fails the
    /// completed legs are compensated and the totals plus `affected`'s
    /// position are put back as they were, unless a payout could not be
    /// reclaimed: then the mutated state stands, since it is the only one
    /// the pool's balances still cover. No `RefCell` borrow is held while
    /// collaborators run.
    fn transact<T>(
        &self,
        affected: &Address,
        mutate: impl FnOnce(&mut PoolState) -> Result<T>,
        interact: impl FnOnce(&mut TransferJournal<'_>, &T) -> std::result::Result<(), TransferError>,
    ) -> Result<T> {
        let pool_address = self.config.borrow().pool_address.clone();
        let (totals, position) = {
            let state = self.state.borrow();
            (state.totals, state.positions.get(affected).copied())
        };

        let outcome = mutate(&mut *self.state.borrow_mut())?;

        let mut journal = TransferJournal::new(&pool_address);
        if let Err(err) = interact(&mut journal, &outcome) {
            let unwind = journal.compensate();
            if unwind == Unwind::PayoutKept {
                tracing::error!(%affected, %err, "payout stranded; operation left committed");
                return Err(PoolError::PayoutNotReclaimed(err));
            }

            let mut state = self.state.borrow_mut();
            state.totals = totals;
            match position {
                Some(position) => {
                    state.positions.insert(affected.clone(), position);
                }
                None => {
                    state.positions.remove(affected);
                }
            }
            tracing::warn!(%affected, %err, "collaborator call failed; pool state rolled back");
            return Err(match unwind {
                Unwind::PullsKept => PoolError::RefundIncomplete(err),
                _ => err.into(),
            });
        }
        Ok(outcome)
    }
}
