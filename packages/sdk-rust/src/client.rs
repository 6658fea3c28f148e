//! [`SwapClient`] — the main entry point for host integrations.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use reward_swap::{
    Address, Asset, Collaborators, Direction, MemoryLedger, Pool, PoolConfig, PoolError,
    PoolEvent, SwapPreview, TokenLedger,
};

use crate::{
    error::{Error, Result},
    math::{compute_amount_b, min_amount_out, pending_reward, pool_share_pct, redeemable, spot_price},
    state::{PoolSnapshot, REWARD_TOKEN_ADDRESS, SNAPSHOT_VERSION, TOKEN_A_ADDRESS, TOKEN_B_ADDRESS},
    types::{
        Balances, ClaimResult, CreatePoolParams, CreatePoolResult, EmergencyWithdrawResult,
        PoolInfo, PositionInfo, ProvideParams, ProvideResult, RemoveParams, RemoveResult,
        SwapParams, SwapResult,
    },
};

// ─── Client ───────────────────────────────────────────────────────────────────

/// File-backed reward-swap client.
///
/// Each successful write operation is committed to the state file before it
/// returns; a refused operation leaves both the pool and the file untouched.
///
/// ```rust,no_run
/// # use reward_swap::{Address, Direction};
/// # use reward_swap_sdk::{SwapClient, SwapParams};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = SwapClient::open("pool.json")?;
/// let result = client.convert(&Address::from("alice"), SwapParams {
///     direction:        Direction::AToB,
///     amount_in:        1_000,
///     max_slippage_bps: 50,
/// })?;
/// println!("received {}", result.amount_out);
/// # Ok(())
/// # }
/// ```
pub struct SwapClient {
    path:    PathBuf,
    pool:    Pool,
    token_a: Rc<MemoryLedger>,
    token_b: Rc<MemoryLedger>,
    reward:  Rc<MemoryLedger>,
    history: Vec<PoolEvent>,
}

impl SwapClient {
    /// Create a new pool with fresh ledgers and write it to `path`.
    ///
    /// Refuses to overwrite an existing state file.
    pub fn create(path: impl Into<PathBuf>, params: CreatePoolParams) -> Result<(Self, CreatePoolResult)> {
        let path = path.into();
        if path.exists() {
            return Err(Error::StateExists(path.display().to_string()));
        }

        let token_a = Rc::new(MemoryLedger::new(TOKEN_A_ADDRESS));
        let token_b = Rc::new(MemoryLedger::new(TOKEN_B_ADDRESS));
        let reward  = Rc::new(MemoryLedger::new(REWARD_TOKEN_ADDRESS));

        let owner = &params.owner;
        let pool = Pool::new(PoolConfig::new(owner.clone(), params.pool_address.clone()));
        pool.set_token_a(owner, token_a.clone())?;
        pool.set_token_b(owner, token_b.clone())?;
        pool.set_reward_token(owner, reward.clone())?;
        pool.set_reward_rate_bps(owner, params.reward_rate_bps)?;

        let mut client = Self { path, pool, token_a, token_b, reward, history: Vec::new() };
        client.commit()?;
        tracing::info!(path = %client.path.display(), %owner, "pool created");

        Ok((client, CreatePoolResult {
            owner:           params.owner,
            pool_address:    params.pool_address,
            token_a:         Address::from(TOKEN_A_ADDRESS),
            token_b:         Address::from(TOKEN_B_ADDRESS),
            reward_token:    Address::from(REWARD_TOKEN_ADDRESS),
            reward_rate_bps: params.reward_rate_bps,
        }))
    }

    /// Load the pool stored at `path` and re-bind its ledgers.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = PoolSnapshot::load(&path)?;

        let token_a = Rc::new(MemoryLedger::from_book(snapshot.token_a));
        let token_b = Rc::new(MemoryLedger::from_book(snapshot.token_b));
        let reward  = Rc::new(MemoryLedger::from_book(snapshot.reward));
        let collaborators = Collaborators {
            token_a:      Some(token_a.clone()),
            token_b:      Some(token_b.clone()),
            reward_token: Some(reward.clone()),
        };
        let pool = Pool::restore(snapshot.config, snapshot.state, collaborators)?;

        Ok(Self { path, pool, token_a, token_b, reward, history: snapshot.events })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live pool, for callers that need the raw engine.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    // ── Wallet operations ─────────────────────────────────────────────────────

    /// Mint `amount` of both pool tokens to `holder` and approve the pool to
    /// pull them.
    pub fn faucet(&mut self, holder: &Address, amount: u64) -> Result<Balances> {
        let pool_address = self.pool.config().pool_address;
        for ledger in [&self.token_a, &self.token_b] {
            ledger.credit(holder, amount)?;
            ledger.approve(holder, &pool_address, u64::MAX);
        }
        self.commit()?;
        tracing::info!(%holder, amount, "faucet");
        Ok(self.balances(holder))
    }

    /// Plain ledger transfer of one pool asset; the pool's books are not
    /// involved.
    pub fn send(&mut self, from: &Address, to: &Address, asset: Asset, amount: u64) -> Result<Balances> {
        if amount == 0 {
            return Err(Error::InvalidArgument("amount must be greater than zero".into()));
        }
        self.ledger(asset).transfer(from, to, amount)?;
        self.commit()?;
        tracing::info!(%from, %to, %asset, amount, "send");
        Ok(self.balances(from))
    }

    pub fn balances(&self, holder: &Address) -> Balances {
        Balances {
            holder:  holder.clone(),
            token_a: self.token_a.balance_of(holder),
            token_b: self.token_b.balance_of(holder),
            reward:  self.reward.balance_of(holder),
        }
    }

    // ── Write operations ──────────────────────────────────────────────────────

    /// Deposit both assets and receive LP shares.
    ///
    /// If `params.amount_b` is `None` the client computes the proportional
    /// amount from live reserves; `Some(n)` overrides.
    pub fn provide_liquidity(&mut self, provider: &Address, params: ProvideParams) -> Result<ProvideResult> {
        let amount_b = compute_amount_b(&self.pool.totals(), params.amount_a, params.amount_b)?;
        let minted = self
            .pool
            .add_liquidity_with_min(provider, params.amount_a, amount_b, params.min_shares);
        let shares_minted = self.finish(minted)?;

        Ok(ProvideResult {
            provider:     provider.clone(),
            amount_a:     params.amount_a,
            amount_b,
            shares_minted,
            total_shares: self.pool.totals().total_shares,
        })
    }

    /// Burn some or all of a position.
    pub fn remove_liquidity(&mut self, provider: &Address, params: RemoveParams) -> Result<RemoveResult> {
        let held = self.pool.position(provider).shares;
        let removed = match params.shares {
            None if params.min_a == 0 && params.min_b == 0 => self.pool.remove_liquidity(provider),
            None => self.pool.remove_shares(provider, held, params.min_a, params.min_b),
            Some(shares) => self.pool.remove_shares(provider, shares, params.min_a, params.min_b),
        };
        let (amount_a, amount_b) = self.finish(removed)?;

        let shares_left = self.pool.position(provider).shares;
        Ok(RemoveResult {
            provider:      provider.clone(),
            amount_a,
            amount_b,
            shares_burned: held - shares_left,
            shares_left,
        })
    }

    /// Swap one pool asset for the other.
    ///
    /// The output floor is the simulated output less `max_slippage_bps`.
    /// Pass `max_slippage_bps = 0` to disable the slippage guard.
    pub fn convert(&mut self, trader: &Address, params: SwapParams) -> Result<SwapResult> {
        let sim = self.simulate(params.direction, params.amount_in)?;
        let min_out = min_amount_out(sim.amount_out, params.max_slippage_bps);

        let swapped = self.pool.swap(trader, params.amount_in, params.direction, min_out);
        let amount_out = self.finish(swapped)?;

        Ok(SwapResult {
            trader:         trader.clone(),
            direction:      params.direction,
            amount_in:      params.amount_in,
            estimated_out:  sim.amount_out,
            min_amount_out: min_out,
            amount_out,
            reward_fee:     sim.fee,
        })
    }

    /// Mint every settled reward to `provider`.
    pub fn claim_rewards(&mut self, provider: &Address) -> Result<ClaimResult> {
        let claimed = self.pool.claim_rewards(provider);
        let amount = self.finish(claimed)?;
        Ok(ClaimResult { provider: provider.clone(), amount })
    }

    // ── Admin operations ──────────────────────────────────────────────────────

    pub fn set_reward_rate(&mut self, caller: &Address, reward_rate_bps: u16) -> Result<PoolInfo> {
        self.pool.set_reward_rate_bps(caller, reward_rate_bps)?;
        self.commit()?;
        Ok(self.pool_info())
    }

    /// Sweep tokens held by the pool above its reserve to the owner.
    pub fn emergency_withdraw(
        &mut self,
        caller: &Address,
        asset:  Asset,
        amount: u64,
    ) -> Result<EmergencyWithdrawResult> {
        self.pool.emergency_withdraw(caller, asset, amount)?;
        self.commit()?;
        Ok(EmergencyWithdrawResult { asset, to: self.pool.config().owner, amount })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Simulate a swap without executing it.
    pub fn simulate(&self, direction: Direction, amount_in: u64) -> Result<SwapPreview> {
        let totals = self.pool.totals();
        if totals.total_shares == 0 {
            return Err(Error::NoLiquidity);
        }
        Ok(self.pool.simulate_swap(amount_in, direction)?)
    }

    /// Pool configuration plus current reserves and spot price.
    pub fn pool_info(&self) -> PoolInfo {
        let info = self.pool.info();
        PoolInfo {
            owner:                info.config.owner,
            pool_address:         info.config.pool_address,
            token_a:              info.config.token_a,
            token_b:              info.config.token_b,
            reward_token:         info.config.reward_token,
            reserve_a:            info.totals.reserve_a,
            reserve_b:            info.totals.reserve_b,
            total_shares:         info.totals.total_shares,
            reward_rate_bps:      info.config.reward_rate_bps,
            acc_reward_per_share: info.totals.acc_reward_per_share,
            spot_price:           spot_price(&info.totals),
            providers:            info.providers,
        }
    }

    /// `provider`'s position with redeemable amounts and pending reward.
    pub fn my_position(&self, provider: &Address) -> Result<PositionInfo> {
        let totals = self.pool.totals();
        let position = self.pool.position(provider);
        let (redeemable_a, redeemable_b) = redeemable(&totals, position.shares)?;

        Ok(PositionInfo {
            provider:       provider.clone(),
            shares:         position.shares,
            pool_share_pct: pool_share_pct(&totals, position.shares),
            redeemable_a,
            redeemable_b,
            pending_reward: pending_reward(&position, &totals)?,
            reward_balance: self.reward.balance_of(provider),
        })
    }

    /// Every committed operation, oldest first.
    pub fn history(&self) -> &[PoolEvent] {
        &self.history
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ledger(&self, asset: Asset) -> &MemoryLedger {
        match asset {
            Asset::A => &*self.token_a,
            Asset::B => &*self.token_b,
        }
    }

    /// Commit after a pool operation. A failure that still moved tokens is
    /// written to the state file before it is returned.
    fn finish<T>(&mut self, outcome: std::result::Result<T, PoolError>) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err @ (PoolError::PayoutNotReclaimed(_) | PoolError::RefundIncomplete(_))) => {
                self.commit()?;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Move drained events into the history and write the state file.
    fn commit(&mut self) -> Result<()> {
        self.history.extend(self.pool.drain_events());
        let (config, state) = self.pool.snapshot();
        PoolSnapshot {
            version: SNAPSHOT_VERSION,
            config,
            state,
            token_a: self.token_a.book(),
            token_b: self.token_b.book(),
            reward:  self.reward.book(),
            events:  self.history.clone(),
        }
        .save(&self.path)
    }
}
