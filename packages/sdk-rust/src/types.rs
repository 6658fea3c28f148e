//! Public parameter and result types for [`crate::SwapClient`].
//!
//! Every result type serializes to the JSON the CLI prints with `--json`.

use reward_swap::{Address, Asset, Direction};
use serde::{Deserialize, Serialize};

// ─── Create pool ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreatePoolParams {
    /// Identity allowed to run the admin commands.
    pub owner:           Address,
    /// Account that holds the pool's balances on every ledger.
    pub pool_address:    Address,
    pub reward_rate_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolResult {
    pub owner:           Address,
    pub pool_address:    Address,
    pub token_a:         Address,
    pub token_b:         Address,
    pub reward_token:    Address,
    pub reward_rate_bps: u16,
}

// ─── Faucet ───────────────────────────────────────────────────────────────────

/// Balances of one holder across the pool's three ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub holder:  Address,
    pub token_a: u64,
    pub token_b: u64,
    pub reward:  u64,
}

// ─── Provide liquidity ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProvideParams {
    pub amount_a:   u64,
    /// `None` deposits B in proportion to the live reserves.
    pub amount_b:   Option<u64>,
    /// Refuse the deposit if fewer shares would be minted.
    pub min_shares: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvideResult {
    pub provider:      Address,
    pub amount_a:      u64,
    pub amount_b:      u64,
    pub shares_minted: u64,
    pub total_shares:  u64,
}

// ─── Remove liquidity ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RemoveParams {
    /// `None` burns the whole position.
    pub shares: Option<u64>,
    pub min_a:  u64,
    pub min_b:  u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResult {
    pub provider:      Address,
    pub amount_a:      u64,
    pub amount_b:      u64,
    pub shares_burned: u64,
    pub shares_left:   u64,
}

// ─── Swap ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SwapParams {
    pub direction:        Direction,
    pub amount_in:        u64,
    /// Tolerated shortfall against the simulated output. `0` disables the floor.
    pub max_slippage_bps: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResult {
    pub trader:         Address,
    pub direction:      Direction,
    pub amount_in:      u64,
    pub estimated_out:  u64,
    pub min_amount_out: u64,
    pub amount_out:     u64,
    /// Reward credited to LPs by this swap.
    pub reward_fee:     u64,
}

// ─── Rewards ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResult {
    pub provider: Address,
    pub amount:   u64,
}

// ─── Admin ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyWithdrawResult {
    pub asset:  Asset,
    pub to:     Address,
    pub amount: u64,
}

// ─── Queries ──────────────────────────────────────────────────────────────────

/// Pool configuration plus live reserves and spot price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    pub owner:                Address,
    pub pool_address:         Address,
    pub token_a:              Option<Address>,
    pub token_b:              Option<Address>,
    pub reward_token:         Option<Address>,
    pub reserve_a:            u64,
    pub reserve_b:            u64,
    pub total_shares:         u64,
    pub reward_rate_bps:      u16,
    pub acc_reward_per_share: u128,
    /// B per A at the current reserves.
    pub spot_price:           f64,
    /// Positions holding at least one share.
    pub providers:            usize,
}

/// One provider's position with redeemable amounts and rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    pub provider:       Address,
    pub shares:         u64,
    /// Share of the pool, in percent.
    pub pool_share_pct: f64,
    /// What burning every share would return right now.
    pub redeemable_a:   u64,
    pub redeemable_b:   u64,
    pub pending_reward: u64,
    /// Reward tokens already claimed to the provider's wallet.
    pub reward_balance: u64,
}
