use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_REWARD_RATE_BPS;

// ─── Identities ────────────────────────────────────────────────────────────
// Opaque account identity shared by the pool, its owner, providers and the
// token ledgers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Address {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which way a swap moves through the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sell asset A, receive asset B.
    AToB,
    /// Sell asset B, receive asset A.
    BToA,
}

impl Direction {
    pub fn input(self) -> Asset {
        match self {
            Direction::AToB => Asset::A,
            Direction::BToA => Asset::B,
        }
    }

    pub fn output(self) -> Asset {
        match self {
            Direction::AToB => Asset::B,
            Direction::BToA => Asset::A,
        }
    }
}

/// One of the two pooled assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    A,
    B,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::A => f.write_str("A"),
            Asset::B => f.write_str("B"),
        }
    }
}

// ─── Pool ──────────────────────────────────────────────────────────────────
// Constant-product pool (x * y = k) plus the reward accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals {
    pub reserve_a: u64,
    pub reserve_b: u64,
    /// Total LP shares outstanding
    pub total_shares: u64,
    /// Cumulative reward earned per LP share, scaled by `SCALE`
    pub acc_reward_per_share: u128,
}

impl PoolTotals {
    pub fn reserve(&self, asset: Asset) -> u64 {
        match asset {
            Asset::A => self.reserve_a,
            Asset::B => self.reserve_b,
        }
    }

    pub(crate) fn reserve_mut(&mut self, asset: Asset) -> &mut u64 {
        match asset {
            Asset::A => &mut self.reserve_a,
            Asset::B => &mut self.reserve_b,
        }
    }

    /// `reserve_a * reserve_b`, the constant-product invariant.
    pub fn k(&self) -> u128 {
        self.reserve_a as u128 * self.reserve_b as u128
    }
}

// ─── Position ──────────────────────────────────────────────────────────────
// Tracks one provider's LP contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// LP shares this position holds
    pub shares: u64,
    /// Accumulator snapshot at last settlement
    pub reward_debt: u128,
    /// Settled but unclaimed reward
    pub pending_reward: u64,
}

impl Position {
    /// Nothing left to track: no shares and nothing to claim.
    pub fn is_empty(&self) -> bool {
        self.shares == 0 && self.pending_reward == 0
    }
}

/// Everything the pool mutates: totals plus the position table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub totals: PoolTotals,
    pub positions: BTreeMap<Address, Position>,
}

impl PoolState {
    pub fn position(&self, owner: &Address) -> Position {
        self.positions.get(owner).copied().unwrap_or_default()
    }

    /// Empty-pool equivalence, share conservation, and no reward debt ahead
    /// of the accumulator.
    pub fn invariants_hold(&self) -> bool {
        let t = &self.totals;
        let empty_shares = t.total_shares == 0;
        let empty_reserves = t.reserve_a == 0 && t.reserve_b == 0;
        let share_sum = self
            .positions
            .values()
            .try_fold(0u64, |sum, p| sum.checked_add(p.shares));
        empty_shares == empty_reserves
            && share_sum == Some(t.total_shares)
            && self
                .positions
                .values()
                .all(|p| p.reward_debt <= t.acc_reward_per_share)
    }

    /// Write a position back, dropping it from the table once it is empty.
    pub(crate) fn store_position(&mut self, owner: &Address, position: Position) {
        if position.is_empty() {
            self.positions.remove(owner);
        } else {
            self.positions.insert(owner.clone(), position);
        }
    }
}

// ─── Config ────────────────────────────────────────────────────────────────
// Externally supplied configuration, read at operation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The only identity allowed to call the administrative surface
    pub owner: Address,
    /// Account that holds the pool's token balances
    pub pool_address: Address,
    pub token_a: Option<Address>,
    pub token_b: Option<Address>,
    pub reward_token: Option<Address>,
    /// Reward taken per swap input, in basis points
    pub reward_rate_bps: u16,
}

impl PoolConfig {
    pub fn new(owner: Address, pool_address: Address) -> Self {
        Self {
            owner,
            pool_address,
            token_a: None,
            token_b: None,
            reward_token: None,
            reward_rate_bps: DEFAULT_REWARD_RATE_BPS,
        }
    }
}
