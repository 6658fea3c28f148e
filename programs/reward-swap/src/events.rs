use serde::{Deserialize, Serialize};

use crate::state::{Address, Asset, Direction};

/// One record per committed pool operation, in commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    LiquidityAdded {
        provider: Address,
        amount_a: u64,
        amount_b: u64,
        shares: u64,
    },
    LiquidityRemoved {
        provider: Address,
        amount_a: u64,
        amount_b: u64,
        shares: u64,
    },
    Swapped {
        trader: Address,
        direction: Direction,
        amount_in: u64,
        amount_out: u64,
        fee: u64,
    },
    RewardsClaimed {
        provider: Address,
        amount: u64,
    },
    RewardRateUpdated {
        reward_rate_bps: u16,
    },
    TokenBound {
        slot: TokenSlot,
        token: Address,
    },
    EmergencyWithdrawal {
        asset: Asset,
        to: Address,
        amount: u64,
    },
}

/// Which collaborator a `TokenBound` record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSlot {
    TokenA,
    TokenB,
    Reward,
}
