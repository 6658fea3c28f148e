//! reward-swap — constant-product pool that pays its liquidity providers a
//! per-trade reward.
//!
//! Operations on [`Pool`]:
//!   add_liquidity     — deposit both assets, receive LP shares
//!   remove_liquidity  — burn every share, withdraw proportional reserves
//!   remove_shares     — burn part of a position with output floors
//!   swap              — x * y = k trade with a caller-supplied minimum output
//!   claim_rewards     — settle and mint accrued LP rewards
//!
//! Owner-only: set_token_a / set_token_b / set_reward_token,
//! set_reward_rate_bps, emergency_withdraw.
//!
//! Every mutating operation holds a [`TransactionGuard`] for its whole run,
//! including the calls out to the token ledgers, so a ledger that calls back
//! into the pool is refused with [`PoolError::ReentrancyDetected`].
//!
//! ```
//! use std::rc::Rc;
//! use reward_swap::{Address, Direction, MemoryLedger, Pool, PoolConfig};
//!
//! let owner = Address::from("owner");
//! let vault = Address::from("pool");
//! let alice = Address::from("alice");
//!
//! let token_a = Rc::new(MemoryLedger::new("token-a"));
//! let token_b = Rc::new(MemoryLedger::new("token-b"));
//! for token in [&token_a, &token_b] {
//!     token.credit(&alice, 10_000).unwrap();
//!     token.approve(&alice, &vault, u64::MAX);
//! }
//!
//! let pool = Pool::new(PoolConfig::new(owner.clone(), vault));
//! pool.set_token_a(&owner, token_a.clone()).unwrap();
//! pool.set_token_b(&owner, token_b.clone()).unwrap();
//!
//! assert_eq!(pool.add_liquidity(&alice, 1_000, 1_000).unwrap(), 1_000);
//! assert_eq!(pool.swap(&alice, 100, Direction::AToB, 90).unwrap(), 90);
//! ```

pub mod constants;
pub mod error;
pub mod events;
pub mod guard;
pub mod instructions;
pub mod ledger;
pub mod memory;
pub mod pool;
pub mod state;

pub use constants::*;
pub use error::{PoolError, Result};
pub use events::{PoolEvent, TokenSlot};
pub use guard::{GuardState, TransactionGuard};
pub use instructions::{SwapOutcome, SwapPreview};
pub use ledger::{RewardToken, TokenLedger, TransferError};
pub use memory::{LedgerBook, LedgerCall, MemoryLedger, TransferHook};
pub use pool::{Collaborators, Pool, PoolInfo};
pub use state::*;
