//! Reward-swap Rust SDK
//!
//! File-backed client for a reward-paying constant-product pool.
//! A host opens a pool state file, runs operations against it, and every
//! successful operation is written back atomically.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use reward_swap::{Address, Direction};
//! use reward_swap_sdk::{CreatePoolParams, ProvideParams, SwapClient, SwapParams};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let owner = Address::from("owner");
//!     let (mut client, _) = SwapClient::create("pool.json", CreatePoolParams {
//!         owner:           owner.clone(),
//!         pool_address:    Address::from("pool"),
//!         reward_rate_bps: 30,
//!     })?;
//!
//!     let alice = Address::from("alice");
//!     client.faucet(&alice, 1_000_000)?;
//!     client.provide_liquidity(&alice, ProvideParams {
//!         amount_a: 100_000, amount_b: Some(100_000), min_shares: 0,
//!     })?;
//!
//!     // 1. Simulate first to check the trade
//!     let sim = client.simulate(Direction::AToB, 1_000)?;
//!     println!("Estimated out: {}  price_impact: {:.2}%", sim.amount_out, sim.price_impact_pct);
//!
//!     // 2. Execute with 0.5% max slippage
//!     let result = client.convert(&alice, SwapParams {
//!         direction:        Direction::AToB,
//!         amount_in:        1_000,
//!         max_slippage_bps: 50,
//!     })?;
//!     println!("Swapped! received {}", result.amount_out);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`SwapClient::create`] | Create a new pool state file |
//! | [`SwapClient::faucet`] | Mint test tokens and approve the pool |
//! | [`SwapClient::provide_liquidity`] | Deposit tokens, receive LP shares |
//! | [`SwapClient::remove_liquidity`] | Burn shares, withdraw reserves |
//! | [`SwapClient::convert`] | Swap with a slippage tolerance |
//! | [`SwapClient::simulate`] | Fee and price-impact breakdown |
//! | [`SwapClient::claim_rewards`] | Mint accrued LP rewards |
//! | [`SwapClient::pool_info`] | Reserves, spot price, reward rate |
//! | [`SwapClient::my_position`] | Shares, redeemable amounts, pending reward |

pub mod client;
pub mod error;
pub mod math;
pub mod state;
pub mod types;

pub use client::SwapClient;
pub use error::{Error, Result};
pub use state::PoolSnapshot;
pub use types::*;
