//! Reward-swap Rust SDK — integration example
//!
//! Demonstrates: pool creation, liquidity, simulate, swap and reward claims
//! against a throwaway state file.
//!
//! ```bash
//! cargo run -p reward-swap-sdk --example walkthrough
//! ```

use reward_swap::{Address, Direction};
use reward_swap_sdk::{CreatePoolParams, ProvideParams, RemoveParams, SwapClient, SwapParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("pool.json");

    let owner = Address::from("owner");
    let alice = Address::from("alice");
    let bob = Address::from("bob");

    // ─── Create a pool paying LPs 1% of every swap ───────────────────────────

    let (mut client, created) = SwapClient::create(&path, CreatePoolParams {
        owner:           owner.clone(),
        pool_address:    Address::from("pool"),
        reward_rate_bps: 100,
    })?;
    println!("created pool at {} (reward {} bps)", path.display(), created.reward_rate_bps);

    // ─── Seed liquidity ──────────────────────────────────────────────────────

    client.faucet(&alice, 1_000_000)?;
    client.faucet(&bob, 1_000_000)?;
    let seeded = client.provide_liquidity(&alice, ProvideParams {
        amount_a:   100_000,
        amount_b:   Some(400_000),
        min_shares: 0,
    })?;
    println!("alice minted {} shares", seeded.shares_minted);

    // ─── Simulate, then swap ─────────────────────────────────────────────────

    let sim = client.simulate(Direction::AToB, 5_000)?;
    println!(
        "5000 A → {} B  (impact {:.2}%, LP reward {})",
        sim.amount_out, sim.price_impact_pct, sim.fee
    );
    let swap = client.convert(&bob, SwapParams {
        direction:        Direction::AToB,
        amount_in:        5_000,
        max_slippage_bps: 50,
    })?;
    println!("bob received {} B (floor {})", swap.amount_out, swap.min_amount_out);

    // ─── Rewards survive a full exit ─────────────────────────────────────────

    let exit = client.remove_liquidity(&alice, RemoveParams::default())?;
    println!("alice withdrew {} A + {} B", exit.amount_a, exit.amount_b);
    println!("alice pending reward {}", client.my_position(&alice)?.pending_reward);
    let claimed = client.claim_rewards(&alice)?;
    println!("alice claimed {}", claimed.amount);

    // ─── Reopen from disk ────────────────────────────────────────────────────

    drop(client);
    let reopened = SwapClient::open(&path)?;
    println!("{} events recorded", reopened.history().len());
    Ok(())
}
