//! Property-based tests for pool-wide conservation laws.
//! Random interleavings of deposits, withdrawals, swaps and claims must keep
//! every pool invariant, and failed operations must change nothing.

use proptest::prelude::*;
use reward_swap::{Address, Direction, PoolEvent, TokenLedger};

use crate::common::Harness;

// ============================================================================
// Test Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add { who: usize, a: u64, b: u64 },
    RemoveAll { who: usize },
    RemoveSome { who: usize, shares: u64 },
    Swap { a_to_b: bool, amount: u64 },
    Claim { who: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..3, 1u64..1_000_000, 1u64..1_000_000)
            .prop_map(|(who, a, b)| Op::Add { who, a, b }),
        1 => (0usize..3).prop_map(|who| Op::RemoveAll { who }),
        1 => (0usize..3, 1u64..20_000).prop_map(|(who, shares)| Op::RemoveSome { who, shares }),
        4 => (any::<bool>(), 1u64..500_000).prop_map(|(a_to_b, amount)| Op::Swap { a_to_b, amount }),
        1 => (0usize..3).prop_map(|who| Op::Claim { who }),
    ]
}

fn reward_rate() -> impl Strategy<Value = u16> {
    prop_oneof![Just(0u16), 1u16..=1_000, Just(10_000u16)]
}

const FUNDING: u64 = 1_000_000_000_000;

// ============================================================================
// Conservation Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every invariant holds after every operation, successful or not.
    #[test]
    fn prop_invariants_hold_after_every_operation(
        rate in reward_rate(),
        ops in prop::collection::vec(op(), 1..64),
    ) {
        let h = Harness::new(rate);
        let providers: Vec<Address> =
            ["p0", "p1", "p2"].iter().map(|n| h.account(n, FUNDING)).collect();
        let trader = h.account("trader", FUNDING);

        for op in ops {
            let (_, before) = h.pool.snapshot();
            let outcome = match op {
                Op::Add { who, a, b } => h.pool.add_liquidity(&providers[who], a, b).map(|_| ()),
                Op::RemoveAll { who } => h.pool.remove_liquidity(&providers[who]).map(|_| ()),
                Op::RemoveSome { who, shares } => {
                    h.pool.remove_shares(&providers[who], shares, 0, 0).map(|_| ())
                }
                Op::Swap { a_to_b, amount } => {
                    let direction = if a_to_b { Direction::AToB } else { Direction::BToA };
                    h.pool.swap(&trader, amount, direction, 0).map(|_| ())
                }
                Op::Claim { who } => h.pool.claim_rewards(&providers[who]).map(|_| ()),
            };
            let (_, after) = h.pool.snapshot();

            prop_assert!(after.invariants_hold(), "invariants broken after {:?}: {:?}", op, after);
            prop_assert!(after.totals.acc_reward_per_share >= before.totals.acc_reward_per_share);
            prop_assert!(h.token_a.balance_of(&h.vault) >= after.totals.reserve_a);
            prop_assert!(h.token_b.balance_of(&h.vault) >= after.totals.reserve_b);
            if outcome.is_err() {
                prop_assert_eq!(&after, &before);
            }
            prop_assert!(!h.pool.is_busy());
        }
    }

    /// Swaps never shrink `reserve_a * reserve_b`.
    #[test]
    fn prop_swaps_never_decrease_k(
        seed_a in 1_000u64..10_000_000,
        seed_b in 1_000u64..10_000_000,
        swaps in prop::collection::vec((any::<bool>(), 1u64..5_000_000), 1..48),
    ) {
        let h = Harness::new(30);
        let lp = h.account("lp", FUNDING);
        let trader = h.account("trader", FUNDING);
        h.pool.add_liquidity(&lp, seed_a, seed_b).unwrap();

        for (a_to_b, amount) in swaps {
            let direction = if a_to_b { Direction::AToB } else { Direction::BToA };
            let k_before = h.pool.totals().k();
            let _ = h.pool.swap(&trader, amount, direction, 0);
            prop_assert!(h.pool.totals().k() >= k_before);
        }
    }

    /// Rewards paid plus rewards still pending never exceed fees taken.
    #[test]
    fn prop_rewards_are_never_double_counted(
        rate in 1u16..=10_000,
        ops in prop::collection::vec(op(), 1..64),
    ) {
        let h = Harness::new(rate);
        let providers: Vec<Address> =
            ["p0", "p1", "p2"].iter().map(|n| h.account(n, FUNDING)).collect();
        let trader = h.account("trader", FUNDING);

        for op in ops {
            let _ = match op {
                Op::Add { who, a, b } => h.pool.add_liquidity(&providers[who], a, b).map(|_| ()),
                Op::RemoveAll { who } => h.pool.remove_liquidity(&providers[who]).map(|_| ()),
                Op::RemoveSome { who, shares } => {
                    h.pool.remove_shares(&providers[who], shares, 0, 0).map(|_| ())
                }
                Op::Swap { a_to_b, amount } => {
                    let direction = if a_to_b { Direction::AToB } else { Direction::BToA };
                    h.pool.swap(&trader, amount, direction, 0).map(|_| ())
                }
                Op::Claim { who } => h.pool.claim_rewards(&providers[who]).map(|_| ()),
            };
        }

        let fees: u128 = h
            .pool
            .drain_events()
            .iter()
            .map(|event| match event {
                PoolEvent::Swapped { fee, .. } => *fee as u128,
                _ => 0,
            })
            .sum();
        let pending: u128 = providers
            .iter()
            .map(|p| h.pool.pending_rewards(p).unwrap() as u128)
            .sum();
        prop_assert!(h.reward.total_supply() as u128 + pending <= fees);
    }
}
