//! Property-based tests for pricing and share minting arithmetic.

use proptest::prelude::*;
use reward_swap::instructions::{isqrt, quote, reward_per_share_delta, settle};
use reward_swap::{Position, SCALE};

use crate::common::Harness;

proptest! {
    /// Output is floored constant product and never drains the output side.
    #[test]
    fn prop_quote_never_drains_and_keeps_k(
        reserve_in in 1u64..u64::MAX / 4,
        reserve_out in 1u64..u64::MAX / 4,
        amount_in in 1u64..u64::MAX / 4,
    ) {
        let out = quote(reserve_in, reserve_out, amount_in).unwrap();
        prop_assert!(out < reserve_out);
        let k_before = reserve_in as u128 * reserve_out as u128;
        let k_after = (reserve_in as u128 + amount_in as u128) * (reserve_out - out) as u128;
        prop_assert!(k_after >= k_before);
    }

    /// isqrt is the floor square root.
    #[test]
    fn prop_isqrt_is_floor(a in any::<u64>(), b in any::<u64>()) {
        let n = a as u128 * b as u128;
        let s = isqrt(n);
        prop_assert!(s * s <= n);
        prop_assert!((s + 1).checked_mul(s + 1).map_or(true, |sq| sq > n));
    }

    /// Settling twice with no new fees adds nothing.
    #[test]
    fn prop_settle_is_idempotent(
        shares in any::<u64>(),
        fee in 0u64..1_000_000_000,
        total in 1u64..1_000_000_000,
    ) {
        let acc = reward_per_share_delta(fee, total).unwrap();
        let position = Position { shares: shares.min(total), reward_debt: 0, pending_reward: 0 };
        let once = settle(&position, acc).unwrap();
        let twice = settle(&once, acc).unwrap();
        prop_assert_eq!(once, twice);
        prop_assert!(once.pending_reward as u128 <= fee as u128);
        prop_assert!(acc <= fee as u128 * SCALE);
    }

    /// A sole provider gets back at most what they put in, and the pool empties.
    #[test]
    fn prop_sole_provider_round_trip(a in 1u64..1_000_000_000_000, b in 1u64..1_000_000_000_000) {
        let h = Harness::new(30);
        let lp = h.account("lp", 1_000_000_000_000);
        if h.pool.add_liquidity(&lp, a, b).is_ok() {
            let (out_a, out_b) = h.pool.remove_liquidity(&lp).unwrap();
            prop_assert!(out_a <= a && out_b <= b);
            let totals = h.pool.totals();
            prop_assert_eq!((totals.reserve_a, totals.reserve_b, totals.total_shares), (0, 0, 0));
        }
    }
}
