//! Shared fixtures: a pool wired to three in-memory ledgers.

#![allow(dead_code)]

use std::rc::Rc;

use reward_swap::{Address, MemoryLedger, Pool, PoolConfig, TokenLedger};

pub struct Harness {
    pub pool: Rc<Pool>,
    pub token_a: Rc<MemoryLedger>,
    pub token_b: Rc<MemoryLedger>,
    pub reward: Rc<MemoryLedger>,
    pub owner: Address,
    pub vault: Address,
}

impl Harness {
    pub fn new(reward_rate_bps: u16) -> Self {
        let owner = Address::from("owner");
        let vault = Address::from("pool");
        let token_a = Rc::new(MemoryLedger::new("token-a"));
        let token_b = Rc::new(MemoryLedger::new("token-b"));
        let reward = Rc::new(MemoryLedger::new("reward"));

        let pool = Rc::new(Pool::new(PoolConfig::new(owner.clone(), vault.clone())));
        pool.set_token_a(&owner, token_a.clone()).unwrap();
        pool.set_token_b(&owner, token_b.clone()).unwrap();
        pool.set_reward_token(&owner, reward.clone()).unwrap();
        pool.set_reward_rate_bps(&owner, reward_rate_bps).unwrap();
        pool.drain_events();

        Self { pool, token_a, token_b, reward, owner, vault }
    }

    /// A funded account that has approved the pool for everything it holds.
    pub fn account(&self, name: &str, balance: u64) -> Address {
        let who = Address::from(name);
        for token in [&self.token_a, &self.token_b] {
            token.credit(&who, balance).unwrap();
            token.approve(&who, &self.vault, u64::MAX);
        }
        who
    }

    pub fn assert_invariants(&self) {
        let (_, state) = self.pool.snapshot();
        assert!(state.invariants_hold(), "pool invariants broken: {state:?}");
        // ledgers hold at least what the pool has booked
        assert!(self.token_a.balance_of(&self.vault) >= state.totals.reserve_a);
        assert!(self.token_b.balance_of(&self.vault) >= state.totals.reserve_b);
    }
}
