//! In-process ledger used by hosts without an external token system,
//! by the CLI's state file and by tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{RewardToken, TokenLedger, TransferError};
use crate::state::Address;

/// Serializable contents of a [`MemoryLedger`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBook {
    pub address: Address,
    pub balances: BTreeMap<Address, u64>,
    /// owner → spender → remaining allowance
    pub allowances: BTreeMap<Address, BTreeMap<Address, u64>>,
    pub total_supply: u64,
}

/// What a ledger is about to do, as seen by a [`TransferHook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Transfer { from: Address, to: Address, amount: u64 },
    TransferFrom { spender: Address, from: Address, to: Address, amount: u64 },
    Mint { to: Address, amount: u64 },
}

/// Runs before a ledger moves any balance. Returning an error aborts the
/// call. Hooks may call back into the pool; they run with no ledger borrow
/// held.
pub type TransferHook = Box<dyn Fn(&LedgerCall) -> Result<(), TransferError>>;

pub struct MemoryLedger {
    book: RefCell<LedgerBook>,
    hook: RefCell<Option<TransferHook>>,
}

impl MemoryLedger {
    pub fn new(address: impl Into<Address>) -> Self {
        Self::from_book(LedgerBook {
            address: address.into(),
            ..LedgerBook::default()
        })
    }

    pub fn from_book(book: LedgerBook) -> Self {
        Self {
            book: RefCell::new(book),
            hook: RefCell::new(None),
        }
    }

    pub fn book(&self) -> LedgerBook {
        self.book.borrow().clone()
    }

    pub fn total_supply(&self) -> u64 {
        self.book.borrow().total_supply
    }

    /// Create `amount` new tokens for `holder` (faucet / test seeding).
    pub fn credit(&self, holder: &Address, amount: u64) -> Result<(), TransferError> {
        let mut book = self.book.borrow_mut();
        let supply = book
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected("total supply overflow".into()))?;
        let balance = book.balances.entry(holder.clone()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected("balance overflow".into()))?;
        book.total_supply = supply;
        Ok(())
    }

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    pub fn approve(&self, owner: &Address, spender: &Address, amount: u64) {
        self.book
            .borrow_mut()
            .allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.book
            .borrow()
            .allowances
            .get(owner)
            .and_then(|granted| granted.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_hook(&self, hook: TransferHook) {
        *self.hook.borrow_mut() = Some(hook);
    }

    pub fn clear_hook(&self) {
        self.hook.borrow_mut().take();
    }

    fn run_hook(&self, call: LedgerCall) -> Result<(), TransferError> {
        // Take the hook out so it can re-enter this ledger.
        let hook = self.hook.borrow_mut().take();
        let outcome = match &hook {
            Some(hook) => hook(&call),
            None => Ok(()),
        };
        if let Some(hook) = hook {
            let mut slot = self.hook.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
        outcome
    }

    fn move_balance(&self, from: &Address, to: &Address, amount: u64) -> Result<(), TransferError> {
        let mut book = self.book.borrow_mut();
        let available = book.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                holder: from.clone(),
                needed: amount,
                available,
            });
        }
        let credited = book
            .balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected("balance overflow".into()))?;
        book.balances.insert(from.clone(), available - amount);
        book.balances.insert(to.clone(), credited);
        Ok(())
    }
}

impl TokenLedger for MemoryLedger {
    fn address(&self) -> Address {
        self.book.borrow().address.clone()
    }

    fn balance_of(&self, holder: &Address) -> u64 {
        self.book.borrow().balances.get(holder).copied().unwrap_or(0)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: u64) -> Result<(), TransferError> {
        self.run_hook(LedgerCall::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        })?;
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TransferError> {
        self.run_hook(LedgerCall::TransferFrom {
            spender: spender.clone(),
            from: from.clone(),
            to: to.clone(),
            amount,
        })?;
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TransferError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                needed: amount,
                allowed,
            });
        }
        self.move_balance(from, to, amount)?;
        self.approve(from, spender, allowed - amount);
        Ok(())
    }
}

impl RewardToken for MemoryLedger {
    fn address(&self) -> Address {
        TokenLedger::address(self)
    }

    fn mint(&self, to: &Address, amount: u64) -> Result<(), TransferError> {
        self.run_hook(LedgerCall::Mint {
            to: to.clone(),
            amount,
        })?;
        self.credit(to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_starts_from_an_empty_book() {
        let book = MemoryLedger::new("token-a").book();

        assert_eq!(book.address.as_str(), "token-a");
        assert!(book.balances.is_empty() && book.allowances.is_empty());
        assert_eq!(book.total_supply, 0);
        assert_eq!(LedgerBook::default().address, Address::default());
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let ledger = MemoryLedger::new("token-a");
        let alice = Address::from("alice");
        let pool = Address::from("pool");
        ledger.credit(&alice, 500).unwrap();
        ledger.approve(&alice, &pool, 300);

        ledger.transfer_from(&pool, &alice, &pool, 200).unwrap();

        assert_eq!(ledger.balance_of(&alice), 300);
        assert_eq!(ledger.balance_of(&pool), 200);
        assert_eq!(ledger.allowance(&alice, &pool), 100);
        assert!(matches!(
            ledger.transfer_from(&pool, &alice, &pool, 101),
            Err(TransferError::InsufficientAllowance { allowed: 100, .. })
        ));
    }

    #[test]
    fn transfer_rejects_overdraft_without_moving_funds() {
        let ledger = MemoryLedger::new("token-b");
        let bob = Address::from("bob");
        let carol = Address::from("carol");
        ledger.credit(&bob, 10).unwrap();

        let err = ledger.transfer(&bob, &carol, 11).unwrap_err();

        assert!(matches!(err, TransferError::InsufficientBalance { available: 10, .. }));
        assert_eq!(ledger.balance_of(&bob), 10);
        assert_eq!(ledger.balance_of(&carol), 0);
    }

    #[test]
    fn hook_can_veto_a_mint() {
        let ledger = MemoryLedger::new("reward");
        ledger.set_hook(Box::new(|call| match call {
            LedgerCall::Mint { .. } => Err(TransferError::Rejected("minting paused".into())),
            _ => Ok(()),
        }));

        assert!(ledger.mint(&Address::from("dave"), 5).is_err());
        assert_eq!(ledger.total_supply(), 0);

        ledger.clear_hook();
        ledger.mint(&Address::from("dave"), 5).unwrap();
        assert_eq!(ledger.total_supply(), 5);
    }
}
