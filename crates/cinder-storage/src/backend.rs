//! The storage contract consumed by the interpreter, and the volatile backend.

use cinder_primitives::{Address, Nonce, Word};
use std::collections::HashMap;

/// Account-state access as seen by the interpreter.
///
/// Getters return the zero value for anything absent; setters on a backend
/// where `is_write_allowed()` is false are no-ops. The backend resolves any
/// cross-run contention internally; the interpreter only issues synchronous
/// calls from a single run.
pub trait Storage {
    /// Whether setters take effect on this backend.
    fn is_write_allowed(&self) -> bool;

    /// Register an account so it participates in balance/nonce bookkeeping.
    fn create_account(&mut self, address: Address);

    /// Balance of `address`, zero if unknown.
    fn get_balance(&self, address: Address) -> Word;

    /// Set the balance of `address`.
    fn set_balance(&mut self, address: Address, balance: Word);

    /// Nonce of `address`, zero if unknown.
    fn get_nonce(&self, address: Address) -> Nonce;

    /// Set the nonce of `address`.
    fn set_nonce(&mut self, address: Address, nonce: Nonce);

    /// Contract storage slot `key` under `address`, zero if absent.
    fn get_state(&self, address: Address, key: Word) -> Word;

    /// Write contract storage slot `key` under `address`.
    fn set_state(&mut self, address: Address, key: Word, value: Word);

    /// Release any held resources. Further calls read as empty.
    fn close(&mut self);
}

#[derive(Clone, Debug, Default)]
struct AccountState {
    balance: Word,
    nonce: Nonce,
}

/// Volatile in-memory backend with a simple map underneath.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: HashMap<Address, AccountState>,
    state: HashMap<(Address, Word), Word>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn is_write_allowed(&self) -> bool {
        true
    }

    fn create_account(&mut self, address: Address) {
        self.accounts.entry(address).or_default();
    }

    fn get_balance(&self, address: Address) -> Word {
        self.accounts
            .get(&address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn set_balance(&mut self, address: Address, balance: Word) {
        self.accounts.entry(address).or_default().balance = balance;
    }

    fn get_nonce(&self, address: Address) -> Nonce {
        self.accounts
            .get(&address)
            .map(|a| a.nonce)
            .unwrap_or_default()
    }

    fn set_nonce(&mut self, address: Address, nonce: Nonce) {
        self.accounts.entry(address).or_default().nonce = nonce;
    }

    fn get_state(&self, address: Address, key: Word) -> Word {
        self.state
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    fn set_state(&mut self, address: Address, key: Word, value: Word) {
        self.state.insert((address, key), value);
    }

    fn close(&mut self) {
        self.accounts.clear();
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults_to_zero() {
        let store = MemoryStore::new();
        let addr = Address::from_bytes([1; 20]);
        assert_eq!(store.get_balance(addr), Word::zero());
        assert_eq!(store.get_nonce(addr), 0);
        assert_eq!(store.get_state(addr, Word::from(7u64)), Word::zero());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        let addr = Address::from_bytes([2; 20]);

        store.create_account(addr);
        store.set_balance(addr, Word::from(10_000u64));
        store.set_nonce(addr, 3);
        store.set_state(addr, Word::from(2u64), Word::from(100u64));

        assert!(store.is_write_allowed());
        assert_eq!(store.get_balance(addr), Word::from(10_000u64));
        assert_eq!(store.get_nonce(addr), 3);
        assert_eq!(store.get_state(addr, Word::from(2u64)), Word::from(100u64));
    }

    #[test]
    fn test_memory_store_state_isolated_per_address() {
        let mut store = MemoryStore::new();
        let a = Address::from_bytes([3; 20]);
        let b = Address::from_bytes([4; 20]);

        store.set_state(a, Word::one(), Word::from(42u64));
        assert_eq!(store.get_state(b, Word::one()), Word::zero());
    }

    #[test]
    fn test_memory_store_close_clears() {
        let mut store = MemoryStore::new();
        let addr = Address::from_bytes([5; 20]);
        store.set_balance(addr, Word::from(1u64));
        store.close();
        assert_eq!(store.get_balance(addr), Word::zero());
    }
}
