//! Persistent account state over RocksDB.

use crate::backend::Storage;
use crate::db::{cf, Database};
use crate::error::StorageResult;
use cinder_primitives::{Address, Nonce, Word};
use std::path::Path;
use tracing::{error, warn};

/// Serialized account record: nonce (8 bytes LE) + balance (32 bytes BE).
const ACCOUNT_LEN: usize = 8 + 32;

#[derive(Clone, Copy, Debug, Default)]
struct AccountRecord {
    nonce: Nonce,
    balance: Word,
}

impl AccountRecord {
    fn to_bytes(self) -> [u8; ACCOUNT_LEN] {
        let mut bytes = [0u8; ACCOUNT_LEN];
        bytes[0..8].copy_from_slice(&self.nonce.to_le_bytes());
        self.balance.to_big_endian(&mut bytes[8..40]);
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != ACCOUNT_LEN {
            return None;
        }
        let nonce = Nonce::from_le_bytes(bytes[0..8].try_into().ok()?);
        let balance = Word::from_big_endian(&bytes[8..40]);
        Some(Self { nonce, balance })
    }
}

/// Storage key combining address and slot
fn slot_key(address: Address, slot: Word) -> Vec<u8> {
    let mut key = Vec::with_capacity(20 + 32);
    key.extend_from_slice(address.as_bytes());
    let mut word = [0u8; 32];
    slot.to_big_endian(&mut word);
    key.extend_from_slice(&word);
    key
}

/// Persistent state store backed by RocksDB.
///
/// Opened read-only it serves as a snapshot view over previously persisted
/// state: getters work, `is_write_allowed()` is false, and setters are
/// no-ops.
pub struct StateStore {
    db: Database,
    write_allowed: bool,
}

impl StateStore {
    /// Open (creating if missing) a read/write store at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::new(path);
        db.open()?;
        Ok(Self {
            db,
            write_allowed: true,
        })
    }

    /// Open an existing store at `path` as a read-only snapshot.
    pub fn open_read_only(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::new(path);
        db.open_read_only()?;
        Ok(Self {
            db,
            write_allowed: false,
        })
    }

    fn account(&self, address: Address) -> AccountRecord {
        match self.db.get(cf::ACCOUNTS, address.as_bytes()) {
            Ok(Some(bytes)) => AccountRecord::from_bytes(&bytes).unwrap_or_else(|| {
                error!(%address, "malformed account record");
                AccountRecord::default()
            }),
            Ok(None) => AccountRecord::default(),
            Err(e) => {
                error!(%address, error = %e, "account read failed");
                AccountRecord::default()
            }
        }
    }

    fn put_account(&self, address: Address, record: AccountRecord) {
        if let Err(e) = self
            .db
            .put(cf::ACCOUNTS, address.as_bytes(), &record.to_bytes())
        {
            error!(%address, error = %e, "account write failed");
        }
    }
}

impl Storage for StateStore {
    fn is_write_allowed(&self) -> bool {
        self.write_allowed
    }

    fn create_account(&mut self, address: Address) {
        if !self.write_allowed {
            warn!(%address, "create_account on read-only store ignored");
            return;
        }
        if self.db.get(cf::ACCOUNTS, address.as_bytes()).ok().flatten().is_none() {
            self.put_account(address, AccountRecord::default());
        }
    }

    fn get_balance(&self, address: Address) -> Word {
        self.account(address).balance
    }

    fn set_balance(&mut self, address: Address, balance: Word) {
        if !self.write_allowed {
            return;
        }
        let mut record = self.account(address);
        record.balance = balance;
        self.put_account(address, record);
    }

    fn get_nonce(&self, address: Address) -> Nonce {
        self.account(address).nonce
    }

    fn set_nonce(&mut self, address: Address, nonce: Nonce) {
        if !self.write_allowed {
            return;
        }
        let mut record = self.account(address);
        record.nonce = nonce;
        self.put_account(address, record);
    }

    fn get_state(&self, address: Address, key: Word) -> Word {
        match self.db.get(cf::STORAGE, &slot_key(address, key)) {
            Ok(Some(bytes)) if bytes.len() == 32 => Word::from_big_endian(&bytes),
            Ok(Some(_)) => {
                error!(%address, "malformed storage slot");
                Word::zero()
            }
            Ok(None) => Word::zero(),
            Err(e) => {
                error!(%address, error = %e, "storage read failed");
                Word::zero()
            }
        }
    }

    fn set_state(&mut self, address: Address, key: Word, value: Word) {
        if !self.write_allowed {
            return;
        }
        let k = slot_key(address, key);
        let mut v = [0u8; 32];
        value.to_big_endian(&mut v);
        if let Err(e) = self.db.put(cf::STORAGE, &k, &v) {
            error!(%address, error = %e, "storage write failed");
        }
    }

    fn close(&mut self) {
        self.db.close();
    }
}
