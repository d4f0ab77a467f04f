//! # cinder-storage
//!
//! Storage backends for the Cinder VM.
//!
//! The interpreter consumes the narrow [`Storage`] contract; two backends
//! implement it: [`MemoryStore`], a volatile map for simulations, and
//! [`StateStore`], a RocksDB-backed persistent store that can also be
//! opened as a read-only snapshot view.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backend;
mod db;
mod error;
mod state;

pub use backend::{MemoryStore, Storage};
pub use db::{cf, Database, DbConfig};
pub use error::{StorageError, StorageResult};
pub use state::StateStore;
