//! # cinder-primitives
//!
//! Primitive types shared across the Cinder VM crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;

pub use address::{Address, AddressError};

/// The VM's native 256-bit unsigned word.
pub use primitive_types::U256 as Word;

/// Gas type
pub type Gas = u64;

/// Account nonce type
pub type Nonce = u64;
