//! Gas schedule.
//!
//! Static costs follow the classic frontier tiers. Memory expansion is
//! charged linearly per byte, and storage access is charged at the flat
//! warm-access rate with no cold surcharge or refund accounting beyond
//! the counter carried in the execution context.

use cinder_primitives::Gas;

/// Flat cost deducted before the first instruction runs.
pub const INTRINSIC: Gas = 21_000;

/// Cost per newly allocated byte of memory.
pub const MEMORY_BYTE: Gas = 3;

pub const ZERO: Gas = 0;
pub const BASE: Gas = 2;
pub const VERY_LOW: Gas = 3;
pub const LOW: Gas = 5;
pub const MID: Gas = 8;
pub const HIGH: Gas = 10;
pub const JUMPDEST: Gas = 1;

/// Flat warm-access cost shared by SLOAD, SSTORE and BALANCE.
pub const WARM_ACCESS: Gas = 100;
