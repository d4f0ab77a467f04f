use thiserror::Error;

/// Faults raised while executing bytecode. Any of these aborts the run
/// and consumes the remaining gas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("stack overflow")]
    StackOverflow,

    #[error("memory access out of bounds: offset {offset}, len {len}, memory size {size}")]
    MemoryBounds { offset: u64, len: u64, size: u64 },

    #[error("invalid jump destination {0}")]
    InvalidJumpDestination(u64),

    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),
}

pub type VmResult<T> = Result<T, VmError>;
