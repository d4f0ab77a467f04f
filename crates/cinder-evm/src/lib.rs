//! A stack-based 256-bit bytecode interpreter.
//!
//! The machine executes one call frame at a time against a pluggable
//! [`Storage`](cinder_storage::Storage) backend: a 1024-deep operand
//! stack of [`Word`]s, a linear zero-filled byte memory, a dense opcode
//! dispatch table and a gas meter with a linear memory-expansion rule.
//! Callers may attach a [`Tracer`] to observe every step and storage
//! access.
//!
//! ```no_run
//! use bytes::Bytes;
//! use cinder_evm::{op, ExecutionContext, Interpreter, Word};
//! use cinder_primitives::Address;
//! use cinder_storage::MemoryStore;
//!
//! let code = Bytes::from(vec![op::PUSH1, 5, op::PUSH1, 6, op::ADD, op::STOP]);
//! let ctx = ExecutionContext::new(
//!     Address::ZERO,
//!     Address::ZERO,
//!     Word::zero(),
//!     Bytes::new(),
//!     code,
//!     30_000,
//! );
//! let mut store = MemoryStore::new();
//! let mut vm = Interpreter::new(ctx, &mut store, None);
//! let outcome = vm.run();
//! assert!(outcome.is_success());
//! ```

mod context;
mod error;
pub mod gas;
mod instructions;
mod interpreter;
mod memory;
mod stack;
mod table;
mod tracer;
pub mod word;

pub use context::ExecutionContext;
pub use error::{VmError, VmResult};
pub use interpreter::{Halt, Interpreter, RunOutcome, VmConfig};
pub use memory::Memory;
pub use stack::{Stack, MAX_STACK_SIZE};
pub use table::{op, Exec, OpEntry, OpTable};
pub use tracer::{AccessKind, LogTracer, RecordingTracer, Tracer};

pub use cinder_primitives::{Address, Gas, Word};
