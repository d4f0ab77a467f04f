//! Execution tracing.
//!
//! A [`Tracer`] is handed to the interpreter by the caller and receives
//! callbacks at run boundaries, at the start and end of every step, and
//! on storage access. The interpreter drives every hook; instructions
//! never call a tracer directly except through the storage-access
//! helpers, so a tracer observes a consistent view of the machine.

use cinder_primitives::{Address, Word};
use tracing::info;

use crate::context::ExecutionContext;
use crate::memory::Memory;
use crate::stack::Stack;

/// What kind of account data a storage access touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Balance,
    Nonce,
    State,
}

/// Observer for interpreter execution. All methods have empty default
/// bodies so a tracer only implements the hooks it cares about.
pub trait Tracer {
    /// Called once before the first instruction.
    fn capture_run_start(&mut self, _ctx: &ExecutionContext) {}

    /// Called once after the run has halted, in success and failure
    /// alike.
    fn capture_run_end(&mut self, _ctx: &ExecutionContext) {}

    /// Called before an instruction executes. `gas` is the remaining
    /// budget before this step's charge.
    fn capture_step_start(
        &mut self,
        _opcode: u8,
        _name: &'static str,
        _pc: u64,
        _gas: u64,
        _stack: &Stack,
        _memory: &Memory,
    ) {
    }

    /// Called after an instruction executed and its gas was charged.
    fn capture_step_end(&mut self, _gas: u64, _stack: &Stack, _memory: &Memory) {}

    /// A read of balance, nonce or a state slot. `key` is the slot for
    /// state reads and `None` otherwise.
    fn capture_storage_read(
        &mut self,
        _kind: AccessKind,
        _address: Address,
        _key: Option<Word>,
        _value: Word,
    ) {
    }

    /// A write of balance, nonce or a state slot.
    fn capture_storage_write(
        &mut self,
        _kind: AccessKind,
        _address: Address,
        _key: Option<Word>,
        _old: Word,
        _new: Word,
    ) {
    }

    /// An account was registered with the backend. Drivers call this
    /// when seeding state; no opcode creates accounts.
    fn capture_account_created(&mut self, _address: Address) {}
}

/// Tracer that logs every hook through `tracing` at info level.
#[derive(Debug, Default)]
pub struct LogTracer {
    step_name: &'static str,
    step_gas: u64,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn format_stack(stack: &Stack) -> String {
    let items: Vec<String> = stack.items().iter().map(|w| format!("{w:#x}")).collect();
    format!("[{}]", items.join(", "))
}

impl Tracer for LogTracer {
    fn capture_run_start(&mut self, ctx: &ExecutionContext) {
        info!(
            contract = %ctx.contract,
            sender = %ctx.sender,
            gas = ctx.gas,
            code_len = ctx.code.len(),
            "run start"
        );
    }

    fn capture_run_end(&mut self, ctx: &ExecutionContext) {
        info!(
            pc = ctx.pc,
            gas = ctx.gas,
            stopped = ctx.stopped,
            reverted = ctx.reverted,
            return_data = %hex::encode(&ctx.return_data),
            "run end"
        );
    }

    fn capture_step_start(
        &mut self,
        opcode: u8,
        name: &'static str,
        pc: u64,
        gas: u64,
        stack: &Stack,
        memory: &Memory,
    ) {
        self.step_name = name;
        self.step_gas = gas;
        info!(
            op = name,
            opcode = format_args!("0x{opcode:02x}"),
            pc,
            gas,
            stack = %format_stack(stack),
            mem_len = memory.len(),
            "step"
        );
    }

    fn capture_step_end(&mut self, gas: u64, stack: &Stack, memory: &Memory) {
        info!(
            op = self.step_name,
            gas_used = self.step_gas.saturating_sub(gas),
            gas,
            stack = %format_stack(stack),
            mem_len = memory.len(),
            "step done"
        );
    }

    fn capture_storage_read(
        &mut self,
        kind: AccessKind,
        address: Address,
        key: Option<Word>,
        value: Word,
    ) {
        info!(?kind, %address, key = ?key, value = %value, "storage read");
    }

    fn capture_storage_write(
        &mut self,
        kind: AccessKind,
        address: Address,
        key: Option<Word>,
        old: Word,
        new: Word,
    ) {
        info!(?kind, %address, key = ?key, %old, %new, "storage write");
    }

    fn capture_account_created(&mut self, address: Address) {
        info!(%address, "account created");
    }
}

/// Tracer that records every storage access, mainly for tests and the
/// simulation driver.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    pub steps: Vec<&'static str>,
    pub reads: Vec<(AccessKind, Address, Option<Word>, Word)>,
    pub writes: Vec<(AccessKind, Address, Option<Word>, Word, Word)>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracer for RecordingTracer {
    fn capture_step_start(
        &mut self,
        _opcode: u8,
        name: &'static str,
        _pc: u64,
        _gas: u64,
        _stack: &Stack,
        _memory: &Memory,
    ) {
        self.steps.push(name);
    }

    fn capture_storage_read(
        &mut self,
        kind: AccessKind,
        address: Address,
        key: Option<Word>,
        value: Word,
    ) {
        self.reads.push((kind, address, key, value));
    }

    fn capture_storage_write(
        &mut self,
        kind: AccessKind,
        address: Address,
        key: Option<Word>,
        old: Word,
        new: Word,
    ) {
        self.writes.push((kind, address, key, old, new));
    }
}
