//! The run loop.
//!
//! One [`Interpreter`] executes one call frame: fetch the opcode at pc,
//! look it up in the dense table, check the static cost up front, run
//! the body, then charge static cost plus linear memory growth. The pc
//! advances to a claimed jump destination if one was set, otherwise by
//! one; halting flags are checked first so the pc of a finished run
//! still points at the terminating opcode byte.

use std::collections::HashSet;

use cinder_primitives::{Gas, Word};
use cinder_storage::Storage;
use tracing::{debug, error, info, warn};

use crate::context::ExecutionContext;
use crate::error::{VmError, VmResult};
use crate::gas;
use crate::memory::Memory;
use crate::stack::Stack;
use crate::table::{op, Exec, OpTable};
use crate::tracer::Tracer;
use crate::word;

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// STOP, RETURN, or the pc running past the end of the code.
    Stop,
    /// REVERT: the caller should discard state changes.
    Revert,
    /// The gas budget ran out, before the run or mid-instruction.
    OutOfGas,
    /// A contract violation aborted the run.
    Fatal(VmError),
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub halt: Halt,
    pub return_data: Vec<u8>,
    pub gas_remaining: Gas,
    pub refund: Gas,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.halt == Halt::Stop
    }
}

/// Knobs for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct VmConfig {
    /// Abort on unknown opcodes instead of logging and skipping them.
    pub strict_opcodes: bool,
}

/// A single-frame bytecode interpreter bound to a storage backend and,
/// optionally, a tracer.
pub struct Interpreter<'a> {
    pub(crate) stack: Stack,
    pub(crate) memory: Memory,
    pub(crate) ctx: ExecutionContext,
    pub(crate) storage: &'a mut dyn Storage,
    pub(crate) tracer: Option<&'a mut dyn Tracer>,
    table: OpTable,
    jump_dests: HashSet<u64>,
    config: VmConfig,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        ctx: ExecutionContext,
        storage: &'a mut dyn Storage,
        tracer: Option<&'a mut dyn Tracer>,
    ) -> Self {
        Self::with_config(ctx, storage, tracer, VmConfig::default())
    }

    pub fn with_config(
        ctx: ExecutionContext,
        storage: &'a mut dyn Storage,
        tracer: Option<&'a mut dyn Tracer>,
        config: VmConfig,
    ) -> Self {
        let jump_dests = analyze_jump_dests(&ctx.code);
        Self {
            stack: Stack::new(),
            memory: Memory::new(),
            ctx,
            storage,
            tracer,
            table: OpTable::new(),
            jump_dests,
            config,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Executes the frame to completion.
    pub fn run(&mut self) -> RunOutcome {
        info!(
            contract = %self.ctx.contract,
            gas = self.ctx.gas,
            code_len = self.ctx.code.len(),
            "starting execution"
        );
        if let Some(t) = self.tracer.as_deref_mut() {
            t.capture_run_start(&self.ctx);
        }
        let halt = self.execute();
        if let Some(t) = self.tracer.as_deref_mut() {
            t.capture_run_end(&self.ctx);
        }
        info!(halt = ?halt, gas_remaining = self.ctx.gas, pc = self.ctx.pc, "execution finished");
        RunOutcome {
            halt,
            return_data: self.ctx.return_data.clone(),
            gas_remaining: self.ctx.gas,
            refund: self.ctx.refund,
        }
    }

    fn execute(&mut self) -> Halt {
        if self.ctx.gas < gas::INTRINSIC {
            error!(gas = self.ctx.gas, needed = gas::INTRINSIC, "budget below intrinsic cost");
            return Halt::OutOfGas;
        }
        self.ctx.gas -= gas::INTRINSIC;

        loop {
            let opcode = self.fetch();
            let Some(entry) = self.table.get(opcode) else {
                if self.config.strict_opcodes {
                    return Halt::Fatal(VmError::UnknownOpcode(opcode));
                }
                warn!(
                    opcode = format_args!("0x{opcode:02x}"),
                    pc = self.ctx.pc,
                    "unknown opcode, skipping"
                );
                self.ctx.pc += 1;
                continue;
            };

            // Static cost is checked before the instruction runs.
            if self.ctx.gas < entry.gas {
                debug!(op = entry.name, gas = self.ctx.gas, "out of gas");
                return Halt::OutOfGas;
            }

            if let Some(t) = self.tracer.as_deref_mut() {
                t.capture_step_start(
                    opcode,
                    entry.name,
                    self.ctx.pc,
                    self.ctx.gas,
                    &self.stack,
                    &self.memory,
                );
            }

            let mem_before = self.memory.len();
            let result = match entry.exec {
                Exec::Simple(f) => f(self),
                Exec::Push(size) => self.op_push(size),
                Exec::Dup(depth) => self.stack.dup(depth as usize),
                Exec::Swap(depth) => self.stack.swap(depth as usize),
            };

            // Memory growth is only known after execution; a shortfall
            // on the dynamic part zeroes the meter.
            let growth = self.memory.len() - mem_before;
            let cost = entry.gas.saturating_add(growth.saturating_mul(gas::MEMORY_BYTE));
            if cost > self.ctx.gas {
                self.ctx.gas = 0;
                return Halt::OutOfGas;
            }
            self.ctx.gas -= cost;

            if let Some(t) = self.tracer.as_deref_mut() {
                t.capture_step_end(self.ctx.gas, &self.stack, &self.memory);
            }

            if let Err(e) = result {
                error!(op = entry.name, pc = self.ctx.pc, error = %e, "instruction fault");
                return Halt::Fatal(e);
            }

            // Halting flags are checked before the pc advances so it
            // stays on the terminating opcode byte.
            if self.ctx.stopped {
                return Halt::Stop;
            }
            if self.ctx.reverted {
                return Halt::Revert;
            }

            match self.ctx.jump_target.take() {
                Some(dest) => self.ctx.pc = dest,
                None => self.ctx.pc += 1,
            }
        }
    }

    /// The opcode at pc. Running past the end of the code reads as
    /// STOP.
    fn fetch(&self) -> u8 {
        match usize::try_from(self.ctx.pc) {
            Ok(pc) if pc < self.ctx.code.len() => self.ctx.code[pc],
            _ => op::STOP,
        }
    }

    /// Pushes the immediate of a PUSH0..PUSH32 and advances pc past it.
    fn op_push(&mut self, size: u8) -> VmResult<()> {
        if size == 0 {
            return self.stack.push(Word::zero());
        }
        let size = size as usize;
        let code = &self.ctx.code;
        let start = self.ctx.pc as usize + 1;
        let mut buf = [0u8; 32];
        // Truncated immediates are right-padded with zeros, so the
        // available bytes keep their positions within the immediate.
        for i in 0..size {
            if let Some(b) = code.get(start + i) {
                buf[32 - size + i] = *b;
            }
        }
        self.ctx.pc += size as u64;
        self.stack.push(Word::from_big_endian(&buf))
    }

    /// Checks a JUMP/JUMPI destination against the analyzed set.
    pub(crate) fn validate_jump(&self, dest: Word) -> VmResult<u64> {
        let dest = word::to_u64(dest).ok_or(VmError::InvalidJumpDestination(u64::MAX))?;
        if self.jump_dests.contains(&dest) {
            Ok(dest)
        } else {
            Err(VmError::InvalidJumpDestination(dest))
        }
    }
}

/// Collects the offsets of every JUMPDEST that sits in instruction
/// position, skipping bytes that are PUSH immediates.
fn analyze_jump_dests(code: &[u8]) -> HashSet<u64> {
    let mut dests = HashSet::new();
    let mut i = 0usize;
    while i < code.len() {
        let byte = code[i];
        if byte == op::JUMPDEST {
            dests.insert(i as u64);
        } else if (op::PUSH1..=op::PUSH32).contains(&byte) {
            i += (byte - op::PUSH0) as usize;
        }
        i += 1;
    }
    dests
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use cinder_primitives::Address;
    use cinder_storage::MemoryStore;

    use crate::tracer::{AccessKind, RecordingTracer};

    const BUDGET: Gas = 30_000;

    fn contract_addr() -> Address {
        Address::from_bytes([0x11; 20])
    }

    fn sender_addr() -> Address {
        Address::from_bytes([0x22; 20])
    }

    fn ctx_for(code: Vec<u8>, gas: Gas) -> ExecutionContext {
        ExecutionContext::new(
            contract_addr(),
            sender_addr(),
            Word::zero(),
            Bytes::new(),
            Bytes::from(code),
            gas,
        )
    }

    fn run_code(code: Vec<u8>) -> (RunOutcome, Vec<Word>, u64) {
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(code, BUDGET), &mut store, None);
        let outcome = vm.run();
        let stack = vm.stack().items().to_vec();
        (outcome, stack, vm.context().pc)
    }

    #[test]
    fn push_add_stop_leaves_sum_on_stack() {
        // PUSH5 0x05, PUSH6 0x0000000000000006, ADD, STOP
        let code = vec![
            op::PUSH1, 5, //
            op::PUSH1 + 5, 0, 0, 0, 0, 0, 6, //
            op::ADD,
            op::STOP,
        ];
        let stop_pc = (code.len() - 1) as u64;
        let (outcome, stack, pc) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(11u8)]);
        assert_eq!(pc, stop_pc);
        // Intrinsic plus two pushes, one add, and a free STOP.
        assert_eq!(outcome.gas_remaining, BUDGET - gas::INTRINSIC - 3 * gas::VERY_LOW);
    }

    #[test]
    fn running_past_code_end_stops() {
        let (outcome, stack, _) = run_code(vec![op::PUSH1, 7]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(7u8)]);
    }

    #[test]
    fn truncated_push_immediate_right_pads() {
        // PUSH2 with a single trailing byte reads as 0xab00.
        let (outcome, stack, _) = run_code(vec![op::PUSH1 + 1, 0xab]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(0xab00u64)]);
    }

    #[test]
    fn push0_pushes_zero() {
        let (outcome, stack, _) = run_code(vec![op::PUSH0, op::STOP]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::zero()]);
    }

    #[test]
    fn add_wraps_modulo_word() {
        // MAX + 1 == 0
        let mut code = vec![op::PUSH1, 1, op::PUSH32];
        code.extend_from_slice(&[0xff; 32]);
        code.push(op::ADD);
        code.push(op::STOP);
        let (outcome, stack, _) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::zero()]);
    }

    #[test]
    fn div_and_mod_by_zero_yield_zero() {
        let (_, stack, _) = run_code(vec![
            op::PUSH1, 0, op::PUSH1, 9, op::DIV, //
            op::PUSH1, 0, op::PUSH1, 9, op::MOD, //
            op::STOP,
        ]);
        assert_eq!(stack, vec![Word::zero(), Word::zero()]);
    }

    #[test]
    fn oversized_shifts_saturate() {
        // 1 << 256 == 0, and SAR of a negative value by 300 is all ones.
        let mut code = vec![
            op::PUSH1, 1, op::PUSH1 + 1, 0x01, 0x00, op::SHL, // 1 << 256
        ];
        code.extend_from_slice(&[op::PUSH32]);
        code.extend_from_slice(&[0xff; 32]);
        code.extend_from_slice(&[op::PUSH1 + 1, 0x01, 0x2c, op::SAR, op::STOP]); // -1 >> 300
        let (_, stack, _) = run_code(code);
        assert_eq!(stack, vec![Word::zero(), Word::MAX]);
    }

    #[test]
    fn mstore_mload_round_trip() {
        let (outcome, stack, _) = run_code(vec![
            op::PUSH1, 42, op::PUSH1, 0, op::MSTORE, // mem[0..32] = 42
            op::PUSH1, 0, op::MLOAD, //
            op::STOP,
        ]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(42u8)]);
        // MSTORE grew memory by 32 bytes at 3 gas each.
        let static_costs = 4 * gas::VERY_LOW + gas::VERY_LOW; // 4 pushes/loads + mstore
        assert_eq!(
            outcome.gas_remaining,
            BUDGET - gas::INTRINSIC - static_costs - 32 * gas::MEMORY_BYTE
        );
    }

    #[test]
    fn budget_below_intrinsic_is_out_of_gas() {
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(vec![op::STOP], 10_000), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::OutOfGas);
        assert_eq!(outcome.gas_remaining, 10_000);
    }

    #[test]
    fn static_shortfall_halts_before_executing() {
        // Exactly intrinsic: the PUSH needs 3 more.
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(
            ctx_for(vec![op::PUSH1, 1, op::STOP], gas::INTRINSIC),
            &mut store,
            None,
        );
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::OutOfGas);
        assert_eq!(outcome.gas_remaining, 0);
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn memory_growth_shortfall_zeroes_the_meter() {
        // Enough for the static costs but not for 64 bytes of growth.
        let budget = gas::INTRINSIC + 3 * gas::VERY_LOW + 32 * gas::MEMORY_BYTE - 1;
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(
            ctx_for(vec![op::PUSH1, 1, op::PUSH1, 0, op::MSTORE, op::STOP], budget),
            &mut store,
            None,
        );
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::OutOfGas);
        assert_eq!(outcome.gas_remaining, 0);
    }

    #[test]
    fn jump_lands_on_jumpdest() {
        // PUSH1 4, JUMP, STOP, JUMPDEST, PUSH1 9, STOP
        let code = vec![
            op::PUSH1, 4, op::JUMP, //
            op::STOP, //
            op::JUMPDEST, op::PUSH1, 9, op::STOP,
        ];
        let (outcome, stack, pc) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(9u8)]);
        assert_eq!(pc, 7);
    }

    #[test]
    fn jump_to_non_jumpdest_is_fatal() {
        let (outcome, _, _) = run_code(vec![op::PUSH1, 3, op::JUMP, op::STOP]);
        assert_eq!(
            outcome.halt,
            Halt::Fatal(VmError::InvalidJumpDestination(3))
        );
    }

    #[test]
    fn jumpdest_inside_push_immediate_is_invalid() {
        // The 0x5b at offset 1 is PUSH1's immediate, not a destination.
        let code = vec![op::PUSH1, op::JUMPDEST, op::PUSH1, 1, op::JUMP, op::STOP];
        let (outcome, _, _) = run_code(code);
        assert_eq!(
            outcome.halt,
            Halt::Fatal(VmError::InvalidJumpDestination(1))
        );
    }

    #[test]
    fn jumpi_falls_through_on_zero() {
        // condition 0: no jump, PUSH1 7 runs.
        let code = vec![
            op::PUSH1, 0, op::PUSH1, 7, op::JUMPI, //
            op::PUSH1, 7, op::STOP, //
            op::JUMPDEST, op::STOP,
        ];
        let (outcome, stack, _) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(7u8)]);
    }

    #[test]
    fn jumpi_takes_branch_on_nonzero() {
        let code = vec![
            op::PUSH1, 1, op::PUSH1, 7, op::JUMPI, //
            op::PUSH1, 7, //
            op::JUMPDEST, op::STOP,
        ];
        let (outcome, stack, pc) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert!(stack.is_empty());
        assert_eq!(pc, 8);
    }

    #[test]
    fn backward_jump_loops() {
        // Decrement a counter to zero:
        // PUSH1 3; JUMPDEST; PUSH1 1; SWAP1; SUB; DUP1; PUSH1 2; JUMPI; STOP
        let code = vec![
            op::PUSH1, 3, //
            op::JUMPDEST, //
            op::PUSH1, 1, op::SWAP1, op::SUB, //
            op::DUP1, op::PUSH1, 2, op::JUMPI, //
            op::STOP,
        ];
        let (outcome, stack, _) = run_code(code);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::zero()]);
    }

    #[test]
    fn return_copies_memory_region() {
        // Store 0xdeadbeef's word, return its last 4 bytes.
        let code = vec![
            op::PUSH1 + 3, 0xde, 0xad, 0xbe, 0xef, //
            op::PUSH1, 0, op::MSTORE, //
            op::PUSH1, 4, op::PUSH1, 28, op::RETURN,
        ];
        let (outcome, _, pc) = run_code(code.clone());
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(outcome.return_data, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(pc, (code.len() - 1) as u64);
    }

    #[test]
    fn revert_halts_with_data() {
        let code = vec![
            op::PUSH1, 0xaa, op::PUSH1, 0, op::MSTORE8, //
            op::PUSH1, 1, op::PUSH1, 0, op::REVERT,
        ];
        let (outcome, _, _) = run_code(code);
        assert_eq!(outcome.halt, Halt::Revert);
        assert_eq!(outcome.return_data, vec![0xaa]);
        assert!(!outcome.is_success());
    }

    #[test]
    fn unknown_opcode_skipped_when_lenient() {
        // 0xfe is unassigned; lenient mode skips it.
        let (outcome, stack, _) = run_code(vec![0xfe, op::PUSH1, 5, op::STOP]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::from(5u8)]);
    }

    #[test]
    fn unknown_opcode_fatal_when_strict() {
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::with_config(
            ctx_for(vec![0xfe, op::STOP], BUDGET),
            &mut store,
            None,
            VmConfig { strict_opcodes: true },
        );
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Fatal(VmError::UnknownOpcode(0xfe)));
    }

    #[test]
    fn stack_underflow_is_fatal() {
        let (outcome, _, _) = run_code(vec![op::ADD, op::STOP]);
        assert_eq!(outcome.halt, Halt::Fatal(VmError::StackUnderflow));
    }

    #[test]
    fn address_and_caller_push_context_fields() {
        let (_, stack, _) = run_code(vec![op::ADDRESS, op::CALLER, op::STOP]);
        assert_eq!(
            stack,
            vec![contract_addr().into_word(), sender_addr().into_word()]
        );
    }

    #[test]
    fn calldata_ops_read_input() {
        let mut store = MemoryStore::new();
        let mut ctx = ctx_for(
            vec![
                op::CALLDATASIZE, //
                op::PUSH1, 0, op::CALLDATALOAD, //
                op::STOP,
            ],
            BUDGET,
        );
        ctx.calldata = Bytes::from_static(&[0x01, 0x02]);
        let mut vm = Interpreter::new(ctx, &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        // A 32-byte load over 2 bytes of calldata zero-pads on the right.
        let mut expected = [0u8; 32];
        expected[0] = 0x01;
        expected[1] = 0x02;
        assert_eq!(
            vm.stack().items(),
            &[Word::from(2u8), Word::from_big_endian(&expected)]
        );
    }

    #[test]
    fn calldatacopy_writes_window_to_memory() {
        let mut store = MemoryStore::new();
        let mut ctx = ctx_for(
            vec![
                op::PUSH1, 4, op::PUSH1, 1, op::PUSH1, 0, op::CALLDATACOPY, //
                op::STOP,
            ],
            BUDGET,
        );
        ctx.calldata = Bytes::from_static(b"abc");
        let mut vm = Interpreter::new(ctx, &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(vm.memory().as_bytes(), b"bc\0\0");
    }

    #[test]
    fn codecopy_writes_own_bytecode() {
        let code = vec![
            op::PUSH1, 3, op::PUSH1, 0, op::PUSH1, 0, op::CODECOPY, //
            op::STOP,
        ];
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(code.clone(), BUDGET), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(vm.memory().as_bytes(), &code[..3]);
    }

    #[test]
    fn sstore_sload_round_trip() {
        let code = vec![
            op::PUSH1, 42, op::PUSH1, 7, op::SSTORE, // state[7] = 42
            op::PUSH1, 7, op::SLOAD, //
            op::STOP,
        ];
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(code, BUDGET), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(vm.stack().items(), &[Word::from(42u8)]);
        // The write landed in the backend under the contract address.
        assert_eq!(
            store.get_state(contract_addr(), Word::from(7u8)),
            Word::from(42u8)
        );
    }

    #[test]
    fn sload_of_absent_slot_is_zero() {
        let (outcome, stack, _) = run_code(vec![op::PUSH1, 9, op::SLOAD, op::STOP]);
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(stack, vec![Word::zero()]);
    }

    #[test]
    fn sstore_clear_accrues_refund() {
        let code = vec![
            op::PUSH1, 1, op::PUSH1, 7, op::SSTORE, //
            op::PUSH1, 0, op::PUSH1, 7, op::SSTORE, //
            op::STOP,
        ];
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(code, BUDGET), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.refund, gas::WARM_ACCESS);
    }

    #[test]
    fn balance_reads_backend() {
        let mut store = MemoryStore::new();
        store.create_account(sender_addr());
        store.set_balance(sender_addr(), Word::from(1000u64));
        let code = vec![op::CALLER, op::BALANCE, op::STOP];
        let mut vm = Interpreter::new(ctx_for(code, BUDGET), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        assert_eq!(vm.stack().items(), &[Word::from(1000u64)]);
    }

    #[test]
    fn tracer_sees_steps_and_storage_accesses() {
        let code = vec![
            op::PUSH1, 5, op::PUSH1, 7, op::SSTORE, //
            op::PUSH1, 7, op::SLOAD, //
            op::STOP,
        ];
        let mut store = MemoryStore::new();
        let mut tracer = RecordingTracer::new();
        let mut vm = Interpreter::new(ctx_for(code.clone(), BUDGET), &mut store, Some(&mut tracer));
        let traced = vm.run();

        assert_eq!(
            tracer.steps,
            vec!["PUSH1", "PUSH1", "SSTORE", "PUSH1", "SLOAD", "STOP"]
        );
        assert_eq!(
            tracer.writes,
            vec![(
                AccessKind::State,
                contract_addr(),
                Some(Word::from(7u8)),
                Word::zero(),
                Word::from(5u8)
            )]
        );
        assert_eq!(
            tracer.reads,
            vec![(
                AccessKind::State,
                contract_addr(),
                Some(Word::from(7u8)),
                Word::from(5u8)
            )]
        );

        // The same run without a tracer ends in the same state.
        let mut store2 = MemoryStore::new();
        let mut vm2 = Interpreter::new(ctx_for(code, BUDGET), &mut store2, None);
        let untraced = vm2.run();
        assert_eq!(traced, untraced);
    }

    #[test]
    fn pc_and_msize_and_gas_observe_machine_state() {
        let code = vec![op::PC, op::MSIZE, op::GAS, op::STOP];
        let mut store = MemoryStore::new();
        let mut vm = Interpreter::new(ctx_for(code, BUDGET), &mut store, None);
        let outcome = vm.run();
        assert_eq!(outcome.halt, Halt::Stop);
        let gas_at_op = BUDGET - gas::INTRINSIC - 2 * gas::BASE;
        assert_eq!(
            vm.stack().items(),
            &[Word::zero(), Word::zero(), Word::from(gas_at_op)]
        );
    }
}
