//! Built-in demonstration scenarios.
//!
//! Each scenario assembles a small program covering arithmetic,
//! comparison, environment, memory and storage opcodes, then runs it
//! with the logging tracer attached. The volatile scenario uses
//! in-memory state seeded with a funded account; the persistent one
//! executes against a RocksDB directory so storage written by one
//! invocation is visible to the next.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use cinder_evm::{op, ExecutionContext, Interpreter, LogTracer, Tracer, Word};
use cinder_primitives::Address;
use cinder_storage::{MemoryStore, StateStore, Storage};
use tracing::info;

const SIM_GAS: u64 = 42_000;

fn sim_sender() -> Address {
    // Fixed demo account.
    Address::from_bytes([
        0x35, 0x0f, 0xbd, 0xe8, 0x50, 0x99, 0x8a, 0xac, 0x40, 0xf0, 0xb9, 0x36, 0x4b, 0x4a, 0xce,
        0xa6, 0x65, 0xa3, 0xd0, 0x8c,
    ])
}

/// Arithmetic, comparison, logic and environment preamble shared by
/// both scenarios. Leaves `[0x1]` on the stack.
fn preamble() -> Vec<u8> {
    vec![
        op::PUSH1, 0x05, //
        op::PUSH1, 0x06, //
        op::ADD, //  [0xb]
        op::PUSH1, 0x02, //
        op::MUL, //  [0x16]
        op::PUSH1, 0x05, //
        op::GT, //   [0x0]
        op::PUSH1, 0x01, //
        op::OR, //   [0x1]
        op::ADDRESS, //
        op::BALANCE, // [0x1, balance(contract)]
        op::POP, //  [0x1]
    ]
}

/// Runs against in-memory state: writes a word through memory into
/// storage slot 2 and reads it back.
pub fn run_volatile() -> Result<()> {
    let contract = sim_sender();

    let mut code = preamble();
    code.extend_from_slice(&[
        // Stack holds [0x1], used as the first MSTORE value.
        op::PUSH1, 0x00, //
        op::MSTORE, // mem[0..32] = 1
        op::PUSH1, 0x02, //
        op::PUSH1, 0x20, //
        op::MSTORE, // mem[32..64] = 2
        op::PUSH1, 0x64, //
        op::PUSH1, 0x20, //
        op::MLOAD,  // [0x64, 0x2]
        op::SSTORE, // state[2] = 0x64
        op::PUSH1, 0x02, //
        op::SLOAD, // [0x64]
        op::STOP,
    ]);

    let mut tracer = LogTracer::new();
    let mut store = MemoryStore::new();
    store.create_account(contract);
    tracer.capture_account_created(contract);
    store.set_balance(contract, Word::from(10_000u64));

    info!(code_len = code.len(), "starting volatile simulation");
    run_scenario(code, contract, &mut store, &mut tracer)?;

    info!(
        slot2 = %store.get_state(contract, Word::from(2u8)),
        "volatile simulation finished"
    );
    Ok(())
}

/// Runs against a persistent state directory: after the preamble it
/// reads storage slots 0 and 1 of the given contract, so values
/// written by earlier invocations survive.
pub fn run_persistent(path: &Path, contract: Address) -> Result<()> {
    let mut code = preamble();
    code.extend_from_slice(&[
        op::PUSH1, 0x00, //
        op::MSTORE, // mem[0..32] = 1
        op::PUSH1, 0x02, //
        op::PUSH1, 0x20, //
        op::MSTORE, // mem[32..64] = 2
        op::PUSH1, 0x00, //
        op::SLOAD, // [state[0]]
        op::PUSH1, 0x01, //
        op::SLOAD, // [state[0], state[1]]
        op::STOP,
    ]);

    let mut store = StateStore::open(path)
        .with_context(|| format!("opening state at {}", path.display()))?;

    let mut tracer = LogTracer::new();
    info!(code_len = code.len(), %contract, "starting persistent simulation");
    run_scenario(code, contract, &mut store, &mut tracer)?;
    store.close();
    Ok(())
}

fn run_scenario(
    code: Vec<u8>,
    contract: Address,
    storage: &mut dyn Storage,
    tracer: &mut dyn Tracer,
) -> Result<()> {
    let ctx = ExecutionContext::new(
        contract,
        sim_sender(),
        Word::one(),
        Bytes::new(),
        Bytes::from(code),
        SIM_GAS,
    );
    let mut vm = Interpreter::new(ctx, storage, Some(tracer));
    let outcome = vm.run();
    info!(halt = ?outcome.halt, gas_remaining = outcome.gas_remaining, "scenario finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn volatile_scenario_completes() {
        run_volatile().unwrap();
    }

    #[test]
    fn persistent_scenario_reads_seeded_slots() {
        let dir = TempDir::new().unwrap();
        let contract = Address::from_bytes([0x10; 20]);

        {
            let mut store = StateStore::open(dir.path()).unwrap();
            store.set_state(contract, Word::zero(), Word::from(111u64));
            store.set_state(contract, Word::one(), Word::from(222u64));
            store.close();
        }

        run_persistent(dir.path(), contract).unwrap();
    }
}
