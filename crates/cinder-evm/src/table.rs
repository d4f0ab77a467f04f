//! Opcode dispatch table.
//!
//! A dense 256-entry array indexed directly by the opcode byte. Every
//! entry carries the mnemonic, the static gas cost and the execution
//! body; unassigned bytes are `None`. Lookup is a single array index
//! with no hashing.

use cinder_primitives::Gas;

use crate::error::VmResult;
use crate::gas;
use crate::instructions;
use crate::interpreter::Interpreter;

/// Bare opcode byte values.
pub mod op {
    pub const STOP: u8 = 0x00;
    pub const ADD: u8 = 0x01;
    pub const MUL: u8 = 0x02;
    pub const SUB: u8 = 0x03;
    pub const DIV: u8 = 0x04;
    pub const SDIV: u8 = 0x05;
    pub const MOD: u8 = 0x06;
    pub const SMOD: u8 = 0x07;
    pub const ADDMOD: u8 = 0x08;
    pub const MULMOD: u8 = 0x09;
    pub const EXP: u8 = 0x0a;
    pub const SIGNEXTEND: u8 = 0x0b;

    pub const LT: u8 = 0x10;
    pub const GT: u8 = 0x11;
    pub const SLT: u8 = 0x12;
    pub const SGT: u8 = 0x13;
    pub const EQ: u8 = 0x14;
    pub const ISZERO: u8 = 0x15;
    pub const AND: u8 = 0x16;
    pub const OR: u8 = 0x17;
    pub const XOR: u8 = 0x18;
    pub const NOT: u8 = 0x19;
    pub const BYTE: u8 = 0x1a;
    pub const SHL: u8 = 0x1b;
    pub const SHR: u8 = 0x1c;
    pub const SAR: u8 = 0x1d;

    pub const ADDRESS: u8 = 0x30;
    pub const BALANCE: u8 = 0x31;
    pub const CALLER: u8 = 0x33;
    pub const CALLVALUE: u8 = 0x34;
    pub const CALLDATALOAD: u8 = 0x35;
    pub const CALLDATASIZE: u8 = 0x36;
    pub const CALLDATACOPY: u8 = 0x37;
    pub const CODESIZE: u8 = 0x38;
    pub const CODECOPY: u8 = 0x39;

    pub const POP: u8 = 0x50;
    pub const MLOAD: u8 = 0x51;
    pub const MSTORE: u8 = 0x52;
    pub const MSTORE8: u8 = 0x53;
    pub const SLOAD: u8 = 0x54;
    pub const SSTORE: u8 = 0x55;
    pub const JUMP: u8 = 0x56;
    pub const JUMPI: u8 = 0x57;
    pub const PC: u8 = 0x58;
    pub const MSIZE: u8 = 0x59;
    pub const GAS: u8 = 0x5a;
    pub const JUMPDEST: u8 = 0x5b;

    pub const PUSH0: u8 = 0x5f;
    pub const PUSH1: u8 = 0x60;
    pub const PUSH32: u8 = 0x7f;

    pub const DUP1: u8 = 0x80;
    pub const DUP16: u8 = 0x8f;
    pub const SWAP1: u8 = 0x90;
    pub const SWAP16: u8 = 0x9f;

    pub const RETURN: u8 = 0xf3;
    pub const REVERT: u8 = 0xfd;
}

type ExecFn = fn(&mut Interpreter<'_>) -> VmResult<()>;

/// How an entry executes. PUSH, DUP and SWAP families carry their
/// size/depth instead of one function per member.
#[derive(Clone, Copy)]
pub enum Exec {
    Simple(ExecFn),
    Push(u8),
    Dup(u8),
    Swap(u8),
}

#[derive(Clone, Copy)]
pub struct OpEntry {
    pub name: &'static str,
    pub gas: Gas,
    pub exec: Exec,
}

const PUSH_NAMES: [&str; 33] = [
    "PUSH0", "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9",
    "PUSH10", "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18",
    "PUSH19", "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27",
    "PUSH28", "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_NAMES: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_NAMES: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

pub struct OpTable {
    entries: [Option<OpEntry>; 256],
}

impl OpTable {
    pub fn new() -> Self {
        let mut entries: [Option<OpEntry>; 256] = [None; 256];

        let mut set = |code: u8, name: &'static str, gas: Gas, exec: Exec| {
            entries[code as usize] = Some(OpEntry { name, gas, exec });
        };

        set(op::STOP, "STOP", gas::ZERO, Exec::Simple(instructions::stop));
        set(op::ADD, "ADD", gas::VERY_LOW, Exec::Simple(instructions::add));
        set(op::MUL, "MUL", gas::LOW, Exec::Simple(instructions::mul));
        set(op::SUB, "SUB", gas::VERY_LOW, Exec::Simple(instructions::sub));
        set(op::DIV, "DIV", gas::LOW, Exec::Simple(instructions::div));
        set(op::SDIV, "SDIV", gas::LOW, Exec::Simple(instructions::sdiv));
        set(op::MOD, "MOD", gas::LOW, Exec::Simple(instructions::rem));
        set(op::SMOD, "SMOD", gas::LOW, Exec::Simple(instructions::smod));
        set(op::ADDMOD, "ADDMOD", gas::MID, Exec::Simple(instructions::addmod));
        set(op::MULMOD, "MULMOD", gas::MID, Exec::Simple(instructions::mulmod));
        set(op::EXP, "EXP", gas::HIGH, Exec::Simple(instructions::exp));
        set(
            op::SIGNEXTEND,
            "SIGNEXTEND",
            gas::LOW,
            Exec::Simple(instructions::signextend),
        );

        set(op::LT, "LT", gas::VERY_LOW, Exec::Simple(instructions::lt));
        set(op::GT, "GT", gas::VERY_LOW, Exec::Simple(instructions::gt));
        set(op::SLT, "SLT", gas::VERY_LOW, Exec::Simple(instructions::slt));
        set(op::SGT, "SGT", gas::VERY_LOW, Exec::Simple(instructions::sgt));
        set(op::EQ, "EQ", gas::VERY_LOW, Exec::Simple(instructions::eq));
        set(op::ISZERO, "ISZERO", gas::VERY_LOW, Exec::Simple(instructions::iszero));
        set(op::AND, "AND", gas::VERY_LOW, Exec::Simple(instructions::and));
        set(op::OR, "OR", gas::VERY_LOW, Exec::Simple(instructions::or));
        set(op::XOR, "XOR", gas::VERY_LOW, Exec::Simple(instructions::xor));
        set(op::NOT, "NOT", gas::VERY_LOW, Exec::Simple(instructions::not));
        set(op::BYTE, "BYTE", gas::VERY_LOW, Exec::Simple(instructions::byte));
        set(op::SHL, "SHL", gas::VERY_LOW, Exec::Simple(instructions::shl));
        set(op::SHR, "SHR", gas::VERY_LOW, Exec::Simple(instructions::shr));
        set(op::SAR, "SAR", gas::VERY_LOW, Exec::Simple(instructions::sar));

        set(op::ADDRESS, "ADDRESS", gas::BASE, Exec::Simple(instructions::address));
        set(
            op::BALANCE,
            "BALANCE",
            gas::WARM_ACCESS,
            Exec::Simple(instructions::balance),
        );
        set(op::CALLER, "CALLER", gas::BASE, Exec::Simple(instructions::caller));
        set(
            op::CALLVALUE,
            "CALLVALUE",
            gas::BASE,
            Exec::Simple(instructions::callvalue),
        );
        set(
            op::CALLDATALOAD,
            "CALLDATALOAD",
            gas::VERY_LOW,
            Exec::Simple(instructions::calldataload),
        );
        set(
            op::CALLDATASIZE,
            "CALLDATASIZE",
            gas::BASE,
            Exec::Simple(instructions::calldatasize),
        );
        set(
            op::CALLDATACOPY,
            "CALLDATACOPY",
            gas::VERY_LOW,
            Exec::Simple(instructions::calldatacopy),
        );
        set(op::CODESIZE, "CODESIZE", gas::BASE, Exec::Simple(instructions::codesize));
        set(
            op::CODECOPY,
            "CODECOPY",
            gas::VERY_LOW,
            Exec::Simple(instructions::codecopy),
        );

        set(op::POP, "POP", gas::BASE, Exec::Simple(instructions::pop));
        set(op::MLOAD, "MLOAD", gas::VERY_LOW, Exec::Simple(instructions::mload));
        set(op::MSTORE, "MSTORE", gas::VERY_LOW, Exec::Simple(instructions::mstore));
        set(op::MSTORE8, "MSTORE8", gas::VERY_LOW, Exec::Simple(instructions::mstore8));
        set(
            op::SLOAD,
            "SLOAD",
            gas::WARM_ACCESS,
            Exec::Simple(instructions::sload),
        );
        set(
            op::SSTORE,
            "SSTORE",
            gas::WARM_ACCESS,
            Exec::Simple(instructions::sstore),
        );
        set(op::JUMP, "JUMP", gas::MID, Exec::Simple(instructions::jump));
        set(op::JUMPI, "JUMPI", gas::HIGH, Exec::Simple(instructions::jumpi));
        set(op::PC, "PC", gas::BASE, Exec::Simple(instructions::pc));
        set(op::MSIZE, "MSIZE", gas::BASE, Exec::Simple(instructions::msize));
        set(op::GAS, "GAS", gas::BASE, Exec::Simple(instructions::gas_remaining));
        set(
            op::JUMPDEST,
            "JUMPDEST",
            gas::JUMPDEST,
            Exec::Simple(instructions::jumpdest),
        );

        // PUSH0 pushes a constant zero; PUSH1..PUSH32 carry 1..32
        // immediate bytes.
        for size in 0..=32u8 {
            set(
                op::PUSH0 + size,
                PUSH_NAMES[size as usize],
                gas::VERY_LOW,
                Exec::Push(size),
            );
        }
        for depth in 1..=16u8 {
            set(
                op::DUP1 + depth - 1,
                DUP_NAMES[depth as usize - 1],
                gas::VERY_LOW,
                Exec::Dup(depth),
            );
            set(
                op::SWAP1 + depth - 1,
                SWAP_NAMES[depth as usize - 1],
                gas::VERY_LOW,
                Exec::Swap(depth),
            );
        }

        set(op::RETURN, "RETURN", gas::ZERO, Exec::Simple(instructions::ret));
        set(op::REVERT, "REVERT", gas::ZERO, Exec::Simple(instructions::revert));

        Self { entries }
    }

    pub fn get(&self, opcode: u8) -> Option<OpEntry> {
        self.entries[opcode as usize]
    }
}

impl Default for OpTable {
    fn default() -> Self {
        Self::new()
    }
}
