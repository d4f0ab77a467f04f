use bytes::Bytes;
use cinder_primitives::{Address, Gas, Word};

/// Mutable state of a single bytecode run: program counter, gas meter,
/// call parameters and halt flags. The interpreter owns exactly one of
/// these per run and threads it through every instruction.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Offset of the instruction currently being executed. After the
    /// run halts it rests on the terminating opcode.
    pub pc: u64,
    /// Gas remaining.
    pub gas: Gas,
    /// Refund counter accumulated by storage clears.
    pub refund: Gas,
    /// Account whose code is running.
    pub contract: Address,
    /// Account that initiated the call.
    pub sender: Address,
    /// Value transferred with the call.
    pub value: Word,
    /// Input data for the call.
    pub calldata: Bytes,
    /// Bytecode being executed.
    pub code: Bytes,
    /// Set by STOP and RETURN.
    pub stopped: bool,
    /// Set by REVERT.
    pub reverted: bool,
    /// Buffer filled by RETURN and REVERT.
    pub return_data: Vec<u8>,
    /// Destination claimed by a JUMP or taken JUMPI this step.
    pub(crate) jump_target: Option<u64>,
}

impl ExecutionContext {
    pub fn new(
        contract: Address,
        sender: Address,
        value: Word,
        calldata: Bytes,
        code: Bytes,
        gas: Gas,
    ) -> Self {
        Self {
            pc: 0,
            gas,
            refund: 0,
            contract,
            sender,
            value,
            calldata,
            code,
            stopped: false,
            reverted: false,
            return_data: Vec::new(),
            jump_target: None,
        }
    }
}
