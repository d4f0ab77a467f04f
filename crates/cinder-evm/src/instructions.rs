//! Instruction bodies.
//!
//! Each function implements one opcode against the interpreter state.
//! Binary operators pop their first operand and rewrite the new top in
//! place. None of these touch the program counter except the jumps,
//! which park their destination in the context for the run loop to
//! apply.

use cinder_primitives::{Address, Word};

use crate::error::{VmError, VmResult};
use crate::interpreter::Interpreter;
use crate::tracer::AccessKind;
use crate::word;

// -- halting ----------------------------------------------------------

pub(crate) fn stop(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.ctx.stopped = true;
    Ok(())
}

pub(crate) fn ret(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let offset = vm.stack.pop()?;
    let len = vm.stack.pop()?;
    vm.ctx.return_data = load_region(vm, offset, len);
    vm.ctx.stopped = true;
    Ok(())
}

pub(crate) fn revert(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let offset = vm.stack.pop()?;
    let len = vm.stack.pop()?;
    vm.ctx.return_data = load_region(vm, offset, len);
    vm.ctx.reverted = true;
    Ok(())
}

/// Reads a memory region for RETURN/REVERT. Regions that do not fit in
/// addressable memory read as zeros rather than faulting.
fn load_region(vm: &Interpreter<'_>, offset: Word, len: Word) -> Vec<u8> {
    let len = word::to_u64(len).unwrap_or(0);
    match word::to_u64(offset) {
        Some(off) => vm.memory.load(off, len),
        None => vec![0u8; len as usize],
    }
}

// -- arithmetic -------------------------------------------------------

pub(crate) fn add(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x.overflowing_add(*y).0;
    Ok(())
}

pub(crate) fn mul(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x.overflowing_mul(*y).0;
    Ok(())
}

pub(crate) fn sub(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x.overflowing_sub(*y).0;
    Ok(())
}

pub(crate) fn div(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::div(x, *y);
    Ok(())
}

pub(crate) fn sdiv(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::sdiv(x, *y);
    Ok(())
}

pub(crate) fn rem(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::rem(x, *y);
    Ok(())
}

pub(crate) fn smod(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::smod(x, *y);
    Ok(())
}

pub(crate) fn addmod(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.pop()?;
    let n = vm.stack.peek_mut()?;
    *n = word::addmod(x, y, *n);
    Ok(())
}

pub(crate) fn mulmod(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.pop()?;
    let n = vm.stack.peek_mut()?;
    *n = word::mulmod(x, y, *n);
    Ok(())
}

pub(crate) fn exp(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let base = vm.stack.pop()?;
    let exponent = vm.stack.peek_mut()?;
    *exponent = word::exp(base, *exponent);
    Ok(())
}

pub(crate) fn signextend(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let b = vm.stack.pop()?;
    let x = vm.stack.peek_mut()?;
    *x = word::signextend(b, *x);
    Ok(())
}

// -- comparison and bitwise -------------------------------------------

pub(crate) fn lt(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::bool_to_word(x < *y);
    Ok(())
}

pub(crate) fn gt(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::bool_to_word(x > *y);
    Ok(())
}

pub(crate) fn slt(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::bool_to_word(word::slt(x, *y));
    Ok(())
}

pub(crate) fn sgt(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::bool_to_word(word::sgt(x, *y));
    Ok(())
}

pub(crate) fn eq(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = word::bool_to_word(x == *y);
    Ok(())
}

pub(crate) fn iszero(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.peek_mut()?;
    *x = word::bool_to_word(x.is_zero());
    Ok(())
}

pub(crate) fn and(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x & *y;
    Ok(())
}

pub(crate) fn or(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x | *y;
    Ok(())
}

pub(crate) fn xor(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.pop()?;
    let y = vm.stack.peek_mut()?;
    *y = x ^ *y;
    Ok(())
}

pub(crate) fn not(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let x = vm.stack.peek_mut()?;
    *x = !*x;
    Ok(())
}

pub(crate) fn byte(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let i = vm.stack.pop()?;
    let x = vm.stack.peek_mut()?;
    *x = word::byte_at(i, *x);
    Ok(())
}

pub(crate) fn shl(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let shift = vm.stack.pop()?;
    let value = vm.stack.peek_mut()?;
    *value = word::shl(shift, *value);
    Ok(())
}

pub(crate) fn shr(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let shift = vm.stack.pop()?;
    let value = vm.stack.peek_mut()?;
    *value = word::shr(shift, *value);
    Ok(())
}

pub(crate) fn sar(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let shift = vm.stack.pop()?;
    let value = vm.stack.peek_mut()?;
    *value = word::sar(shift, *value);
    Ok(())
}

// -- environment ------------------------------------------------------

pub(crate) fn address(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(vm.ctx.contract.into_word())
}

pub(crate) fn balance(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let slot = vm.stack.peek_mut()?;
    let address = Address::from_word(*slot);
    let balance = vm.storage.get_balance(address);
    if let Some(t) = vm.tracer.as_deref_mut() {
        t.capture_storage_read(AccessKind::Balance, address, None, balance);
    }
    *slot = balance;
    Ok(())
}

pub(crate) fn caller(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(vm.ctx.sender.into_word())
}

pub(crate) fn callvalue(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(vm.ctx.value)
}

/// Reads `len` bytes of `data` at `offset`, zero-padding past the end.
fn data_window(data: &[u8], offset: Word, len: u64) -> Vec<u8> {
    let mut out = vec![0u8; len as usize];
    if let Some(off) = word::to_u64(offset) {
        let size = data.len() as u64;
        if off < size {
            let end = size.min(off.saturating_add(len));
            let available = (end - off) as usize;
            out[..available].copy_from_slice(&data[off as usize..end as usize]);
        }
    }
    out
}

pub(crate) fn calldataload(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let offset = vm.stack.pop()?;
    let window = data_window(&vm.ctx.calldata, offset, 32);
    vm.stack.push(Word::from_big_endian(&window))
}

pub(crate) fn calldatasize(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(Word::from(vm.ctx.calldata.len() as u64))
}

pub(crate) fn calldatacopy(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let mem_offset = vm.stack.pop()?;
    let data_offset = vm.stack.pop()?;
    let len = vm.stack.pop()?;
    copy_to_memory(vm, mem_offset, data_offset, len, true)
}

pub(crate) fn codesize(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(Word::from(vm.ctx.code.len() as u64))
}

pub(crate) fn codecopy(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let mem_offset = vm.stack.pop()?;
    let code_offset = vm.stack.pop()?;
    let len = vm.stack.pop()?;
    copy_to_memory(vm, mem_offset, code_offset, len, false)
}

fn copy_to_memory(
    vm: &mut Interpreter<'_>,
    mem_offset: Word,
    data_offset: Word,
    len: Word,
    from_calldata: bool,
) -> VmResult<()> {
    let len = word::to_u64(len).ok_or(VmError::MemoryBounds {
        offset: u64::MAX,
        len: u64::MAX,
        size: vm.memory.len(),
    })?;
    let mem_offset = word::to_u64(mem_offset).ok_or(VmError::MemoryBounds {
        offset: u64::MAX,
        len,
        size: vm.memory.len(),
    })?;
    if len == 0 {
        return Ok(());
    }
    let window = if from_calldata {
        data_window(&vm.ctx.calldata, data_offset, len)
    } else {
        data_window(&vm.ctx.code, data_offset, len)
    };
    let end = mem_offset.checked_add(len).ok_or(VmError::MemoryBounds {
        offset: mem_offset,
        len,
        size: vm.memory.len(),
    })?;
    vm.memory.resize(end);
    vm.memory.store(mem_offset, &window)
}

// -- memory -----------------------------------------------------------

pub(crate) fn pop(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.pop()?;
    Ok(())
}

pub(crate) fn mload(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let slot = vm.stack.peek_mut()?;
    let window = match word::to_u64(*slot) {
        // Reads never grow memory; out-of-range bytes are zero.
        Some(off) => vm.memory.load(off, 32),
        None => vec![0u8; 32],
    };
    *slot = Word::from_big_endian(&window);
    Ok(())
}

pub(crate) fn mstore(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let offset = vm.stack.pop()?;
    let value = vm.stack.pop()?;
    let offset = word::to_u64(offset).ok_or(VmError::MemoryBounds {
        offset: u64::MAX,
        len: 32,
        size: vm.memory.len(),
    })?;
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let end = offset.checked_add(32).ok_or(VmError::MemoryBounds {
        offset,
        len: 32,
        size: vm.memory.len(),
    })?;
    vm.memory.resize(end);
    vm.memory.store(offset, &buf)
}

pub(crate) fn mstore8(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let offset = vm.stack.pop()?;
    let value = vm.stack.pop()?;
    let offset = word::to_u64(offset).ok_or(VmError::MemoryBounds {
        offset: u64::MAX,
        len: 1,
        size: vm.memory.len(),
    })?;
    let end = offset.checked_add(1).ok_or(VmError::MemoryBounds {
        offset,
        len: 1,
        size: vm.memory.len(),
    })?;
    vm.memory.resize(end);
    vm.memory.store(offset, &[value.byte(0)])
}

pub(crate) fn msize(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(Word::from(vm.memory.len()))
}

pub(crate) fn gas_remaining(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(Word::from(vm.ctx.gas))
}

// -- storage ----------------------------------------------------------

pub(crate) fn sload(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let key = vm.stack.peek_mut()?;
    let value = vm.storage.get_state(vm.ctx.contract, *key);
    if let Some(t) = vm.tracer.as_deref_mut() {
        t.capture_storage_read(AccessKind::State, vm.ctx.contract, Some(*key), value);
    }
    *key = value;
    Ok(())
}

pub(crate) fn sstore(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let key = vm.stack.pop()?;
    let value = vm.stack.pop()?;
    let old = vm.storage.get_state(vm.ctx.contract, key);
    vm.storage.set_state(vm.ctx.contract, key, value);
    if !old.is_zero() && value.is_zero() {
        vm.ctx.refund += crate::gas::WARM_ACCESS;
    }
    if let Some(t) = vm.tracer.as_deref_mut() {
        t.capture_storage_write(AccessKind::State, vm.ctx.contract, Some(key), old, value);
    }
    Ok(())
}

// -- control flow -----------------------------------------------------

pub(crate) fn jump(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let dest = vm.stack.pop()?;
    let dest = vm.validate_jump(dest)?;
    vm.ctx.jump_target = Some(dest);
    Ok(())
}

pub(crate) fn jumpi(vm: &mut Interpreter<'_>) -> VmResult<()> {
    let dest = vm.stack.pop()?;
    let condition = vm.stack.pop()?;
    if !condition.is_zero() {
        let dest = vm.validate_jump(dest)?;
        vm.ctx.jump_target = Some(dest);
    }
    Ok(())
}

pub(crate) fn pc(vm: &mut Interpreter<'_>) -> VmResult<()> {
    vm.stack.push(Word::from(vm.ctx.pc))
}

pub(crate) fn jumpdest(_vm: &mut Interpreter<'_>) -> VmResult<()> {
    Ok(())
}
