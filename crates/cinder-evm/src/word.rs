//! Arithmetic helpers over 256-bit words.
//!
//! All operations wrap modulo 2^256. Signed variants interpret their
//! operands as two's-complement values.

use cinder_primitives::Word;
use primitive_types::U512;

const SIGN_BIT: usize = 255;

/// Returns the low 64 bits of `w`, or `None` when the value does not fit.
pub fn to_u64(w: Word) -> Option<u64> {
    if w.bits() <= 64 {
        Some(w.low_u64())
    } else {
        None
    }
}

pub fn bool_to_word(b: bool) -> Word {
    if b {
        Word::one()
    } else {
        Word::zero()
    }
}

fn is_negative(w: Word) -> bool {
    w.bit(SIGN_BIT)
}

fn twos_complement(w: Word) -> Word {
    (!w).overflowing_add(Word::one()).0
}

/// Unsigned division. Division by zero yields zero.
pub fn div(x: Word, y: Word) -> Word {
    if y.is_zero() {
        Word::zero()
    } else {
        x / y
    }
}

/// Unsigned remainder. Modulo by zero yields zero.
pub fn rem(x: Word, y: Word) -> Word {
    if y.is_zero() {
        Word::zero()
    } else {
        x % y
    }
}

/// Signed division. Division by zero yields zero, and MinInt256 / -1
/// wraps back to MinInt256.
pub fn sdiv(x: Word, y: Word) -> Word {
    if y.is_zero() {
        return Word::zero();
    }
    let x_neg = is_negative(x);
    let y_neg = is_negative(y);
    let x_abs = if x_neg { twos_complement(x) } else { x };
    let y_abs = if y_neg { twos_complement(y) } else { y };
    let quotient = x_abs / y_abs;
    if x_neg != y_neg {
        twos_complement(quotient)
    } else {
        quotient
    }
}

/// Signed remainder. The result takes the sign of the dividend.
pub fn smod(x: Word, y: Word) -> Word {
    if y.is_zero() {
        return Word::zero();
    }
    let x_neg = is_negative(x);
    let x_abs = if x_neg { twos_complement(x) } else { x };
    let y_abs = if is_negative(y) { twos_complement(y) } else { y };
    let remainder = x_abs % y_abs;
    if x_neg {
        twos_complement(remainder)
    } else {
        remainder
    }
}

fn low_word(x: U512) -> Word {
    let mut buf = [0u8; 64];
    x.to_big_endian(&mut buf);
    Word::from_big_endian(&buf[32..])
}

/// (x + y) % n without intermediate overflow. Zero modulus yields zero.
pub fn addmod(x: Word, y: Word, n: Word) -> Word {
    if n.is_zero() {
        return Word::zero();
    }
    let sum = U512::from(x) + U512::from(y);
    low_word(sum % U512::from(n))
}

/// (x * y) % n without intermediate overflow. Zero modulus yields zero.
pub fn mulmod(x: Word, y: Word, n: Word) -> Word {
    if n.is_zero() {
        return Word::zero();
    }
    low_word(x.full_mul(y) % U512::from(n))
}

/// base^exponent modulo 2^256.
pub fn exp(base: Word, exponent: Word) -> Word {
    base.overflowing_pow(exponent).0
}

/// Extends the sign of the value whose most significant byte sits at
/// position `b` (0 = least significant). `b >= 31` leaves `x` unchanged.
pub fn signextend(b: Word, x: Word) -> Word {
    if b >= Word::from(31u8) {
        return x;
    }
    let byte_index = b.low_u64() as usize;
    let sign_bit = byte_index * 8 + 7;
    if x.bit(sign_bit) {
        let mask = (Word::one() << (sign_bit + 1)) - Word::one();
        x | !mask
    } else {
        let mask = (Word::one() << (sign_bit + 1)) - Word::one();
        x & mask
    }
}

/// Signed less-than.
pub fn slt(x: Word, y: Word) -> bool {
    match (is_negative(x), is_negative(y)) {
        (true, false) => true,
        (false, true) => false,
        _ => x < y,
    }
}

/// Signed greater-than.
pub fn sgt(x: Word, y: Word) -> bool {
    match (is_negative(x), is_negative(y)) {
        (true, false) => false,
        (false, true) => true,
        _ => x > y,
    }
}

/// The `i`-th byte of `x`, counting from the most significant.
/// Indices past 31 yield zero.
pub fn byte_at(i: Word, x: Word) -> Word {
    if i >= Word::from(32u8) {
        return Word::zero();
    }
    let index = i.low_u64() as usize;
    // Word::byte counts from the least significant end.
    Word::from(x.byte(31 - index))
}

/// Left shift. Shift amounts of 256 or more yield zero.
pub fn shl(shift: Word, value: Word) -> Word {
    match to_u64(shift) {
        Some(s) if s < 256 => value << (s as usize),
        _ => Word::zero(),
    }
}

/// Logical right shift. Shift amounts of 256 or more yield zero.
pub fn shr(shift: Word, value: Word) -> Word {
    match to_u64(shift) {
        Some(s) if s < 256 => value >> (s as usize),
        _ => Word::zero(),
    }
}

/// Arithmetic right shift. Oversized shifts saturate to 0 for
/// non-negative values and to all ones for negative values.
pub fn sar(shift: Word, value: Word) -> Word {
    let negative = is_negative(value);
    match to_u64(shift) {
        Some(s) if s < 256 => {
            let shifted = value >> (s as usize);
            if negative && s > 0 {
                // Fill the vacated high bits with ones.
                let fill = Word::MAX << (256 - s as usize);
                shifted | fill
            } else {
                shifted
            }
        }
        _ => {
            if negative {
                Word::MAX
            } else {
                Word::zero()
            }
        }
    }
}
