//! 256-bit word arithmetic.
//!
//! Words are unsigned 256-bit integers. All arithmetic wraps, and division
//! or modulo by zero yields zero, so nothing here can fail. The signed
//! helpers interpret the most significant bit as the sign (two's
//! complement).

pub use primitive_types::{H160, U256, U512};

/// The machine word: stack slot, memory word, storage key and value.
pub type Word = U256;

/// A 20-byte account address.
pub type Address = H160;

/// Width of a word in bytes.
pub const WORD_BYTES: usize = 32;

fn sign_bit() -> Word {
    Word::one() << 255
}

/// 1 for true, 0 for false.
pub fn from_bool(value: bool) -> Word {
    if value {
        Word::one()
    } else {
        Word::zero()
    }
}

/// True if the word is negative under two's complement.
pub fn is_negative(value: Word) -> bool {
    value.bit(255)
}

/// Two's complement negation (wraps for the minimum value).
pub fn negate(value: Word) -> Word {
    (!value).overflowing_add(Word::one()).0
}

fn abs(value: Word) -> Word {
    if is_negative(value) {
        negate(value)
    } else {
        value
    }
}

pub fn add(a: Word, b: Word) -> Word {
    a.overflowing_add(b).0
}

pub fn sub(a: Word, b: Word) -> Word {
    a.overflowing_sub(b).0
}

pub fn mul(a: Word, b: Word) -> Word {
    a.overflowing_mul(b).0
}

pub fn div(a: Word, b: Word) -> Word {
    if b.is_zero() {
        Word::zero()
    } else {
        a / b
    }
}

pub fn rem(a: Word, b: Word) -> Word {
    if b.is_zero() {
        Word::zero()
    } else {
        a % b
    }
}

/// Signed division, truncating toward zero.
pub fn sdiv(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return Word::zero();
    }
    let quotient = abs(a) / abs(b);
    if is_negative(a) ^ is_negative(b) {
        negate(quotient)
    } else {
        quotient
    }
}

/// Signed remainder. The result takes the sign of the dividend.
pub fn smod(a: Word, b: Word) -> Word {
    if b.is_zero() {
        return Word::zero();
    }
    let remainder = abs(a) % abs(b);
    if is_negative(a) {
        negate(remainder)
    } else {
        remainder
    }
}

fn truncate(wide: U512) -> Word {
    let U512(limbs) = wide;
    U256([limbs[0], limbs[1], limbs[2], limbs[3]])
}

/// `(a + b) % n` computed on the full 257-bit sum.
pub fn addmod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return Word::zero();
    }
    let sum = U512::from(a) + U512::from(b);
    truncate(sum % U512::from(n))
}

/// `(a * b) % n` computed on the full 512-bit product.
pub fn mulmod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return Word::zero();
    }
    truncate(a.full_mul(b) % U512::from(n))
}

/// Wrapping exponentiation.
pub fn exp(base: Word, exponent: Word) -> Word {
    base.overflowing_pow(exponent).0
}

/// Number of significant bytes in an exponent (priced per byte by EXP).
pub fn byte_len(value: Word) -> usize {
    value.bits().div_ceil(8)
}

/// Sign-extend `value` from the byte at index `byte_index` (0 = lowest).
pub fn signextend(byte_index: Word, value: Word) -> Word {
    if byte_index >= Word::from(31) {
        return value;
    }
    let bit = byte_index.low_u64() as usize * 8 + 7;
    let mask = (Word::one() << (bit + 1)) - Word::one();
    if value.bit(bit) {
        value | !mask
    } else {
        value & mask
    }
}

pub fn lt(a: Word, b: Word) -> Word {
    from_bool(a < b)
}

pub fn gt(a: Word, b: Word) -> Word {
    from_bool(a > b)
}

/// Signed less-than. Flipping the sign bit maps signed order onto unsigned order.
pub fn slt(a: Word, b: Word) -> Word {
    from_bool((a ^ sign_bit()) < (b ^ sign_bit()))
}

pub fn sgt(a: Word, b: Word) -> Word {
    from_bool((a ^ sign_bit()) > (b ^ sign_bit()))
}

/// The `index`-th byte of `value`, counting from the most significant end.
pub fn byte(index: Word, value: Word) -> Word {
    if index >= Word::from(WORD_BYTES) {
        return Word::zero();
    }
    let i = index.low_u64() as usize;
    Word::from(value.byte(WORD_BYTES - 1 - i))
}

pub fn shl(shift: Word, value: Word) -> Word {
    if shift >= Word::from(256) {
        Word::zero()
    } else {
        value << shift.low_u64() as usize
    }
}

pub fn shr(shift: Word, value: Word) -> Word {
    if shift >= Word::from(256) {
        Word::zero()
    } else {
        value >> shift.low_u64() as usize
    }
}

/// Arithmetic right shift: vacated bits are filled with the sign bit.
pub fn sar(shift: Word, value: Word) -> Word {
    let negative = is_negative(value);
    if shift >= Word::from(256) {
        return if negative { Word::MAX } else { Word::zero() };
    }
    let n = shift.low_u64() as usize;
    if negative {
        !((!value) >> n)
    } else {
        value >> n
    }
}

/// Convert to `usize`, or `None` if the value does not fit.
pub fn to_usize(value: Word) -> Option<usize> {
    if value.bits() > 64 {
        return None;
    }
    usize::try_from(value.low_u64()).ok()
}

/// Convert to `u64`, saturating at `u64::MAX`.
pub fn saturating_u64(value: Word) -> u64 {
    if value.bits() > 64 {
        u64::MAX
    } else {
        value.low_u64()
    }
}

/// Big-endian bytes of a word.
pub fn to_be_bytes(value: Word) -> [u8; WORD_BYTES] {
    let mut out = [0u8; WORD_BYTES];
    value.to_big_endian(&mut out);
    out
}

/// Value of a `PUSHn` immediate.
///
/// When the code ends early the missing trailing bytes read as zero, so
/// `immediate` is left-aligned within a `width`-byte field.
pub fn from_push_data(immediate: &[u8], width: usize) -> Word {
    let mut buf = [0u8; WORD_BYTES];
    let start = WORD_BYTES - width;
    let len = immediate.len().min(width);
    buf[start..start + len].copy_from_slice(&immediate[..len]);
    Word::from_big_endian(&buf)
}

/// Read 32 bytes of `data` starting at `offset`, zero-padding past the end.
pub fn load_padded(data: &[u8], offset: usize) -> Word {
    let mut buf = [0u8; WORD_BYTES];
    if offset < data.len() {
        let len = (data.len() - offset).min(WORD_BYTES);
        buf[..len].copy_from_slice(&data[offset..offset + len]);
    }
    Word::from_big_endian(&buf)
}

/// The low 20 bytes of a word as an address.
pub fn to_address(value: Word) -> Address {
    let bytes = to_be_bytes(value);
    Address::from_slice(&bytes[12..])
}

/// An address zero-extended to a word.
pub fn from_address(address: Address) -> Word {
    Word::from_big_endian(address.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u64) -> Word {
        Word::from(n)
    }

    fn neg(n: u64) -> Word {
        negate(w(n))
    }

    #[test]
    fn wrapping_add_sub_mul() {
        assert_eq!(add(Word::MAX, w(1)), Word::zero());
        assert_eq!(sub(w(0), w(1)), Word::MAX);
        assert_eq!(mul(Word::MAX, w(2)), sub(Word::MAX, w(1)));
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(div(w(7), w(0)), w(0));
        assert_eq!(rem(w(7), w(0)), w(0));
        assert_eq!(sdiv(w(7), w(0)), w(0));
        assert_eq!(smod(w(7), w(0)), w(0));
        assert_eq!(addmod(w(1), w(2), w(0)), w(0));
        assert_eq!(mulmod(w(1), w(2), w(0)), w(0));
    }

    #[test]
    fn signed_division_truncates_toward_zero() {
        assert_eq!(sdiv(neg(7), w(2)), neg(3));
        assert_eq!(sdiv(w(7), neg(2)), neg(3));
        assert_eq!(sdiv(neg(7), neg(2)), w(3));
    }

    #[test]
    fn signed_division_min_by_minus_one_wraps() {
        let min = Word::one() << 255;
        assert_eq!(sdiv(min, Word::MAX), min);
    }

    #[test]
    fn signed_modulo_takes_dividend_sign() {
        assert_eq!(smod(neg(8), w(3)), neg(2));
        assert_eq!(smod(w(8), neg(3)), w(2));
    }

    #[test]
    fn addmod_and_mulmod_use_wide_intermediate() {
        assert_eq!(addmod(Word::MAX, w(2), w(2)), w(1));
        assert_eq!(mulmod(Word::MAX, Word::MAX, w(12)), w(9));
        assert_eq!(addmod(w(10), w(11), w(12)), w(9));
    }

    #[test]
    fn exponentiation_wraps() {
        assert_eq!(exp(w(2), w(10)), w(1024));
        assert_eq!(exp(w(2), w(256)), w(0));
        assert_eq!(exp(w(0), w(0)), w(1));
    }

    #[test]
    fn exponent_byte_len() {
        assert_eq!(byte_len(w(0)), 0);
        assert_eq!(byte_len(w(255)), 1);
        assert_eq!(byte_len(w(256)), 2);
        assert_eq!(byte_len(Word::MAX), 32);
    }

    #[test]
    fn signextend_cases() {
        assert_eq!(signextend(w(0), w(0xff)), Word::MAX);
        assert_eq!(signextend(w(0), w(0x7f)), w(0x7f));
        assert_eq!(signextend(w(1), w(0x8000)), negate(w(0x8000)));
        assert_eq!(signextend(w(0), w(0x1ff)), Word::MAX);
        assert_eq!(signextend(w(31), w(0xff)), w(0xff));
        assert_eq!(signextend(Word::MAX, w(0xff)), w(0xff));
    }

    #[test]
    fn signed_comparisons() {
        assert_eq!(slt(neg(1), w(1)), w(1));
        assert_eq!(slt(w(1), neg(1)), w(0));
        assert_eq!(sgt(w(1), neg(1)), w(1));
        assert_eq!(sgt(neg(2), neg(1)), w(0));
        assert_eq!(slt(neg(2), neg(1)), w(1));
        assert_eq!(lt(w(1), Word::MAX), w(1));
        assert_eq!(gt(w(1), Word::MAX), w(0));
    }

    #[test]
    fn byte_is_big_endian() {
        let value = Word::from_big_endian(&[0xab; 1]) << 248;
        assert_eq!(byte(w(0), value), w(0xab));
        assert_eq!(byte(w(31), w(0xcd)), w(0xcd));
        assert_eq!(byte(w(32), Word::MAX), w(0));
    }

    #[test]
    fn shifts() {
        assert_eq!(shl(w(4), w(1)), w(16));
        assert_eq!(shl(w(256), w(1)), w(0));
        assert_eq!(shr(w(4), w(16)), w(1));
        assert_eq!(shr(Word::MAX, w(16)), w(0));
        assert_eq!(shl(w(1), Word::one() << 255), w(0));
    }

    #[test]
    fn arithmetic_shift_fills_sign() {
        assert_eq!(sar(w(1), neg(4)), neg(2));
        assert_eq!(sar(w(300), neg(4)), Word::MAX);
        assert_eq!(sar(w(300), w(4)), w(0));
        assert_eq!(sar(w(1), w(4)), w(2));
    }

    #[test]
    fn usize_conversion() {
        assert_eq!(to_usize(w(42)), Some(42));
        assert_eq!(to_usize(Word::MAX), None);
        assert_eq!(saturating_u64(Word::MAX), u64::MAX);
    }

    #[test]
    fn push_data_is_left_aligned_when_truncated() {
        assert_eq!(from_push_data(&[0x01, 0x02], 2), w(0x0102));
        assert_eq!(from_push_data(&[0x01], 2), w(0x0100));
        assert_eq!(from_push_data(&[], 1), w(0));
    }

    #[test]
    fn load_padded_past_end() {
        let data = [0xffu8; 4];
        assert_eq!(load_padded(&data, 4), w(0));
        assert_eq!(load_padded(&data, 0), Word::from(0xffff_ffffu64) << 224);
        assert_eq!(load_padded(&data, 100), w(0));
    }

    #[test]
    fn address_roundtrip() {
        let address = Address::from_low_u64_be(0x1000);
        assert_eq!(from_address(address), w(0x1000));
        assert_eq!(to_address(w(0x1000)), address);
        // High bytes are dropped.
        assert_eq!(to_address(Word::MAX), Address::repeat_byte(0xff));
    }
}
