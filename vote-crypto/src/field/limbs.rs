//! Fixed-width 256-bit unsigned integers.
//!
//! [U256] is the raw integer type underneath both prime fields of this crate. It stores four
//! 64-bit limbs in little-endian order and provides the carry-propagating primitives needed by
//! Montgomery arithmetic. Most operations are `const fn` so that curve and hash constants can be
//! evaluated at compile time.

use core::{cmp::Ordering, fmt};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// Number of 64-bit limbs in a [U256].
pub const LIMBS: usize = 4;

/// Number of bytes in the big-endian encoding of a [U256].
pub const U256_BYTES: usize = 32;

// LIMB PRIMITIVES
// ================================================================================================

/// Computes `a + b + carry`, returning the result and the new carry.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result and the new borrow (0 or 1).
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (ret as u64, ((ret >> 64) as u64) & 1)
}

/// Computes `a + (b * c) + carry`, returning the result and the new carry.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

// U256
// ================================================================================================

/// A 256-bit unsigned integer stored as four little-endian 64-bit limbs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct U256(pub(crate) [u64; LIMBS]);

impl U256 {
    /// The integer zero.
    pub const ZERO: Self = Self([0; LIMBS]);

    /// The integer one.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// The largest representable integer, `2^256 - 1`.
    pub const MAX: Self = Self([u64::MAX; LIMBS]);

    /// Width of the integer in bits.
    pub const BITS: u32 = 256;

    /// Creates an integer from little-endian limbs.
    pub const fn from_words(words: [u64; LIMBS]) -> Self {
        Self(words)
    }

    /// Returns the little-endian limbs of this integer.
    pub const fn to_words(self) -> [u64; LIMBS] {
        self.0
    }

    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    pub const fn from_u128(value: u128) -> Self {
        Self([value as u64, (value >> 64) as u64, 0, 0])
    }

    /// Parses a big-endian hex constant, with or without a `0x` prefix.
    ///
    /// This is intended for compile-time constants: it panics on malformed input. Use
    /// [crate::utils::hex_to_u256] to parse untrusted strings.
    pub const fn from_be_hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        let mut start = 0;
        if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
            start = 2;
        }
        assert!(bytes.len() > start, "hex constant has no digits");
        assert!(bytes.len() - start <= 2 * U256_BYTES, "hex constant is wider than 256 bits");

        let mut limbs = [0u64; LIMBS];
        let mut nibble = 0;
        let mut i = bytes.len();
        while i > start {
            i -= 1;
            let digit = match bytes[i] {
                b'0'..=b'9' => bytes[i] - b'0',
                b'a'..=b'f' => bytes[i] - b'a' + 10,
                b'A'..=b'F' => bytes[i] - b'A' + 10,
                _ => panic!("invalid character in hex constant"),
            };
            limbs[nibble / 16] |= (digit as u64) << ((nibble % 16) * 4);
            nibble += 1;
        }

        Self(limbs)
    }

    /// Creates an integer from its 32-byte big-endian encoding.
    pub const fn from_be_bytes(bytes: &[u8; U256_BYTES]) -> Self {
        let mut limbs = [0u64; LIMBS];
        let mut i = 0;
        while i < U256_BYTES {
            let limb = LIMBS - 1 - i / 8;
            limbs[limb] = (limbs[limb] << 8) | bytes[i] as u64;
            i += 1;
        }
        Self(limbs)
    }

    /// Returns the 32-byte big-endian encoding of this integer.
    pub const fn to_be_bytes(&self) -> [u8; U256_BYTES] {
        let mut bytes = [0u8; U256_BYTES];
        let mut i = 0;
        while i < U256_BYTES {
            let limb = self.0[LIMBS - 1 - i / 8];
            bytes[i] = (limb >> (56 - 8 * (i % 8))) as u8;
            i += 1;
        }
        bytes
    }

    /// Returns the big-endian encoding with leading zero bytes stripped.
    ///
    /// Zero is encoded as an empty slice.
    pub fn to_minimal_be_bytes(&self) -> alloc::vec::Vec<u8> {
        let bytes = self.to_be_bytes();
        let skip = (U256_BYTES * 8 - self.bits() as usize) / 8;
        bytes[skip..].to_vec()
    }

    pub const fn is_zero(&self) -> bool {
        (self.0[0] | self.0[1] | self.0[2] | self.0[3]) == 0
    }

    pub const fn is_odd(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Returns the bit at position `index` (0 is the least significant bit).
    pub const fn bit(&self, index: usize) -> bool {
        index < 256 && (self.0[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Returns the number of significant bits, i.e. `0` for zero.
    pub const fn bits(&self) -> u32 {
        let mut i = LIMBS;
        while i > 0 {
            i -= 1;
            if self.0[i] != 0 {
                return (i as u32) * 64 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    /// Returns the number of trailing zero bits; `256` for zero.
    pub const fn trailing_zeros(&self) -> u32 {
        let mut i = 0;
        while i < LIMBS {
            if self.0[i] != 0 {
                return (i as u32) * 64 + self.0[i].trailing_zeros();
            }
            i += 1;
        }
        256
    }

    /// Computes `self + rhs`, returning the wrapped sum and the carry.
    pub const fn adc(&self, rhs: &Self) -> (Self, u64) {
        let (w0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (w1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (w2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (w3, carry) = adc(self.0[3], rhs.0[3], carry);
        (Self([w0, w1, w2, w3]), carry)
    }

    /// Computes `self - rhs`, returning the wrapped difference and the borrow (0 or 1).
    pub const fn sbb(&self, rhs: &Self) -> (Self, u64) {
        let (w0, borrow) = sbb(self.0[0], rhs.0[0], 0);
        let (w1, borrow) = sbb(self.0[1], rhs.0[1], borrow);
        let (w2, borrow) = sbb(self.0[2], rhs.0[2], borrow);
        let (w3, borrow) = sbb(self.0[3], rhs.0[3], borrow);
        (Self([w0, w1, w2, w3]), borrow)
    }

    pub const fn wrapping_add(&self, rhs: &Self) -> Self {
        self.adc(rhs).0
    }

    pub const fn wrapping_sub(&self, rhs: &Self) -> Self {
        self.sbb(rhs).0
    }

    /// Returns `true` if `self < rhs`. Runs in constant time.
    pub const fn lt(&self, rhs: &Self) -> bool {
        self.sbb(rhs).1 == 1
    }

    /// Shifts left by `shift` bits, discarding bits shifted out.
    pub const fn shl(&self, shift: u32) -> Self {
        if shift >= 256 {
            return Self::ZERO;
        }
        let limb_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut out = [0u64; LIMBS];
        let mut i = LIMBS;
        while i > limb_shift {
            i -= 1;
            let src = i - limb_shift;
            out[i] = self.0[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                out[i] |= self.0[src - 1] >> (64 - bit_shift);
            }
        }
        Self(out)
    }

    /// Shifts right by `shift` bits.
    pub const fn shr(&self, shift: u32) -> Self {
        if shift >= 256 {
            return Self::ZERO;
        }
        let limb_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let mut out = [0u64; LIMBS];
        let mut i = 0;
        while i + limb_shift < LIMBS {
            let src = i + limb_shift;
            out[i] = self.0[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < LIMBS {
                out[i] |= self.0[src + 1] << (64 - bit_shift);
            }
            i += 1;
        }
        Self(out)
    }

    /// Keeps the `count` least significant bits and clears the rest.
    pub const fn low_bits(&self, count: u32) -> Self {
        if count >= 256 {
            return *self;
        }
        let mut out = self.0;
        let mut i = 0;
        while i < LIMBS {
            let start = (i as u32) * 64;
            if start >= count {
                out[i] = 0;
            } else if count - start < 64 {
                out[i] &= (1u64 << (count - start)) - 1;
            }
            i += 1;
        }
        Self(out)
    }

    /// Computes `self * factor + addend`, returning `None` on overflow.
    pub(crate) const fn checked_mul_small_add(&self, factor: u64, addend: u64) -> Option<Self> {
        let (w0, carry) = mac(addend, self.0[0], factor, 0);
        let (w1, carry) = mac(0, self.0[1], factor, carry);
        let (w2, carry) = mac(0, self.0[2], factor, carry);
        let (w3, carry) = mac(0, self.0[3], factor, carry);
        if carry != 0 { None } else { Some(Self([w0, w1, w2, w3])) }
    }
}

// TRAIT IMPLEMENTATIONS
// ================================================================================================

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ConstantTimeEq for U256 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl ConditionallySelectable for U256 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl Zeroize for U256 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

/// Formats the integer in minimal lower-case hex; `0` for zero.
impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        let mut started = false;
        for i in (0..LIMBS).rev() {
            if started {
                write!(f, "{:016x}", self.0[i])?;
            } else if self.0[i] != 0 {
                write!(f, "{:x}", self.0[i])?;
                started = true;
            }
        }
        if !started {
            f.write_str("0")?;
        }
        Ok(())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self:#x})")
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:#x}")
    }
}
