//! Pack/unpack of the 64-bit unit field
//!
//! Bit layout (bit 63 = MSB), transmitted big-endian:
//!
//! | Bits    | Field                      |
//! |---------|----------------------------|
//! | 63..60  | prefix code                |
//! | 59..54  | unit code, slot 0          |
//! | 53..50  | exponent code, slot 0      |
//! | 49..44  | unit code, slot 1          |
//! | ...     | ...                        |
//! | 9..4    | unit code, slot 5          |
//! | 3..0    | exponent code, slot 5      |
//!
//! The surrounding message places this word at its header offset and does not
//! interpret any bit of it.

use bytes::{Buf, BufMut};
use tracing::debug;

use crate::descriptor::{CodedDescriptor, UnitDescriptor, MAX_UNITS};
use crate::error::{Result, ValidationError};

/// Encoded size of the unit field
pub const PACKED_LEN: usize = 8;

const PREFIX_SHIFT: u32 = 60;
const PREFIX_MASK: u64 = 0x0F;
const UNIT_MASK: u64 = 0x3F;
const EXPONENT_MASK: u64 = 0x0F;
const SLOT_BITS: usize = 10;

/// Bit offset of the unit code in `slot`
#[inline]
const fn unit_shift(slot: usize) -> usize {
    SLOT_BITS * (MAX_UNITS - 1 - slot) + 4
}

/// Bit offset of the exponent code in `slot`
#[inline]
const fn exponent_shift(slot: usize) -> usize {
    SLOT_BITS * (MAX_UNITS - 1 - slot)
}

/// Anything that can be laid out as the 64-bit unit field
pub trait PackUnit {
    /// Packed field as an integer
    fn pack_word(&self) -> u64;

    /// Packed field as big-endian bytes, ready to embed in a message
    fn pack(&self) -> [u8; PACKED_LEN] {
        self.pack_word().to_be_bytes()
    }

    /// Append the packed field to a message buffer
    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u64(self.pack_word());
    }
}

impl PackUnit for CodedDescriptor {
    fn pack_word(&self) -> u64 {
        let units = self.unit_codes();
        let exponents = self.exponent_codes();

        let mut word = (u64::from(self.prefix_code()) & PREFIX_MASK) << PREFIX_SHIFT;
        for slot in 0..MAX_UNITS {
            word |= (u64::from(units[slot]) & UNIT_MASK) << unit_shift(slot);
            word |= (u64::from(exponents[slot]) & EXPONENT_MASK) << exponent_shift(slot);
        }

        debug!("Packed unit field: 0x{:016X}", word);
        word
    }
}

impl PackUnit for UnitDescriptor {
    fn pack_word(&self) -> u64 {
        self.to_coded().pack_word()
    }
}

/// Pack a descriptor into its 8-byte big-endian wire form
///
/// ```
/// use unit_codec::{pack, UnitDescriptor};
///
/// let meter = UnitDescriptor::from_unit("meter").unwrap();
/// assert_eq!(pack(&meter), 0x0044_0000_0000_0000u64.to_be_bytes());
/// ```
pub fn pack<D: PackUnit>(descriptor: &D) -> [u8; PACKED_LEN] {
    descriptor.pack()
}

/// Unpack a 64-bit field into raw codes.
///
/// Always yields six slots; validation runs on the raw codes, so a word
/// carrying e.g. exponent code 0x8 or unit code 28 is rejected.
pub fn unpack(word: u64) -> Result<CodedDescriptor> {
    let prefix = ((word >> PREFIX_SHIFT) & PREFIX_MASK) as u8;

    let mut units = [0u8; MAX_UNITS];
    let mut exponents = [0u8; MAX_UNITS];
    for slot in 0..MAX_UNITS {
        units[slot] = ((word >> unit_shift(slot)) & UNIT_MASK) as u8;
        exponents[slot] = ((word >> exponent_shift(slot)) & EXPONENT_MASK) as u8;
    }

    debug!(
        "Unpacked unit field 0x{:016X}: prefix={:X}, units={:?}, exponents={:?}",
        word, prefix, units, exponents
    );
    CodedDescriptor::from_codes(prefix, &units, &exponents)
}

/// Unpack the 8-byte big-endian wire form
pub fn unpack_bytes(bytes: &[u8; PACKED_LEN]) -> Result<CodedDescriptor> {
    unpack(u64::from_be_bytes(*bytes))
}

/// Consume the 8-byte field from a message buffer and unpack it
pub fn get<B: Buf>(buf: &mut B) -> Result<CodedDescriptor> {
    if buf.remaining() < PACKED_LEN {
        return Err(ValidationError::BufferTooShort {
            needed: PACKED_LEN,
            available: buf.remaining(),
        });
    }
    unpack(buf.get_u64())
}
