//! unit-codec - Unit descriptor field codec
//!
//! Encodes a physical quantity (SI prefix plus up to six unit/exponent pairs)
//! into the 64-bit unit field of sensor and array message headers, and decodes
//! it back.
//!
//! # Modules
//!
//! - `tables`: unit, exponent and prefix code tables
//! - `descriptor`: validated descriptor values (`UnitDescriptor`, `CodedDescriptor`)
//! - `codec`: bit layout, `pack`/`unpack`, buffer helpers
//! - `error`: `ValidationError`
//!
//! # Example
//!
//! ```
//! use unit_codec::{pack, unpack, PackUnit, UnitDescriptor, Unit};
//!
//! // meters per second squared
//! let accel = UnitDescriptor::new(["meter", "second"], "none", [1, -2]).unwrap();
//! let bytes = pack(&accel);
//!
//! // The receiver only gets raw codes back
//! let coded = unpack(u64::from_be_bytes(bytes)).unwrap();
//! assert_eq!(coded.unit_codes(), &[1, 3, 0, 0, 0, 0]);
//! assert_eq!(coded.exponent_codes(), &[1, 0xE, 0, 0, 0, 0]);
//!
//! // Symbolic form is an explicit, separate step
//! let named = coded.to_named().unwrap();
//! assert_eq!(named.units(), &[Unit::Meter, Unit::Second]);
//! assert_eq!(named.pack_word(), coded.pack_word());
//! ```

pub mod codec;
pub mod descriptor;
pub mod error;
pub mod tables;

// Re-exports for convenience
pub use codec::{get, pack, unpack, unpack_bytes, PackUnit, PACKED_LEN};
pub use descriptor::{
    CodedDescriptor, DescriptorSpec, OneOrMany, PrefixAlias, UnitDescriptor, UnitRef, MAX_UNITS,
};
pub use error::{Result, ValidationError};
pub use tables::{Prefix, Unit, EXPONENT_TABLE};
