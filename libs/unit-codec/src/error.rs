//! Error types for unit-codec

use thiserror::Error;

/// Result type for unit-codec operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Descriptor validation errors
///
/// Every failure of the codec is a validation failure: construction, field
/// updates and unpacking all run the same checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Too many units: {count} given, at most {max} allowed")]
    TooManyUnits { count: usize, max: usize },

    #[error("Descriptor needs at least one unit")]
    NoUnits,

    #[error("Unit/exponent count mismatch: {units} units, {exponents} exponents")]
    CountMismatch { units: usize, exponents: usize },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown unit code: {0}")]
    UnknownUnitCode(u8),

    #[error("Exponent not supported: {0}")]
    UnsupportedExponent(i32),

    #[error("Unknown exponent code: 0x{0:X}")]
    UnknownExponentCode(u8),

    #[error("Prefix not supported: {0}")]
    UnknownPrefix(String),

    #[error("Unknown prefix code: 0x{0:X}")]
    UnknownPrefixCode(u8),

    #[error("Empty unit slot {slot} precedes a populated slot")]
    SlotGap { slot: usize },

    #[error("Buffer too short: need {needed} bytes, {available} available")]
    BufferTooShort { needed: usize, available: usize },
}

impl ValidationError {
    pub fn unknown_unit(name: impl Into<String>) -> Self {
        Self::UnknownUnit(name.into())
    }

    pub fn unknown_prefix(alias: impl Into<String>) -> Self {
        Self::UnknownPrefix(alias.into())
    }
}
