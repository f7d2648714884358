//! Code tables for the unit descriptor field
//!
//! Three static tables:
//! - physical units, 6-bit codes 1..=27 (0 means "no unit in this slot")
//! - decimal exponents, 4-bit codes (two's-complement nibble for negatives)
//! - SI prefixes, 4-bit codes, reachable through three alias families
//!   (name, power of ten, notation string) that all resolve to one code

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// ============================================================================
// Units
// ============================================================================

/// Reserved unit code for an empty slot
pub const NO_UNIT: u8 = 0x00;

/// Physical unit with its wire code as discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Unit {
    Meter = 0x01,
    Gram = 0x02,
    Second = 0x03,
    Ampere = 0x04,
    Kelvin = 0x05,
    Mole = 0x06,
    Candela = 0x07,
    Radian = 0x08,
    Steradian = 0x09,
    Hertz = 0x0A,
    Newton = 0x0B,
    Pascal = 0x0C,
    Joule = 0x0D,
    Watt = 0x0E,
    Coulomb = 0x0F,
    Volt = 0x10,
    Farad = 0x11,
    Ohm = 0x12,
    Siemens = 0x13,
    Weber = 0x14,
    Tesla = 0x15,
    Henry = 0x16,
    Lumen = 0x17,
    Lux = 0x18,
    Becquerel = 0x19,
    Gray = 0x1A,
    Sievert = 0x1B,
}

impl Unit {
    /// All units in code order (index = code - 1)
    pub const ALL: [Unit; 27] = [
        Unit::Meter,
        Unit::Gram,
        Unit::Second,
        Unit::Ampere,
        Unit::Kelvin,
        Unit::Mole,
        Unit::Candela,
        Unit::Radian,
        Unit::Steradian,
        Unit::Hertz,
        Unit::Newton,
        Unit::Pascal,
        Unit::Joule,
        Unit::Watt,
        Unit::Coulomb,
        Unit::Volt,
        Unit::Farad,
        Unit::Ohm,
        Unit::Siemens,
        Unit::Weber,
        Unit::Tesla,
        Unit::Henry,
        Unit::Lumen,
        Unit::Lux,
        Unit::Becquerel,
        Unit::Gray,
        Unit::Sievert,
    ];

    /// 6-bit wire code
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a unit by wire code. Code 0 is "no unit" and returns `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => None,
            c => Self::ALL.get(usize::from(c) - 1).copied(),
        }
    }

    /// Look up a unit by its table name (exact, lowercase)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Meter => "meter",
            Unit::Gram => "gram",
            Unit::Second => "second",
            Unit::Ampere => "ampere",
            Unit::Kelvin => "kelvin",
            Unit::Mole => "mole",
            Unit::Candela => "candela",
            Unit::Radian => "radian",
            Unit::Steradian => "steradian",
            Unit::Hertz => "hertz",
            Unit::Newton => "newton",
            Unit::Pascal => "pascal",
            Unit::Joule => "joule",
            Unit::Watt => "watt",
            Unit::Coulomb => "coulomb",
            Unit::Volt => "volt",
            Unit::Farad => "farad",
            Unit::Ohm => "ohm",
            Unit::Siemens => "siemens",
            Unit::Weber => "weber",
            Unit::Tesla => "tesla",
            Unit::Henry => "henry",
            Unit::Lumen => "lumen",
            Unit::Lux => "lux",
            Unit::Becquerel => "becquerel",
            Unit::Gray => "gray",
            Unit::Sievert => "sievert",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ValidationError::unknown_unit(s))
    }
}

/// Whether `code` is acceptable in a raw unit slot (0 or a table code)
#[inline]
pub fn is_unit_code(code: u8) -> bool {
    code == NO_UNIT || Unit::from_code(code).is_some()
}

// ============================================================================
// Exponents
// ============================================================================

/// Decimal exponent to 4-bit code.
///
/// Negative exponents use the low nibble of their two's complement, stopping
/// at -6. Codes 0x8 and 0x9 are never produced.
pub const EXPONENT_TABLE: [(i8, u8); 14] = [
    (0, 0x0),
    (1, 0x1),
    (2, 0x2),
    (3, 0x3),
    (4, 0x4),
    (5, 0x5),
    (6, 0x6),
    (7, 0x7),
    (-1, 0xF),
    (-2, 0xE),
    (-3, 0xD),
    (-4, 0xC),
    (-5, 0xB),
    (-6, 0xA),
];

/// Code for a decimal exponent, if supported
pub fn exponent_code(exponent: i32) -> Option<u8> {
    EXPONENT_TABLE
        .iter()
        .find(|(e, _)| i32::from(*e) == exponent)
        .map(|&(_, code)| code)
}

/// Decimal exponent for a 4-bit code, if the code is in the table
pub fn exponent_from_code(code: u8) -> Option<i8> {
    EXPONENT_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map(|&(e, _)| e)
}

// ============================================================================
// Prefixes
// ============================================================================

/// Reserved prefix code for "no prefix"
pub const NO_PREFIX: u8 = 0x0;

/// SI magnitude prefix with its wire code as discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Prefix {
    Deka = 0x1,
    Hecto = 0x2,
    Kilo = 0x3,
    Mega = 0x4,
    Giga = 0x5,
    Tera = 0x6,
    Peta = 0x7,
    Deci = 0x9,
    Centi = 0xA,
    Milli = 0xB,
    Micro = 0xC,
    Nano = 0xD,
    Pico = 0xE,
    Femto = 0xF,
}

impl Prefix {
    pub const ALL: [Prefix; 14] = [
        Prefix::Deka,
        Prefix::Hecto,
        Prefix::Kilo,
        Prefix::Mega,
        Prefix::Giga,
        Prefix::Tera,
        Prefix::Peta,
        Prefix::Deci,
        Prefix::Centi,
        Prefix::Milli,
        Prefix::Micro,
        Prefix::Nano,
        Prefix::Pico,
        Prefix::Femto,
    ];

    /// 4-bit wire code
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a prefix by wire code. 0x0 ("none") and 0x8 return `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            Prefix::Deka => "deka",
            Prefix::Hecto => "hecto",
            Prefix::Kilo => "kilo",
            Prefix::Mega => "mega",
            Prefix::Giga => "giga",
            Prefix::Tera => "tera",
            Prefix::Peta => "peta",
            Prefix::Deci => "deci",
            Prefix::Centi => "centi",
            Prefix::Milli => "milli",
            Prefix::Micro => "micro",
            Prefix::Nano => "nano",
            Prefix::Pico => "pico",
            Prefix::Femto => "femto",
        }
    }

    /// Power of ten this prefix stands for
    pub fn power(self) -> i32 {
        match self {
            Prefix::Deka => 1,
            Prefix::Hecto => 2,
            Prefix::Kilo => 3,
            Prefix::Mega => 6,
            Prefix::Giga => 9,
            Prefix::Tera => 12,
            Prefix::Peta => 15,
            Prefix::Deci => -1,
            Prefix::Centi => -2,
            Prefix::Milli => -3,
            Prefix::Micro => -6,
            Prefix::Nano => -9,
            Prefix::Pico => -12,
            Prefix::Femto => -15,
        }
    }

    /// Notation alias, e.g. `"1e3"` for kilo
    pub fn notation(self) -> String {
        format!("1e{}", self.power())
    }

    /// Name alias lookup. "deca" is accepted as a spelling of deka.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "deca" => Some(Prefix::Deka),
            _ => Self::ALL.iter().copied().find(|p| p.name() == name),
        }
    }

    /// Power-of-ten alias lookup
    pub fn from_power(power: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.power() == power)
    }

    /// Notation alias lookup (exact string match, e.g. `"1e-6"`)
    pub fn from_notation(notation: &str) -> Option<Self> {
        let power = notation.strip_prefix("1e")?;
        // "1e+3" and "1e03" are not table keys
        if power.starts_with('+') || power.trim_start_matches('-').starts_with('0') {
            return None;
        }
        Self::from_power(power.parse().ok()?)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Prefix {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_notation(s))
            .ok_or_else(|| ValidationError::unknown_prefix(s))
    }
}

/// Wire code for an optional prefix
#[inline]
pub fn prefix_code(prefix: Option<Prefix>) -> u8 {
    prefix.map_or(NO_PREFIX, Prefix::code)
}

/// Whether `code` is acceptable in the raw prefix field (0 or a table code)
#[inline]
pub fn is_prefix_code(code: u8) -> bool {
    code == NO_PREFIX || Prefix::from_code(code).is_some()
}
