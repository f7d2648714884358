//! Descriptor values
//!
//! Two shapes, one per codec direction:
//! - [`UnitDescriptor`]: built from symbolic input (names, aliases, decimal
//!   exponents). This is what callers construct and pack.
//! - [`CodedDescriptor`]: six raw (unit code, exponent code) slots plus a raw
//!   prefix code. This is what `unpack` returns.
//!
//! Both are validated on construction and immutable afterwards, apart from
//! the re-validating setters on `UnitDescriptor`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::tables::{
    exponent_code, exponent_from_code, is_prefix_code, is_unit_code, prefix_code, Prefix, Unit,
    NO_UNIT,
};

/// Maximum number of (unit, exponent) slots in a descriptor
pub const MAX_UNITS: usize = 6;

// ============================================================================
// Input types
// ============================================================================

/// A single value or an ordered sequence, normalized once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Build a sequence from anything convertible into `T`
    pub fn many<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<T>,
    {
        Self::Many(items.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(v: Vec<T>) -> Self {
        Self::Many(v)
    }
}

impl<T, const N: usize> From<[T; N]> for OneOrMany<T> {
    fn from(v: [T; N]) -> Self {
        Self::Many(v.into())
    }
}

impl From<i32> for OneOrMany<i32> {
    fn from(v: i32) -> Self {
        Self::One(v)
    }
}

impl From<UnitRef> for OneOrMany<UnitRef> {
    fn from(v: UnitRef) -> Self {
        Self::One(v)
    }
}

impl From<&str> for OneOrMany<UnitRef> {
    fn from(v: &str) -> Self {
        Self::One(v.into())
    }
}

impl From<Unit> for OneOrMany<UnitRef> {
    fn from(v: Unit) -> Self {
        Self::One(v.into())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<UnitRef> {
    fn from(v: [&str; N]) -> Self {
        Self::many(v)
    }
}

impl<const N: usize> From<[Unit; N]> for OneOrMany<UnitRef> {
    fn from(v: [Unit; N]) -> Self {
        Self::many(v)
    }
}

/// A unit given either by table name or by raw wire code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitRef {
    Code(u8),
    Name(String),
}

impl UnitRef {
    /// Resolve through the name lookup or the code lookup.
    ///
    /// Code 0 ("no unit") is not a unit on this path.
    pub fn resolve(&self) -> Result<Unit> {
        match self {
            UnitRef::Name(name) => {
                Unit::from_name(name).ok_or_else(|| ValidationError::unknown_unit(name.as_str()))
            },
            UnitRef::Code(code) => {
                Unit::from_code(*code).ok_or(ValidationError::UnknownUnitCode(*code))
            },
        }
    }
}

impl From<&str> for UnitRef {
    fn from(v: &str) -> Self {
        UnitRef::Name(v.to_string())
    }
}

impl From<String> for UnitRef {
    fn from(v: String) -> Self {
        UnitRef::Name(v)
    }
}

impl From<u8> for UnitRef {
    fn from(v: u8) -> Self {
        UnitRef::Code(v)
    }
}

impl From<Unit> for UnitRef {
    fn from(v: Unit) -> Self {
        UnitRef::Name(v.name().to_string())
    }
}

/// A prefix given through one of its alias families
///
/// All families resolve to the same canonical [`Prefix`]; which alias was
/// used is not kept after construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PrefixInput", into = "PrefixInput")]
pub enum PrefixAlias {
    #[default]
    None,
    /// `"kilo"`, `"deca"`, ...
    Name(String),
    /// Signed power of ten, e.g. `3` or `-6`
    Power(i32),
    /// `"1e3"`, `"1e-6"`, ...
    Notation(String),
}

impl PrefixAlias {
    pub fn is_none(&self) -> bool {
        matches!(self, PrefixAlias::None)
    }

    pub fn resolve(&self) -> Result<Option<Prefix>> {
        let resolved = match self {
            PrefixAlias::None => return Ok(None),
            PrefixAlias::Name(name) if name == "none" => return Ok(None),
            PrefixAlias::Name(name) => Prefix::from_name(name),
            PrefixAlias::Power(power) => Prefix::from_power(*power),
            PrefixAlias::Notation(notation) => Prefix::from_notation(notation),
        };
        resolved
            .map(Some)
            .ok_or_else(|| ValidationError::unknown_prefix(self.to_string()))
    }
}

impl fmt::Display for PrefixAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixAlias::None => f.write_str("none"),
            PrefixAlias::Name(s) | PrefixAlias::Notation(s) => f.write_str(s),
            PrefixAlias::Power(p) => write!(f, "{}", p),
        }
    }
}

impl From<&str> for PrefixAlias {
    /// Integers become powers, `1e..` a notation, anything else a name
    fn from(v: &str) -> Self {
        if let Ok(power) = v.parse::<i32>() {
            PrefixAlias::Power(power)
        } else if v == "none" {
            PrefixAlias::None
        } else if v.starts_with("1e") {
            PrefixAlias::Notation(v.to_string())
        } else {
            PrefixAlias::Name(v.to_string())
        }
    }
}

impl From<i32> for PrefixAlias {
    fn from(v: i32) -> Self {
        PrefixAlias::Power(v)
    }
}

impl From<Prefix> for PrefixAlias {
    fn from(v: Prefix) -> Self {
        PrefixAlias::Name(v.name().to_string())
    }
}

impl From<Option<Prefix>> for PrefixAlias {
    fn from(v: Option<Prefix>) -> Self {
        v.map_or(PrefixAlias::None, Into::into)
    }
}

impl FromStr for PrefixAlias {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(PrefixAlias::from(s))
    }
}

/// Wire form of a prefix alias in YAML/JSON.
///
/// YAML reads an unquoted `1e3` as a float, so exact powers of ten are
/// accepted as numbers too. `null` means no prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PrefixInput {
    Power(i32),
    Float(f64),
    Text(String),
    Null,
}

/// Power of ten `v` is exactly (up to float rounding), if any
fn power_of_ten(v: f64) -> Option<i32> {
    if !v.is_finite() || v <= 0.0 {
        return None;
    }
    let power = v.log10().round();
    let exact = 10f64.powi(power as i32);
    (((exact - v) / v).abs() < 1e-9).then_some(power as i32)
}

impl From<PrefixInput> for PrefixAlias {
    fn from(v: PrefixInput) -> Self {
        match v {
            PrefixInput::Power(p) => PrefixAlias::Power(p),
            PrefixInput::Float(f) => match power_of_ten(f) {
                Some(p) => PrefixAlias::Power(p),
                None => PrefixAlias::Notation(f.to_string()),
            },
            PrefixInput::Text(s) => PrefixAlias::from(s.as_str()),
            PrefixInput::Null => PrefixAlias::None,
        }
    }
}

impl From<PrefixAlias> for PrefixInput {
    fn from(v: PrefixAlias) -> Self {
        match v {
            PrefixAlias::Power(p) => PrefixInput::Power(p),
            other => PrefixInput::Text(other.to_string()),
        }
    }
}

// ============================================================================
// UnitDescriptor
// ============================================================================

/// Validated symbolic descriptor: prefix plus 1 to 6 ordered (unit, exponent) pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorSpec", into = "DescriptorSpec")]
pub struct UnitDescriptor {
    units: Vec<Unit>,
    exponents: Vec<i8>,
    prefix: Option<Prefix>,
}

impl UnitDescriptor {
    /// Build and validate a descriptor.
    ///
    /// A scalar unit or exponent counts as a one-element sequence. Exponents
    /// are not broadcast: several units need as many exponents.
    ///
    /// ```
    /// use unit_codec::{PrefixAlias, UnitDescriptor};
    ///
    /// let accel = UnitDescriptor::new(["meter", "second"], PrefixAlias::None, [1, -2]).unwrap();
    /// assert_eq!(accel.len(), 2);
    ///
    /// assert!(UnitDescriptor::new(["meter", "gram"], PrefixAlias::None, 1).is_err());
    /// assert!(UnitDescriptor::new("meter", "not-a-prefix", 1).is_err());
    /// ```
    pub fn new(
        units: impl Into<OneOrMany<UnitRef>>,
        prefix: impl Into<PrefixAlias>,
        exponents: impl Into<OneOrMany<i32>>,
    ) -> Result<Self> {
        let units = units.into().into_vec();
        let exponents = exponents.into().into_vec();
        let prefix = prefix.into();
        let (units, exponents, prefix) = validate(&units, &prefix, &exponents)
            .inspect_err(|e| debug!("Unit descriptor rejected: {}", e))?;
        Ok(Self {
            units,
            exponents,
            prefix,
        })
    }

    /// Single unit, no prefix, exponent 1
    pub fn from_unit(unit: impl Into<UnitRef>) -> Result<Self> {
        Self::new(OneOrMany::One(unit.into()), PrefixAlias::None, 1)
    }

    /// Already-resolved parts; callers guarantee the invariants
    pub(crate) fn from_parts(units: Vec<Unit>, exponents: Vec<i8>, prefix: Option<Prefix>) -> Self {
        debug_assert!(!units.is_empty() && units.len() <= MAX_UNITS);
        debug_assert_eq!(units.len(), exponents.len());
        Self {
            units,
            exponents,
            prefix,
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Decimal exponents, one per unit
    pub fn exponents(&self) -> &[i8] {
        &self.exponents
    }

    pub fn prefix(&self) -> Option<Prefix> {
        self.prefix
    }

    /// Number of populated slots (1..=6)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false for a validated descriptor
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// (unit, exponent) pairs in slot order
    pub fn terms(&self) -> impl Iterator<Item = (Unit, i8)> + '_ {
        self.units.iter().copied().zip(self.exponents.iter().copied())
    }

    /// Replace the units. Fails without changing `self` if the result is invalid.
    pub fn set_units(&mut self, units: impl Into<OneOrMany<UnitRef>>) -> Result<()> {
        let units = units.into().into_vec();
        let (units, _, _) = validate(
            &units,
            &PrefixAlias::from(self.prefix),
            &self.exponents.iter().map(|&e| i32::from(e)).collect::<Vec<_>>(),
        )
        .inspect_err(|e| debug!("Unit update rejected: {}", e))?;
        self.units = units;
        Ok(())
    }

    /// Replace the exponents. Fails without changing `self` if the result is invalid.
    pub fn set_exponents(&mut self, exponents: impl Into<OneOrMany<i32>>) -> Result<()> {
        let exponents = exponents.into().into_vec();
        let prefix = PrefixAlias::from(self.prefix);
        let (_, exponents, _) = validate(&self.unit_refs(), &prefix, &exponents)
            .inspect_err(|e| debug!("Exponent update rejected: {}", e))?;
        self.exponents = exponents;
        Ok(())
    }

    /// Replace the prefix. Fails without changing `self` if the alias is unknown.
    pub fn set_prefix(&mut self, prefix: impl Into<PrefixAlias>) -> Result<()> {
        let prefix = prefix
            .into()
            .resolve()
            .inspect_err(|e| debug!("Prefix update rejected: {}", e))?;
        self.prefix = prefix;
        Ok(())
    }

    /// Raw-code form, with unused slots zeroed
    pub fn to_coded(&self) -> CodedDescriptor {
        let mut units = [NO_UNIT; MAX_UNITS];
        let mut exponents = [0u8; MAX_UNITS];
        for (i, (unit, exponent)) in self.terms().enumerate() {
            units[i] = unit.code();
            let code = exponent_code(i32::from(exponent));
            debug_assert!(code.is_some(), "exponent {} outside the table", exponent);
            exponents[i] = code.unwrap_or(0);
        }
        CodedDescriptor {
            prefix: prefix_code(self.prefix),
            units,
            exponents,
        }
    }

    fn unit_refs(&self) -> Vec<UnitRef> {
        self.units.iter().map(|&u| UnitRef::Code(u.code())).collect()
    }
}

impl fmt::Display for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{}(", prefix)?;
        }
        for (i, (unit, exponent)) in self.terms().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}^{}", unit, exponent)?;
        }
        if self.prefix.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Construction rules shared by `new` and the setters
fn validate(
    units: &[UnitRef],
    prefix: &PrefixAlias,
    exponents: &[i32],
) -> Result<(Vec<Unit>, Vec<i8>, Option<Prefix>)> {
    if units.len() > MAX_UNITS {
        return Err(ValidationError::TooManyUnits {
            count: units.len(),
            max: MAX_UNITS,
        });
    }
    if units.is_empty() {
        return Err(ValidationError::NoUnits);
    }
    if units.len() != exponents.len() {
        return Err(ValidationError::CountMismatch {
            units: units.len(),
            exponents: exponents.len(),
        });
    }

    let prefix = prefix.resolve()?;
    let units = units.iter().map(UnitRef::resolve).collect::<Result<Vec<_>>>()?;
    let exponents = exponents
        .iter()
        .map(|&e| match exponent_code(e) {
            // Table exponents all fit in i8
            Some(_) => Ok(e as i8),
            None => Err(ValidationError::UnsupportedExponent(e)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((units, exponents, prefix))
}

/// Serialized form of a [`UnitDescriptor`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorSpec {
    pub units: OneOrMany<UnitRef>,
    #[serde(default, skip_serializing_if = "PrefixAlias::is_none")]
    pub prefix: PrefixAlias,
    #[serde(default = "default_exponents")]
    pub exponents: OneOrMany<i32>,
}

fn default_exponents() -> OneOrMany<i32> {
    OneOrMany::One(1)
}

impl TryFrom<DescriptorSpec> for UnitDescriptor {
    type Error = ValidationError;

    fn try_from(spec: DescriptorSpec) -> Result<Self> {
        UnitDescriptor::new(spec.units, spec.prefix, spec.exponents)
    }
}

impl From<UnitDescriptor> for DescriptorSpec {
    fn from(d: UnitDescriptor) -> Self {
        Self {
            units: OneOrMany::many(d.units),
            prefix: d.prefix.into(),
            exponents: OneOrMany::many(d.exponents.into_iter().map(i32::from)),
        }
    }
}

// ============================================================================
// CodedDescriptor
// ============================================================================

/// Raw-code descriptor as carried on the wire
///
/// Always six slots. A slot with unit code 0 is empty; the codec does not
/// truncate empty slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CodedDescriptor {
    prefix: u8,
    units: [u8; MAX_UNITS],
    exponents: [u8; MAX_UNITS],
}

impl CodedDescriptor {
    /// Build from raw codes, zero-padding to six slots.
    ///
    /// Unit code 0 and prefix code 0 are accepted as "none".
    pub fn from_codes(prefix: u8, units: &[u8], exponents: &[u8]) -> Result<Self> {
        Self::check_codes(prefix, units, exponents)
            .inspect_err(|e| debug!("Coded descriptor rejected: {}", e))?;

        let mut coded = Self {
            prefix,
            units: [NO_UNIT; MAX_UNITS],
            exponents: [0; MAX_UNITS],
        };
        coded.units[..units.len()].copy_from_slice(units);
        coded.exponents[..exponents.len()].copy_from_slice(exponents);
        Ok(coded)
    }

    fn check_codes(prefix: u8, units: &[u8], exponents: &[u8]) -> Result<()> {
        if units.len() > MAX_UNITS {
            return Err(ValidationError::TooManyUnits {
                count: units.len(),
                max: MAX_UNITS,
            });
        }
        if units.len() != exponents.len() {
            return Err(ValidationError::CountMismatch {
                units: units.len(),
                exponents: exponents.len(),
            });
        }
        if !is_prefix_code(prefix) {
            return Err(ValidationError::UnknownPrefixCode(prefix));
        }
        if let Some(&code) = units.iter().find(|&&c| !is_unit_code(c)) {
            return Err(ValidationError::UnknownUnitCode(code));
        }
        if let Some(&code) = exponents.iter().find(|&&c| exponent_from_code(c).is_none()) {
            return Err(ValidationError::UnknownExponentCode(code));
        }
        Ok(())
    }

    pub fn prefix_code(&self) -> u8 {
        self.prefix
    }

    pub fn unit_codes(&self) -> &[u8; MAX_UNITS] {
        &self.units
    }

    pub fn exponent_codes(&self) -> &[u8; MAX_UNITS] {
        &self.exponents
    }

    /// (unit code, exponent code) of one slot
    pub fn slot(&self, index: usize) -> Option<(u8, u8)> {
        Some((*self.units.get(index)?, *self.exponents.get(index)?))
    }

    /// Number of slots with a non-zero unit code
    pub fn populated(&self) -> usize {
        self.units.iter().filter(|&&u| u != NO_UNIT).count()
    }

    /// True when no slot carries a unit
    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    /// Resolve codes back to symbolic form.
    ///
    /// Trailing empty slots are dropped. The canonical prefix name comes back,
    /// not the alias used at pack time.
    pub fn to_named(&self) -> Result<UnitDescriptor> {
        let last = self
            .units
            .iter()
            .rposition(|&u| u != NO_UNIT)
            .ok_or(ValidationError::NoUnits)?;

        let mut units = Vec::with_capacity(last + 1);
        let mut exponents = Vec::with_capacity(last + 1);
        for slot in 0..=last {
            let unit = match self.units[slot] {
                NO_UNIT => return Err(ValidationError::SlotGap { slot }),
                code => Unit::from_code(code).ok_or(ValidationError::UnknownUnitCode(code))?,
            };
            let exponent = exponent_from_code(self.exponents[slot])
                .ok_or(ValidationError::UnknownExponentCode(self.exponents[slot]))?;
            units.push(unit);
            exponents.push(exponent);
        }

        Ok(UnitDescriptor::from_parts(
            units,
            exponents,
            Prefix::from_code(self.prefix),
        ))
    }
}

impl From<&UnitDescriptor> for CodedDescriptor {
    fn from(d: &UnitDescriptor) -> Self {
        d.to_coded()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    // ========== Construction ==========

    #[test]
    fn test_scalar_inputs_normalize_to_one_slot() {
        let d = UnitDescriptor::new("meter", PrefixAlias::None, 1).unwrap();
        assert_eq!(d.units(), &[Unit::Meter]);
        assert_eq!(d.exponents(), &[1]);
        assert_eq!(d.prefix(), None);
        assert_eq!(d, UnitDescriptor::from_unit("meter").unwrap());
    }

    #[test]
    fn test_units_by_name_or_code_are_equivalent() {
        let by_name = UnitDescriptor::new(["meter", "second"], "kilo", [1, -2]).unwrap();
        let by_code = UnitDescriptor::new(
            OneOrMany::<UnitRef>::many([UnitRef::Code(1), UnitRef::Code(3)]),
            3,
            [1, -2],
        )
        .unwrap();
        assert_eq!(by_name, by_code);
    }

    #[test]
    fn test_six_units_accepted_seven_rejected() {
        let six = ["meter", "gram", "second", "ampere", "kelvin", "mole"];
        assert!(UnitDescriptor::new(six, PrefixAlias::None, [1; 6]).is_ok());

        let seven = ["meter", "gram", "second", "ampere", "kelvin", "mole", "candela"];
        let err = UnitDescriptor::new(seven, PrefixAlias::None, [1; 7]).unwrap_err();
        assert_eq!(err, ValidationError::TooManyUnits { count: 7, max: 6 });
    }

    #[test]
    fn test_no_exponent_broadcast() {
        let err = UnitDescriptor::new(["meter", "gram"], PrefixAlias::None, [1]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CountMismatch {
                units: 2,
                exponents: 1
            }
        );
        assert!(UnitDescriptor::new(["meter", "gram"], PrefixAlias::None, 1).is_err());
    }

    #[test]
    fn test_empty_units_rejected() {
        let err =
            UnitDescriptor::new(Vec::<UnitRef>::new(), PrefixAlias::None, Vec::<i32>::new())
                .unwrap_err();
        assert_eq!(err, ValidationError::NoUnits);
    }

    #[test]
    fn test_unknown_inputs_rejected() {
        assert_eq!(
            UnitDescriptor::from_unit("furlong").unwrap_err(),
            ValidationError::UnknownUnit("furlong".into())
        );
        assert_eq!(
            UnitDescriptor::from_unit(0u8).unwrap_err(),
            ValidationError::UnknownUnitCode(0)
        );
        assert_eq!(
            UnitDescriptor::from_unit(28u8).unwrap_err(),
            ValidationError::UnknownUnitCode(28)
        );
        assert_eq!(
            UnitDescriptor::new("meter", "not-a-prefix", 1).unwrap_err(),
            ValidationError::UnknownPrefix("not-a-prefix".into())
        );
        assert_eq!(
            UnitDescriptor::new("meter", PrefixAlias::None, 8).unwrap_err(),
            ValidationError::UnsupportedExponent(8)
        );
        assert_eq!(
            UnitDescriptor::new("meter", PrefixAlias::None, -7).unwrap_err(),
            ValidationError::UnsupportedExponent(-7)
        );
    }

    #[test]
    fn test_prefix_aliases_resolve_identically() {
        let expected = Some(Prefix::Micro);
        for alias in [
            PrefixAlias::from("micro"),
            PrefixAlias::from(-6),
            PrefixAlias::from("1e-6"),
            PrefixAlias::from(Prefix::Micro),
        ] {
            let d = UnitDescriptor::new("volt", alias, 1).unwrap();
            assert_eq!(d.prefix(), expected);
        }
        assert_eq!(
            PrefixAlias::from("1e4").resolve().unwrap_err().to_string(),
            "Prefix not supported: 1e4"
        );
        assert_eq!(
            PrefixAlias::from(4).resolve().unwrap_err(),
            ValidationError::UnknownPrefix("4".into())
        );
    }

    #[test]
    fn test_prefix_alias_from_str() {
        assert_eq!("3".parse::<PrefixAlias>().unwrap(), PrefixAlias::Power(3));
        assert_eq!("-12".parse::<PrefixAlias>().unwrap(), PrefixAlias::Power(-12));
        assert_eq!("none".parse::<PrefixAlias>().unwrap(), PrefixAlias::None);
        assert_eq!(
            "1e9".parse::<PrefixAlias>().unwrap(),
            PrefixAlias::Notation("1e9".into())
        );
        assert_eq!(
            "giga".parse::<PrefixAlias>().unwrap(),
            PrefixAlias::Name("giga".into())
        );
    }

    #[test]
    fn test_prefix_alias_string_paths_agree() {
        for text in ["3", "-3", "none", "1e-6", "kilo"] {
            assert_eq!(PrefixAlias::from(text), text.parse::<PrefixAlias>().unwrap());
        }
        assert_eq!(PrefixAlias::from("-3"), PrefixAlias::Power(-3));
        assert_eq!(
            UnitDescriptor::new("ampere", "-3", 1).unwrap().prefix(),
            Some(Prefix::Milli)
        );
    }

    #[test]
    fn test_prefix_name_none_means_no_prefix() {
        assert_eq!(PrefixAlias::Name("none".into()).resolve().unwrap(), None);
        let d = UnitDescriptor::new("meter", PrefixAlias::Name("none".into()), 1).unwrap();
        assert_eq!(d.prefix(), None);
    }

    #[test]
    fn test_power_of_ten() {
        assert_eq!(power_of_ten(1e3), Some(3));
        assert_eq!(power_of_ten(1e-6), Some(-6));
        assert_eq!(power_of_ten(1e-15), Some(-15));
        assert_eq!(power_of_ten(1.0), Some(0));
        assert_eq!(power_of_ten(2000.0), None);
        assert_eq!(power_of_ten(0.0), None);
        assert_eq!(power_of_ten(-1000.0), None);
    }

    #[test]
    fn test_to_coded_uses_table_codes() {
        for (exponent, code) in crate::tables::EXPONENT_TABLE {
            let d = UnitDescriptor::new("meter", PrefixAlias::None, i32::from(exponent)).unwrap();
            assert_eq!(d.to_coded().exponent_codes()[0], code);
        }
    }

    // ========== Setters ==========

    #[test]
    fn test_setters_revalidate_and_keep_state_on_failure() {
        let mut d = UnitDescriptor::new(["meter", "second"], PrefixAlias::None, [1, -2]).unwrap();
        let before = d.clone();

        assert!(d.set_units("meter").is_err());
        assert!(d.set_exponents([1, 2, 3]).is_err());
        assert!(d.set_prefix("bogus").is_err());
        assert!(d.set_exponents([1, 9]).is_err());
        assert_eq!(d, before);

        d.set_units(["newton", "meter"]).unwrap();
        d.set_exponents([1, 1]).unwrap();
        d.set_prefix("1e3").unwrap();
        assert_eq!(d.units(), &[Unit::Newton, Unit::Meter]);
        assert_eq!(d.exponents(), &[1, 1]);
        assert_eq!(d.prefix(), Some(Prefix::Kilo));

        d.set_prefix(PrefixAlias::None).unwrap();
        assert_eq!(d.prefix(), None);
    }

    // ========== Display ==========

    #[test]
    fn test_display() {
        let d = UnitDescriptor::new(["meter", "second"], "kilo", [1, -2]).unwrap();
        assert_eq!(d.to_string(), "kilo(meter^1 second^-2)");
        let d = UnitDescriptor::from_unit("hertz").unwrap();
        assert_eq!(d.to_string(), "hertz^1");
    }

    // ========== CodedDescriptor ==========

    #[test]
    fn test_to_coded_pads_slots() {
        let d = UnitDescriptor::new(["meter", "second"], "milli", [1, -2]).unwrap();
        let c = d.to_coded();
        assert_eq!(c.prefix_code(), 0xB);
        assert_eq!(c.unit_codes(), &[1, 3, 0, 0, 0, 0]);
        assert_eq!(c.exponent_codes(), &[1, 0xE, 0, 0, 0, 0]);
        assert_eq!(c.populated(), 2);
        assert_eq!(c.slot(1), Some((3, 0xE)));
        assert_eq!(c.slot(6), None);
    }

    #[test]
    fn test_coded_accepts_zero_codes() {
        let c = CodedDescriptor::from_codes(0, &[0; 6], &[0; 6]).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_coded_rejects_bad_codes() {
        assert_eq!(
            CodedDescriptor::from_codes(0x8, &[1], &[1]).unwrap_err(),
            ValidationError::UnknownPrefixCode(0x8)
        );
        assert_eq!(
            CodedDescriptor::from_codes(0, &[28], &[1]).unwrap_err(),
            ValidationError::UnknownUnitCode(28)
        );
        assert_eq!(
            CodedDescriptor::from_codes(0, &[1], &[0x9]).unwrap_err(),
            ValidationError::UnknownExponentCode(0x9)
        );
        assert_eq!(
            CodedDescriptor::from_codes(0, &[1; 7], &[1; 7]).unwrap_err(),
            ValidationError::TooManyUnits { count: 7, max: 6 }
        );
        assert!(CodedDescriptor::from_codes(0, &[1, 2], &[1]).is_err());
    }

    #[test]
    fn test_to_named() {
        let c = CodedDescriptor::from_codes(0x3, &[1, 3, 0, 0, 0, 0], &[1, 0xE, 0, 0, 0, 0])
            .unwrap();
        let d = c.to_named().unwrap();
        assert_eq!(d.units(), &[Unit::Meter, Unit::Second]);
        assert_eq!(d.exponents(), &[1, -2]);
        assert_eq!(d.prefix(), Some(Prefix::Kilo));
        assert_eq!(d.to_coded(), c);
    }

    #[test]
    fn test_to_named_rejects_gaps_and_empty() {
        let gap = CodedDescriptor::from_codes(0, &[1, 0, 3], &[1, 0, 1]).unwrap();
        assert_eq!(gap.to_named().unwrap_err(), ValidationError::SlotGap { slot: 1 });

        let empty = CodedDescriptor::from_codes(0, &[], &[]).unwrap();
        assert_eq!(empty.to_named().unwrap_err(), ValidationError::NoUnits);
    }

    // ========== Serde ==========

    #[test]
    fn test_deserialize_validates() {
        let d: UnitDescriptor = serde_json::from_str(
            r#"{"units": ["meter", 3], "prefix": "1e-3", "exponents": [1, -2]}"#,
        )
        .unwrap();
        assert_eq!(d.units(), &[Unit::Meter, Unit::Second]);
        assert_eq!(d.prefix(), Some(Prefix::Milli));

        let d: UnitDescriptor = serde_json::from_str(r#"{"units": "kelvin"}"#).unwrap();
        assert_eq!(d.exponents(), &[1]);

        let d: UnitDescriptor = serde_json::from_str(r#"{"units": "watt", "prefix": 6}"#).unwrap();
        assert_eq!(d.prefix(), Some(Prefix::Mega));

        let bad = serde_json::from_str::<UnitDescriptor>(r#"{"units": ["meter", "gram"]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_canonical_form() {
        let d = UnitDescriptor::new(["meter", "second"], 3, [1, -2]).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "units": ["meter", "second"],
                "prefix": "kilo",
                "exponents": [1, -2]
            })
        );

        let back: UnitDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
