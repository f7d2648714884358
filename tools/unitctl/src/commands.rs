//! Command handlers for unitctl
//!
//! Rendering is kept separate from printing so output can be tested.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::json;
use std::fmt::Write;
use tracing::{info, warn};
use unit_codec::tables::{exponent_from_code, Prefix, Unit};
use unit_codec::{
    unpack, CodedDescriptor, OneOrMany, PackUnit, PrefixAlias, UnitDescriptor, UnitRef,
    EXPONENT_TABLE,
};

use crate::config::UnitctlConfig;
use crate::hex;

/// Unit argument: a number is a raw code, anything else a table name
pub fn parse_unit_ref(arg: &str) -> UnitRef {
    match arg.parse::<u8>() {
        Ok(code) => UnitRef::Code(code),
        Err(_) => UnitRef::Name(arg.to_string()),
    }
}

/// Build a descriptor from command-line arguments.
///
/// No exponents means exponent 1, which only fits a single unit.
pub fn descriptor_from_args(
    units: &[String],
    exponents: &[i32],
    prefix: PrefixAlias,
) -> Result<UnitDescriptor> {
    let units = OneOrMany::Many(units.iter().map(|u| parse_unit_ref(u)).collect());
    let exponents = if exponents.is_empty() {
        OneOrMany::One(1)
    } else {
        OneOrMany::Many(exponents.to_vec())
    };
    UnitDescriptor::new(units, prefix, exponents).context("Invalid unit descriptor")
}

pub fn render_pack(descriptor: &UnitDescriptor, uppercase: bool) -> String {
    let word = descriptor.pack_word();
    format!(
        "{}\n  word:  {}\n  bytes: {}",
        descriptor,
        hex::format_word(word, uppercase),
        hex::encode_bytes(&descriptor.pack(), uppercase)
    )
}

fn unit_label(code: u8) -> &'static str {
    match code {
        0 => "-",
        c => Unit::from_code(c).map_or("?", Unit::name),
    }
}

fn prefix_label(code: u8) -> &'static str {
    match code {
        0 => "none",
        c => Prefix::from_code(c).map_or("?", Prefix::name),
    }
}

pub fn render_unpack(coded: &CodedDescriptor, named: bool) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "prefix: 0x{:X} ({})",
        coded.prefix_code(),
        prefix_label(coded.prefix_code())
    )?;
    for (slot, (unit, exponent)) in coded
        .unit_codes()
        .iter()
        .zip(coded.exponent_codes())
        .enumerate()
    {
        let decimal = exponent_from_code(*exponent).unwrap_or_default();
        writeln!(
            out,
            "slot {}: unit {:>2} ({}), exponent 0x{:X} ({})",
            slot,
            unit,
            unit_label(*unit),
            exponent,
            decimal
        )?;
    }
    if named {
        let descriptor = coded.to_named().context("Cannot decode to named form")?;
        write!(out, "named: {}", descriptor)?;
    }
    Ok(out.trim_end().to_string())
}

pub fn render_unpack_json(coded: &CodedDescriptor, named: bool) -> Result<String> {
    let value = if named {
        let descriptor = coded.to_named().context("Cannot decode to named form")?;
        json!({ "coded": coded, "named": descriptor })
    } else {
        json!({ "coded": coded })
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_tables() -> String {
    let mut out = String::new();

    // Writing to String buffer is infallible
    let _ = writeln!(out, "Units (6-bit):");
    for unit in Unit::ALL {
        let _ = writeln!(out, "  0x{:02X}  {}", unit.code(), unit);
    }

    let _ = writeln!(out, "\nExponents (4-bit):");
    for (exponent, code) in EXPONENT_TABLE {
        let _ = writeln!(out, "  0x{:X}  {:>2}", code, exponent);
    }

    let _ = writeln!(out, "\nPrefixes (4-bit):");
    let _ = writeln!(out, "  0x0  none");
    for prefix in Prefix::ALL {
        let _ = writeln!(
            out,
            "  0x{:X}  {:<6} {:>3}  {}",
            prefix.code(),
            prefix,
            prefix.power(),
            prefix.notation()
        );
    }
    out.trim_end().to_string()
}

pub fn render_catalog(config: &UnitctlConfig, name: Option<&str>) -> Result<String> {
    let entries: Vec<(&str, &UnitDescriptor)> = match name {
        Some(name) => match config.descriptor(name) {
            Some(descriptor) => vec![(name, descriptor)],
            None => bail!("Descriptor not found in catalog: {}", name),
        },
        None => config
            .descriptors
            .iter()
            .map(|(n, d)| (n.as_str(), d))
            .collect(),
    };

    let width = entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (entry_name, descriptor) in entries {
        writeln!(
            out,
            "{:<width$}  {}  {}",
            entry_name,
            hex::format_word(descriptor.pack_word(), config.hex_uppercase),
            descriptor,
            width = width
        )?;
    }
    Ok(out.trim_end().to_string())
}

// ============================================================================
// Handlers
// ============================================================================

pub fn handle_pack(
    units: &[String],
    exponents: &[i32],
    prefix: PrefixAlias,
    uppercase: bool,
) -> Result<()> {
    let descriptor = descriptor_from_args(units, exponents, prefix)?;
    info!("Packing {}", descriptor);
    println!("{}", render_pack(&descriptor, uppercase));
    Ok(())
}

pub fn handle_unpack(word: &str, named: bool, as_json: bool) -> Result<()> {
    let word = hex::parse_word(word)?;
    let coded = unpack(word).context("Invalid unit field")?;
    if as_json {
        println!("{}", render_unpack_json(&coded, named)?);
    } else {
        println!("{}", render_unpack(&coded, named)?);
    }
    Ok(())
}

pub fn handle_tables() -> Result<()> {
    println!("{}", render_tables());
    Ok(())
}

pub fn handle_catalog(config: &UnitctlConfig, name: Option<&str>) -> Result<()> {
    if config.descriptors.is_empty() {
        warn!("Catalog is empty");
        println!("{} No descriptors configured", "WARN".yellow());
        return Ok(());
    }
    println!("{}", render_catalog(config, name)?);
    println!(
        "\n{} {} descriptor(s)",
        "OK".green(),
        name.map_or(config.descriptors.len(), |_| 1)
    );
    Ok(())
}
