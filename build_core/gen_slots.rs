//! Generate the static SLOT tables from `slots.json`.
use super::domain::*;
use super::errors::*;
use super::literals::*;
use crate::core::MAX_DISPLAY_PRECISION;

use std::collections::HashSet;
use std::fmt::Write;

/// Validate both SLOT tables and emit `SLOTS` / `TEST_RESULT_SLOTS`, sorted by id.
pub(crate) fn run_slots_gen(document: &SlotDocument) -> Result<String, BuildError> {
    let mut buffer = String::new();
    writeln!(
        buffer,
        "// @generated by build.rs from build_core/var/slots.json. Do not edit."
    )?;
    writeln!(buffer)?;

    generate_table(&mut buffer, "SLOTS", "slots", &document.slots)?;
    generate_table(
        &mut buffer,
        "TEST_RESULT_SLOTS",
        "test_result_slots",
        &document.test_result_slots,
    )?;

    Ok(buffer)
}

fn generate_table(
    buffer: &mut String,
    static_name: &str,
    table: &'static str,
    entries: &[SlotEntry],
) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(BuildError::DuplicateId {
                table,
                id: entry.id as u32,
            });
        }
        if !(1..=64).contains(&entry.length) {
            return Err(BuildError::BitLengthErr {
                table,
                id: entry.id as u32,
                length: entry.length,
            });
        }
    }

    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.id);

    writeln!(buffer, "/// Sorted by `id`; searched with a binary search.")?;
    writeln!(buffer, "pub(crate) static {}: &[Slot] = &[", static_name)?;
    for entry in &sorted {
        writeln!(buffer, "\tSlot {{")?;
        writeln!(buffer, "\t\tid: {},", entry.id)?;
        writeln!(buffer, "\t\tname: {:?},", entry.name)?;
        writeln!(buffer, "\t\ttype_label: {:?},", entry.type_label)?;
        writeln!(buffer, "\t\tscale_factor: {},", float_literal(entry.scaling))?;
        writeln!(buffer, "\t\toffset: {},", float_literal(entry.offset))?;
        writeln!(buffer, "\t\tbit_length: {},", entry.length)?;
        writeln!(buffer, "\t\tunit_label: {:?},", entry.unit)?;
        writeln!(
            buffer,
            "\t\tprecision: {},",
            display_precision(entry.scaling, MAX_DISPLAY_PRECISION)
        )?;
        writeln!(buffer, "\t}},")?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;
    Ok(())
}
