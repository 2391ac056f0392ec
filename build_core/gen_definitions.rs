//! Generate the PGN definition repository and the SPN label index.
use super::domain::*;
use super::errors::*;
use super::literals::*;
use crate::core::MAX_SPN;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write;

/// Validate every SPN layout against the SLOT table and emit
/// `PGN_DEFINITIONS` (sorted by PGN) and `SPN_LABELS` (sorted by SPN).
pub(crate) fn run_definitions_gen(
    document: &DefinitionDocument,
    slots: &SlotDocument,
) -> Result<String, BuildError> {
    let slot_widths: HashMap<u16, u8> = slots
        .slots
        .iter()
        .map(|slot| (slot.id, slot.length))
        .collect();

    let mut seen_pgns = HashSet::new();
    for pgn in &document.pgns {
        if !seen_pgns.insert(pgn.pgn) {
            return Err(BuildError::DuplicateId {
                table: "pgns",
                id: pgn.pgn,
            });
        }
        validate_pgn(pgn, &slot_widths)?;
    }

    let mut pgns: Vec<&PgnEntry> = document.pgns.iter().collect();
    pgns.sort_by_key(|pgn| pgn.pgn);

    let mut buffer = String::new();
    writeln!(
        buffer,
        "// @generated by build.rs from the PGN definition table. Do not edit."
    )?;
    writeln!(buffer)?;
    writeln!(buffer, "/// Sorted by `pgn`; searched with a binary search.")?;
    writeln!(buffer, "pub(crate) static PGN_DEFINITIONS: &[PgnDefinition] = &[")?;
    for pgn in &pgns {
        writeln!(buffer, "\tPgnDefinition {{")?;
        writeln!(buffer, "\t\tpgn: {},", pgn.pgn)?;
        writeln!(buffer, "\t\tlabel: {:?},", pgn.label)?;
        writeln!(buffer, "\t\tacronym: {:?},", pgn.acronym)?;
        writeln!(buffer, "\t\tlength: {},", option_u16_literal(pgn.length))?;
        writeln!(buffer, "\t\tspns: &[")?;
        for spn in &pgn.spns {
            writeln!(
                buffer,
                "\t\t\tSpnDefinition {{ spn: {}, label: {:?}, bit_offset: {}, bit_length: {}, slot_id: {} }},",
                spn.spn,
                spn.label,
                spn.bit_offset,
                spn.bit_length,
                option_u16_literal(spn.slot)
            )?;
        }
        writeln!(buffer, "\t\t],")?;
        writeln!(buffer, "\t}},")?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;

    // First label wins: explicit diagnostic labels, then PGN layouts.
    let mut labels: BTreeMap<u32, &str> = BTreeMap::new();
    for entry in &document.spn_labels {
        if entry.spn > MAX_SPN {
            return Err(BuildError::LayoutErr {
                pgn: 0,
                spn: entry.spn,
                comment: "SPN exceeds 19 bits",
            });
        }
        labels.entry(entry.spn).or_insert(entry.label.as_str());
    }
    for pgn in &pgns {
        for spn in &pgn.spns {
            labels.entry(spn.spn).or_insert(spn.label.as_str());
        }
    }

    writeln!(buffer, "/// Sorted by `spn`; searched with a binary search.")?;
    writeln!(buffer, "pub(crate) static SPN_LABELS: &[SpnLabel] = &[")?;
    for (spn, label) in &labels {
        writeln!(buffer, "\tSpnLabel {{ spn: {}, label: {:?} }},", spn, label)?;
    }
    writeln!(buffer, "];")?;

    Ok(buffer)
}

fn validate_pgn(pgn: &PgnEntry, slot_widths: &HashMap<u16, u8>) -> Result<(), BuildError> {
    let available_bits = pgn.length.map(|len| len as u32 * 8);

    for spn in &pgn.spns {
        if spn.spn > MAX_SPN {
            return Err(BuildError::LayoutErr {
                pgn: pgn.pgn,
                spn: spn.spn,
                comment: "SPN exceeds 19 bits",
            });
        }
        if !(1..=64).contains(&spn.bit_length) {
            return Err(BuildError::LayoutErr {
                pgn: pgn.pgn,
                spn: spn.spn,
                comment: "bit length must be within 1..=64",
            });
        }
        if let Some(bits) = available_bits {
            if spn.bit_offset as u32 + spn.bit_length as u32 > bits {
                return Err(BuildError::LayoutErr {
                    pgn: pgn.pgn,
                    spn: spn.spn,
                    comment: "field extends past the PGN length",
                });
            }
        }
        if let Some(slot) = spn.slot {
            let slot_bits = *slot_widths.get(&slot).ok_or(BuildError::UnknownSlot {
                pgn: pgn.pgn,
                spn: spn.spn,
                slot,
            })?;
            if slot_bits != spn.bit_length {
                return Err(BuildError::SlotWidthMismatch {
                    pgn: pgn.pgn,
                    spn: spn.spn,
                    spn_bits: spn.bit_length,
                    slot_bits,
                });
            }
        }
    }
    Ok(())
}
