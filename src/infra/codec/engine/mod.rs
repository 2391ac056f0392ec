//! PGN definition repository and the table-driven SPN decoder used for
//! parameter groups without a dedicated message type.
//!
//! The tables are generated by `build.rs` from `build_core/var/pgn_definitions.json`
//! (or the file named by `KORRI_J1939_DEFINITIONS_PATH`).
use super::bits::read_at;
use crate::core::{PgnDefinition, ScaledValue, Slot, SpnDefinition, SpnLabel};
use alloc::{string::String, vec::Vec};

include!(concat!(env!("OUT_DIR"), "/generated_definitions.rs"));

/// Layout of `pgn`, if the repository knows it.
pub fn find_definition(pgn: u32) -> Option<&'static PgnDefinition> {
    PGN_DEFINITIONS
        .binary_search_by_key(&pgn, |definition| definition.pgn)
        .ok()
        .map(|index| &PGN_DEFINITIONS[index])
}

/// First parameter group carrying `spn`, with the SPN layout inside it.
pub fn find_spn(spn: u32) -> Option<(&'static PgnDefinition, &'static SpnDefinition)> {
    PGN_DEFINITIONS.iter().find_map(|definition| {
        definition
            .spns
            .iter()
            .find(|layout| layout.spn == spn)
            .map(|layout| (definition, layout))
    })
}

/// Human-readable name of an SPN.
pub fn spn_label(spn: u32) -> Option<&'static str> {
    SPN_LABELS
        .binary_search_by_key(&spn, |entry: &SpnLabel| entry.spn)
        .ok()
        .map(|index| SPN_LABELS[index].label)
}

/// Every definition in the repository, sorted by PGN.
pub fn definitions() -> &'static [PgnDefinition] {
    PGN_DEFINITIONS
}

//==================================================================================SPN_VALUE
/// Raw value of one SPN extracted from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpnValue {
    pub definition: &'static SpnDefinition,
    pub raw: u64,
}

impl SpnValue {
    pub fn spn(&self) -> u32 {
        self.definition.spn
    }

    pub fn label(&self) -> &'static str {
        self.definition.label
    }

    pub fn slot(&self) -> Option<&'static Slot> {
        self.definition.slot_id.and_then(Slot::find)
    }

    /// Engineering value, `None` for SPNs without a SLOT.
    pub fn scaled(&self) -> Option<ScaledValue> {
        self.slot().map(|slot| slot.scale(self.raw))
    }

    /// Scaled rendering, or the raw value for SPNs without a SLOT.
    pub fn rendered(&self) -> String {
        match self.slot() {
            Some(slot) => slot.render(self.raw),
            None => alloc::format!("{}", self.raw),
        }
    }
}

/// Extract every SPN of `definition` present in `payload`.
///
/// SPNs whose bits lie beyond the end of the payload are omitted; the
/// returned count tells how many were recognized.
pub fn decode_spns(definition: &'static PgnDefinition, payload: &[u8]) -> Vec<SpnValue> {
    definition
        .spns
        .iter()
        .filter_map(|layout| {
            read_at(payload, layout.bit_offset as usize, layout.bit_length)
                .ok()
                .map(|raw| SpnValue {
                    definition: layout,
                    raw,
                })
        })
        .collect()
}
