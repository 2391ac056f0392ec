//! Structures deserialized from the JSON data tables under `build_core/var/`.
use serde::Deserialize;

//==================================================================================SLOTS
#[derive(Debug, Deserialize)]
/// Root of `slots.json`.
pub(crate) struct SlotDocument {
    pub(crate) slots: Vec<SlotEntry>,
    pub(crate) test_result_slots: Vec<SlotEntry>,
}

#[derive(Debug, Deserialize, Clone)]
/// One scaling definition (Scaling, Limit, Offset and Transfer function).
pub(crate) struct SlotEntry {
    pub(crate) id: u16,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) type_label: String,
    pub(crate) scaling: f64,
    #[serde(default)]
    pub(crate) offset: f64,
    pub(crate) length: u8,
    #[serde(default)]
    pub(crate) unit: String,
}

//==================================================================================DEFINITIONS
#[derive(Debug, Deserialize)]
/// Root of `pgn_definitions.json`.
pub(crate) struct DefinitionDocument {
    pub(crate) pgns: Vec<PgnEntry>,
    /// Labels for SPNs that only appear in diagnostic messages (DTCs, DM24...).
    #[serde(default)]
    pub(crate) spn_labels: Vec<SpnLabelEntry>,
}

#[derive(Debug, Deserialize)]
/// Layout of a single parameter group.
pub(crate) struct PgnEntry {
    pub(crate) pgn: u32,
    pub(crate) label: String,
    pub(crate) acronym: String,
    pub(crate) length: Option<u16>,
    pub(crate) spns: Vec<SpnEntry>,
}

#[derive(Debug, Deserialize)]
/// Position of one SPN inside its parameter group.
pub(crate) struct SpnEntry {
    pub(crate) spn: u32,
    pub(crate) label: String,
    pub(crate) bit_offset: u16,
    pub(crate) bit_length: u8,
    pub(crate) slot: Option<u16>,
}

#[derive(Debug, Deserialize)]
/// Free-standing SPN label.
pub(crate) struct SpnLabelEntry {
    pub(crate) spn: u32,
    pub(crate) label: String,
}
