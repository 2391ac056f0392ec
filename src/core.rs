//! Defines the "data contract" between `build.rs` (the scribe) and
//! the value codec / generic decoder (the interpreters).
//!
//! `build.rs` generates static SLOT and PGN tables built from these types.
//! The `infra::codec` modules consume them to scale and decode payloads.

// Types in this module are primarily used by generated code.
#![allow(dead_code)]

/// Largest Suspect Parameter Number (19 bits).
pub const MAX_SPN: u32 = 0x7_FFFF;

/// Largest number of decimals used when rendering a scaled value.
pub const MAX_DISPLAY_PRECISION: u8 = 4;

/// Scaling definition (Scaling, Limit, Offset and Transfer function).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// 1. SLOT identifier.
    pub id: u16,
    /// 2. SLOT name (e.g. `SAEpc03`).
    pub name: &'static str,
    /// 3. Quantity (e.g. "Percent", "Temperature").
    pub type_label: &'static str,
    /// 4. Engineering units per raw bit.
    pub scale_factor: f64,
    /// 5. Offset added after scaling.
    pub offset: f64,
    /// 6. Raw field width in bits.
    pub bit_length: u8,
    /// 7. Physical unit (e.g. "kPa", "%").
    pub unit_label: &'static str,
    /// 8. Decimals used to display a scaled value.
    pub precision: u8,
}

/// Position of one SPN inside a parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpnDefinition {
    /// 1. Suspect Parameter Number.
    pub spn: u32,
    /// 2. Human-readable name.
    pub label: &'static str,
    /// 3. Absolute bit offset of the least significant bit.
    pub bit_offset: u16,
    /// 4. Field width in bits.
    pub bit_length: u8,
    /// 5. Scaling definition, `None` for raw values.
    pub slot_id: Option<u16>,
}

/// Layout of a parameter group without a dedicated decoder.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PgnDefinition {
    /// 1. Parameter Group Number.
    pub pgn: u32,
    /// 2. Parameter group name.
    pub label: &'static str,
    /// 3. Acronym (e.g. `EEC1`).
    pub acronym: &'static str,
    /// 4. Payload length in bytes, if fixed.
    pub length: Option<u16>,
    /// 5. Ordered SPN layouts.
    pub spns: &'static [SpnDefinition],
}

/// SPN label used when rendering diagnostic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpnLabel {
    pub spn: u32,
    pub label: &'static str,
}

/// Classification of a raw unsigned field under the J1939 sentinel convention.
///
/// For an N-bit field (N ≥ 2) the all-ones value means "not available" and the
/// value right below means "error". One-bit fields carry no sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    Data,
    Error,
    NotAvailable,
}

impl Sentinel {
    /// Classify `raw` as read from a field `bits` wide.
    pub const fn classify(raw: u64, bits: u8) -> Self {
        if bits < 2 || bits > 64 {
            return Sentinel::Data;
        }
        let all_ones = if bits == 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        if raw == all_ones {
            Sentinel::NotAvailable
        } else if raw == all_ones - 1 {
            Sentinel::Error
        } else {
            Sentinel::Data
        }
    }
}

/// Engineering value produced by a SLOT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaledValue {
    Number(f64),
    Error,
    NotAvailable,
}

impl ScaledValue {
    /// Numeric value, `None` for sentinels.
    pub fn number(&self) -> Option<f64> {
        match self {
            ScaledValue::Number(value) => Some(*value),
            _ => None,
        }
    }
}
