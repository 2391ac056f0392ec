//! GHG tracking and NOx binning arrays.
//!
//! Each array exists three times: lifetime, stored 100-hour and active
//! 100-hour. A GHG array carries every tracked quantity of one period; a NOx
//! binning array carries one quantity split over 16 operating bins. Fields
//! are little-endian and scaled through their SLOT; missing bytes read as
//! "not available".
use super::header;
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::*;
use crate::protocol::transport::raw_frame::{le_value, RawFrame};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

const TIME_SLOT: u16 = 25;
const DISTANCE_SLOT: u16 = 26;
const VOLUME_SLOT: u16 = 27;
const ENERGY_SLOT: u16 = 28;
const COUNT_SLOT: u16 = 29;
const MASS_SLOT: u16 = 30;
const SHORT_COUNT_SLOT: u16 = 19;

const LABEL_WIDTH: usize = 40;
const VALUE_WIDTH: usize = 20;
/// Spaces between two table columns.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingPeriod {
    Active100Hour,
    Stored100Hour,
    Lifetime,
}

impl TrackingPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            TrackingPeriod::Active100Hour => "Active 100 Hour",
            TrackingPeriod::Stored100Hour => "Stored 100 Hour",
            TrackingPeriod::Lifetime => "Lifetime",
        }
    }
}

/// Position and scaling of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedParameter {
    pub label: &'static str,
    pub offset: usize,
    pub length: usize,
    pub slot: u16,
}

const fn parameter(
    label: &'static str,
    offset: usize,
    length: usize,
    slot: u16,
) -> TrackedParameter {
    TrackedParameter {
        label,
        offset,
        length,
        slot,
    }
}

pub static GHG_PARAMETERS: [TrackedParameter; 13] = [
    parameter("Engine Run Time", 0, 4, TIME_SLOT),
    parameter("Vehicle Distance", 4, 4, DISTANCE_SLOT),
    parameter("Vehicle Fuel Consumed", 8, 4, VOLUME_SLOT),
    parameter("Engine Fuel Consumed", 12, 4, VOLUME_SLOT),
    parameter("Engine Output Energy", 16, 4, ENERGY_SLOT),
    parameter("PKE Numerator", 20, 4, COUNT_SLOT),
    parameter("Urban Speed Run Time", 24, 4, TIME_SLOT),
    parameter("Idle Run Time", 28, 4, TIME_SLOT),
    parameter("Engine Idle Fuel Consumed", 32, 4, VOLUME_SLOT),
    parameter("PTO Run Time", 36, 4, TIME_SLOT),
    parameter("PTO Fuel Consumed", 40, 4, VOLUME_SLOT),
    parameter("AES Shutdown Count", 44, 2, SHORT_COUNT_SLOT),
    parameter("Stop-Start Run Time", 46, 4, TIME_SLOT),
];

pub const NOX_BINS: usize = 16;
const BIN_LENGTH: usize = 4;

static BIN_LABELS: [&str; NOX_BINS] = [
    "Bin 1 (Total)",
    "Bin 2 (Idle)",
    "Bin 3",
    "Bin 4",
    "Bin 5",
    "Bin 6",
    "Bin 7",
    "Bin 8",
    "Bin 9",
    "Bin 10",
    "Bin 11",
    "Bin 12",
    "Bin 13",
    "Bin 14",
    "Bin 15",
    "Bin 16",
];

const fn bins(slot: u16) -> [TrackedParameter; NOX_BINS] {
    let mut parameters = [parameter("", 0, BIN_LENGTH, slot); NOX_BINS];
    let mut index = 0;
    while index < NOX_BINS {
        parameters[index] = parameter(BIN_LABELS[index], index * BIN_LENGTH, BIN_LENGTH, slot);
        index += 1;
    }
    parameters
}

pub static NOX_MASS_BINS: [TrackedParameter; NOX_BINS] = bins(MASS_SLOT);
pub static NOX_ENERGY_BINS: [TrackedParameter; NOX_BINS] = bins(ENERGY_SLOT);

/// One decoded field, kept raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedValue {
    pub label: &'static str,
    pub raw: u64,
    pub slot: u16,
}

impl TrackedValue {
    pub fn value(&self) -> ScaledValue {
        Slot::lookup(self.slot).scale(self.raw)
    }

    pub fn rendered(&self) -> String {
        Slot::lookup(self.slot).render(self.raw)
    }
}

pub fn decode_tracked(payload: &[u8], parameters: &[TrackedParameter]) -> Vec<TrackedValue> {
    parameters
        .iter()
        .map(|parameter| {
            let missing = u64::MAX >> (64 - parameter.length * 8);
            TrackedValue {
                label: parameter.label,
                raw: le_value(payload, parameter.offset, parameter.length).unwrap_or(missing),
                slot: parameter.slot,
            }
        })
        .collect()
}

/// Common view used to lay several arrays side by side.
pub trait TrackingArray {
    /// Heading of this array's column in a combined table.
    fn column_title(&self) -> &'static str;
    fn values(&self) -> &[TrackedValue];
}

fn render_rows(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    source_address: u8,
    values: &[TrackedValue],
) -> fmt::Result {
    write!(f, "{}[", header(title, source_address))?;
    for value in values {
        write!(
            f,
            "\n  {:<label$}{:>value$}",
            value.label,
            value.rendered(),
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
    }
    write!(f, "\n]")
}

/// Arrays as right-aligned columns, one row per field. Row labels come from
/// the first array; a shorter array leaves its cells blank.
pub fn render_tracking_table(columns: &[&dyn TrackingArray]) -> String {
    let cells: Vec<Vec<String>> = columns
        .iter()
        .map(|column| column.values().iter().map(TrackedValue::rendered).collect())
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .zip(&cells)
        .map(|(column, cells)| {
            cells
                .iter()
                .map(|cell| cell.chars().count())
                .chain(core::iter::once(column.column_title().chars().count()))
                .max()
                .unwrap_or(0)
                + COLUMN_GAP
        })
        .collect();

    let mut table = String::new();
    let _ = write!(table, "{:<label$}", "", label = LABEL_WIDTH);
    for (column, width) in columns.iter().zip(&widths) {
        let _ = write!(table, "{:>width$}", column.column_title(), width = *width);
    }
    let labels = columns.first().map(|column| column.values()).unwrap_or(&[]);
    for (row, value) in labels.iter().enumerate() {
        let _ = write!(table, "\n{:<label$}", value.label, label = LABEL_WIDTH);
        for (cells, width) in cells.iter().zip(&widths) {
            let cell = cells.get(row).map(String::as_str).unwrap_or("");
            let _ = write!(table, "{:>width$}", cell, width = *width);
        }
    }
    table
}

macro_rules! tracking_array {
    ($(#[$meta:meta])* $name:ident, $pgn:expr, $period:expr, $title:literal, $column:literal, $parameters:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub source_address: u8,
            pub values: Vec<TrackedValue>,
        }

        impl $name {
            pub const PERIOD: TrackingPeriod = $period;
            pub const TITLE: &'static str = $title;
        }

        impl DiagnosticPacket for $name {
            const PGN: u32 = $pgn;

            fn decode(frame: &RawFrame) -> Self {
                debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
                Self {
                    source_address: frame.source_address,
                    values: decode_tracked(&frame.payload, &$parameters),
                }
            }

            fn source_address(&self) -> u8 {
                self.source_address
            }
        }

        impl TrackingArray for $name {
            fn column_title(&self) -> &'static str {
                $column
            }

            fn values(&self) -> &[TrackedValue] {
                &self.values
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                render_rows(f, $title, self.source_address, &self.values)
            }
        }
    };
}

tracking_array!(
    GhgTrackingLifetime,
    GHG_TRACKING_LIFETIME_PGN,
    TrackingPeriod::Lifetime,
    "GHG Tracking Lifetime",
    "Lifetime",
    GHG_PARAMETERS
);
tracking_array!(
    GhgTrackingStored100Hour,
    GHG_TRACKING_STORED_100_HOUR_PGN,
    TrackingPeriod::Stored100Hour,
    "GHG Tracking Stored 100 Hour",
    "Stored 100 Hour",
    GHG_PARAMETERS
);
tracking_array!(
    GhgTrackingActive100Hour,
    GHG_TRACKING_ACTIVE_100_HOUR_PGN,
    TrackingPeriod::Active100Hour,
    "GHG Tracking Active 100 Hour",
    "Active 100 Hour",
    GHG_PARAMETERS
);

tracking_array!(
    NoxLifetimeSystemOut,
    NOX_LIFETIME_SYSTEM_OUT_PGN,
    TrackingPeriod::Lifetime,
    "NOx Binning Lifetime System Out NOx Mass",
    "System Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxLifetimeEngineOut,
    NOX_LIFETIME_ENGINE_OUT_PGN,
    TrackingPeriod::Lifetime,
    "NOx Binning Lifetime Engine Out NOx Mass",
    "Engine Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxLifetimeEngineEnergy,
    NOX_LIFETIME_ENGINE_ENERGY_PGN,
    TrackingPeriod::Lifetime,
    "NOx Binning Lifetime Engine Output Energy",
    "Engine Energy",
    NOX_ENERGY_BINS
);
tracking_array!(
    NoxStored100HourSystemOut,
    NOX_STORED_100_HOUR_SYSTEM_OUT_PGN,
    TrackingPeriod::Stored100Hour,
    "NOx Binning Stored 100 Hour System Out NOx Mass",
    "System Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxStored100HourEngineOut,
    NOX_STORED_100_HOUR_ENGINE_OUT_PGN,
    TrackingPeriod::Stored100Hour,
    "NOx Binning Stored 100 Hour Engine Out NOx Mass",
    "Engine Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxStored100HourEngineEnergy,
    NOX_STORED_100_HOUR_ENGINE_ENERGY_PGN,
    TrackingPeriod::Stored100Hour,
    "NOx Binning Stored 100 Hour Engine Output Energy",
    "Engine Energy",
    NOX_ENERGY_BINS
);
tracking_array!(
    NoxActive100HourSystemOut,
    NOX_ACTIVE_100_HOUR_SYSTEM_OUT_PGN,
    TrackingPeriod::Active100Hour,
    "NOx Binning Active 100 Hour System Out NOx Mass",
    "System Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxActive100HourEngineOut,
    NOX_ACTIVE_100_HOUR_ENGINE_OUT_PGN,
    TrackingPeriod::Active100Hour,
    "NOx Binning Active 100 Hour Engine Out NOx Mass",
    "Engine Out NOx",
    NOX_MASS_BINS
);
tracking_array!(
    NoxActive100HourEngineEnergy,
    NOX_ACTIVE_100_HOUR_ENGINE_ENERGY_PGN,
    TrackingPeriod::Active100Hour,
    "NOx Binning Active 100 Hour Engine Output Energy",
    "Engine Energy",
    NOX_ENERGY_BINS
);

#[cfg(test)]
#[path = "tracking_tests.rs"]
mod tests;
