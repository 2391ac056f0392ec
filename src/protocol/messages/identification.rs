//! `*`-delimited identification messages: VIN, component and ECU identification.
//!
//! Every field is terminated by `*`. A trailing unterminated segment is kept only
//! when it carries text once `0x00`/`0xFF` padding is removed. Fields past the
//! last one present are `None`; `Some("")` is a present but empty field.
use super::{header, latin1_text};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::{
    COMPONENT_IDENTIFICATION_PGN, ECU_IDENTIFICATION_PGN, VEHICLE_IDENTIFICATION_PGN,
};
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{string::String, vec::Vec};
use core::fmt;

pub const FIELD_DELIMITER: u8 = b'*';

fn is_padding(byte: &u8) -> bool {
    matches!(byte, 0x00 | 0xFF)
}

/// Split `payload` into exactly `count` optional fields.
pub fn split_fields(payload: &[u8], count: usize) -> Vec<Option<String>> {
    let mut fields: Vec<Option<String>> = Vec::with_capacity(count);
    let mut segments = payload.split(|byte| *byte == FIELD_DELIMITER).peekable();
    while let Some(segment) = segments.next() {
        if fields.len() == count {
            break;
        }
        let end = segment
            .iter()
            .rposition(|byte| !is_padding(byte))
            .map_or(0, |index| index + 1);
        let terminated = segments.peek().is_some();
        if terminated || end > 0 {
            fields.push(Some(latin1_text(&segment[..end])));
        }
    }
    fields.resize(count, None);
    fields
}

fn write_field(f: &mut fmt::Formatter<'_>, label: &str, field: &Option<String>) -> fmt::Result {
    match field {
        Some(text) => write!(f, "\n  {}: {}", label, text),
        None => write!(f, "\n  {}: (none)", label),
    }
}

//==================================================================================VIN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleIdentification {
    pub source_address: u8,
    pub vin: Option<String>,
    pub manufacturer_data: Option<String>,
}

impl DiagnosticPacket for VehicleIdentification {
    const PGN: u32 = VEHICLE_IDENTIFICATION_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let mut fields = split_fields(&frame.payload, 2).into_iter();
        Self {
            source_address: frame.source_address,
            vin: fields.next().flatten(),
            manufacturer_data: fields.next().flatten(),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for VehicleIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("Vehicle Identification", self.source_address))?;
        write_field(f, "VIN", &self.vin)?;
        write_field(f, "Manufacturer Data", &self.manufacturer_data)?;
        write!(f, "\n]")
    }
}

//==================================================================================COMPONENT
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentification {
    pub source_address: u8,
    pub make: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub unit_number: Option<String>,
}

impl DiagnosticPacket for ComponentIdentification {
    const PGN: u32 = COMPONENT_IDENTIFICATION_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let mut fields = split_fields(&frame.payload, 4).into_iter();
        Self {
            source_address: frame.source_address,
            make: fields.next().flatten(),
            model: fields.next().flatten(),
            serial_number: fields.next().flatten(),
            unit_number: fields.next().flatten(),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for ComponentIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("Component Identification", self.source_address))?;
        write_field(f, "Make", &self.make)?;
        write_field(f, "Model", &self.model)?;
        write_field(f, "Serial", &self.serial_number)?;
        write_field(f, "Unit", &self.unit_number)?;
        write!(f, "\n]")
    }
}

//==================================================================================ECU
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EcuIdentification {
    pub source_address: u8,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    pub ecu_type: Option<String>,
    pub manufacturer_name: Option<String>,
    pub hardware_id: Option<String>,
}

impl DiagnosticPacket for EcuIdentification {
    const PGN: u32 = ECU_IDENTIFICATION_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let mut fields = split_fields(&frame.payload, 6).into_iter();
        Self {
            source_address: frame.source_address,
            part_number: fields.next().flatten(),
            serial_number: fields.next().flatten(),
            location: fields.next().flatten(),
            ecu_type: fields.next().flatten(),
            manufacturer_name: fields.next().flatten(),
            hardware_id: fields.next().flatten(),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for EcuIdentification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("ECU Identification", self.source_address))?;
        write_field(f, "Part Number", &self.part_number)?;
        write_field(f, "Serial Number", &self.serial_number)?;
        write_field(f, "Location", &self.location)?;
        write_field(f, "Type", &self.ecu_type)?;
        write_field(f, "Manufacturer", &self.manufacturer_name)?;
        write_field(f, "Hardware ID", &self.hardware_id)?;
        write!(f, "\n]")
    }
}
