//! Creation and extraction of the 29-bit SAE J1939 CAN identifiers.
use crate::error::CanIdBuildError;

/// Destination address meaning "every node".
pub const GLOBAL_ADDRESS: u8 = 0xFF;
/// Address used by nodes that could not claim one.
pub const NULL_ADDRESS: u8 = 0xFE;
/// Default priority for diagnostic traffic.
pub const DEFAULT_PRIORITY: u8 = 6;

/// `true` when the PGN is destination specific (PF < 240).
pub const fn is_pdu1(pgn: u32) -> bool {
    ((pgn >> 8) & 0xFF) < 240
}

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Extended CAN identifier (29 bits) with accessors for priority, PGN,
/// destination and source.
pub struct CanId(pub u32);

impl CanId {
    /// Creates a pre-configured `CanIdBuilder` for a PGN and source address.
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Priority (3 bits, value 0-7).
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// 18-bit PGN. For PDU1 identifiers the PS byte is a destination and is cleared.
    pub fn pgn(&self) -> u32 {
        let raw = (self.0 >> 8) & 0x3_FFFF;
        if is_pdu1(raw) {
            raw & 0x3_FF00
        } else {
            raw
        }
    }

    /// Destination address of a PDU1 identifier.
    pub fn destination(&self) -> Option<u8> {
        let raw = (self.0 >> 8) & 0x3_FFFF;
        if is_pdu1(raw) {
            Some((raw & 0xFF) as u8)
        } else {
            None
        }
    }

    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}
//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder that enforces the PDU1/PDU2 rules.
pub struct CanIdBuilder {
    pub priority: u8,
    pub pgn: u32,
    pub source_address: u8,
    pub destination: Option<u8>,
}

impl CanIdBuilder {
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            pgn,
            source_address,
            destination: None,
        }
    }

    /// Priority is capped to 3 bits.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Assigns a destination address. Only valid for PDU1 PGNs.
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Builds the identifier:
    /// - PF < 240 (PDU1): PS of the PGN must be `0`; the destination goes in PS,
    ///   global (`0xFF`) when none is given
    /// - PF ≥ 240 (PDU2): broadcast only, a destination is refused
    pub fn build(self) -> Result<CanId, CanIdBuildError> {
        if self.pgn > 0x3_FFFF {
            return Err(CanIdBuildError::PgnOutOfRange { pgn: self.pgn });
        }
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps = (self.pgn & 0xFF) as u8;

        let ps_field = if is_pdu1(self.pgn) {
            if ps != 0 {
                return Err(CanIdBuildError::PsFocusMessageMustBeNull);
            }
            match self.destination {
                Some(NULL_ADDRESS) => return Err(CanIdBuildError::InvalidDestination),
                Some(destination) => destination,
                None => GLOBAL_ADDRESS,
            }
        } else {
            if self.destination.is_some() {
                return Err(CanIdBuildError::InvalidForFocusedMessage { pf });
            }
            ps
        };

        let id = ((self.priority as u32) << 26)
            | ((self.pgn & 0x3_0000) << 8)
            | ((pf as u32) << 16)
            | ((ps_field as u32) << 8)
            | (self.source_address as u32);
        Ok(CanId(id))
    }
}
