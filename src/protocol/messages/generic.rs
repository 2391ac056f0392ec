//! Fallback decoder for parameter groups without a dedicated message type.
use super::header;
use crate::infra::codec::engine::{decode_spns, find_definition, SpnValue};
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{format, vec::Vec};
use core::fmt;

/// SPN values extracted through the definition repository. Unknown PGNs keep
/// only the raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericPacket {
    pub pgn: u32,
    pub source_address: u8,
    pub values: Vec<SpnValue>,
    pub payload: Vec<u8>,
}

impl GenericPacket {
    pub fn decode(frame: &RawFrame) -> Self {
        let values = find_definition(frame.pgn)
            .map(|definition| decode_spns(definition, &frame.payload))
            .unwrap_or_default();
        Self {
            pgn: frame.pgn,
            source_address: frame.source_address,
            values,
            payload: frame.payload.clone(),
        }
    }

    /// Number of SPNs decoded from the payload.
    pub fn recognized(&self) -> usize {
        self.values.len()
    }

    pub fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for GenericPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(definition) = find_definition(self.pgn) else {
            write!(f, "{}[", header(&format!("PGN {}", self.pgn), self.source_address))?;
            for (index, byte) in self.payload.iter().enumerate() {
                if index > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:02X}", byte)?;
            }
            return write!(f, "]");
        };
        write!(f, "{}{}", header(definition.acronym, self.source_address), definition.label)?;
        for value in &self.values {
            write!(f, "\n  SPN {:>5} {}: {}", value.spn(), value.label(), value.rendered())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_known_pgn() {
        // Engine coolant 90 °C, oil pressure and the rest not available.
        let mut payload = vec![0xFF; 8];
        payload[0] = 0x82;
        let frame = RawFrame::new(65262, 6, 0x00, 0xFF, payload);
        let packet = GenericPacket::decode(&frame);
        assert_eq!(packet.recognized(), 5);
        assert_eq!(packet.values[0].spn(), 110);
        assert_eq!(packet.values[0].rendered(), "90 °C");
        let text = packet.to_string();
        assert!(text.starts_with("ET1 from Engine #1 (0): "));
        assert!(text.contains("\n  SPN   110 Engine Coolant Temperature: 90 °C"));
        assert!(text.contains("\n  SPN   174 Engine Fuel 1 Temperature 1: Not Available"));
    }

    #[test]
    /// Unknown PGNs never fail: the payload is kept and rendered in hex.
    fn test_unknown_pgn() {
        let frame = RawFrame::new(0xFF12, 6, 0x21, 0xFF, vec![0x01, 0xAB, 0xFF]);
        let packet = GenericPacket::decode(&frame);
        assert_eq!(packet.recognized(), 0);
        assert_eq!(packet.to_string(), "PGN 65298 from Body Controller (33): [01 AB FF]");
    }

    #[test]
    fn test_partial_payload() {
        let frame = RawFrame::new(65262, 6, 0x00, 0xFF, vec![0x82, 0x50]);
        let packet = GenericPacket::decode(&frame);
        assert_eq!(packet.recognized(), 2);
    }
}
