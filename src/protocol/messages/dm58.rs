//! DM58: rationality fault SPN data.
use super::dtc::{spn_name, split_spn_fmi};
use super::header;
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::bits::read_at;
use crate::infra::codec::engine::find_spn;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM58_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{format, string::String};
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dm58RationalityData {
    pub source_address: u8,
    pub tid: u8,
    pub spn: u32,
    pub fmi: u8,
    pub data: [u8; 4],
}

impl Dm58RationalityData {
    /// Width of the SPN when the repository knows it, the whole data field otherwise.
    fn bit_length(&self) -> u8 {
        find_spn(self.spn).map_or(32, |(_, layout)| layout.bit_length.min(32))
    }

    /// SPN value aligned at the start of the data field.
    pub fn raw_value(&self) -> u64 {
        read_at(&self.data, 0, self.bit_length()).unwrap_or(u32::MAX as u64)
    }

    /// Engineering value when the SPN and its SLOT are known.
    pub fn value(&self) -> Option<ScaledValue> {
        let (_, layout) = find_spn(self.spn)?;
        let slot = layout.slot_id.and_then(Slot::find)?;
        Some(slot.scale(self.raw_value()))
    }

    pub fn rendered(&self) -> String {
        let slot = find_spn(self.spn)
            .and_then(|(_, layout)| layout.slot_id)
            .and_then(Slot::find);
        match slot {
            Some(slot) => slot.render(self.raw_value()),
            None => format!("{}", self.raw_value()),
        }
    }
}

impl DiagnosticPacket for Dm58RationalityData {
    const PGN: u32 = DM58_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let byte = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        let (spn, fmi) = split_spn_fmi([byte(1), byte(2), byte(3)]);
        Self {
            source_address: frame.source_address,
            tid: byte(0),
            spn,
            fmi,
            data: [byte(4), byte(5), byte(6), byte(7)],
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm58RationalityData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}TID {}, SPN {} - {}, FMI {}, Value: {}",
            header("DM58", self.source_address),
            self.tid,
            self.spn,
            spn_name(self.spn),
            self.fmi,
            self.rendered()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn dm58(payload: &[u8]) -> Dm58RationalityData {
        Dm58RationalityData::decode(&RawFrame::new(DM58_PGN, 6, 0x00, 0xF9, payload.to_vec()))
    }

    #[test]
    /// Engine speed: 16-bit SPN scaled through its SLOT.
    fn test_known_spn() {
        let packet = dm58(&[245, 0xBE, 0x00, 0x1F, 0xE0, 0x2E, 0xFF, 0xFF]);
        assert_eq!(packet.tid, 245);
        assert_eq!(packet.spn, 190);
        assert_eq!(packet.raw_value(), 12000);
        assert_eq!(packet.value(), Some(ScaledValue::Number(1500.0)));
        assert_eq!(
            packet.to_string(),
            "DM58 from Engine #1 (0): TID 245, SPN 190 - Engine Speed, FMI 31, Value: 1500.000 rpm"
        );
    }

    #[test]
    fn test_sentinel_value() {
        let packet = dm58(&[245, 0xBE, 0x00, 0x1F, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(packet.value(), Some(ScaledValue::NotAvailable));
        assert!(packet.to_string().ends_with("Value: Not Available"));
    }

    #[test]
    /// Unknown SPNs expose the raw data field.
    fn test_unknown_spn() {
        let packet = dm58(&[245, 0x10, 0x27, 0x1F, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(packet.spn, 10000);
        assert_eq!(packet.value(), None);
        assert_eq!(packet.raw_value(), 1);
        assert!(packet.to_string().ends_with("Unknown SPN, FMI 31, Value: 1"));
    }
}
