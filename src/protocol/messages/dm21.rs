//! DM21: distance and time with the MIL on and since codes were cleared.
use super::header;
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM21_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use core::fmt;

const KILOMETERS_SLOT: u16 = 22;
const MINUTES_SLOT: u16 = 21;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm21DiagnosticReadiness2 {
    pub source_address: u8,
    pub distance_with_mil_on: u16,
    pub distance_since_clear: u16,
    pub minutes_with_mil_on: u16,
    pub minutes_since_clear: u16,
}

impl Dm21DiagnosticReadiness2 {
    pub fn kilometers_with_mil_on(&self) -> ScaledValue {
        Slot::lookup(KILOMETERS_SLOT).scale(self.distance_with_mil_on as u64)
    }

    pub fn kilometers_since_clear(&self) -> ScaledValue {
        Slot::lookup(KILOMETERS_SLOT).scale(self.distance_since_clear as u64)
    }

    pub fn time_with_mil_on(&self) -> ScaledValue {
        Slot::lookup(MINUTES_SLOT).scale(self.minutes_with_mil_on as u64)
    }

    pub fn time_since_clear(&self) -> ScaledValue {
        Slot::lookup(MINUTES_SLOT).scale(self.minutes_since_clear as u64)
    }
}

impl DiagnosticPacket for Dm21DiagnosticReadiness2 {
    const PGN: u32 = DM21_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let word = |offset: usize| frame.le_bytes(offset, 2).unwrap_or(0xFFFF) as u16;
        Self {
            source_address: frame.source_address,
            distance_with_mil_on: word(0),
            distance_since_clear: word(2),
            minutes_with_mil_on: word(4),
            minutes_since_clear: word(6),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm21DiagnosticReadiness2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kilometers = Slot::lookup(KILOMETERS_SLOT);
        let minutes = Slot::lookup(MINUTES_SLOT);
        write!(f, "{}[", header("DM21", self.source_address))?;
        let rows = [
            ("Distance Traveled While MIL is Activated:", kilometers, self.distance_with_mil_on),
            ("Time Run by Engine While MIL is Activated:", minutes, self.minutes_with_mil_on),
            ("Distance Since DTCs Cleared:", kilometers, self.distance_since_clear),
            ("Time Since DTCs Cleared:", minutes, self.minutes_since_clear),
        ];
        for (label, slot, raw) in rows {
            write!(f, "\n  {:<43} {}", label, slot.render(raw as u64))?;
        }
        write!(f, "\n]")
    }
}
