//! DM31: DTC to lamp association.
use super::dtc::{is_reported, DiagnosticTroubleCode, DTC_LENGTH};
use super::header;
use super::lamp::Lamps;
use crate::infra::codec::groups::decode_groups;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM31_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

pub const DTC_LAMP_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DtcLampStatus {
    pub dtc: DiagnosticTroubleCode,
    pub lamps: Lamps,
}

impl DtcLampStatus {
    fn from_window(window: &[u8]) -> Self {
        Self {
            dtc: DiagnosticTroubleCode::from_window(window),
            lamps: Lamps::new(window[DTC_LENGTH], window[DTC_LENGTH + 1]),
        }
    }
}

impl fmt::Display for DtcLampStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.dtc, self.lamps)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm31DtcLampAssociation {
    pub source_address: u8,
    pub records: Vec<DtcLampStatus>,
}

impl DiagnosticPacket for Dm31DtcLampAssociation {
    const PGN: u32 = DM31_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            records: decode_groups(
                &frame.payload,
                DTC_LAMP_LENGTH,
                |window| is_reported(&window[..DTC_LENGTH]),
                DtcLampStatus::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm31DtcLampAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", header("DM31", self.source_address))?;
        if self.records.is_empty() {
            return write!(f, "No DTCs");
        }
        for record in &self.records {
            write!(f, "\n{}", record)?;
        }
        Ok(())
    }
}
