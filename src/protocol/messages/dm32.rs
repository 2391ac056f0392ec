//! DM32: regulated exhaust emission level exceedance.
use super::dtc::{is_reported, DiagnosticTroubleCode, DTC_LENGTH};
use super::header;
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::groups::decode_groups;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM32_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

pub const EXCEEDANCE_LENGTH: usize = 8;
const MINUTES_SLOT: u16 = 21;

/// One DTC followed by two minute counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmissionExceedance {
    pub dtc: DiagnosticTroubleCode,
    pub time_since_last_exceedance: u16,
    pub total_exceedance_time: u16,
}

impl EmissionExceedance {
    fn from_window(window: &[u8]) -> Self {
        Self {
            dtc: DiagnosticTroubleCode::from_window(window),
            time_since_last_exceedance: u16::from_le_bytes([window[4], window[5]]),
            total_exceedance_time: u16::from_le_bytes([window[6], window[7]]),
        }
    }

    pub fn time_since_last_exceedance(&self) -> ScaledValue {
        Slot::lookup(MINUTES_SLOT).scale(self.time_since_last_exceedance as u64)
    }

    pub fn total_exceedance_time(&self) -> ScaledValue {
        Slot::lookup(MINUTES_SLOT).scale(self.total_exceedance_time as u64)
    }
}

impl fmt::Display for EmissionExceedance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = Slot::lookup(MINUTES_SLOT);
        write!(
            f,
            "{}\n  Time Since Last Exceedance: {}, Total Exceedance Time: {}",
            self.dtc,
            minutes.render(self.time_since_last_exceedance as u64),
            minutes.render(self.total_exceedance_time as u64)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm32EmissionExceedance {
    pub source_address: u8,
    pub exceedances: Vec<EmissionExceedance>,
}

impl DiagnosticPacket for Dm32EmissionExceedance {
    const PGN: u32 = DM32_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            exceedances: decode_groups(
                &frame.payload,
                EXCEEDANCE_LENGTH,
                |window| is_reported(&window[..DTC_LENGTH]),
                EmissionExceedance::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm32EmissionExceedance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", header("DM32", self.source_address))?;
        if self.exceedances.is_empty() {
            return write!(f, "No DTCs");
        }
        for exceedance in &self.exceedances {
            write!(f, "\n{}", exceedance)?;
        }
        Ok(())
    }
}
