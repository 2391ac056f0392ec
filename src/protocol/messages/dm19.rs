//! DM19: calibration information, 20 bytes per calibration.
use super::{header, latin1_text};
use crate::infra::codec::groups::{decode_groups, not_all_ff};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM19_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

pub const CALIBRATION_LENGTH: usize = 20;

/// Calibration Verification Number and Calibration ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalibrationInformation {
    pub cvn: u32,
    pub cal_id: [u8; 16],
}

impl CalibrationInformation {
    fn from_window(window: &[u8]) -> Self {
        let mut cvn = [0u8; 4];
        cvn.copy_from_slice(&window[..4]);
        let mut cal_id = [0u8; 16];
        cal_id.copy_from_slice(&window[4..CALIBRATION_LENGTH]);
        Self {
            cvn: u32::from_le_bytes(cvn),
            cal_id,
        }
    }

    /// Calibration ID with trailing NUL, `0xFF` and space padding removed;
    /// embedded bytes are kept.
    pub fn cal_id(&self) -> String {
        let end = self
            .cal_id
            .iter()
            .rposition(|byte| !matches!(byte, 0x00 | 0xFF | b' '))
            .map_or(0, |index| index + 1);
        latin1_text(&self.cal_id[..end])
    }

    /// `0x` followed by eight upper-case hex digits, most significant byte first.
    pub fn cvn_hex(&self) -> String {
        alloc::format!("0x{:08X}", self.cvn)
    }
}

impl fmt::Display for CalibrationInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAL ID of {} and CVN of {}", self.cal_id(), self.cvn_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm19CalibrationInformation {
    pub source_address: u8,
    pub calibrations: Vec<CalibrationInformation>,
}

impl DiagnosticPacket for Dm19CalibrationInformation {
    const PGN: u32 = DM19_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            calibrations: decode_groups(
                &frame.payload,
                CALIBRATION_LENGTH,
                not_all_ff,
                CalibrationInformation::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm19CalibrationInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", header("DM19", self.source_address))?;
        if self.calibrations.is_empty() {
            return write!(f, "No Calibrations");
        }
        write!(f, "[")?;
        for calibration in &self.calibrations {
            write!(f, "\n  {}", calibration)?;
        }
        write!(f, "\n]")
    }
}
