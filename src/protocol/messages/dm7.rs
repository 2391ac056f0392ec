//! DM7: command non-continuously monitored test.
use super::dtc::{join_spn_fmi, spn_name, split_spn_fmi};
use super::header;
use crate::error::BitWriterError;
use crate::infra::codec::traits::{DiagnosticPacket, ToPayload};
use crate::protocol::pgns::DM7_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use core::fmt;

pub const DM7_LENGTH: usize = 8;
/// Asks for the DM30 scaled test results of one SPN.
pub const TID_SCALED_TEST_RESULTS: u8 = 247;
/// Asks for the DM58 rationality fault data of one SPN.
pub const TID_RATIONALITY_DATA: u8 = 245;
/// FMI sent with the SPN-based TIDs.
pub const ALL_FMIS: u8 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dm7Command {
    pub source_address: u8,
    pub tid: u8,
    pub spn: u32,
    pub fmi: u8,
}

impl Dm7Command {
    pub fn new(source_address: u8, tid: u8, spn: u32, fmi: u8) -> Self {
        let (spn, fmi) = split_spn_fmi(join_spn_fmi(spn, fmi));
        Self {
            source_address,
            tid,
            spn,
            fmi,
        }
    }

    pub fn scaled_test_results(source_address: u8, spn: u32) -> Self {
        Self::new(source_address, TID_SCALED_TEST_RESULTS, spn, ALL_FMIS)
    }

    pub fn rationality_data(source_address: u8, spn: u32) -> Self {
        Self::new(source_address, TID_RATIONALITY_DATA, spn, ALL_FMIS)
    }
}

impl ToPayload for Dm7Command {
    /// TID, SPN/FMI, then four `0xFF` bytes.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        if buffer.len() < DM7_LENGTH {
            return Err(BitWriterError::OutOfBounds {
                asked: DM7_LENGTH * 8,
                available: buffer.len() * 8,
            });
        }
        buffer[0] = self.tid;
        buffer[1..4].copy_from_slice(&join_spn_fmi(self.spn, self.fmi));
        buffer[4..DM7_LENGTH].fill(0xFF);
        Ok(DM7_LENGTH)
    }

    fn payload_len(&self) -> usize {
        DM7_LENGTH
    }
}

impl DiagnosticPacket for Dm7Command {
    const PGN: u32 = DM7_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let byte = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        let (spn, fmi) = split_spn_fmi([byte(1), byte(2), byte(3)]);
        Self {
            source_address: frame.source_address,
            tid: byte(0),
            spn,
            fmi,
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm7Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}TID {} for SPN {} - {}, FMI {}",
            header("DM7", self.source_address),
            self.tid,
            self.spn,
            spn_name(self.spn),
            self.fmi
        )
    }
}
