//! DM29: regulated DTC counts.
use super::{header, render_count};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM29_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use core::fmt;

/// Five one-byte counters, read once at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dm29DtcCounts {
    pub source_address: u8,
    pub emission_pending: u8,
    pub all_pending: u8,
    pub emission_mil_on: u8,
    pub emission_previously_mil_on: u8,
    pub emission_permanent: u8,
}

impl DiagnosticPacket for Dm29DtcCounts {
    const PGN: u32 = DM29_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let count = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        Self {
            source_address: frame.source_address,
            emission_pending: count(0),
            all_pending: count(1),
            emission_mil_on: count(2),
            emission_previously_mil_on: count(3),
            emission_permanent: count(4),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm29DtcCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("DM29", self.source_address))?;
        write!(f, "\n  {:<50}{:>13}", "", "Count")?;
        let rows = [
            ("Emission-Related Pending DTC Count", self.emission_pending),
            ("All Pending DTC Count", self.all_pending),
            ("Emission-Related MIL-On DTC Count", self.emission_mil_on),
            ("Emission-Related Previously MIL-On DTC Count", self.emission_previously_mil_on),
            ("Emission-Related Permanent DTC Count", self.emission_permanent),
        ];
        for (label, count) in rows {
            write!(f, "\n  {:<50}{:>13}", label, render_count(count as u64, 8))?;
        }
        write!(f, "\n]")
    }
}
