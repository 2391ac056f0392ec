//! Fault-code families sharing the lamps + DTC list layout:
//! DM1, DM2, DM6, DM12, DM23, DM27 and DM28.
use super::dtc::{is_reported, DiagnosticTroubleCode, DTC_LENGTH};
use super::header;
use super::lamp::Lamps;
use crate::infra::codec::groups::decode_groups;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::*;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

/// Lamps from bytes 0-1 (missing bytes read as "not available") and the DTC
/// group from byte 2 on.
pub fn decode_lamps_and_dtcs(payload: &[u8]) -> (Lamps, Vec<DiagnosticTroubleCode>) {
    let status = payload.first().copied().unwrap_or(0xFF);
    let flash = payload.get(1).copied().unwrap_or(0xFF);
    let dtcs = decode_groups(
        payload.get(2..).unwrap_or(&[]),
        DTC_LENGTH,
        is_reported,
        DiagnosticTroubleCode::from_window,
    );
    (Lamps::new(status, flash), dtcs)
}

/// Shared rendering: header with lamps, then one DTC per line or "No DTCs".
pub fn render_dtcs(
    f: &mut fmt::Formatter<'_>,
    acronym: &str,
    source_address: u8,
    lamps: &Lamps,
    dtcs: &[DiagnosticTroubleCode],
) -> fmt::Result {
    write!(f, "{}{}", header(acronym, source_address), lamps)?;
    if dtcs.is_empty() {
        return write!(f, "\nNo DTCs");
    }
    for dtc in dtcs {
        write!(f, "\n{}", dtc)?;
    }
    Ok(())
}

macro_rules! dtc_packet {
    ($(#[$meta:meta])* $name:ident, $pgn:expr, $acronym:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub source_address: u8,
            pub lamps: Lamps,
            pub dtcs: Vec<DiagnosticTroubleCode>,
        }

        impl $name {
            pub const ACRONYM: &'static str = $acronym;
        }

        impl DiagnosticPacket for $name {
            const PGN: u32 = $pgn;

            fn decode(frame: &RawFrame) -> Self {
                debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
                let (lamps, dtcs) = decode_lamps_and_dtcs(&frame.payload);
                Self {
                    source_address: frame.source_address,
                    lamps,
                    dtcs,
                }
            }

            fn source_address(&self) -> u8 {
                self.source_address
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                render_dtcs(f, $acronym, self.source_address, &self.lamps, &self.dtcs)
            }
        }
    };
}

dtc_packet!(
    /// DM1: active diagnostic trouble codes.
    Dm1ActiveDtcs,
    DM1_PGN,
    "DM1"
);
dtc_packet!(
    /// DM2: previously active diagnostic trouble codes.
    Dm2PreviouslyActiveDtcs,
    DM2_PGN,
    "DM2"
);
dtc_packet!(
    /// DM6: emission-related pending DTCs.
    Dm6PendingEmissionDtcs,
    DM6_PGN,
    "DM6"
);
dtc_packet!(
    /// DM12: emission-related active DTCs.
    Dm12EmissionDtcs,
    DM12_PGN,
    "DM12"
);
dtc_packet!(
    /// DM23: emission-related previously MIL-on DTCs.
    Dm23PreviouslyMilOnEmissionDtcs,
    DM23_PGN,
    "DM23"
);
dtc_packet!(
    /// DM27: all pending DTCs.
    Dm27AllPendingDtcs,
    DM27_PGN,
    "DM27"
);
dtc_packet!(
    /// DM28: permanent DTCs.
    Dm28PermanentEmissionDtcs,
    DM28_PGN,
    "DM28"
);
