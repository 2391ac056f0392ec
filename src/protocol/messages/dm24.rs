//! DM24: SPN support list.
use super::dtc::{spn_name, split_spn_fmi};
use super::header;
use crate::infra::codec::groups::{decode_groups, not_all_ff};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM24_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

pub const SUPPORTED_SPN_LENGTH: usize = 4;

/// One SPN entry. Support flags are active-low on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SupportedSpn {
    pub spn: u32,
    pub supports_scaled_test_results: bool,
    pub supports_data_stream: bool,
    pub supports_expanded_freeze_frame: bool,
    /// Length of the SPN data in a freeze frame, in bytes.
    pub length: u8,
}

impl SupportedSpn {
    fn from_window(window: &[u8]) -> Self {
        let (spn, _) = split_spn_fmi([window[0], window[1], window[2]]);
        let flags = window[2];
        Self {
            spn,
            supports_expanded_freeze_frame: flags & 0x01 == 0,
            supports_data_stream: flags & 0x02 == 0,
            supports_scaled_test_results: flags & 0x04 == 0,
            length: window[3],
        }
    }

    pub fn name(&self) -> &'static str {
        spn_name(self.spn)
    }
}

impl fmt::Display for SupportedSpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPN {} - {}", self.spn, self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm24SpnSupport {
    pub source_address: u8,
    pub supported_spns: Vec<SupportedSpn>,
}

impl Dm24SpnSupport {
    fn filtered(&self, capability: impl Fn(&SupportedSpn) -> bool) -> Vec<SupportedSpn> {
        let mut spns: Vec<SupportedSpn> = self
            .supported_spns
            .iter()
            .filter(|spn| capability(spn))
            .copied()
            .collect();
        spns.sort_by_key(|spn| spn.spn);
        spns
    }

    pub fn scaled_test_result_spns(&self) -> Vec<SupportedSpn> {
        self.filtered(|spn| spn.supports_scaled_test_results)
    }

    pub fn data_stream_spns(&self) -> Vec<SupportedSpn> {
        self.filtered(|spn| spn.supports_data_stream)
    }

    pub fn freeze_frame_spns(&self) -> Vec<SupportedSpn> {
        self.filtered(|spn| spn.supports_expanded_freeze_frame)
    }
}

impl DiagnosticPacket for Dm24SpnSupport {
    const PGN: u32 = DM24_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            supported_spns: decode_groups(
                &frame.payload,
                SUPPORTED_SPN_LENGTH,
                not_all_ff,
                SupportedSpn::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

fn render_group(f: &mut fmt::Formatter<'_>, title: &str, spns: &[SupportedSpn]) -> fmt::Result {
    write!(f, "\n{}", title)?;
    if spns.is_empty() {
        return write!(f, "\n  No Supported SPNs");
    }
    for spn in spns {
        write!(f, "\n  {}", spn)?;
    }
    Ok(())
}

impl fmt::Display for Dm24SpnSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("DM24", self.source_address))?;
        render_group(f, "(Supporting Scaled Test Results) [", &self.scaled_test_result_spns())?;
        write!(f, "\n]")?;
        render_group(f, "(Supports Data Stream Results) [", &self.data_stream_spns())?;
        write!(f, "\n]")?;
        render_group(f, "(Supports Freeze Frame Results) [", &self.freeze_frame_spns())?;
        write!(f, "\n]\n]")
    }
}
