//! DM25: expanded freeze frames.
//!
//! Freeze frames carry no fixed stride. The default framing follows J1939-73:
//! each frame starts with a length byte counting the DTC and its SPN data. Some
//! modules send back-to-back frames of one known size instead; callers that know
//! that size decode with [`FreezeFrameFraming::FixedStride`].
use super::dtc::{DiagnosticTroubleCode, DTC_LENGTH};
use super::header;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM25_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FreezeFrameFraming {
    /// Length byte, DTC, SPN data.
    #[default]
    LengthPrefixed,
    /// DTC followed by `n - 4` SPN data bytes per frame. A payload shorter than
    /// two strides is a single frame.
    FixedStride(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FreezeFrame {
    pub dtc: DiagnosticTroubleCode,
    pub spn_data: Vec<u8>,
}

impl FreezeFrame {
    /// DTC then SPN data; `None` under four bytes.
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let dtc = bytes.get(..DTC_LENGTH)?;
        Some(Self {
            dtc: DiagnosticTroubleCode::from_window(dtc),
            spn_data: bytes[DTC_LENGTH..].to_vec(),
        })
    }

    /// "No freeze frame" marker: SPN 0 / FMI 0 without data.
    pub fn is_empty_marker(&self) -> bool {
        self.dtc.is_placeholder() && self.spn_data.iter().all(|byte| *byte == 0xFF)
    }
}

impl fmt::Display for FreezeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Freeze Frame: {}\n  SPN Data:", self.dtc)?;
        for byte in &self.spn_data {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

fn length_prefixed(payload: &[u8]) -> Vec<FreezeFrame> {
    let mut frames = Vec::new();
    let mut rest = payload;
    while let Some((&length, tail)) = rest.split_first() {
        let length = length as usize;
        if length < DTC_LENGTH || length > tail.len() {
            break;
        }
        let (body, next) = tail.split_at(length);
        frames.extend(FreezeFrame::from_bytes(body));
        rest = next;
    }
    frames
}

fn fixed_stride(payload: &[u8], stride: usize) -> Vec<FreezeFrame> {
    if stride < DTC_LENGTH || payload.len() < stride * 2 {
        return FreezeFrame::from_bytes(payload).into_iter().collect();
    }
    payload
        .chunks_exact(stride)
        .filter_map(FreezeFrame::from_bytes)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm25ExpandedFreezeFrame {
    pub source_address: u8,
    pub freeze_frames: Vec<FreezeFrame>,
}

impl Dm25ExpandedFreezeFrame {
    pub fn decode_with(frame: &RawFrame, framing: FreezeFrameFraming) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let mut freeze_frames = match framing {
            FreezeFrameFraming::LengthPrefixed => length_prefixed(&frame.payload),
            FreezeFrameFraming::FixedStride(stride) => fixed_stride(&frame.payload, stride),
        };
        freeze_frames.retain(|freeze_frame| !freeze_frame.is_empty_marker());
        Self {
            source_address: frame.source_address,
            freeze_frames,
        }
    }
}

impl DiagnosticPacket for Dm25ExpandedFreezeFrame {
    const PGN: u32 = DM25_PGN;

    fn decode(frame: &RawFrame) -> Self {
        Self::decode_with(frame, FreezeFrameFraming::default())
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm25ExpandedFreezeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", header("DM25", self.source_address))?;
        if self.freeze_frames.is_empty() {
            return write!(f, "No Freeze Frames");
        }
        write!(f, "[")?;
        for freeze_frame in &self.freeze_frames {
            write!(f, "\n{}", freeze_frame)?;
        }
        write!(f, "\n]")
    }
}
