//! DM22: individual clear/reset of one active or previously active DTC.
//!
//! The same layout carries the tool's request and the module's answer: a
//! control byte, a NACK reason, three reserved bytes, then the SPN/FMI field.
use super::dtc::{join_spn_fmi, spn_name, split_spn_fmi};
use super::header;
use crate::error::BitWriterError;
use crate::infra::codec::traits::{DiagnosticPacket, ToPayload};
use crate::protocol::lookups::fmi_description;
use crate::protocol::pgns::DM22_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use core::fmt;

pub const DM22_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dm22Control {
    ClearPreviouslyActive,
    AckPreviouslyActive,
    NackPreviouslyActive,
    ClearActive,
    AckActive,
    NackActive,
    Other(u8),
}

impl Dm22Control {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Dm22Control::ClearPreviouslyActive,
            2 => Dm22Control::AckPreviouslyActive,
            3 => Dm22Control::NackPreviouslyActive,
            17 => Dm22Control::ClearActive,
            18 => Dm22Control::AckActive,
            19 => Dm22Control::NackActive,
            other => Dm22Control::Other(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Dm22Control::ClearPreviouslyActive => 1,
            Dm22Control::AckPreviouslyActive => 2,
            Dm22Control::NackPreviouslyActive => 3,
            Dm22Control::ClearActive => 17,
            Dm22Control::AckActive => 18,
            Dm22Control::NackActive => 19,
            Dm22Control::Other(other) => other,
        }
    }

    pub fn is_ack(self) -> bool {
        matches!(self, Dm22Control::AckPreviouslyActive | Dm22Control::AckActive)
    }

    pub fn is_nack(self) -> bool {
        matches!(self, Dm22Control::NackPreviouslyActive | Dm22Control::NackActive)
    }
}

impl fmt::Display for Dm22Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dm22Control::ClearPreviouslyActive => f.write_str("Clear/Reset Previously Active DTC"),
            Dm22Control::AckPreviouslyActive => {
                f.write_str("Clear/Reset Previously Active DTC Acknowledged")
            }
            Dm22Control::NackPreviouslyActive => {
                f.write_str("Clear/Reset Previously Active DTC Refused")
            }
            Dm22Control::ClearActive => f.write_str("Clear/Reset Active DTC"),
            Dm22Control::AckActive => f.write_str("Clear/Reset Active DTC Acknowledged"),
            Dm22Control::NackActive => f.write_str("Clear/Reset Active DTC Refused"),
            Dm22Control::Other(value) => write!(f, "Unknown Control ({})", value),
        }
    }
}

/// Byte 1: why a module refused the clear. `0xFF` outside of a NACK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dm22NackReason {
    General,
    AccessDenied,
    UnknownDtc,
    NotPreviouslyActive,
    NotActive,
    NotApplicable,
    Other(u8),
}

impl Dm22NackReason {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Dm22NackReason::General,
            1 => Dm22NackReason::AccessDenied,
            2 => Dm22NackReason::UnknownDtc,
            3 => Dm22NackReason::NotPreviouslyActive,
            4 => Dm22NackReason::NotActive,
            0xFF => Dm22NackReason::NotApplicable,
            other => Dm22NackReason::Other(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Dm22NackReason::General => 0,
            Dm22NackReason::AccessDenied => 1,
            Dm22NackReason::UnknownDtc => 2,
            Dm22NackReason::NotPreviouslyActive => 3,
            Dm22NackReason::NotActive => 4,
            Dm22NackReason::NotApplicable => 0xFF,
            Dm22NackReason::Other(other) => other,
        }
    }
}

impl fmt::Display for Dm22NackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dm22NackReason::General => f.write_str("General Negative Acknowledge"),
            Dm22NackReason::AccessDenied => f.write_str("Access Denied"),
            Dm22NackReason::UnknownDtc => f.write_str("Unknown DTC"),
            Dm22NackReason::NotPreviouslyActive => f.write_str("DTC No Longer Previously Active"),
            Dm22NackReason::NotActive => f.write_str("DTC No Longer Active"),
            Dm22NackReason::NotApplicable => f.write_str("Not Applicable"),
            Dm22NackReason::Other(value) => write!(f, "Unknown Reason ({})", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dm22IndividualClear {
    pub source_address: u8,
    pub control: Dm22Control,
    pub nack_reason: Dm22NackReason,
    pub spn: u32,
    pub fmi: u8,
}

impl Dm22IndividualClear {
    /// Tool request for one DTC; `active` picks the active or the previously
    /// active list.
    pub fn request(source_address: u8, active: bool, spn: u32, fmi: u8) -> Self {
        let (spn, fmi) = split_spn_fmi(join_spn_fmi(spn, fmi));
        Self {
            source_address,
            control: if active {
                Dm22Control::ClearActive
            } else {
                Dm22Control::ClearPreviouslyActive
            },
            nack_reason: Dm22NackReason::NotApplicable,
            spn,
            fmi,
        }
    }

    /// `true` when this answers a clear of the same SPN/FMI.
    pub fn answers(&self, spn: u32, fmi: u8) -> bool {
        (self.control.is_ack() || self.control.is_nack()) && self.spn == spn && self.fmi == fmi
    }
}

impl DiagnosticPacket for Dm22IndividualClear {
    const PGN: u32 = DM22_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let byte = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        let (spn, fmi) = split_spn_fmi([byte(5), byte(6), byte(7)]);
        Self {
            source_address: frame.source_address,
            control: Dm22Control::from_u8(byte(0)),
            nack_reason: Dm22NackReason::from_u8(byte(1)),
            spn,
            fmi,
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl ToPayload for Dm22IndividualClear {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        if buffer.len() < DM22_LENGTH {
            return Err(BitWriterError::OutOfBounds {
                asked: DM22_LENGTH * 8,
                available: buffer.len() * 8,
            });
        }
        buffer[0] = self.control.as_u8();
        buffer[1] = self.nack_reason.as_u8();
        buffer[2..5].fill(0xFF);
        buffer[5..DM22_LENGTH].copy_from_slice(&join_spn_fmi(self.spn, self.fmi));
        Ok(DM22_LENGTH)
    }

    fn payload_len(&self) -> usize {
        DM22_LENGTH
    }
}

impl fmt::Display for Dm22IndividualClear {
    /// `DM22 from Engine #1 (0): Clear/Reset Active DTC Refused (DTC No Longer Active), SPN 609:19 - ...`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", header("DM22", self.source_address), self.control)?;
        if self.control.is_nack() {
            write!(f, " ({})", self.nack_reason)?;
        }
        write!(
            f,
            ", SPN {}:{} - {}, {}",
            self.spn,
            self.fmi,
            spn_name(self.spn),
            fmi_description(self.fmi)
        )
    }
}
