//! Acknowledgment (PGN 59392): answer to a request that carries no data.
use super::header;
use crate::error::BitWriterError;
use crate::infra::codec::traits::{DiagnosticPacket, ToPayload};
use crate::protocol::pgns::ACKNOWLEDGMENT_PGN;
use crate::protocol::transport::can_id::GLOBAL_ADDRESS;
use crate::protocol::transport::raw_frame::{le_value, RawFrame};
use core::fmt;

pub const ACKNOWLEDGMENT_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckControl {
    Ack,
    Nack,
    AccessDenied,
    CannotRespond,
    Other(u8),
}

impl AckControl {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => AckControl::Ack,
            1 => AckControl::Nack,
            2 => AckControl::AccessDenied,
            3 => AckControl::CannotRespond,
            other => AckControl::Other(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            AckControl::Ack => 0,
            AckControl::Nack => 1,
            AckControl::AccessDenied => 2,
            AckControl::CannotRespond => 3,
            AckControl::Other(other) => other,
        }
    }
}

impl fmt::Display for AckControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckControl::Ack => f.write_str("ACK"),
            AckControl::Nack => f.write_str("NACK"),
            AckControl::AccessDenied => f.write_str("Access Denied"),
            AckControl::CannotRespond => f.write_str("Cannot Respond"),
            AckControl::Other(value) => write!(f, "Unknown ({})", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Acknowledgment {
    pub source_address: u8,
    pub control: AckControl,
    pub group_function: u8,
    /// Address of the requester being answered; `0xFF` when broadcast.
    pub address: u8,
    pub requested_pgn: u32,
}

impl Acknowledgment {
    pub fn new(source_address: u8, control: AckControl, address: u8, requested_pgn: u32) -> Self {
        Self {
            source_address,
            control,
            group_function: 0xFF,
            address,
            requested_pgn,
        }
    }

    /// NACK, access denied or cannot respond.
    pub fn is_negative(&self) -> bool {
        matches!(
            self.control,
            AckControl::Nack | AckControl::AccessDenied | AckControl::CannotRespond
        )
    }

    /// `true` when this answers a request from `requester` for `pgn`.
    pub fn answers(&self, requester: u8, pgn: u32) -> bool {
        self.requested_pgn == pgn && (self.address == requester || self.address == GLOBAL_ADDRESS)
    }
}

impl DiagnosticPacket for Acknowledgment {
    const PGN: u32 = ACKNOWLEDGMENT_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let byte = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        Self {
            source_address: frame.source_address,
            control: AckControl::from_u8(byte(0)),
            group_function: byte(1),
            address: byte(4),
            requested_pgn: le_value(&frame.payload, 5, 3).unwrap_or(0x3_FFFF) as u32,
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl ToPayload for Acknowledgment {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        if buffer.len() < ACKNOWLEDGMENT_LENGTH {
            return Err(BitWriterError::OutOfBounds {
                asked: ACKNOWLEDGMENT_LENGTH * 8,
                available: buffer.len() * 8,
            });
        }
        buffer[0] = self.control.as_u8();
        buffer[1] = self.group_function;
        buffer[2] = 0xFF;
        buffer[3] = 0xFF;
        buffer[4] = self.address;
        buffer[5..8].copy_from_slice(&self.requested_pgn.to_le_bytes()[..3]);
        Ok(ACKNOWLEDGMENT_LENGTH)
    }

    fn payload_len(&self) -> usize {
        ACKNOWLEDGMENT_LENGTH
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Response: {}, Group Function: {}, Address Acknowledged: {}, PGN Requested: {}",
            header("Acknowledgment", self.source_address),
            self.control,
            self.group_function,
            self.address,
            self.requested_pgn
        )
    }
}
