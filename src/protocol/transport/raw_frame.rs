//! Reassembled J1939 message handed to the decoders.
use crate::protocol::transport::can_id::{is_pdu1, GLOBAL_ADDRESS};
use alloc::vec::Vec;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// One complete parameter group, single frame or reassembled from the transport protocol.
pub struct RawFrame {
    /// PGN with the PS byte cleared for destination-specific (PDU1) groups.
    pub pgn: u32,
    pub priority: u8,
    pub source_address: u8,
    /// `0xFF` for broadcasts and for PDU2 groups.
    pub destination_address: u8,
    pub payload: Vec<u8>,
}

impl RawFrame {
    /// Build a frame, normalizing the PGN so that PDU1 destinations never leak into it.
    pub fn new(
        pgn: u32,
        priority: u8,
        source_address: u8,
        destination_address: u8,
        payload: Vec<u8>,
    ) -> Self {
        let (pgn, destination_address) = if is_pdu1(pgn) {
            (pgn & 0x3_FF00, destination_address)
        } else {
            (pgn, GLOBAL_ADDRESS)
        };
        Self {
            pgn,
            priority: priority & 0x07,
            source_address,
            destination_address,
            payload,
        }
    }

    pub fn is_pdu1(&self) -> bool {
        is_pdu1(self.pgn)
    }

    /// PGN field as transmitted in the identifier (`pgn | destination` for PDU1).
    pub fn wire_pgn(&self) -> u32 {
        if self.is_pdu1() {
            self.pgn | self.destination_address as u32
        } else {
            self.pgn
        }
    }

    pub fn is_global(&self) -> bool {
        self.destination_address == GLOBAL_ADDRESS
    }

    /// Little-endian unsigned value of `len` bytes at `offset`, `None` past the payload.
    pub fn le_bytes(&self, offset: usize, len: usize) -> Option<u64> {
        le_value(&self.payload, offset, len)
    }
}

/// Little-endian unsigned value of `len` (≤ 8) bytes at `offset`.
pub fn le_value(bytes: &[u8], offset: usize, len: usize) -> Option<u64> {
    if len > 8 {
        return None;
    }
    let window = bytes.get(offset..offset.checked_add(len)?)?;
    Some(
        window
            .iter()
            .rev()
            .fold(0u64, |acc, byte| (acc << 8) | *byte as u64),
    )
}
