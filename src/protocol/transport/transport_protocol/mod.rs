//! SAE J1939-21 transport protocol: carries parameter groups of 9 to 1785
//! bytes over TP.CM (connection management) and TP.DT (data transfer) frames.
//!
//! Receiving supports both the broadcast announce (BAM) and the RTS/CTS
//! connection modes. Sending is broadcast only.
pub mod assembler;
pub mod builder;

/// Connection management PGN (TP.CM).
pub const TP_CM_PGN: u32 = 0xEC00;
/// Data transfer PGN (TP.DT).
pub const TP_DT_PGN: u32 = 0xEB00;
/// Largest payload the protocol can carry (255 packets × 7 bytes).
pub const MAX_TP_PAYLOAD: usize = 1785;
/// Payload bytes per TP.DT packet.
pub const BYTES_PER_PACKET: usize = 7;
/// Delay between BAM data packets (J1939-21 requires 50 to 200 ms).
pub const BAM_INTER_PACKET_DELAY_MS: u32 = 50;

/// Control byte of a TP.CM frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlByte {
    RequestToSend,
    ClearToSend,
    EndOfMessageAck,
    BroadcastAnnounce,
    Abort,
}

impl ControlByte {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            16 => Some(ControlByte::RequestToSend),
            17 => Some(ControlByte::ClearToSend),
            19 => Some(ControlByte::EndOfMessageAck),
            32 => Some(ControlByte::BroadcastAnnounce),
            255 => Some(ControlByte::Abort),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            ControlByte::RequestToSend => 16,
            ControlByte::ClearToSend => 17,
            ControlByte::EndOfMessageAck => 19,
            ControlByte::BroadcastAnnounce => 32,
            ControlByte::Abort => 255,
        }
    }
}

/// Number of TP.DT packets needed for `len` bytes.
pub const fn packet_count(len: usize) -> usize {
    len.div_ceil(BYTES_PER_PACKET)
}

/// Write the transported PGN in bytes 5..8 of a TP.CM payload.
pub(crate) fn put_pgn(data: &mut [u8; 8], pgn: u32) {
    data[5..8].copy_from_slice(&pgn.to_le_bytes()[..3]);
}

/// Transported PGN from bytes 5..8 of a TP.CM payload.
pub(crate) fn get_pgn(data: &[u8]) -> u32 {
    data[5] as u32 | (data[6] as u32) << 8 | (data[7] as u32) << 16
}
