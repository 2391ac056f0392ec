//! In-memory representation of a classic 8-byte J1939 CAN frame, with
//! bridges to the `embedded-can` HAL traits.
use crate::protocol::transport::can_id::CanId;
use embedded_can::{ExtendedId, Frame, Id};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raw frame as read from the CAN bus.
pub struct CanFrame {
    /// Full 29-bit CAN identifier.
    pub id: CanId,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Frame carrying `payload` (at most 8 bytes, the rest is ignored).
    pub fn new(id: CanId, payload: &[u8]) -> Self {
        let len = payload.len().min(8);
        let mut data = [0xFF; 8];
        data[..len].copy_from_slice(&payload[..len]);
        Self { id, data, len }
    }

    /// Valid bytes of the frame.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(8)]
    }

    /// Convert a HAL frame. Standard (11-bit) and remote frames are not J1939 traffic.
    pub fn from_embedded<F: Frame>(frame: &F) -> Option<Self> {
        if frame.is_remote_frame() {
            return None;
        }
        match frame.id() {
            Id::Extended(id) => Some(Self::new(CanId(id.as_raw()), frame.data())),
            Id::Standard(_) => None,
        }
    }

    /// Convert into a HAL frame type.
    pub fn to_embedded<F: Frame>(&self) -> Option<F> {
        let id = ExtendedId::new(self.id.0)?;
        F::new(id, self.payload())
    }
}
