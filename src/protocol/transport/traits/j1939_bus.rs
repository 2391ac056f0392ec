//! Message-level bus consumed by the diagnostic client: whole parameter groups
//! in, whole parameter groups out. Segmentation is the implementor's business.
use crate::protocol::transport::can_id::DEFAULT_PRIORITY;
use crate::protocol::transport::raw_frame::RawFrame;
use crate::protocol::REQUEST_PGN;
use alloc::vec::Vec;
use futures_util::Future;

/// Bus speaking complete J1939 messages.
pub trait J1939Bus {
    type Error: core::fmt::Debug;

    /// Address the tool transmits from.
    fn source_address(&self) -> u8;

    /// Transmit one message.
    fn send<'a>(
        &'a mut self,
        frame: &'a RawFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Wait for the next complete message from any node.
    fn recv<'a>(&'a mut self) -> impl Future<Output = Result<RawFrame, Self::Error>> + 'a;

    /// Request (PGN 59904) for `pgn`: three little-endian bytes, sent to
    /// `destination` (`0xFF` for a global request).
    fn create_request_frame(&self, pgn: u32, destination: u8) -> RawFrame {
        let mut payload = Vec::with_capacity(3);
        payload.extend_from_slice(&pgn.to_le_bytes()[..3]);
        RawFrame::new(
            REQUEST_PGN,
            DEFAULT_PRIORITY,
            self.source_address(),
            destination,
            payload,
        )
    }
}
