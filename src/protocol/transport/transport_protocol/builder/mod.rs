//! CAN frame generator for outgoing parameter groups: a single frame up to eight
//! bytes, otherwise a BAM announce followed by the TP.DT packets.
use super::{
    packet_count, put_pgn, ControlByte, BYTES_PER_PACKET, MAX_TP_PAYLOAD, TP_CM_PGN, TP_DT_PGN,
};
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{is_pdu1, CanId, DEFAULT_PRIORITY, GLOBAL_ADDRESS};

#[derive(Debug)]
/// Shared parameters for all frames composing one message.
pub struct TpBuilder<'a> {
    pgn: u32,
    priority: u8,
    source_address: u8,
    destination: u8,
    payload: &'a [u8],
}

/// Lazy iterator returning frames one by one as they are encoded.
pub struct FrameIterator<'a> {
    builder: TpBuilder<'a>,
    /// 0 = announce (or the single frame), then TP.DT sequence numbers.
    step: usize,
    done: bool,
}

impl<'a> TpBuilder<'a> {
    pub fn new(pgn: u32, source_address: u8, destination: u8, payload: &'a [u8]) -> Self {
        Self {
            pgn,
            priority: DEFAULT_PRIORITY,
            source_address,
            destination,
            payload,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// `true` when the payload needs the transport protocol.
    pub fn is_multi_packet(&self) -> bool {
        self.payload.len() > 8
    }

    /// `true` when the payload fits the protocol.
    pub fn fits(&self) -> bool {
        self.payload.len() <= MAX_TP_PAYLOAD
    }

    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            step: 0,
            done: false,
        }
    }

    fn identifier(&self, pgn: u32, destination: u8) -> Result<CanId, CanIdBuildError> {
        let builder = CanId::builder(pgn, self.source_address).with_priority(self.priority);
        if is_pdu1(pgn) {
            builder.to_destination(destination).build()
        } else {
            builder.build()
        }
    }
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = Result<CanFrame, CanIdBuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let builder = &self.builder;
        let total_len = builder.payload.len();

        if !builder.is_multi_packet() {
            self.done = true;
            return Some(
                builder
                    .identifier(builder.pgn, builder.destination)
                    .map(|id| CanFrame::new(id, builder.payload)),
            );
        }

        let packets = packet_count(total_len);
        let frame = if self.step == 0 {
            let mut data = [0xFF; 8];
            data[0] = ControlByte::BroadcastAnnounce.as_u8();
            data[1..3].copy_from_slice(&(total_len as u16).to_le_bytes());
            data[3] = packets as u8;
            put_pgn(&mut data, builder.pgn);
            builder
                .identifier(TP_CM_PGN, GLOBAL_ADDRESS)
                .map(|id| CanFrame::new(id, &data))
        } else {
            let start = (self.step - 1) * BYTES_PER_PACKET;
            let end = (start + BYTES_PER_PACKET).min(total_len);
            let mut data = [0xFF; 8];
            data[0] = self.step as u8;
            data[1..1 + end - start].copy_from_slice(&builder.payload[start..end]);
            builder
                .identifier(TP_DT_PGN, GLOBAL_ADDRESS)
                .map(|id| CanFrame::new(id, &data))
        };

        if frame.is_err() || self.step == packets {
            self.done = true;
        }
        self.step += 1;
        Some(frame)
    }
}
