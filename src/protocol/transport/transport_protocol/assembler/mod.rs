//! Transport protocol assembler: rebuilds parameter groups from TP.CM / TP.DT
//! frames and produces the control frames the receiver owes the originator
//! (CTS and end-of-message acknowledgment in RTS/CTS mode).
use super::{
    get_pgn, packet_count, put_pgn, ControlByte, BYTES_PER_PACKET, MAX_TP_PAYLOAD, TP_CM_PGN,
    TP_DT_PGN,
};
use crate::protocol::transport::can_id::GLOBAL_ADDRESS;
use alloc::vec::Vec;

//==================================================================================Constants

/// Maximum number of sessions handled in parallel (distinct originators).
const MAX_CONCURRENT_SESSIONS: usize = 8;

/// Abort reason sent when the receiver cannot take another session.
pub const ABORT_RESOURCES_NEEDED: u8 = 2;

//==================================================================================Enums and Structs
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Frame unrelated to a live session or discarded (bad sequence, pool exhausted, ...).
    Ignored,
    /// Frame integrated; more packets are expected.
    FragmentConsumed,
    /// Frame integrated; `ControlFrame` must be sent back (CTS or Abort).
    Reply(ControlFrame),
    /// All packets were received.
    MessageComplete(CompletedMessage),
}

/// TP.CM frame addressed to the originator of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFrame {
    pub destination: u8,
    pub data: [u8; 8],
}

impl ControlFrame {
    fn clear_to_send(destination: u8, count: u8, next_sequence: u8, pgn: u32) -> Self {
        let mut data = [0xFF; 8];
        data[0] = ControlByte::ClearToSend.as_u8();
        data[1] = count;
        data[2] = next_sequence;
        put_pgn(&mut data, pgn);
        Self { destination, data }
    }

    fn end_of_message(destination: u8, size: usize, packets: u8, pgn: u32) -> Self {
        let mut data = [0xFF; 8];
        data[0] = ControlByte::EndOfMessageAck.as_u8();
        data[1..3].copy_from_slice(&(size as u16).to_le_bytes());
        data[3] = packets;
        put_pgn(&mut data, pgn);
        Self { destination, data }
    }

    fn abort(destination: u8, reason: u8, pgn: u32) -> Self {
        let mut data = [0xFF; 8];
        data[0] = ControlByte::Abort.as_u8();
        data[1] = reason;
        put_pgn(&mut data, pgn);
        Self { destination, data }
    }
}

/// Reassembled parameter group.
#[derive(Debug, PartialEq, Eq)]
pub struct CompletedMessage {
    pub pgn: u32,
    pub source_address: u8,
    /// `0xFF` for BAM transfers.
    pub destination_address: u8,
    pub payload: Vec<u8>,
    /// End-of-message acknowledgment owed to the originator (RTS/CTS mode).
    pub acknowledgment: Option<ControlFrame>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SessionState {
    Inactive,
    InProgress,
}

#[derive(Debug)]
struct TpSession {
    state: SessionState,
    source_address: u8,
    destination_address: u8,
    pgn: u32,
    expected_size: usize,
    expected_packets: u8,
    /// Sequence number the next TP.DT must carry.
    next_sequence: u8,
    /// Last sequence number granted by the current CTS (RTS/CTS mode).
    window_end: u8,
    /// Packets per CTS requested by the originator.
    max_per_cts: u8,
    buffer: Vec<u8>,
}

impl TpSession {
    const fn new() -> Self {
        Self {
            state: SessionState::Inactive,
            source_address: 0,
            destination_address: 0,
            pgn: 0,
            expected_size: 0,
            expected_packets: 0,
            next_sequence: 1,
            window_end: 0,
            max_per_cts: 0xFF,
            buffer: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.state = SessionState::Inactive;
        self.expected_size = 0;
        self.expected_packets = 0;
        self.next_sequence = 1;
        self.window_end = 0;
        self.buffer.clear();
    }

    fn is_broadcast(&self) -> bool {
        self.destination_address == GLOBAL_ADDRESS
    }

    fn matches(&self, source_address: u8, destination_address: u8) -> bool {
        self.state == SessionState::InProgress
            && self.source_address == source_address
            && self.destination_address == destination_address
    }

    /// Grant the next batch of packets and build the CTS announcing it.
    ///
    /// Sequence arithmetic runs in `u16`: a 255-packet window ends on sequence 255.
    fn grant(&mut self) -> ControlFrame {
        let next = self.next_sequence as u16;
        let remaining = (self.expected_packets as u16 + 1).saturating_sub(next);
        let count = remaining.min(self.max_per_cts as u16);
        self.window_end = (next + count).saturating_sub(1) as u8;
        ControlFrame::clear_to_send(
            self.source_address,
            count as u8,
            self.next_sequence,
            self.pgn,
        )
    }
}

/// Owns a fixed pool of reusable sessions, keyed by (source, destination).
#[derive(Debug)]
pub struct TpAssembler {
    sessions: [TpSession; MAX_CONCURRENT_SESSIONS],
}

impl Default for TpAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl TpAssembler {
    pub const fn new() -> Self {
        const INACTIVE: TpSession = TpSession::new();
        Self {
            sessions: [INACTIVE; MAX_CONCURRENT_SESSIONS],
        }
    }

    /// Number of sessions currently in progress.
    pub fn active_sessions(&self) -> usize {
        self.sessions
            .iter()
            .filter(|session| session.state == SessionState::InProgress)
            .count()
    }

    //==================================================================================Process Functions
    /// Process a TP.CM or TP.DT frame.
    ///
    /// * `pgn` – PGN of the frame with the destination cleared
    /// * `source_address` / `destination_address` – from the identifier
    /// * `local_address` – our address; RTS frames aimed elsewhere are ignored
    /// * `data` – frame payload (at least eight bytes)
    pub fn process_frame(
        &mut self,
        pgn: u32,
        source_address: u8,
        destination_address: u8,
        local_address: u8,
        data: &[u8],
    ) -> ProcessResult {
        if data.len() < 8 {
            return ProcessResult::Ignored;
        }
        match pgn {
            TP_CM_PGN => {
                self.process_connection(source_address, destination_address, local_address, data)
            }
            TP_DT_PGN => self.process_data(source_address, destination_address, data),
            _ => ProcessResult::Ignored,
        }
    }

    fn process_connection(
        &mut self,
        source_address: u8,
        destination_address: u8,
        local_address: u8,
        data: &[u8],
    ) -> ProcessResult {
        let Some(control) = ControlByte::from_u8(data[0]) else {
            return ProcessResult::Ignored;
        };
        match control {
            ControlByte::BroadcastAnnounce if destination_address == GLOBAL_ADDRESS => {
                match self.open(source_address, GLOBAL_ADDRESS, data) {
                    Some(_) => ProcessResult::FragmentConsumed,
                    None => ProcessResult::Ignored,
                }
            }
            ControlByte::RequestToSend if destination_address == local_address => {
                let pgn = get_pgn(data);
                match self.open(source_address, destination_address, data) {
                    Some(index) => {
                        let session = &mut self.sessions[index];
                        session.max_per_cts = match data[4] {
                            0 => 0xFF,
                            max => max,
                        };
                        ProcessResult::Reply(session.grant())
                    }
                    None => ProcessResult::Reply(ControlFrame::abort(
                        source_address,
                        ABORT_RESOURCES_NEEDED,
                        pgn,
                    )),
                }
            }
            ControlByte::Abort => {
                if let Some(session) = self
                    .sessions
                    .iter_mut()
                    .find(|session| session.matches(source_address, destination_address))
                {
                    session.reset();
                }
                ProcessResult::Ignored
            }
            _ => ProcessResult::Ignored,
        }
    }

    /// Start (or restart) a session; `None` when the announce is invalid or the pool is full.
    fn open(&mut self, source_address: u8, destination_address: u8, data: &[u8]) -> Option<usize> {
        let expected_size = u16::from_le_bytes([data[1], data[2]]) as usize;
        let expected_packets = data[3];
        if !(9..=MAX_TP_PAYLOAD).contains(&expected_size)
            || packet_count(expected_size) != expected_packets as usize
        {
            return None;
        }

        // A new announce from the same originator supersedes the previous one.
        let index = self
            .sessions
            .iter()
            .position(|session| session.matches(source_address, destination_address))
            .or_else(|| {
                self.sessions
                    .iter()
                    .position(|session| session.state == SessionState::Inactive)
            })?;

        let session = &mut self.sessions[index];
        session.reset();
        session.state = SessionState::InProgress;
        session.source_address = source_address;
        session.destination_address = destination_address;
        session.pgn = get_pgn(data);
        session.expected_size = expected_size;
        session.expected_packets = expected_packets;
        session.buffer.reserve(expected_size);
        Some(index)
    }

    fn process_data(
        &mut self,
        source_address: u8,
        destination_address: u8,
        data: &[u8],
    ) -> ProcessResult {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| session.matches(source_address, destination_address))
        else {
            return ProcessResult::Ignored;
        };

        let sequence = data[0];
        if sequence != session.next_sequence {
            // Duplicates are tolerated, gaps abandon the transfer.
            if sequence < session.next_sequence {
                return ProcessResult::Ignored;
            }
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "TP sequence gap from {}: expected {}, got {}",
                source_address,
                session.next_sequence,
                sequence
            );
            session.reset();
            return ProcessResult::Ignored;
        }
        if !session.is_broadcast() && sequence > session.window_end {
            return ProcessResult::Ignored;
        }

        let needed = session.expected_size - session.buffer.len();
        let copy_len = needed.min(BYTES_PER_PACKET);
        session.buffer.extend_from_slice(&data[1..1 + copy_len]);
        session.next_sequence = session.next_sequence.wrapping_add(1);

        if session.buffer.len() >= session.expected_size {
            let acknowledgment = if session.is_broadcast() {
                None
            } else {
                Some(ControlFrame::end_of_message(
                    session.source_address,
                    session.expected_size,
                    session.expected_packets,
                    session.pgn,
                ))
            };
            let completed = CompletedMessage {
                pgn: session.pgn,
                source_address: session.source_address,
                destination_address: session.destination_address,
                payload: core::mem::take(&mut session.buffer),
                acknowledgment,
            };
            session.reset();
            return ProcessResult::MessageComplete(completed);
        }

        if !session.is_broadcast() && sequence == session.window_end {
            return ProcessResult::Reply(session.grant());
        }
        ProcessResult::FragmentConsumed
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
