//! Result classification; the listen windows are exercised in `tests/`.
use super::*;
use crate::protocol::messages::AckControl;
use alloc::vec;

fn ack(control: AckControl) -> Acknowledgment {
    Acknowledgment::new(0x00, control, 0xF9, DM11_PGN)
}

#[test]
fn test_clear_kind_pgns() {
    assert_eq!(ClearKind::Active.pgn(), 65235);
    assert_eq!(ClearKind::PreviouslyActive.pgn(), 65228);
}

#[test]
fn test_default_config() {
    let config = ClientConfig::new(0xF9);
    assert_eq!(config.priority, 6);
    assert_eq!(config.tool_address, 0xF9);
    assert_eq!(config.framing, FreezeFrameFraming::LengthPrefixed);
}

#[test]
/// Silence and refusal are different results.
fn test_aggregated_flags() {
    let silent: AggregatedResult = AggregatedResult::default();
    assert!(silent.is_silent());
    assert!(!silent.any_nack());

    let refused: AggregatedResult = AggregatedResult {
        packets: vec![],
        acknowledgments: vec![ack(AckControl::Ack), ack(AckControl::AccessDenied)],
    };
    assert!(!refused.is_silent());
    assert!(refused.any_nack());
    assert_eq!(refused.nacks().count(), 1);
}

#[test]
fn test_outcome_from_acknowledgment() {
    let outcome: RequestOutcome = RequestOutcome::from_acknowledgment(ack(AckControl::Nack));
    assert!(outcome.is_nack());
    let outcome: RequestOutcome = RequestOutcome::from_acknowledgment(ack(AckControl::Ack));
    assert!(matches!(outcome, RequestOutcome::Acknowledged(_)));
    assert!(!outcome.is_timeout());
    assert_eq!(outcome.data(), None);
}

#[test]
/// Own echoes and frames addressed to other nodes are skipped.
fn test_tool_filter() {
    let broadcast = RawFrame::new(65226, 6, 0x00, 0xFF, vec![]);
    let to_tool = RawFrame::new(ACKNOWLEDGMENT_PGN, 6, 0x00, 0xF9, vec![]);
    let to_other = RawFrame::new(ACKNOWLEDGMENT_PGN, 6, 0x00, 0xF1, vec![]);
    let echo = RawFrame::new(65226, 6, 0xF9, 0xFF, vec![]);
    assert!(is_for_tool(0xF9, &broadcast));
    assert!(is_for_tool(0xF9, &to_tool));
    assert!(!is_for_tool(0xF9, &to_other));
    assert!(!is_for_tool(0xF9, &echo));
}

/// Writes fewer bytes than it announces.
struct ShortCommand;

impl ToPayload for ShortCommand {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        buffer[0] = 0x01;
        Ok(1)
    }

    fn payload_len(&self) -> usize {
        8
    }
}

/// Announces more bytes than it can serialize.
struct OversizedCommand;

impl ToPayload for OversizedCommand {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        Err(BitWriterError::OutOfBounds {
            asked: 72,
            available: buffer.len() * 8,
        })
    }

    fn payload_len(&self) -> usize {
        8
    }
}

#[test]
fn test_command_frame_from_tool() {
    let config = ClientConfig::new(0xF9);
    let command = Dm7Command::scaled_test_results(0xF9, 190);
    let frame = command_frame(&config, DM7_PGN, &command, 0x00).unwrap();
    assert_eq!(frame.pgn, DM7_PGN);
    assert_eq!(frame.priority, 6);
    assert_eq!(frame.source_address, 0xF9);
    assert_eq!(frame.destination_address, 0x00);
    assert_eq!(frame.payload.len(), 8);
    assert_eq!(frame.payload[0], 247);

    let frame = command_frame(&config, DM7_PGN, &ShortCommand, 0x00).unwrap();
    assert_eq!(frame.payload, vec![0x01]);
}

#[test]
/// Serialization failures surface as an error instead of a padded frame.
fn test_command_encode_error() {
    let config = ClientConfig::new(0xF9);
    let error = command_frame(&config, DM7_PGN, &OversizedCommand, 0x00).unwrap_err();
    assert_eq!(
        error,
        BitWriterError::OutOfBounds {
            asked: 72,
            available: 64
        }
    );
    let error: RequestError<()> = error.into();
    assert!(matches!(error, RequestError::Encode(_)));
}
