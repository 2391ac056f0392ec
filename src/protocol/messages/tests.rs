//! PGN dispatch and the shared rendering helpers.
use super::*;
use crate::protocol::pgns::*;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

fn frame(pgn: u32, source_address: u8, payload: &[u8]) -> RawFrame {
    RawFrame::new(pgn, 6, source_address, 0xF9, payload.to_vec())
}

#[test]
/// Binary search needs a strictly increasing table.
fn test_decoder_table_sorted() {
    assert!(DECODERS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    assert_eq!(DECODERS.len(), 39);
}

#[test]
/// Every registered PGN decodes to a message reporting that same PGN.
fn test_dispatch_round_trip() {
    for (pgn, _) in DECODERS {
        let message = Message::decode(&frame(*pgn, 0x17, &[0xFF; 8]));
        assert_eq!(message.pgn(), *pgn);
        assert_eq!(message.source_address(), 0x17);
        assert!(!matches!(message, Message::Generic(_)));
        assert!(Message::is_supported(*pgn));
    }
}

#[test]
/// DM1 from the engine: lamps and three DTCs.
fn test_dm1_end_to_end() {
    let payload = [
        0x11, 0x0C, 0x61, 0x02, 0x13, 0x00, 0x21, 0x06, 0x1F, 0x00, 0xEE, 0x10, 0x04, 0x00,
    ];
    let Message::Dm1(dm1) = Message::decode(&frame(DM1_PGN, 0x00, &payload)) else {
        panic!("DM1 expected");
    };
    assert_eq!(dm1.lamps.mil(), LampStatus::Off);
    assert_eq!(dm1.lamps.rsl(), LampStatus::SlowFlash);
    assert_eq!(dm1.lamps.awl(), LampStatus::Off);
    // Flash code 0b00 is slow flash; the fast-flash code is 0b01.
    assert_eq!(dm1.lamps.pl(), LampStatus::SlowFlash);
    let spns: Vec<u32> = dm1.dtcs.iter().map(|dtc| dtc.spn).collect();
    assert_eq!(spns, vec![609, 1569, 4334]);

    let fast = Message::decode(&frame(DM1_PGN, 0x00, &[0x11, 0x01, 0x00, 0x00, 0x00, 0x00]));
    let Message::Dm1(fast) = fast else {
        panic!("DM1 expected");
    };
    assert_eq!(fast.lamps.pl(), LampStatus::FastFlash);
    assert!(fast.dtcs.is_empty());
}

#[test]
/// PGNs without a dedicated decoder go through the definition repository.
fn test_generic_fallback() {
    let message = Message::decode(&frame(61444, 0x00, &[0xF0, 0x7D, 0x7D, 0xE0, 0x2E, 0x00, 0xF0, 0x7D]));
    match &message {
        Message::Generic(packet) => assert_eq!(packet.recognized(), 7),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(message.pgn(), 61444);
    assert!(!Message::is_supported(61444));

    let unknown = Message::decode(&frame(0xFF00, 0x03, &[]));
    assert_eq!(unknown.to_string(), "PGN 65280 from Transmission #1 (3): []");
}

#[test]
fn test_acknowledgment_dispatch() {
    let message = Message::decode(&frame(
        ACKNOWLEDGMENT_PGN,
        0x00,
        &[0x00, 0xFF, 0xFF, 0xFF, 0xF9, 0xD3, 0xFE, 0x00],
    ));
    let ack = message.as_acknowledgment().expect("acknowledgment");
    assert_eq!(ack.control, AckControl::Ack);
    assert_eq!(ack.requested_pgn, DM11_PGN);
    assert!(Message::decode(&frame(DM1_PGN, 0, &[])).as_acknowledgment().is_none());
}

#[test]
/// DM25 framing is only chosen through `decode_with`.
fn test_dm25_framing() {
    let payload = [0x21, 0x06, 0x1F, 0x00, 0x01, 0x02, 0x61, 0x02, 0x13, 0x00, 0x03, 0x04];
    let fixed = Message::decode_with(&frame(DM25_PGN, 0, &payload), FreezeFrameFraming::FixedStride(6));
    let Message::Dm25(fixed) = fixed else {
        panic!("DM25 expected");
    };
    assert_eq!(fixed.freeze_frames.len(), 2);

    let other = Message::decode_with(&frame(DM5_PGN, 0, &[0; 8]), FreezeFrameFraming::FixedStride(6));
    assert!(matches!(other, Message::Dm5(_)));
}

#[test]
fn test_helpers() {
    assert_eq!(header("DM6", 0), "DM6 from Engine #1 (0): ");
    assert_eq!(render_count(12, 8), "12");
    assert_eq!(render_count(0xFE, 8), "error");
    assert_eq!(render_count(0xFFFF, 16), "not available");
    assert_eq!(latin1_text(b"AB\xE9"), "AB\u{e9}");
}

#[test]
/// Rendering through the enum matches the record's own rendering.
fn test_message_display() {
    let payload = [0x00, 0xFF, 0x61, 0x02, 0x13, 0x00];
    let message = Message::decode(&frame(DM6_PGN, 0, &payload));
    let Message::Dm6(dm6) = &message else {
        panic!("DM6 expected");
    };
    assert_eq!(message.to_string(), dm6.to_string());
    assert!(message.to_string().starts_with("DM6 from Engine #1 (0): MIL: off"));
}

#[test]
/// Individual clears, exceedances and tracking arrays have dedicated decoders.
fn test_clear_and_tracking_dispatch() {
    let payload = [19, 4, 0xFF, 0xFF, 0xFF, 0x61, 0x02, 0x13];
    let Message::Dm22(dm22) = Message::decode(&frame(DM22_PGN, 0x00, &payload)) else {
        panic!("DM22 expected");
    };
    assert_eq!(dm22.control, Dm22Control::NackActive);
    assert_eq!(dm22.nack_reason, Dm22NackReason::NotActive);
    assert_eq!(dm22.spn, 609);

    assert!(matches!(
        Message::decode(&frame(DM32_PGN, 0x00, &[0xFF; 8])),
        Message::Dm32(_)
    ));
    assert!(matches!(
        Message::decode(&frame(GHG_TRACKING_LIFETIME_PGN, 0x00, &[0xFF; 50])),
        Message::GhgTrackingLifetime(_)
    ));
    let nox = Message::decode(&frame(NOX_STORED_100_HOUR_ENGINE_OUT_PGN, 0x00, &[0xFF; 64]));
    assert!(matches!(nox, Message::NoxStored100HourEngineOut(_)));
    assert_eq!(nox.pgn(), 64269);
}
