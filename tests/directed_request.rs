//! Destination-specific requests: first answer wins, silence is a timeout.
mod helpers;

use embassy_time::Duration;
use helpers::{MockBus, MockTimer, TOOL_ADDRESS};
use korri_j1939::infra::codec::traits::ToPayload;
use korri_j1939::protocol::messages::dm30::TestOutcome;
use korri_j1939::protocol::messages::dtc::join_spn_fmi;
use korri_j1939::protocol::messages::{
    AckControl, Acknowledgment, Dm22Control, Dm22NackReason, Dm5DiagnosticReadiness, Message,
};
use korri_j1939::protocol::request::{ClearKind, DiagnosticClient, RequestOutcome};
use korri_j1939::protocol::transport::raw_frame::RawFrame;
use korri_j1939::protocol::transport::traits::j1939_bus::J1939Bus;
use korri_j1939::protocol::{
    ACKNOWLEDGMENT_PGN, DM11_PGN, DM19_PGN, DM22_PGN, DM30_PGN, DM5_PGN, DM7_PGN, REQUEST_PGN,
};

const WINDOW: Duration = Duration::from_millis(200);
const ENGINE: u8 = 0x00;

fn ack_frame(from: u8, control: AckControl, address: u8, pgn: u32) -> RawFrame {
    let ack = Acknowledgment::new(from, control, address, pgn);
    let mut payload = [0u8; 8];
    let len = ack.to_payload(&mut payload).expect("eight bytes");
    RawFrame::new(ACKNOWLEDGMENT_PGN, 6, from, address, payload[..len].to_vec())
}

fn dm5_frame(from: u8) -> RawFrame {
    RawFrame::new(DM5_PGN, 6, from, 0xFF, vec![0x01, 0x00, 0x14, 0x07, 0x01, 0x00, 0x00, 0x00])
}

#[tokio::test]
/// Nobody answers, and another module's traffic does not count as an answer.
async fn test_timeout() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    vehicle.inject(dm5_frame(0x17));
    vehicle.inject(ack_frame(0x17, AckControl::Nack, TOOL_ADDRESS, DM5_PGN));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_from::<Dm5DiagnosticReadiness>(ENGINE, Duration::from_millis(50))
        .await
        .expect("bus works");
    assert!(outcome.is_timeout());
    assert!(!outcome.is_nack());
}

#[tokio::test]
/// A NACK addressed to the tool ends the wait.
async fn test_nack() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    vehicle.inject(ack_frame(ENGINE, AckControl::Nack, TOOL_ADDRESS, DM5_PGN));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_from::<Dm5DiagnosticReadiness>(ENGINE, WINDOW)
        .await
        .expect("bus works");
    match outcome {
        RequestOutcome::Nack(ack) => {
            assert_eq!(ack.control, AckControl::Nack);
            assert_eq!(ack.requested_pgn, DM5_PGN);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
/// The request goes to the engine alone and its DM5 comes back decoded.
async fn test_data() {
    let (tool, mut vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    let _vehicle = vehicle.clone();
    let responder = tokio::spawn(async move {
        let request = vehicle.recv().await.expect("request");
        assert_eq!(request.pgn, REQUEST_PGN);
        assert_eq!(request.destination_address, ENGINE);
        assert_eq!(request.payload, vec![0xCE, 0xFE, 0x00]);
        vehicle.inject(dm5_frame(0x17));
        vehicle.inject(dm5_frame(ENGINE));
    });

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_from::<Dm5DiagnosticReadiness>(ENGINE, WINDOW)
        .await
        .expect("bus works");
    responder.await.unwrap();

    let dm5 = outcome.data().expect("DM5 answer");
    assert_eq!(dm5.source_address, ENGINE);
    assert_eq!(dm5.active_count, 1);
    assert_eq!(dm5.obd_compliance, 20);
    assert!(dm5.continuous_systems().iter().all(|system| system.status.supported));
}

#[tokio::test]
/// Decoding by PGN picks the dedicated DM19 decoder.
async fn test_data_by_pgn() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    let mut payload = vec![0x78, 0x56, 0x34, 0x12];
    payload.extend_from_slice(b"CAL-0001\0\0\0\0\0\0\0\0");
    vehicle.inject(RawFrame::new(DM19_PGN, 6, ENGINE, TOOL_ADDRESS, payload));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_pgn_from(DM19_PGN, ENGINE, WINDOW)
        .await
        .expect("bus works");
    match outcome {
        RequestOutcome::Data(Message::Dm19(dm19)) => {
            assert_eq!(dm19.calibrations.len(), 1);
            assert_eq!(dm19.calibrations[0].cal_id(), "CAL-0001");
            assert_eq!(dm19.calibrations[0].cvn_hex(), "0x12345678");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
/// DM7 with TID 247 for SPN 190, answered by a DM30 within limits.
async fn test_scaled_test_results() {
    let (tool, mut vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    let _vehicle = vehicle.clone();
    let responder = tokio::spawn(async move {
        let command = vehicle.recv().await.expect("DM7");
        assert_eq!(command.pgn, DM7_PGN);
        assert_eq!(command.destination_address, ENGINE);
        let spn_fmi = join_spn_fmi(190, 31);
        assert_eq!(
            command.payload,
            vec![247, spn_fmi[0], spn_fmi[1], spn_fmi[2], 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let mut payload = vec![247, spn_fmi[0], spn_fmi[1], spn_fmi[2]];
        for word in [242u16, 5000, 8000, 1000] {
            payload.extend_from_slice(&word.to_le_bytes());
        }
        vehicle.inject(RawFrame::new(DM30_PGN, 6, ENGINE, TOOL_ADDRESS, payload));
    });

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_test_results(ENGINE, 190, WINDOW)
        .await
        .expect("bus works");
    responder.await.unwrap();

    let dm30 = outcome.data().expect("DM30 answer");
    assert_eq!(dm30.test_results.len(), 1);
    let result = dm30.test_results[0];
    assert_eq!((result.spn, result.fmi), (190, 31));
    assert_eq!(result.outcome(), TestOutcome::Passed);
    assert_eq!(
        result.to_string(),
        "SPN 190 FMI 31 (Engine Speed) Result: Test Passed. \
         Min: 2.5000 %, Value: 12.5000 %, Max: 20.0000 %"
    );
}

#[tokio::test]
/// A DM7 refused by the module surfaces as a NACK on the DM7 PGN.
async fn test_scaled_test_results_refused() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    vehicle.inject(ack_frame(ENGINE, AckControl::CannotRespond, TOOL_ADDRESS, DM7_PGN));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .request_test_results(ENGINE, 190, WINDOW)
        .await
        .expect("bus works");
    assert!(outcome.is_nack());
}

#[tokio::test]
/// DM11 to everyone: every acknowledgment of the window is returned.
async fn test_clear_active_dtcs() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    vehicle.inject(ack_frame(ENGINE, AckControl::Ack, TOOL_ADDRESS, DM11_PGN));
    vehicle.inject(ack_frame(0x17, AckControl::AccessDenied, 0xFF, DM11_PGN));
    vehicle.inject(ack_frame(0x21, AckControl::Ack, 0x80, DM11_PGN));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let acks = client
        .clear_dtcs(ClearKind::Active, 0xFF, WINDOW)
        .await
        .expect("bus works");
    let answers: Vec<(u8, AckControl)> = acks
        .iter()
        .map(|ack| (ack.source_address, ack.control))
        .collect();
    assert_eq!(
        answers,
        vec![(ENGINE, AckControl::Ack), (0x17, AckControl::AccessDenied)]
    );
}

#[tokio::test]
/// DM22 for one active DTC, refused because the DTC is no longer active.
async fn test_clear_single_dtc() {
    let (tool, mut vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    let _vehicle = vehicle.clone();
    let responder = tokio::spawn(async move {
        let command = vehicle.recv().await.expect("DM22");
        assert_eq!(command.pgn, DM22_PGN);
        assert_eq!(command.source_address, TOOL_ADDRESS);
        assert_eq!(command.destination_address, ENGINE);
        let spn_fmi = join_spn_fmi(609, 19);
        assert_eq!(
            command.payload,
            vec![17, 0xFF, 0xFF, 0xFF, 0xFF, spn_fmi[0], spn_fmi[1], spn_fmi[2]]
        );

        // Another module's answer is not ours.
        let refusal = vec![19, 4, 0xFF, 0xFF, 0xFF, spn_fmi[0], spn_fmi[1], spn_fmi[2]];
        vehicle.inject(RawFrame::new(DM22_PGN, 6, 0x17, TOOL_ADDRESS, refusal.clone()));
        vehicle.inject(RawFrame::new(DM22_PGN, 6, ENGINE, TOOL_ADDRESS, refusal));
    });

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .clear_dtc(ClearKind::Active, ENGINE, 609, 19, WINDOW)
        .await
        .expect("bus works");
    responder.await.unwrap();

    let answer = outcome.data().expect("DM22 answer");
    assert_eq!(answer.source_address, ENGINE);
    assert_eq!(answer.control, Dm22Control::NackActive);
    assert_eq!(answer.nack_reason, Dm22NackReason::NotActive);
    assert!(answer.answers(609, 19));
}

#[tokio::test]
/// A module without DM22 support refuses the PGN itself.
async fn test_clear_single_dtc_unsupported() {
    let (tool, vehicle) = MockBus::create_pair(TOOL_ADDRESS);
    vehicle.inject(ack_frame(ENGINE, AckControl::Nack, TOOL_ADDRESS, DM22_PGN));

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let outcome = client
        .clear_dtc(ClearKind::PreviouslyActive, ENGINE, 1569, 31, WINDOW)
        .await
        .expect("bus works");
    match outcome {
        RequestOutcome::Nack(ack) => {
            assert_eq!(ack.control, AckControl::Nack);
            assert_eq!(ack.requested_pgn, DM22_PGN);
        }
        other => panic!("unexpected {:?}", other),
    }
}
