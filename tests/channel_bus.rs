//! Client and a simulated engine connected through `embassy-sync` channels.
mod helpers;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Duration;
use helpers::{MockTimer, TOOL_ADDRESS};
use korri_j1939::protocol::messages::{Dm21DiagnosticReadiness2, Message};
use korri_j1939::protocol::request::DiagnosticClient;
use korri_j1939::protocol::transport::channel_bus::ChannelBus;
use korri_j1939::protocol::transport::raw_frame::RawFrame;
use korri_j1939::protocol::transport::traits::j1939_bus::J1939Bus;
use korri_j1939::protocol::{DM21_PGN, REQUEST_PGN, VEHICLE_IDENTIFICATION_PGN};

#[tokio::test]
/// The engine answers a directed DM21 request over the channels.
async fn test_directed_dm21() {
    let to_vehicle: Channel<NoopRawMutex, RawFrame, 4> = Channel::new();
    let to_tool: Channel<NoopRawMutex, RawFrame, 4> = Channel::new();
    let tool = ChannelBus::new(TOOL_ADDRESS, to_vehicle.sender(), to_tool.receiver());
    let mut engine = ChannelBus::new(0x00, to_tool.sender(), to_vehicle.receiver());

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let engine_task = async {
        let request = engine.recv().await.unwrap();
        assert_eq!(request.pgn, REQUEST_PGN);
        assert_eq!(request.destination_address, 0x00);
        let answer = RawFrame::new(
            DM21_PGN,
            6,
            0x00,
            request.source_address,
            vec![0x0A, 0x00, 0x64, 0x00, 0x05, 0x00, 0x3C, 0x00],
        );
        engine.send(&answer).await.unwrap();
    };
    let (outcome, ()) = tokio::join!(
        client.request_from::<Dm21DiagnosticReadiness2>(0x00, Duration::from_millis(200)),
        engine_task
    );

    let dm21 = outcome.expect("bus works").data().expect("DM21 answer");
    assert_eq!(dm21.distance_with_mil_on, 10);
    assert_eq!(dm21.distance_since_clear, 100);
    assert_eq!(dm21.minutes_with_mil_on, 5);
    assert_eq!(dm21.minutes_since_clear, 60);
}

#[tokio::test]
/// A VIN broadcast decoded by PGN.
async fn test_vehicle_identification_by_pgn() {
    let to_vehicle: Channel<NoopRawMutex, RawFrame, 4> = Channel::new();
    let to_tool: Channel<NoopRawMutex, RawFrame, 4> = Channel::new();
    let tool = ChannelBus::new(TOOL_ADDRESS, to_vehicle.sender(), to_tool.receiver());
    let mut engine = ChannelBus::new(0x00, to_tool.sender(), to_vehicle.receiver());

    let mut client = DiagnosticClient::new(tool, MockTimer);
    let engine_task = async {
        let request = engine.recv().await.unwrap();
        assert_eq!(request.payload, vec![0xEC, 0xFE, 0x00]);
        let answer = RawFrame::new(
            VEHICLE_IDENTIFICATION_PGN,
            6,
            0x00,
            0xFF,
            b"1FUJGLDR5CLBP8834*".to_vec(),
        );
        engine.send(&answer).await.unwrap();
    };
    let (result, ()) = tokio::join!(
        client.request_global_pgn(VEHICLE_IDENTIFICATION_PGN, Duration::from_millis(100)),
        engine_task
    );

    let result = result.expect("bus works");
    assert_eq!(result.packets.len(), 1);
    match &result.packets[0] {
        Message::VehicleIdentification(id) => {
            assert_eq!(id.vin.as_deref(), Some("1FUJGLDR5CLBP8834"));
            assert_eq!(id.manufacturer_data, None);
        }
        other => panic!("unexpected {:?}", other),
    }
}
