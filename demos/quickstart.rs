//! # Quickstart
//!
//! Decodes a few captured diagnostic frames without any bus:
//! - DM1 lamps and DTCs
//! - DM5 readiness, merged across two modules
//! - a broadcast PGN through the generic decoder
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use korri_j1939::protocol::messages::Message;
use korri_j1939::protocol::readiness::merge;
use korri_j1939::protocol::transport::can_id::CanId;
use korri_j1939::protocol::transport::raw_frame::RawFrame;
use korri_j1939::protocol::{DM1_PGN, DM5_PGN};

fn main() {
    println!("=== korri-j1939 Quickstart ===\n");

    // ======================================================================
    // 1. Active DTCs (DM1) reassembled from a BAM session
    // ======================================================================
    let dm1 = RawFrame::new(
        DM1_PGN,
        6,
        0x00,
        0xFF,
        vec![
            0x11, 0x0C, 0x61, 0x02, 0x13, 0x00, 0x21, 0x06, 0x1F, 0x00, 0xEE, 0x10, 0x04, 0x00,
        ],
    );
    println!("{}\n", Message::decode(&dm1));

    // ======================================================================
    // 2. Readiness of two modules, merged per monitored system
    // ======================================================================
    let engine = RawFrame::new(DM5_PGN, 6, 0x00, 0xFF, vec![0, 0, 20, 0x07, 1, 0, 1, 0]);
    let aftertreatment = RawFrame::new(DM5_PGN, 6, 0x3D, 0xFF, vec![0, 0, 20, 0, 0, 0x04, 0, 0]);
    let mut systems = Vec::new();
    for frame in [&engine, &aftertreatment] {
        if let Message::Dm5(dm5) = Message::decode(frame) {
            println!("{}\n", dm5);
            systems.extend(dm5.monitored_systems());
        }
    }
    println!("Vehicle composite:");
    for system in merge(systems) {
        println!("{}", system);
    }
    println!();

    // ======================================================================
    // 3. Engine temperature (ET1) through the PGN repository
    // ======================================================================
    let mut payload = vec![0xFF; 8];
    payload[0] = 0x78;
    let et1 = RawFrame::new(65262, 6, 0x00, 0xFF, payload);
    println!("{}\n", Message::decode(&et1));

    // ======================================================================
    // 4. Identifier of a DM1 broadcast
    // ======================================================================
    let can_id = CanId::builder(DM1_PGN, 0x00)
        .with_priority(6)
        .build()
        .expect("valid CAN ID");
    println!("CAN ID: 0x{:08X}, PGN: {}", can_id.0, can_id.pgn());

}
