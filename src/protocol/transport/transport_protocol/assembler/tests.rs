//! Transport protocol reassembly: BAM, RTS/CTS, sequencing and aborts.
use super::*;
use alloc::vec;
use alloc::vec::Vec;

const TOOL: u8 = 0xF9;
const DM1: u32 = 65226;

fn announce(control: ControlByte, size: u16, packets: u8, max_per_cts: u8, pgn: u32) -> [u8; 8] {
    let mut data = [0xFF; 8];
    data[0] = control.as_u8();
    data[1..3].copy_from_slice(&size.to_le_bytes());
    data[3] = packets;
    data[4] = max_per_cts;
    put_pgn(&mut data, pgn);
    data
}

fn packet(sequence: u8, bytes: &[u8]) -> [u8; 8] {
    let mut data = [0xFF; 8];
    data[0] = sequence;
    data[1..1 + bytes.len()].copy_from_slice(bytes);
    data
}

#[test]
/// A 14-byte DM1 broadcast arrives in two TP.DT packets.
fn test_bam_reassembly() {
    let mut assembler = TpAssembler::new();
    let bam = announce(ControlByte::BroadcastAnnounce, 14, 2, 0xFF, DM1);
    assert_eq!(
        assembler.process_frame(TP_CM_PGN, 0x00, 0xFF, TOOL, &bam),
        ProcessResult::FragmentConsumed
    );
    assert_eq!(
        assembler.process_frame(TP_DT_PGN, 0x00, 0xFF, TOOL, &packet(1, &[1, 2, 3, 4, 5, 6, 7])),
        ProcessResult::FragmentConsumed
    );
    let result = assembler.process_frame(
        TP_DT_PGN,
        0x00,
        0xFF,
        TOOL,
        &packet(2, &[8, 9, 10, 11, 12, 13, 14]),
    );
    assert_eq!(
        result,
        ProcessResult::MessageComplete(CompletedMessage {
            pgn: DM1,
            source_address: 0x00,
            destination_address: 0xFF,
            payload: (1..=14).collect::<Vec<u8>>(),
            acknowledgment: None,
        })
    );
    assert_eq!(assembler.active_sessions(), 0);
}

#[test]
/// Padding bytes of the last packet are not part of the message.
fn test_last_packet_padding_dropped() {
    let mut assembler = TpAssembler::new();
    let bam = announce(ControlByte::BroadcastAnnounce, 9, 2, 0xFF, DM1);
    assembler.process_frame(TP_CM_PGN, 0x17, 0xFF, TOOL, &bam);
    assembler.process_frame(TP_DT_PGN, 0x17, 0xFF, TOOL, &packet(1, &[0; 7]));
    match assembler.process_frame(TP_DT_PGN, 0x17, 0xFF, TOOL, &packet(2, &[9, 9])) {
        ProcessResult::MessageComplete(message) => {
            assert_eq!(message.payload, vec![0, 0, 0, 0, 0, 0, 0, 9, 9]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
/// RTS addressed to us is answered with a CTS, completion with an EOM acknowledgment.
fn test_rts_cts_reassembly() {
    let mut assembler = TpAssembler::new();
    let rts = announce(ControlByte::RequestToSend, 10, 2, 0xFF, 54016);

    let mut cts = [0xFF; 8];
    cts[0] = 17;
    cts[1] = 2;
    cts[2] = 1;
    put_pgn(&mut cts, 54016);
    assert_eq!(
        assembler.process_frame(TP_CM_PGN, 0x00, TOOL, TOOL, &rts),
        ProcessResult::Reply(ControlFrame {
            destination: 0x00,
            data: cts
        })
    );

    assembler.process_frame(TP_DT_PGN, 0x00, TOOL, TOOL, &packet(1, &[1, 2, 3, 4, 5, 6, 7]));
    match assembler.process_frame(TP_DT_PGN, 0x00, TOOL, TOOL, &packet(2, &[8, 9, 10])) {
        ProcessResult::MessageComplete(message) => {
            assert_eq!(message.pgn, 54016);
            assert_eq!(message.destination_address, TOOL);
            assert_eq!(message.payload, (1..=10).collect::<Vec<u8>>());
            let ack = message.acknowledgment.expect("EOM acknowledgment");
            assert_eq!(ack.destination, 0x00);
            assert_eq!(ack.data[0], 19);
            assert_eq!(&ack.data[1..4], &[10, 0, 2]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
/// The originator's packets-per-CTS limit is honored batch after batch.
fn test_rts_cts_batches() {
    let mut assembler = TpAssembler::new();
    let rts = announce(ControlByte::RequestToSend, 20, 3, 2, DM1);
    match assembler.process_frame(TP_CM_PGN, 0x21, TOOL, TOOL, &rts) {
        ProcessResult::Reply(cts) => assert_eq!(&cts.data[..3], &[17, 2, 1]),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        assembler.process_frame(TP_DT_PGN, 0x21, TOOL, TOOL, &packet(1, &[0; 7])),
        ProcessResult::FragmentConsumed
    );
    match assembler.process_frame(TP_DT_PGN, 0x21, TOOL, TOOL, &packet(2, &[0; 7])) {
        ProcessResult::Reply(cts) => assert_eq!(&cts.data[..3], &[17, 1, 3]),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        assembler.process_frame(TP_DT_PGN, 0x21, TOOL, TOOL, &packet(3, &[0; 6])),
        ProcessResult::MessageComplete(_)
    ));
}

#[test]
/// RTS frames meant for another node are not ours to answer.
fn test_rts_for_other_node_ignored() {
    let mut assembler = TpAssembler::new();
    let rts = announce(ControlByte::RequestToSend, 10, 2, 0xFF, DM1);
    assert_eq!(
        assembler.process_frame(TP_CM_PGN, 0x00, 0x03, TOOL, &rts),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.active_sessions(), 0);
}

#[test]
/// A sequence gap abandons the session.
fn test_sequence_gap_resets() {
    let mut assembler = TpAssembler::new();
    let bam = announce(ControlByte::BroadcastAnnounce, 20, 3, 0xFF, DM1);
    assembler.process_frame(TP_CM_PGN, 0x00, 0xFF, TOOL, &bam);
    assembler.process_frame(TP_DT_PGN, 0x00, 0xFF, TOOL, &packet(1, &[0; 7]));
    assert_eq!(
        assembler.process_frame(TP_DT_PGN, 0x00, 0xFF, TOOL, &packet(3, &[0; 7])),
        ProcessResult::Ignored
    );
    assert_eq!(assembler.active_sessions(), 0);
}

#[test]
/// Inconsistent announces (size vs packet count) are refused.
fn test_invalid_announce() {
    let mut assembler = TpAssembler::new();
    let bam = announce(ControlByte::BroadcastAnnounce, 20, 2, 0xFF, DM1);
    assert_eq!(
        assembler.process_frame(TP_CM_PGN, 0x00, 0xFF, TOOL, &bam),
        ProcessResult::Ignored
    );
    let short = announce(ControlByte::BroadcastAnnounce, 8, 2, 0xFF, DM1);
    assert_eq!(
        assembler.process_frame(TP_CM_PGN, 0x00, 0xFF, TOOL, &short),
        ProcessResult::Ignored
    );
}

#[test]
/// Sessions from different originators progress independently.
fn test_concurrent_sessions() {
    let mut assembler = TpAssembler::new();
    let bam = announce(ControlByte::BroadcastAnnounce, 9, 2, 0xFF, DM1);
    assembler.process_frame(TP_CM_PGN, 0x00, 0xFF, TOOL, &bam);
    assembler.process_frame(TP_CM_PGN, 0x17, 0xFF, TOOL, &bam);
    assert_eq!(assembler.active_sessions(), 2);

    assembler.process_frame(TP_DT_PGN, 0x17, 0xFF, TOOL, &packet(1, &[0x17; 7]));
    assembler.process_frame(TP_DT_PGN, 0x00, 0xFF, TOOL, &packet(1, &[0x00; 7]));
    match assembler.process_frame(TP_DT_PGN, 0x17, 0xFF, TOOL, &packet(2, &[0x17; 2])) {
        ProcessResult::MessageComplete(message) => {
            assert_eq!(message.source_address, 0x17);
            assert!(message.payload.iter().all(|byte| *byte == 0x17));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(assembler.active_sessions(), 1);
}

#[test]
/// Abort from the originator releases its session.
fn test_abort_releases_session() {
    let mut assembler = TpAssembler::new();
    let rts = announce(ControlByte::RequestToSend, 10, 2, 0xFF, DM1);
    assembler.process_frame(TP_CM_PGN, 0x00, TOOL, TOOL, &rts);
    assert_eq!(assembler.active_sessions(), 1);
    let abort = announce(ControlByte::Abort, 0xFFFF, 0xFF, 0xFF, DM1);
    assembler.process_frame(TP_CM_PGN, 0x00, TOOL, TOOL, &abort);
    assert_eq!(assembler.active_sessions(), 0);
}

/// Drive a 1785-byte RTS/CTS transfer to completion and return the CTS
/// frames the assembler granted, the initial one included.
fn full_rts_cts_transfer(max_per_cts: u8) -> Vec<[u8; 8]> {
    let mut assembler = TpAssembler::new();
    let payload: Vec<u8> = (0..MAX_TP_PAYLOAD).map(|index| index as u8).collect();
    let rts = announce(ControlByte::RequestToSend, 1785, 255, max_per_cts, DM1);

    let mut grants = Vec::new();
    match assembler.process_frame(TP_CM_PGN, 0x00, TOOL, TOOL, &rts) {
        ProcessResult::Reply(cts) => grants.push(cts.data),
        other => panic!("unexpected {:?}", other),
    }
    for (index, chunk) in payload.chunks(BYTES_PER_PACKET).enumerate() {
        let sequence = index as u8 + 1;
        match assembler.process_frame(TP_DT_PGN, 0x00, TOOL, TOOL, &packet(sequence, chunk)) {
            ProcessResult::Reply(cts) => grants.push(cts.data),
            ProcessResult::FragmentConsumed => {}
            ProcessResult::MessageComplete(message) => {
                assert_eq!(sequence, 255);
                assert_eq!(message.payload, payload);
                let ack = message.acknowledgment.expect("EOM acknowledgment");
                assert_eq!(&ack.data[..4], &[19, 0xF9, 0x06, 255]);
                return grants;
            }
            ProcessResult::Ignored => panic!("packet {} ignored", sequence),
        }
    }
    panic!("transfer never completed");
}

#[test]
/// One CTS grants all 255 packets of the largest message.
fn test_rts_cts_full_window() {
    let grants = full_rts_cts_transfer(0xFF);
    assert_eq!(grants.len(), 1);
    assert_eq!(&grants[0][..3], &[17, 255, 1]);
}

#[test]
/// One packet per CTS up to sequence 255.
fn test_rts_cts_single_packet_windows() {
    let grants = full_rts_cts_transfer(1);
    assert_eq!(grants.len(), 255);
    assert_eq!(&grants[0][..3], &[17, 1, 1]);
    assert_eq!(&grants[254][..3], &[17, 1, 255]);
}
