//! `J1939Bus` over a raw `CanBus`: reassembles transport-protocol sessions on
//! receive, answers RTS/CTS originators, and segments long broadcasts on send.
use crate::error::TransportError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{CanId, GLOBAL_ADDRESS};
use crate::protocol::transport::raw_frame::RawFrame;
use crate::protocol::transport::traits::{
    can_bus::CanBus, j1939_bus::J1939Bus, korri_timer::KorriTimer,
};
use crate::protocol::transport::transport_protocol::{
    assembler::{ControlFrame, ProcessResult, TpAssembler},
    builder::TpBuilder,
    BAM_INTER_PACKET_DELAY_MS, TP_CM_PGN, TP_DT_PGN,
};

/// Priority of connection management frames.
const TP_CM_PRIORITY: u8 = 7;

/// Message-level bus built on a CAN driver and a timer.
pub struct TransportLayer<C: CanBus, T: KorriTimer> {
    bus: C,
    timer: T,
    source_address: u8,
    assembler: TpAssembler,
}

impl<C: CanBus, T: KorriTimer> TransportLayer<C, T> {
    pub fn new(bus: C, timer: T, source_address: u8) -> Self {
        Self {
            bus,
            timer,
            source_address,
            assembler: TpAssembler::new(),
        }
    }

    /// Give back the CAN driver and the timer.
    pub fn release(self) -> (C, T) {
        (self.bus, self.timer)
    }

    async fn send_control(
        &mut self,
        control: ControlFrame,
    ) -> Result<(), TransportError<C::Error>> {
        let id = CanId::builder(TP_CM_PGN, self.source_address)
            .with_priority(TP_CM_PRIORITY)
            .to_destination(control.destination)
            .build()?;
        let frame = CanFrame::new(id, &control.data);
        self.bus.send(&frame).await.map_err(TransportError::Send)
    }
}

impl<C: CanBus, T: KorriTimer> J1939Bus for TransportLayer<C, T> {
    type Error = TransportError<C::Error>;

    fn source_address(&self) -> u8 {
        self.source_address
    }

    async fn send<'a>(&'a mut self, frame: &'a RawFrame) -> Result<(), Self::Error> {
        let builder = TpBuilder::new(
            frame.pgn,
            frame.source_address,
            frame.destination_address,
            &frame.payload,
        )
        .with_priority(frame.priority);

        if !builder.fits() {
            return Err(TransportError::PayloadTooLong {
                len: frame.payload.len(),
            });
        }
        if builder.is_multi_packet() && frame.destination_address != GLOBAL_ADDRESS {
            return Err(TransportError::DirectedSegmentationUnsupported);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "send PGN {} to {} ({} bytes)",
            frame.pgn,
            frame.destination_address,
            frame.payload.len()
        );

        let mut is_first_frame = true;
        for can_frame in builder.build() {
            let can_frame = can_frame?;
            if !is_first_frame {
                self.timer.delay_ms(BAM_INTER_PACKET_DELAY_MS).await;
            }
            self.bus
                .send(&can_frame)
                .await
                .map_err(TransportError::Send)?;
            is_first_frame = false;
        }
        Ok(())
    }

    async fn recv<'a>(&'a mut self) -> Result<RawFrame, Self::Error> {
        loop {
            let frame = self.bus.recv().await.map_err(TransportError::Receive)?;
            let id = frame.id;
            let pgn = id.pgn();
            let destination = id.destination().unwrap_or(GLOBAL_ADDRESS);

            if pgn != TP_CM_PGN && pgn != TP_DT_PGN {
                return Ok(RawFrame::new(
                    pgn,
                    id.priority(),
                    id.source_address(),
                    destination,
                    frame.payload().to_vec(),
                ));
            }

            match self.assembler.process_frame(
                pgn,
                id.source_address(),
                destination,
                self.source_address,
                frame.payload(),
            ) {
                ProcessResult::Reply(control) => self.send_control(control).await?,
                ProcessResult::MessageComplete(message) => {
                    if let Some(acknowledgment) = message.acknowledgment {
                        self.send_control(acknowledgment).await?;
                    }
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "TP message PGN {} from {} reassembled ({} bytes)",
                        message.pgn,
                        message.source_address,
                        message.payload.len()
                    );
                    return Ok(RawFrame::new(
                        message.pgn,
                        id.priority(),
                        message.source_address,
                        message.destination_address,
                        message.payload,
                    ));
                }
                ProcessResult::FragmentConsumed | ProcessResult::Ignored => {}
            }
        }
    }
}
