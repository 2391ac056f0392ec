//! `J1939Bus` over `embassy-sync` channels: simulated networks, and firmware
//! where a separate task owns the CAN peripheral.
use crate::protocol::transport::raw_frame::RawFrame;
use crate::protocol::transport::traits::j1939_bus::J1939Bus;
use core::convert::Infallible;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};

/// Endpoint sending into one channel and receiving from another.
pub struct ChannelBus<'ch, M: RawMutex, const N: usize> {
    source_address: u8,
    tx: Sender<'ch, M, RawFrame, N>,
    rx: Receiver<'ch, M, RawFrame, N>,
}

impl<'ch, M: RawMutex, const N: usize> ChannelBus<'ch, M, N> {
    pub fn new(
        source_address: u8,
        tx: Sender<'ch, M, RawFrame, N>,
        rx: Receiver<'ch, M, RawFrame, N>,
    ) -> Self {
        Self {
            source_address,
            tx,
            rx,
        }
    }
}

impl<'ch, M: RawMutex, const N: usize> J1939Bus for ChannelBus<'ch, M, N> {
    type Error = Infallible;

    fn source_address(&self) -> u8 {
        self.source_address
    }

    async fn send<'a>(&'a mut self, frame: &'a RawFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).await;
        Ok(())
    }

    async fn recv<'a>(&'a mut self) -> Result<RawFrame, Self::Error> {
        Ok(self.rx.receive().await)
    }
}
