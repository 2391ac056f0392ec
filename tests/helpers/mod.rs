/// Test doubles: message-level and CAN-level buses over tokio channels, and a
/// timer on `tokio::time::sleep`.
use embassy_time::Duration;
use korri_j1939::protocol::transport::{
    can_frame::CanFrame,
    raw_frame::RawFrame,
    traits::{can_bus::CanBus, j1939_bus::J1939Bus, korri_timer::KorriTimer},
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;

#[allow(dead_code)]
pub const TOOL_ADDRESS: u8 = 0xF9;

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory J1939 network seen from one side.
pub struct MockBus {
    source_address: u8,
    tx: mpsc::UnboundedSender<RawFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<RawFrame>>>,
}

#[allow(dead_code)]
impl MockBus {
    /// Tool-side bus and the vehicle side feeding it.
    pub fn create_pair(tool_address: u8) -> (Self, Self) {
        let (tool_tx, vehicle_rx) = mpsc::unbounded_channel();
        let (vehicle_tx, tool_rx) = mpsc::unbounded_channel();
        let tool = Self {
            source_address: tool_address,
            tx: tool_tx,
            rx: Arc::new(Mutex::new(tool_rx)),
        };
        let vehicle = Self {
            source_address: 0x00,
            tx: vehicle_tx,
            rx: Arc::new(Mutex::new(vehicle_rx)),
        };
        (tool, vehicle)
    }

    /// Push a frame as if a module had sent it.
    pub fn inject(&self, frame: RawFrame) {
        let _ = self.tx.send(frame);
    }
}

impl J1939Bus for MockBus {
    type Error = ();

    fn source_address(&self) -> u8 {
        self.source_address
    }

    async fn send<'a>(&'a mut self, frame: &'a RawFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).map_err(|_| ())
    }

    async fn recv<'a>(&'a mut self) -> Result<RawFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (tool ↔ vehicle).
    pub fn create_pair() -> (Self, Self) {
        let (tool_tx, vehicle_rx) = mpsc::unbounded_channel();
        let (vehicle_tx, tool_rx) = mpsc::unbounded_channel();
        let tool = Self {
            tx: tool_tx,
            rx: Arc::new(Mutex::new(tool_rx)),
        };
        let vehicle = Self {
            tx: vehicle_tx,
            rx: Arc::new(Mutex::new(vehicle_rx)),
        };
        (tool, vehicle)
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).map_err(|_| ())
    }

    async fn recv<'a>(&'a mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive listen windows in tests.
pub struct MockTimer;

impl KorriTimer for MockTimer {
    async fn delay<'a>(&'a mut self, duration: Duration) {
        sleep(std::time::Duration::from_millis(duration.as_millis())).await;
    }
}
