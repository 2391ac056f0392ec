//! Request/response engine: sends a request (global or destination-specific),
//! listens for a bounded window, and classifies what comes back as data,
//! acknowledgment, negative acknowledgment or silence.
//!
//! One request per call, no retries. Answers are kept in arrival order.
use crate::error::{BitWriterError, RequestError};
use crate::infra::codec::traits::{DiagnosticPacket, ToPayload};
use crate::protocol::messages::dm7::Dm7Command;
use crate::protocol::messages::{
    Acknowledgment, Dm22IndividualClear, Dm30ScaledTestResults, Dm58RationalityData,
};
use crate::protocol::messages::{FreezeFrameFraming, Message};
use crate::protocol::pgns::{ACKNOWLEDGMENT_PGN, DM11_PGN, DM22_PGN, DM3_PGN, DM7_PGN};
use crate::protocol::transport::can_id::{DEFAULT_PRIORITY, GLOBAL_ADDRESS};
use crate::protocol::transport::raw_frame::RawFrame;
use crate::protocol::transport::traits::{j1939_bus::J1939Bus, korri_timer::KorriTimer};
use alloc::vec;
use alloc::vec::Vec;
use embassy_time::Duration;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

//==================================================================================CONFIG
/// Runtime settings of a [`DiagnosticClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Priority of the frames the client sends.
    pub priority: u8,
    /// Address requests are sent from and answers are expected at.
    pub tool_address: u8,
    /// DM25 framing used when decoding by PGN.
    pub framing: FreezeFrameFraming,
}

impl ClientConfig {
    pub fn new(tool_address: u8) -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            tool_address,
            framing: FreezeFrameFraming::default(),
        }
    }
}

/// Which fault codes a clear request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearKind {
    /// DM11: active DTCs.
    Active,
    /// DM3: previously active DTCs.
    PreviouslyActive,
}

impl ClearKind {
    pub const fn pgn(self) -> u32 {
        match self {
            ClearKind::Active => DM11_PGN,
            ClearKind::PreviouslyActive => DM3_PGN,
        }
    }
}

//==================================================================================RESULTS
/// Everything collected during one listen window of a multi-target request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult<P = Message> {
    pub packets: Vec<P>,
    pub acknowledgments: Vec<Acknowledgment>,
}

impl<P> Default for AggregatedResult<P> {
    fn default() -> Self {
        Self {
            packets: Vec::new(),
            acknowledgments: Vec::new(),
        }
    }
}

impl<P> AggregatedResult<P> {
    /// At least one module refused (NACK, access denied, cannot respond).
    pub fn any_nack(&self) -> bool {
        self.acknowledgments.iter().any(Acknowledgment::is_negative)
    }

    /// Nobody answered at all.
    pub fn is_silent(&self) -> bool {
        self.packets.is_empty() && self.acknowledgments.is_empty()
    }

    pub fn nacks(&self) -> impl Iterator<Item = &Acknowledgment> {
        self.acknowledgments.iter().filter(|ack| ack.is_negative())
    }
}

/// Answer of a single addressed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<P = Message> {
    Data(P),
    /// Positive acknowledgment without data.
    Acknowledged(Acknowledgment),
    /// NACK, access denied or cannot respond; the control byte tells which.
    Nack(Acknowledgment),
    /// The window closed without an answer.
    Timeout,
}

impl<P> RequestOutcome<P> {
    pub fn data(self) -> Option<P> {
        match self {
            RequestOutcome::Data(packet) => Some(packet),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestOutcome::Timeout)
    }

    pub fn is_nack(&self) -> bool {
        matches!(self, RequestOutcome::Nack(_))
    }

    fn from_acknowledgment(ack: Acknowledgment) -> Self {
        if ack.is_negative() {
            RequestOutcome::Nack(ack)
        } else {
            RequestOutcome::Acknowledged(ack)
        }
    }
}

/// Frames meant for the tool: broadcast or addressed to it, never its own echo.
fn is_for_tool(tool_address: u8, frame: &RawFrame) -> bool {
    frame.source_address != tool_address
        && (frame.is_global() || frame.destination_address == tool_address)
}

/// Command frame sent from the tool to `destination`. Unwritten bytes stay `0xFF`.
fn command_frame<C: ToPayload>(
    config: &ClientConfig,
    pgn: u32,
    command: &C,
    destination: u8,
) -> Result<RawFrame, BitWriterError> {
    let mut payload = vec![0xFF; command.payload_len()];
    let len = command.to_payload(&mut payload)?;
    payload.truncate(len);
    Ok(RawFrame::new(
        pgn,
        config.priority,
        config.tool_address,
        destination,
        payload,
    ))
}

//==================================================================================CLIENT
/// Diagnostic tool talking over a [`J1939Bus`].
pub struct DiagnosticClient<B: J1939Bus, T: KorriTimer> {
    bus: B,
    timer: T,
    config: ClientConfig,
}

impl<B: J1939Bus, T: KorriTimer> DiagnosticClient<B, T> {
    /// Client sending from the bus address with default settings.
    pub fn new(bus: B, timer: T) -> Self {
        let config = ClientConfig::new(bus.source_address());
        Self { bus, timer, config }
    }

    pub fn with_config(bus: B, timer: T, config: ClientConfig) -> Self {
        Self { bus, timer, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Give back the bus and the timer.
    pub fn release(self) -> (B, T) {
        (self.bus, self.timer)
    }

    //==================================================================================Global
    /// Request `P` from every module and collect the answers of the window.
    pub async fn request_global<P: DiagnosticPacket>(
        &mut self,
        window: Duration,
    ) -> Result<AggregatedResult<P>, RequestError<B::Error>> {
        self.send_request(P::PGN, GLOBAL_ADDRESS).await?;
        self.collect(P::PGN, GLOBAL_ADDRESS, window, P::decode).await
    }

    /// Same as [`request_global`](Self::request_global), decoding by PGN.
    pub async fn request_global_pgn(
        &mut self,
        pgn: u32,
        window: Duration,
    ) -> Result<AggregatedResult, RequestError<B::Error>> {
        let framing = self.config.framing;
        self.send_request(pgn, GLOBAL_ADDRESS).await?;
        self.collect(pgn, GLOBAL_ADDRESS, window, |frame| {
            Message::decode_with(frame, framing)
        })
        .await
    }

    //==================================================================================Directed
    /// Request `P` from `address`; returns on its first answer.
    pub async fn request_from<P: DiagnosticPacket>(
        &mut self,
        address: u8,
        window: Duration,
    ) -> Result<RequestOutcome<P>, RequestError<B::Error>> {
        self.send_request(P::PGN, address).await?;
        self.await_answer(P::PGN, P::PGN, address, window, P::decode)
            .await
    }

    /// Same as [`request_from`](Self::request_from), decoding by PGN.
    pub async fn request_pgn_from(
        &mut self,
        pgn: u32,
        address: u8,
        window: Duration,
    ) -> Result<RequestOutcome, RequestError<B::Error>> {
        let framing = self.config.framing;
        self.send_request(pgn, address).await?;
        self.await_answer(pgn, pgn, address, window, |frame| {
            Message::decode_with(frame, framing)
        })
        .await
    }

    /// DM7 with TID 247: scaled test results (DM30) of `spn`.
    pub async fn request_test_results(
        &mut self,
        address: u8,
        spn: u32,
        window: Duration,
    ) -> Result<RequestOutcome<Dm30ScaledTestResults>, RequestError<B::Error>> {
        let command = Dm7Command::scaled_test_results(self.config.tool_address, spn);
        self.send_command(DM7_PGN, &command, address).await?;
        self.await_answer(
            Dm30ScaledTestResults::PGN,
            DM7_PGN,
            address,
            window,
            Dm30ScaledTestResults::decode,
        )
        .await
    }

    /// DM7 with TID 245: rationality fault data (DM58) of `spn`.
    pub async fn request_rationality_data(
        &mut self,
        address: u8,
        spn: u32,
        window: Duration,
    ) -> Result<RequestOutcome<Dm58RationalityData>, RequestError<B::Error>> {
        let command = Dm7Command::rationality_data(self.config.tool_address, spn);
        self.send_command(DM7_PGN, &command, address).await?;
        self.await_answer(
            Dm58RationalityData::PGN,
            DM7_PGN,
            address,
            window,
            Dm58RationalityData::decode,
        )
        .await
    }

    /// DM11 or DM3 request. Answers are acknowledgments only; the whole window
    /// is collected, from `destination` alone unless it is global.
    pub async fn clear_dtcs(
        &mut self,
        kind: ClearKind,
        destination: u8,
        window: Duration,
    ) -> Result<Vec<Acknowledgment>, RequestError<B::Error>> {
        let pgn = kind.pgn();
        self.send_request(pgn, destination).await?;
        let result: AggregatedResult<Acknowledgment> = self
            .collect(pgn, destination, window, Acknowledgment::decode)
            .await?;
        Ok(result.acknowledgments)
    }

    /// DM22 for one DTC of `address`. The module answers with a DM22
    /// acknowledgment or refusal, or with a NACK of the DM22 PGN.
    pub async fn clear_dtc(
        &mut self,
        kind: ClearKind,
        address: u8,
        spn: u32,
        fmi: u8,
        window: Duration,
    ) -> Result<RequestOutcome<Dm22IndividualClear>, RequestError<B::Error>> {
        let active = matches!(kind, ClearKind::Active);
        let command = Dm22IndividualClear::request(self.config.tool_address, active, spn, fmi);
        self.send_command(DM22_PGN, &command, address).await?;
        self.await_answer(
            DM22_PGN,
            DM22_PGN,
            address,
            window,
            Dm22IndividualClear::decode,
        )
        .await
    }

    //==================================================================================Internals
    async fn send_request(
        &mut self,
        pgn: u32,
        destination: u8,
    ) -> Result<(), RequestError<B::Error>> {
        let mut request = self.bus.create_request_frame(pgn, destination);
        request.priority = self.config.priority;
        request.source_address = self.config.tool_address;

        #[cfg(feature = "defmt")]
        defmt::debug!("request PGN {} from {}", pgn, destination);

        self.bus.send(&request).await.map_err(RequestError::Send)
    }

    async fn send_command<C: ToPayload>(
        &mut self,
        pgn: u32,
        command: &C,
        destination: u8,
    ) -> Result<(), RequestError<B::Error>> {
        let frame = command_frame(&self.config, pgn, command, destination)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("command PGN {} to {}", pgn, destination);

        self.bus.send(&frame).await.map_err(RequestError::Send)
    }

    /// Listen for the whole window and keep every answer to `pgn`.
    async fn collect<R>(
        &mut self,
        pgn: u32,
        destination: u8,
        window: Duration,
        decode: impl Fn(&RawFrame) -> R,
    ) -> Result<AggregatedResult<R>, RequestError<B::Error>> {
        let mut result = AggregatedResult::default();
        let tool_address = self.config.tool_address;
        let deadline = self.timer.delay(window);
        pin_mut!(deadline);

        loop {
            let frame = {
                let recv = self.bus.recv();
                pin_mut!(recv);
                match select(deadline.as_mut(), recv).await {
                    Either::Left(_) => break,
                    Either::Right((frame, _)) => frame.map_err(RequestError::Receive)?,
                }
            };
            let from_target = destination == GLOBAL_ADDRESS || frame.source_address == destination;
            if !from_target || !is_for_tool(tool_address, &frame) {
                continue;
            }

            if frame.pgn == ACKNOWLEDGMENT_PGN && pgn != ACKNOWLEDGMENT_PGN {
                let ack = Acknowledgment::decode(&frame);
                if ack.answers(tool_address, pgn) {
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "acknowledgment {} from {}",
                        ack.control.as_u8(),
                        frame.source_address
                    );
                    result.acknowledgments.push(ack);
                }
            } else if frame.pgn == pgn {
                #[cfg(feature = "defmt")]
                defmt::trace!("PGN {} from {}", pgn, frame.source_address);
                result.packets.push(decode(&frame));
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "window closed: {} answers, {} acknowledgments",
            result.packets.len(),
            result.acknowledgments.len()
        );
        Ok(result)
    }

    /// Listen until `address` answers with `response_pgn` or acknowledges
    /// `requested_pgn`, or the window closes.
    async fn await_answer<R>(
        &mut self,
        response_pgn: u32,
        requested_pgn: u32,
        address: u8,
        window: Duration,
        decode: impl Fn(&RawFrame) -> R,
    ) -> Result<RequestOutcome<R>, RequestError<B::Error>> {
        let tool_address = self.config.tool_address;
        let deadline = self.timer.delay(window);
        pin_mut!(deadline);

        loop {
            let frame = {
                let recv = self.bus.recv();
                pin_mut!(recv);
                match select(deadline.as_mut(), recv).await {
                    Either::Left(_) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("no answer from {} for PGN {}", address, requested_pgn);
                        return Ok(RequestOutcome::Timeout);
                    }
                    Either::Right((frame, _)) => frame.map_err(RequestError::Receive)?,
                }
            };
            if frame.source_address != address || !is_for_tool(tool_address, &frame) {
                continue;
            }

            if frame.pgn == response_pgn {
                return Ok(RequestOutcome::Data(decode(&frame)));
            }
            if frame.pgn == ACKNOWLEDGMENT_PGN {
                let ack = Acknowledgment::decode(&frame);
                if ack.answers(tool_address, requested_pgn) {
                    return Ok(RequestOutcome::from_acknowledgment(ack));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
