//! Error definitions shared across library modules.
//! Decoders never fail (malformed payloads are truncated locally); the types below
//! cover bit-level access, CAN identifier construction, transport sessions and bus I/O.
use thiserror_no_std::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// The destination address violates protocol constraints.
    #[error("Invalid destination")]
    InvalidDestination,
    /// Attempt to address a broadcast-only (PDU2) PGN to a single node.
    #[error("Invalid for addressed message: PF is too high: {pf}")]
    InvalidForFocusedMessage { pf: u8 },
    /// PDU1 PGNs carry the destination in PS; their low byte must be zero.
    #[error("PDU1 PGNs require PS = 0")]
    PsFocusMessageMustBeNull,
    /// The PGN does not fit in 18 bits.
    #[error("PGN {pgn} exceeds 18 bits")]
    PgnOutOfRange { pgn: u32 },
}

//==================================================================================TRANSPORT_ERROR
#[derive(Debug, Error)]
/// Failures of the J1939-21 transport layer sitting on top of a raw CAN bus.
pub enum TransportError<E: core::fmt::Debug> {
    /// CAN bus rejected the frame during transmission.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// The CAN identifier could not be built.
    #[error(transparent)]
    Build(#[from] CanIdBuildError),
    /// Payload exceeds the transport protocol capacity (1785 bytes).
    #[error("Payload too long for the transport protocol: {len} bytes")]
    PayloadTooLong { len: usize },
    /// Segmented destination-specific sends (RTS/CTS as originator) are not provided.
    #[error("Destination-specific segmented send is not supported")]
    DirectedSegmentationUnsupported,
}

//==================================================================================REQUEST_ERROR
#[derive(Debug, Error)]
/// Bus-level failures while running a request. Protocol-level refusals (NACK,
/// silence) are outcomes, not errors.
pub enum RequestError<E: core::fmt::Debug> {
    /// The request frame could not be sent.
    #[error("Bus send error: {0:?}")]
    Send(E),
    /// Reading from the bus failed during the listen window.
    #[error("Bus receive error: {0:?}")]
    Receive(E),
    /// The command payload could not be serialized.
    #[error(transparent)]
    Encode(#[from] BitWriterError),
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}

//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Value does not fit in the requested width.
    #[error("Value {value} does not fit in {bits} bits")]
    ValueTooWide { value: u64, bits: u8 },
}
