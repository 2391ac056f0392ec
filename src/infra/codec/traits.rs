//! Public traits exposed by the codec layer. They give every diagnostic
//! message the same decode/encode surface so the request engine can stay generic.
use crate::error::BitWriterError;
use crate::protocol::transport::raw_frame::RawFrame;
use core::fmt::Display;

//==================================================================================DIAGNOSTIC_PACKET
/// Implemented by every dedicated message decoder.
///
/// Decoding is infallible: incomplete groups are dropped and missing fields
/// surface as `None` or sentinel values. `Display` is the canonical rendering.
pub trait DiagnosticPacket: Sized + Display {
    /// PGN this decoder understands (PS byte cleared for PDU1 groups).
    const PGN: u32;

    /// Decode a frame carrying `Self::PGN`.
    fn decode(frame: &RawFrame) -> Self;

    /// Address of the module that sent the message.
    fn source_address(&self) -> u8;
}

//==================================================================================TO_PAYLOAD
/// Serialize a record into wire bytes.
pub trait ToPayload {
    /// Serialize into `buffer`, returning the number of bytes written.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError>;
    /// Serialized length in bytes.
    fn payload_len(&self) -> usize;
}
