//! SAE J1939 transport: CAN frames and 29-bit identifiers, reassembled
//! messages, the J1939-21 transport protocol and the bus abstractions.
pub mod can_frame;
pub mod can_id;
pub mod channel_bus;
pub mod layer;
pub mod raw_frame;
pub mod traits;
pub mod transport_protocol;
