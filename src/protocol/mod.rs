//! J1939 diagnostic protocol: lookup tables, decoded messages, readiness
//! aggregation, the request/response engine and the CAN transport underneath.
pub mod lookups;
pub mod messages;
pub mod pgns;
pub mod readiness;
pub mod request;
pub mod transport;

pub use pgns::*;
