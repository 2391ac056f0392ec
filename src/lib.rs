//! `korri-j1939` library: decoding and requesting SAE J1939 diagnostic
//! messages (DM1, DM5, DM19...) in a `no_std` + `alloc` environment. The crate
//! exposes the binary codec (bit access, SLOT scaling, repeating groups, PGN
//! repository), the decoded messages, readiness aggregation, the request/response
//! engine, and the CAN transport they run on.
#![no_std]
extern crate alloc;
//==================================================================================
/// Core data types shared by the build script and the codec.
pub mod core;
/// Bit access, CAN identifier, transport and request errors.
pub mod error;
/// Binary codec used by every decoder.
pub mod infra;
/// J1939 diagnostics: messages, readiness, request engine and transport.
pub mod protocol;
//==================================================================================
