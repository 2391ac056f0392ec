//! Infrastructure shared by the protocol modules.
pub mod codec;
