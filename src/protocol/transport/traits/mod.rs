//! Abstraction traits used by the transport layer and the diagnostic client.
pub mod can_bus;
pub mod j1939_bus;
pub mod korri_timer;
