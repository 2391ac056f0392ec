//! DM26: diagnostic readiness 3, monitor status for the current drive cycle.
use super::dm5::render_systems;
use super::{header, render_count};
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM26_PGN;
use crate::protocol::readiness::{
    systems_from_bits, MonitoredSystem, CONTINUOUS_SYSTEMS, NON_CONTINUOUS_SYSTEMS,
};
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

const SECONDS_SLOT: u16 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm26DiagnosticReadiness3 {
    pub source_address: u8,
    pub time_since_engine_start: u16,
    pub warm_ups_since_clear: u8,
    /// Byte 3: bits 4-6 status of the continuous monitors (0 = complete).
    pub continuous: u8,
    /// Bytes 4-5: monitors enabled this cycle.
    pub non_continuous_enabled: u16,
    /// Bytes 6-7: monitors not yet complete this cycle.
    pub non_continuous_status: u16,
}

impl Dm26DiagnosticReadiness3 {
    pub fn time_since_engine_start(&self) -> ScaledValue {
        Slot::lookup(SECONDS_SLOT).scale(self.time_since_engine_start as u64)
    }

    /// Continuous monitors carry no enable bit here and are always supported.
    pub fn continuous_systems(&self) -> Vec<MonitoredSystem> {
        systems_from_bits(
            &CONTINUOUS_SYSTEMS,
            self.source_address,
            0x07,
            ((self.continuous >> 4) & 0x07) as u16,
        )
    }

    pub fn non_continuous_systems(&self) -> Vec<MonitoredSystem> {
        systems_from_bits(
            &NON_CONTINUOUS_SYSTEMS,
            self.source_address,
            self.non_continuous_enabled,
            self.non_continuous_status,
        )
    }

    pub fn monitored_systems(&self) -> Vec<MonitoredSystem> {
        let mut systems = self.continuous_systems();
        systems.extend(self.non_continuous_systems());
        systems
    }
}

impl DiagnosticPacket for Dm26DiagnosticReadiness3 {
    const PGN: u32 = DM26_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let word = |index: usize| frame.le_bytes(index, 2).map(|v| v as u16);
        Self {
            source_address: frame.source_address,
            time_since_engine_start: word(0).unwrap_or(0xFFFF),
            warm_ups_since_clear: frame.payload.get(2).copied().unwrap_or(0xFF),
            continuous: frame.payload.get(3).copied().unwrap_or(0),
            non_continuous_enabled: word(4).unwrap_or(0),
            non_continuous_status: word(6).unwrap_or(0),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm26DiagnosticReadiness3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Warm-ups: {}, Time Since Engine Start: {}",
            header("DM26", self.source_address),
            render_count(self.warm_ups_since_clear as u64, 8),
            Slot::lookup(SECONDS_SLOT).render(self.time_since_engine_start as u64)
        )?;
        render_systems(
            f,
            "Continuously Monitored System Support/Status:",
            self.continuous_systems(),
        )?;
        render_systems(
            f,
            "Non-continuously Monitored System Support/Status:",
            self.non_continuous_systems(),
        )
    }
}
