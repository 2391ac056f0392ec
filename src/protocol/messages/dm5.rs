//! DM5: diagnostic readiness 1.
use super::{header, render_count};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::lookups::obd_compliance_label;
use crate::protocol::pgns::DM5_PGN;
use crate::protocol::readiness::{
    systems_from_bits, MonitoredSystem, CONTINUOUS_SYSTEMS, NON_CONTINUOUS_SYSTEMS,
};
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

/// Readiness report. Raw bytes are kept; monitored systems are decoded on access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm5DiagnosticReadiness {
    pub source_address: u8,
    pub active_count: u8,
    pub previously_active_count: u8,
    pub obd_compliance: u8,
    /// Byte 3: bits 0-2 support, bits 4-6 status of the continuous monitors.
    pub continuous: u8,
    /// Bytes 4-5: support of the non-continuous monitors.
    pub non_continuous_support: u16,
    /// Bytes 6-7: status of the non-continuous monitors (0 = complete).
    pub non_continuous_status: u16,
}

impl Dm5DiagnosticReadiness {
    pub fn continuous_systems(&self) -> Vec<MonitoredSystem> {
        systems_from_bits(
            &CONTINUOUS_SYSTEMS,
            self.source_address,
            (self.continuous & 0x07) as u16,
            ((self.continuous >> 4) & 0x07) as u16,
        )
    }

    pub fn non_continuous_systems(&self) -> Vec<MonitoredSystem> {
        systems_from_bits(
            &NON_CONTINUOUS_SYSTEMS,
            self.source_address,
            self.non_continuous_support,
            self.non_continuous_status,
        )
    }

    /// Continuous then non-continuous systems.
    pub fn monitored_systems(&self) -> Vec<MonitoredSystem> {
        let mut systems = self.continuous_systems();
        systems.extend(self.non_continuous_systems());
        systems
    }

    /// An OBD ECU reports a compliance value other than 5 (not OBD), 254 or 255.
    pub fn is_obd(&self) -> bool {
        !matches!(self.obd_compliance, 5 | 0xFE | 0xFF)
    }
}

impl DiagnosticPacket for Dm5DiagnosticReadiness {
    const PGN: u32 = DM5_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let byte = |index: usize| frame.payload.get(index).copied().unwrap_or(0xFF);
        let word = |index: usize| frame.le_bytes(index, 2).map(|v| v as u16).unwrap_or(0);
        Self {
            source_address: frame.source_address,
            active_count: byte(0),
            previously_active_count: byte(1),
            obd_compliance: byte(2),
            continuous: frame.payload.get(3).copied().unwrap_or(0),
            non_continuous_support: word(4),
            non_continuous_status: word(6),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

pub(crate) fn render_systems(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    mut systems: Vec<MonitoredSystem>,
) -> fmt::Result {
    systems.sort_by_key(|system| system.name());
    write!(f, "\n{}", title)?;
    for system in systems {
        write!(f, "\n{}", system)?;
    }
    Ok(())
}

impl fmt::Display for Dm5DiagnosticReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}OBD Compliance: {} ({}), Active Codes: {}, Previously Active Codes: {}",
            header("DM5", self.source_address),
            obd_compliance_label(self.obd_compliance),
            self.obd_compliance,
            render_count(self.active_count as u64, 8),
            render_count(self.previously_active_count as u64, 8)
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
