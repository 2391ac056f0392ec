//! DM33: emission increasing auxiliary emission control device (EI-AECD) active time.
use super::header;
use crate::core::ScaledValue;
use crate::infra::codec::groups::{decode_groups, not_all_ff};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM33_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::vec::Vec;
use core::fmt;

pub const AECD_TIMER_LENGTH: usize = 9;

/// Timers flag their sentinel in the most significant byte only.
pub fn timer_value(raw: u32) -> ScaledValue {
    match raw >> 24 {
        0xFF => ScaledValue::NotAvailable,
        0xFE => ScaledValue::Error,
        _ => ScaledValue::Number(raw as f64),
    }
}

struct TimerDisplay(u32);

impl fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match timer_value(self.0) {
            ScaledValue::Number(_) => write!(f, "{} minutes", self.0),
            ScaledValue::Error => f.write_str("errored"),
            ScaledValue::NotAvailable => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHoursTimer {
    pub aecd_number: u8,
    /// Raw minutes of timer 1.
    pub timer1: u32,
    /// Raw minutes of timer 2.
    pub timer2: u32,
}

impl EngineHoursTimer {
    fn from_window(window: &[u8]) -> Self {
        let timer = |offset: usize| {
            u32::from_le_bytes([
                window[offset],
                window[offset + 1],
                window[offset + 2],
                window[offset + 3],
            ])
        };
        Self {
            aecd_number: window[0],
            timer1: timer(1),
            timer2: timer(5),
        }
    }

    pub fn timer1_minutes(&self) -> ScaledValue {
        timer_value(self.timer1)
    }

    pub fn timer2_minutes(&self) -> ScaledValue {
        timer_value(self.timer2)
    }
}

impl fmt::Display for EngineHoursTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EI-AECD Number = {}: Timer 1 = {}; Timer 2 = {}",
            self.aecd_number,
            TimerDisplay(self.timer1),
            TimerDisplay(self.timer2)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm33EmissionIncreasingAecdTime {
    pub source_address: u8,
    pub timers: Vec<EngineHoursTimer>,
}

impl DiagnosticPacket for Dm33EmissionIncreasingAecdTime {
    const PGN: u32 = DM33_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            timers: decode_groups(
                &frame.payload,
                AECD_TIMER_LENGTH,
                not_all_ff,
                EngineHoursTimer::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm33EmissionIncreasingAecdTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("DM33", self.source_address))?;
        for timer in &self.timers {
            write!(f, "\n  {}", timer)?;
        }
        write!(f, "\n]")
    }
}
