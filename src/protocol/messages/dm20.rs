//! DM20: monitor performance ratios.
use super::dtc::{spn_name, split_spn_fmi};
use super::{header, render_count};
use crate::infra::codec::groups::{decode_groups, not_all_ff};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM20_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{format, vec::Vec};
use core::fmt;

pub const RATIO_LENGTH: usize = 7;
const LABEL_WIDTH: usize = 50;
const VALUE_WIDTH: usize = 11;

/// One in-use performance ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PerformanceRatio {
    pub spn: u32,
    pub numerator: u16,
    pub denominator: u16,
}

impl PerformanceRatio {
    /// SPN in the DTC bit layout (the FMI bits are unused), then numerator
    /// and denominator.
    fn from_window(window: &[u8]) -> Self {
        let (spn, _) = split_spn_fmi([window[0], window[1], window[2]]);
        Self {
            spn,
            numerator: u16::from_le_bytes([window[3], window[4]]),
            denominator: u16::from_le_bytes([window[5], window[6]]),
        }
    }

    pub fn name(&self) -> &'static str {
        spn_name(self.spn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm20PerformanceRatios {
    pub source_address: u8,
    pub ignition_cycles: u16,
    pub obd_monitoring_conditions: u16,
    pub ratios: Vec<PerformanceRatio>,
}

impl DiagnosticPacket for Dm20PerformanceRatios {
    const PGN: u32 = DM20_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let counter = |offset: usize| frame.le_bytes(offset, 2).unwrap_or(0xFFFF) as u16;
        Self {
            source_address: frame.source_address,
            ignition_cycles: counter(0),
            obd_monitoring_conditions: counter(2),
            ratios: decode_groups(
                frame.payload.get(4..).unwrap_or(&[]),
                RATIO_LENGTH,
                not_all_ff,
                PerformanceRatio::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

fn counter_row(f: &mut fmt::Formatter<'_>, label: &str, raw: u16) -> fmt::Result {
    write!(
        f,
        "\n  {:<label$}{:>value$}",
        label,
        render_count(raw as u64, 16),
        label = LABEL_WIDTH,
        value = VALUE_WIDTH
    )
}

impl fmt::Display for Dm20PerformanceRatios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("DM20", self.source_address))?;
        write!(
            f,
            "\n  {:<label$}{:>value$} / {:>value$}",
            "",
            "Num'r",
            "Den'r",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        counter_row(f, "Ignition Cycles", self.ignition_cycles)?;
        counter_row(
            f,
            "OBD Monitoring Conditions Encountered",
            self.obd_monitoring_conditions,
        )?;
        for ratio in &self.ratios {
            write!(
                f,
                "\n  {:<label$}{:>value$} / {:>value$}",
                format!("SPN {} {}", ratio.spn, ratio.name()),
                render_count(ratio.numerator as u64, 16),
                render_count(ratio.denominator as u64, 16),
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        write!(f, "\n]")
    }
}
