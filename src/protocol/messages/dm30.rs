//! DM30: scaled test results.
use super::dtc::{spn_name, split_spn_fmi};
use super::header;
use crate::core::{ScaledValue, Slot};
use crate::infra::codec::groups::{decode_groups, not_all_ff};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM30_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{format, string::String, vec::Vec};
use core::fmt;

pub const TEST_RESULT_LENGTH: usize = 12;
/// Value reported by a test that has not completed yet.
pub const TEST_NOT_COMPLETE: u16 = 0xFB00;
/// Value reported by a test that cannot run.
pub const TEST_CANNOT_BE_PERFORMED: u16 = 0xFB01;
const NO_LIMIT: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOutcome {
    Passed,
    Failed,
    NotCompleted,
    CannotBePerformed,
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TestOutcome::Passed => "Test Passed",
            TestOutcome::Failed => "Test Failed",
            TestOutcome::NotCompleted => "Test Not Complete",
            TestOutcome::CannotBePerformed => "Test Cannot Be Performed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaledTestResult {
    pub tid: u8,
    pub spn: u32,
    pub fmi: u8,
    /// Identifier in the test-result SLOT table.
    pub slot_id: u16,
    pub value: u16,
    pub max: u16,
    pub min: u16,
}

impl ScaledTestResult {
    fn from_window(window: &[u8]) -> Self {
        let word = |offset: usize| u16::from_le_bytes([window[offset], window[offset + 1]]);
        let (spn, fmi) = split_spn_fmi([window[1], window[2], window[3]]);
        Self {
            tid: window[0],
            spn,
            fmi,
            slot_id: word(4),
            value: word(6),
            max: word(8),
            min: word(10),
        }
    }

    pub fn slot(&self) -> Option<&'static Slot> {
        Slot::find_test_result(self.slot_id)
    }

    /// Limits of `0xFFFF` are not compared.
    pub fn outcome(&self) -> TestOutcome {
        match self.value {
            TEST_NOT_COMPLETE => TestOutcome::NotCompleted,
            TEST_CANNOT_BE_PERFORMED => TestOutcome::CannotBePerformed,
            value => {
                let above = self.max != NO_LIMIT && value > self.max;
                let below = self.min != NO_LIMIT && value < self.min;
                if above || below {
                    TestOutcome::Failed
                } else {
                    TestOutcome::Passed
                }
            }
        }
    }

    /// Test value in engineering units, `None` when the SLOT is unknown.
    pub fn scaled_value(&self) -> Option<ScaledValue> {
        self.slot().map(|slot| slot.scale(self.value as u64))
    }

    fn render(&self, raw: u16) -> String {
        match self.slot() {
            Some(slot) => slot.render(raw as u64),
            None => format!("{}", raw),
        }
    }
}

impl fmt::Display for ScaledTestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPN {} FMI {} ({}) Result: {}.",
            self.spn,
            self.fmi,
            spn_name(self.spn),
            self.outcome()
        )?;
        match self.outcome() {
            TestOutcome::Passed | TestOutcome::Failed => write!(
                f,
                " Min: {}, Value: {}, Max: {}",
                self.render(self.min),
                self.render(self.value),
                self.render(self.max)
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm30ScaledTestResults {
    pub source_address: u8,
    pub test_results: Vec<ScaledTestResult>,
}

impl DiagnosticPacket for Dm30ScaledTestResults {
    const PGN: u32 = DM30_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        Self {
            source_address: frame.source_address,
            test_results: decode_groups(
                &frame.payload,
                TEST_RESULT_LENGTH,
                not_all_ff,
                ScaledTestResult::from_window,
            ),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm30ScaledTestResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", header("DM30", self.source_address))?;
        for result in &self.test_results {
            write!(f, "\n  {}", result)?;
        }
        write!(f, "\n]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn result(value: u16, max: u16, min: u16) -> [u8; 12] {
        let mut bytes = [0u8; 12];
        bytes[0] = 247;
        bytes[1..4].copy_from_slice(&[0xBE, 0x00, 0x1F]);
        bytes[4..6].copy_from_slice(&242u16.to_le_bytes());
        bytes[6..8].copy_from_slice(&value.to_le_bytes());
        bytes[8..10].copy_from_slice(&max.to_le_bytes());
        bytes[10..12].copy_from_slice(&min.to_le_bytes());
        bytes
    }

    fn decode(windows: &[[u8; 12]]) -> Dm30ScaledTestResults {
        let payload = windows.iter().flatten().copied().collect();
        Dm30ScaledTestResults::decode(&RawFrame::new(DM30_PGN, 6, 0x00, 0xF9, payload))
    }

    #[test]
    fn test_classification() {
        let packet = decode(&[
            result(5000, 8000, 1000),
            result(9000, 8000, 1000),
            result(500, 8000, 1000),
            result(TEST_NOT_COMPLETE, 0xFFFF, 0xFFFF),
            result(TEST_CANNOT_BE_PERFORMED, 0xFFFF, 0xFFFF),
            result(9000, 0xFFFF, 0xFFFF),
        ]);
        let outcomes: Vec<TestOutcome> = packet
            .test_results
            .iter()
            .map(ScaledTestResult::outcome)
            .collect();
        assert_eq!(
            outcomes,
            [
                TestOutcome::Passed,
                TestOutcome::Failed,
                TestOutcome::Failed,
                TestOutcome::NotCompleted,
                TestOutcome::CannotBePerformed,
                TestOutcome::Passed,
            ]
        );
        let first = packet.test_results[0];
        assert_eq!((first.tid, first.spn, first.fmi, first.slot_id), (247, 190, 31, 242));
    }

    #[test]
    /// Values are scaled through the test-result SLOT table, not the general one.
    fn test_scaling() {
        let packet = decode(&[result(5000, 8000, 1000)]);
        let value = packet.test_results[0].scaled_value();
        assert_eq!(value, Some(ScaledValue::Number(12.5)));
        assert_eq!(
            packet.to_string(),
            "DM30 from Engine #1 (0): [\n  SPN 190 FMI 31 (Engine Speed) Result: Test Passed. Min: 2.5000 %, Value: 12.5000 %, Max: 20.0000 %\n]"
        );
    }

    #[test]
    fn test_unknown_slot_renders_raw() {
        let mut window = result(TEST_NOT_COMPLETE, 0xFFFF, 0xFFFF);
        window[4..6].copy_from_slice(&[0x99, 0x00]);
        let packet = decode(&[window]);
        assert_eq!(packet.test_results[0].scaled_value(), None);
        assert!(packet.to_string().contains("Result: Test Not Complete."));
        let mut failed = result(10, 5, 0);
        failed[4..6].copy_from_slice(&[0x99, 0x00]);
        assert!(decode(&[failed]).to_string().contains("Min: 0, Value: 10, Max: 5"));
    }
}
