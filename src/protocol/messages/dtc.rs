//! Diagnostic Trouble Code: SPN (19 bits) + FMI (5 bits) + conversion method
//! (1 bit) + occurrence count (7 bits) packed in four bytes.
//!
//! Byte layout: bytes 0-1 SPN low 16 bits, byte 2 bits 7-5 SPN high 3 bits and
//! bits 4-0 FMI, byte 3 bit 7 CM and bits 6-0 OC.
use crate::core::MAX_SPN;
use crate::error::BitWriterError;
use crate::infra::codec::bits::{shave, BitWriter};
use crate::infra::codec::engine::spn_label;
use crate::infra::codec::traits::ToPayload;
use crate::protocol::lookups::fmi_description;
use core::fmt;

pub const DTC_LENGTH: usize = 4;

/// Split the 24-bit little-endian SPN/FMI field shared by DTCs, DM7, DM30 and DM58.
pub fn split_spn_fmi(bytes: [u8; 3]) -> (u32, u8) {
    let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]) as u64;
    let spn = shave(raw, 0, 16) | (shave(raw, 21, 3) << 16);
    let fmi = shave(raw, 16, 5);
    (spn as u32, fmi as u8)
}

/// Inverse of [`split_spn_fmi`]; out-of-range inputs are masked.
pub fn join_spn_fmi(spn: u32, fmi: u8) -> [u8; 3] {
    let spn = spn & MAX_SPN;
    [
        spn as u8,
        (spn >> 8) as u8,
        ((((spn >> 16) & 0x07) as u8) << 5) | (fmi & 0x1F),
    ]
}

/// Human-readable SPN name, `"Unknown SPN"` when the repository has none.
pub fn spn_name(spn: u32) -> &'static str {
    spn_label(spn).unwrap_or("Unknown SPN")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagnosticTroubleCode {
    pub spn: u32,
    pub fmi: u8,
    pub conversion_method: u8,
    pub occurrence_count: u8,
}

impl DiagnosticTroubleCode {
    pub fn new(spn: u32, fmi: u8, occurrence_count: u8) -> Self {
        Self {
            spn: spn & MAX_SPN,
            fmi: fmi & 0x1F,
            conversion_method: 0,
            occurrence_count: occurrence_count & 0x7F,
        }
    }

    /// Decode from a 4-byte window.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let (spn, fmi) = split_spn_fmi([bytes[0], bytes[1], bytes[2]]);
        Self {
            spn,
            fmi,
            conversion_method: bytes[3] >> 7,
            occurrence_count: bytes[3] & 0x7F,
        }
    }

    /// Decode the first four bytes of `window`; callers hand over exact strides.
    pub fn from_window(window: &[u8]) -> Self {
        let mut bytes = [0u8; DTC_LENGTH];
        let len = window.len().min(DTC_LENGTH);
        bytes[..len].copy_from_slice(&window[..len]);
        Self::from_bytes(bytes)
    }

    /// `true` for the "no DTC" placeholder (SPN 0, FMI 0).
    pub fn is_placeholder(&self) -> bool {
        self.spn == 0 && self.fmi == 0
    }

    pub fn spn_name(&self) -> &'static str {
        spn_name(self.spn)
    }

    pub fn fmi_description(&self) -> &'static str {
        fmi_description(self.fmi)
    }
}

/// Repeating-group predicate: keep DTC windows that are neither `0xFF`
/// filler nor the SPN 0 / FMI 0 placeholder.
pub fn is_reported(window: &[u8]) -> bool {
    !window.iter().all(|byte| *byte == 0xFF)
        && !DiagnosticTroubleCode::from_window(window).is_placeholder()
}

impl ToPayload for DiagnosticTroubleCode {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, BitWriterError> {
        let mut writer = BitWriter::new(buffer);
        writer.write_u32(self.spn & 0xFFFF, 16)?;
        writer.write_u8(self.fmi, 5)?;
        writer.write_u32(self.spn >> 16, 3)?;
        writer.write_u8(self.occurrence_count, 7)?;
        writer.write_u8(self.conversion_method, 1)?;
        Ok(DTC_LENGTH)
    }

    fn payload_len(&self) -> usize {
        DTC_LENGTH
    }
}

impl fmt::Display for DiagnosticTroubleCode {
    /// `DTC 609:19 - Unknown SPN, Received Network Data In Error - 0 times`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DTC {}:{} - {}, {} - {} times",
            self.spn,
            self.fmi,
            self.spn_name(),
            self.fmi_description(),
            self.occurrence_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    /// The SPN high bits sit above the FMI in byte 2.
    fn test_decode_layout() {
        let dtc = DiagnosticTroubleCode::from_bytes([0xEE, 0x10, 0x04, 0x00]);
        assert_eq!(dtc.spn, 4334);
        assert_eq!(dtc.fmi, 4);

        let dtc = DiagnosticTroubleCode::from_bytes([0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(dtc.spn, MAX_SPN);
        assert_eq!(dtc.fmi, 31);
        assert_eq!(dtc.conversion_method, 1);
        assert_eq!(dtc.occurrence_count, 127);
    }

    #[test]
    /// Encoding then decoding reproduces every field over a spread of values.
    fn test_round_trip() {
        let spns = [0, 1, 0xFFFF, 0x1_0000, 0x5_A5A5, MAX_SPN];
        for spn in spns {
            for fmi in 0..=31u8 {
                for cm in 0..=1u8 {
                    for oc in [0u8, 1, 64, 126, 127] {
                        let dtc = DiagnosticTroubleCode {
                            spn,
                            fmi,
                            conversion_method: cm,
                            occurrence_count: oc,
                        };
                        let mut buffer = [0u8; 4];
                        assert_eq!(dtc.to_payload(&mut buffer), Ok(4));
                        assert_eq!(DiagnosticTroubleCode::from_bytes(buffer), dtc);
                    }
                }
            }
        }
    }

    #[test]
    fn test_spn_fmi_join_split() {
        for spn in [0u32, 92, 609, 0x7_0001, MAX_SPN] {
            assert_eq!(split_spn_fmi(join_spn_fmi(spn, 18)), (spn, 18));
        }
    }

    #[test]
    fn test_is_reported() {
        assert!(!is_reported(&[0xFF; 4]));
        assert!(!is_reported(&[0x00; 4]));
        assert!(!is_reported(&[0x00, 0x00, 0x00, 0x05]));
        assert!(is_reported(&[0x61, 0x02, 0x13, 0x00]));
    }

    #[test]
    fn test_display() {
        let dtc = DiagnosticTroubleCode::from_bytes([0x21, 0x06, 0x1F, 0x23]);
        assert_eq!(
            dtc.to_string(),
            "DTC 1569:31 - Engine Protection Torque Derate, Condition Exists - 35 times"
        );
    }
}
