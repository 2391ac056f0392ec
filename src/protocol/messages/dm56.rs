//! DM56: engine family and model year.
use super::identification::FIELD_DELIMITER;
use super::{header, latin1_text};
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::pgns::DM56_PGN;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::string::String;
use core::fmt;

const MODEL_YEAR_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificationType {
    /// `E`: engine model year.
    Engine,
    /// `V`: vehicle model year.
    Vehicle,
    Other(u8),
}

impl CertificationType {
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'E' => CertificationType::Engine,
            b'V' => CertificationType::Vehicle,
            other => CertificationType::Other(other),
        }
    }
}

impl fmt::Display for CertificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificationType::Engine => f.write_str("Engine"),
            CertificationType::Vehicle => f.write_str("Vehicle"),
            CertificationType::Other(byte) => write!(f, "Unknown ({})", byte),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dm56ModelYear {
    pub source_address: u8,
    /// First eight characters, e.g. `"2019E-MY"`.
    pub model_year_field: String,
    pub family_name: String,
}

impl Dm56ModelYear {
    /// Four-digit model year, `None` when the digits are not numeric.
    pub fn model_year(&self) -> Option<u16> {
        let digits = self.model_year_field.get(..4)?;
        if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn certification_type(&self) -> Option<CertificationType> {
        self.model_year_field
            .as_bytes()
            .get(4)
            .map(|byte| CertificationType::from_byte(*byte))
    }
}

impl DiagnosticPacket for Dm56ModelYear {
    const PGN: u32 = DM56_PGN;

    fn decode(frame: &RawFrame) -> Self {
        debug_assert_eq!(frame.pgn, Self::PGN, "frame PGN does not match the decoder");
        let split = frame.payload.len().min(MODEL_YEAR_LENGTH);
        let (model_year, rest) = frame.payload.split_at(split);
        let family = rest
            .iter()
            .position(|byte| *byte == FIELD_DELIMITER)
            .map_or(rest, |end| &rest[..end]);
        Self {
            source_address: frame.source_address,
            model_year_field: latin1_text(model_year),
            family_name: latin1_text(family),
        }
    }

    fn source_address(&self) -> u8 {
        self.source_address
    }
}

impl fmt::Display for Dm56ModelYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", header("DM56", self.source_address))?;
        match (self.model_year(), self.certification_type()) {
            (Some(year), Some(kind)) => write!(f, "Model Year: {} ({})", year, kind)?,
            _ => write!(f, "Model Year: {}", self.model_year_field)?,
        }
        write!(f, ", Family Name: {}", self.family_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn dm56(payload: &[u8]) -> Dm56ModelYear {
        Dm56ModelYear::decode(&RawFrame::new(DM56_PGN, 6, 0x00, 0xFF, payload.to_vec()))
    }

    #[test]
    fn test_engine_model_year() {
        let packet = dm56(b"2019E-MYUSPEH0611HNE*\xFF\xFF");
        assert_eq!(packet.model_year(), Some(2019));
        assert_eq!(packet.certification_type(), Some(CertificationType::Engine));
        assert_eq!(packet.family_name, "USPEH0611HNE");
        assert_eq!(
            packet.to_string(),
            "DM56 from Engine #1 (0): Model Year: 2019 (Engine), Family Name: USPEH0611HNE"
        );
    }

    #[test]
    /// Without a delimiter the family name runs to the end of the payload.
    fn test_family_without_delimiter() {
        let packet = dm56(b"2021V-MYFAMILY");
        assert_eq!(packet.certification_type(), Some(CertificationType::Vehicle));
        assert_eq!(packet.family_name, "FAMILY");
    }

    #[test]
    fn test_short_payload() {
        let packet = dm56(b"20");
        assert_eq!(packet.model_year(), None);
        assert_eq!(packet.certification_type(), None);
        assert_eq!(packet.family_name, "");
        assert_eq!(
            packet.to_string(),
            "DM56 from Engine #1 (0): Model Year: 20, Family Name: "
        );
    }
}
