//! Decoded diagnostic messages.
//!
//! Every DM family has its own record type implementing
//! [`DiagnosticPacket`]; [`Message`] is the closed set of them, dispatched by
//! PGN through a sorted table. PGNs without a dedicated decoder fall back to
//! [`GenericPacket`].
pub mod acknowledgment;
pub mod dm19;
pub mod dm20;
pub mod dm21;
pub mod dm22;
pub mod dm24;
pub mod dm25;
pub mod dm26;
pub mod dm29;
pub mod dm30;
pub mod dm31;
pub mod dm32;
pub mod dm33;
pub mod dm5;
pub mod dm56;
pub mod dm58;
pub mod dm7;
pub mod dtc;
pub mod dtc_packet;
pub mod generic;
pub mod identification;
pub mod lamp;
pub mod tracking;

use crate::core::Sentinel;
use crate::infra::codec::traits::DiagnosticPacket;
use crate::protocol::lookups::source_address_label;
use crate::protocol::transport::raw_frame::RawFrame;
use alloc::{format, string::String};
use core::fmt;

pub use acknowledgment::{AckControl, Acknowledgment};
pub use dm19::Dm19CalibrationInformation;
pub use dm20::Dm20PerformanceRatios;
pub use dm21::Dm21DiagnosticReadiness2;
pub use dm22::{Dm22Control, Dm22IndividualClear, Dm22NackReason};
pub use dm24::Dm24SpnSupport;
pub use dm25::{Dm25ExpandedFreezeFrame, FreezeFrameFraming};
pub use dm26::Dm26DiagnosticReadiness3;
pub use dm29::Dm29DtcCounts;
pub use dm30::Dm30ScaledTestResults;
pub use dm31::Dm31DtcLampAssociation;
pub use dm32::Dm32EmissionExceedance;
pub use dm33::Dm33EmissionIncreasingAecdTime;
pub use dm5::Dm5DiagnosticReadiness;
pub use dm56::Dm56ModelYear;
pub use dm58::Dm58RationalityData;
pub use dm7::Dm7Command;
pub use dtc::DiagnosticTroubleCode;
pub use dtc_packet::{
    Dm12EmissionDtcs, Dm1ActiveDtcs, Dm23PreviouslyMilOnEmissionDtcs, Dm27AllPendingDtcs,
    Dm28PermanentEmissionDtcs, Dm2PreviouslyActiveDtcs, Dm6PendingEmissionDtcs,
};
pub use generic::GenericPacket;
pub use identification::{ComponentIdentification, EcuIdentification, VehicleIdentification};
pub use lamp::{Lamp, LampStatus, Lamps};
pub use tracking::{
    render_tracking_table, GhgTrackingActive100Hour, GhgTrackingLifetime, GhgTrackingStored100Hour,
    NoxActive100HourEngineEnergy, NoxActive100HourEngineOut, NoxActive100HourSystemOut,
    NoxLifetimeEngineEnergy, NoxLifetimeEngineOut, NoxLifetimeSystemOut,
    NoxStored100HourEngineEnergy, NoxStored100HourEngineOut, NoxStored100HourSystemOut,
    TrackingArray, TrackingPeriod,
};

//==================================================================================RENDERING
/// `"DM6 from Engine #1 (0): "`.
pub(crate) fn header(acronym: &str, source_address: u8) -> String {
    format!("{} from {}: ", acronym, source_address_label(source_address))
}

/// Counter rendering: the number, `"error"` or `"not available"`.
pub(crate) fn render_count(raw: u64, bits: u8) -> String {
    match Sentinel::classify(raw, bits) {
        Sentinel::Data => format!("{}", raw),
        Sentinel::Error => String::from("error"),
        Sentinel::NotAvailable => String::from("not available"),
    }
}

/// One character per byte (ISO 8859-1).
pub(crate) fn latin1_text(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| *byte as char).collect()
}

//==================================================================================MESSAGE
macro_rules! messages {
    ($($variant:ident($packet:ty)),+ $(,)?) => {
        /// Any decoded message.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Message {
            $($variant($packet),)+
            Generic(GenericPacket),
        }

        $(
            impl From<$packet> for Message {
                fn from(packet: $packet) -> Self {
                    Message::$variant(packet)
                }
            }
        )+

        impl Message {
            /// PGN of the decoded frame.
            pub fn pgn(&self) -> u32 {
                match self {
                    $(Message::$variant(_) => <$packet as DiagnosticPacket>::PGN,)+
                    Message::Generic(packet) => packet.pgn,
                }
            }

            pub fn source_address(&self) -> u8 {
                match self {
                    $(Message::$variant(packet) => packet.source_address(),)+
                    Message::Generic(packet) => packet.source_address(),
                }
            }
        }

        impl fmt::Display for Message {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Message::$variant(packet) => fmt::Display::fmt(packet, f),)+
                    Message::Generic(packet) => fmt::Display::fmt(packet, f),
                }
            }
        }
    };
}

messages!(
    Dm1(Dm1ActiveDtcs),
    Dm2(Dm2PreviouslyActiveDtcs),
    Dm5(Dm5DiagnosticReadiness),
    Dm6(Dm6PendingEmissionDtcs),
    Dm7(Dm7Command),
    Dm12(Dm12EmissionDtcs),
    Dm19(Dm19CalibrationInformation),
    Dm20(Dm20PerformanceRatios),
    Dm21(Dm21DiagnosticReadiness2),
    Dm22(Dm22IndividualClear),
    Dm23(Dm23PreviouslyMilOnEmissionDtcs),
    Dm24(Dm24SpnSupport),
    Dm25(Dm25ExpandedFreezeFrame),
    Dm26(Dm26DiagnosticReadiness3),
    Dm27(Dm27AllPendingDtcs),
    Dm28(Dm28PermanentEmissionDtcs),
    Dm29(Dm29DtcCounts),
    Dm30(Dm30ScaledTestResults),
    Dm31(Dm31DtcLampAssociation),
    Dm32(Dm32EmissionExceedance),
    Dm33(Dm33EmissionIncreasingAecdTime),
    Dm56(Dm56ModelYear),
    Dm58(Dm58RationalityData),
    GhgTrackingLifetime(GhgTrackingLifetime),
    GhgTrackingStored100Hour(GhgTrackingStored100Hour),
    GhgTrackingActive100Hour(GhgTrackingActive100Hour),
    NoxLifetimeSystemOut(NoxLifetimeSystemOut),
    NoxLifetimeEngineOut(NoxLifetimeEngineOut),
    NoxLifetimeEngineEnergy(NoxLifetimeEngineEnergy),
    NoxStored100HourSystemOut(NoxStored100HourSystemOut),
    NoxStored100HourEngineOut(NoxStored100HourEngineOut),
    NoxStored100HourEngineEnergy(NoxStored100HourEngineEnergy),
    NoxActive100HourSystemOut(NoxActive100HourSystemOut),
    NoxActive100HourEngineOut(NoxActive100HourEngineOut),
    NoxActive100HourEngineEnergy(NoxActive100HourEngineEnergy),
    VehicleIdentification(VehicleIdentification),
    ComponentIdentification(ComponentIdentification),
    EcuIdentification(EcuIdentification),
    Acknowledgment(Acknowledgment),
);

type Decoder = fn(&RawFrame) -> Message;

fn decode_as<P>(frame: &RawFrame) -> Message
where
    P: DiagnosticPacket + Into<Message>,
{
    P::decode(frame).into()
}

/// Dedicated decoders, sorted by PGN.
static DECODERS: &[(u32, Decoder)] = &[
    (Dm29DtcCounts::PGN, decode_as::<Dm29DtcCounts>),
    (Dm33EmissionIncreasingAecdTime::PGN, decode_as::<Dm33EmissionIncreasingAecdTime>),
    (Dm32EmissionExceedance::PGN, decode_as::<Dm32EmissionExceedance>),
    (Dm31DtcLampAssociation::PGN, decode_as::<Dm31DtcLampAssociation>),
    (Dm30ScaledTestResults::PGN, decode_as::<Dm30ScaledTestResults>),
    (Dm21DiagnosticReadiness2::PGN, decode_as::<Dm21DiagnosticReadiness2>),
    (Dm20PerformanceRatios::PGN, decode_as::<Dm20PerformanceRatios>),
    (Dm22IndividualClear::PGN, decode_as::<Dm22IndividualClear>),
    (Dm19CalibrationInformation::PGN, decode_as::<Dm19CalibrationInformation>),
    (Dm7Command::PGN, decode_as::<Dm7Command>),
    (Acknowledgment::PGN, decode_as::<Acknowledgment>),
    (GhgTrackingLifetime::PGN, decode_as::<GhgTrackingLifetime>),
    (GhgTrackingStored100Hour::PGN, decode_as::<GhgTrackingStored100Hour>),
    (GhgTrackingActive100Hour::PGN, decode_as::<GhgTrackingActive100Hour>),
    (NoxLifetimeSystemOut::PGN, decode_as::<NoxLifetimeSystemOut>),
    (NoxLifetimeEngineOut::PGN, decode_as::<NoxLifetimeEngineOut>),
    (NoxLifetimeEngineEnergy::PGN, decode_as::<NoxLifetimeEngineEnergy>),
    (NoxStored100HourSystemOut::PGN, decode_as::<NoxStored100HourSystemOut>),
    (NoxStored100HourEngineOut::PGN, decode_as::<NoxStored100HourEngineOut>),
    (NoxStored100HourEngineEnergy::PGN, decode_as::<NoxStored100HourEngineEnergy>),
    (NoxActive100HourSystemOut::PGN, decode_as::<NoxActive100HourSystemOut>),
    (NoxActive100HourEngineOut::PGN, decode_as::<NoxActive100HourEngineOut>),
    (NoxActive100HourEngineEnergy::PGN, decode_as::<NoxActive100HourEngineEnergy>),
    (Dm56ModelYear::PGN, decode_as::<Dm56ModelYear>),
    (Dm58RationalityData::PGN, decode_as::<Dm58RationalityData>),
    (Dm28PermanentEmissionDtcs::PGN, decode_as::<Dm28PermanentEmissionDtcs>),
    (Dm27AllPendingDtcs::PGN, decode_as::<Dm27AllPendingDtcs>),
    (Dm23PreviouslyMilOnEmissionDtcs::PGN, decode_as::<Dm23PreviouslyMilOnEmissionDtcs>),
    (Dm24SpnSupport::PGN, decode_as::<Dm24SpnSupport>),
    (Dm25ExpandedFreezeFrame::PGN, decode_as::<Dm25ExpandedFreezeFrame>),
    (Dm26DiagnosticReadiness3::PGN, decode_as::<Dm26DiagnosticReadiness3>),
    (EcuIdentification::PGN, decode_as::<EcuIdentification>),
    (Dm1ActiveDtcs::PGN, decode_as::<Dm1ActiveDtcs>),
    (Dm2PreviouslyActiveDtcs::PGN, decode_as::<Dm2PreviouslyActiveDtcs>),
    (Dm5DiagnosticReadiness::PGN, decode_as::<Dm5DiagnosticReadiness>),
    (Dm6PendingEmissionDtcs::PGN, decode_as::<Dm6PendingEmissionDtcs>),
    (Dm12EmissionDtcs::PGN, decode_as::<Dm12EmissionDtcs>),
    (ComponentIdentification::PGN, decode_as::<ComponentIdentification>),
    (VehicleIdentification::PGN, decode_as::<VehicleIdentification>),
];

impl Message {
    /// Decode a frame with the decoder registered for its PGN.
    pub fn decode(frame: &RawFrame) -> Self {
        match DECODERS.binary_search_by_key(&frame.pgn, |(pgn, _)| *pgn) {
            Ok(index) => (DECODERS[index].1)(frame),
            Err(_) => Message::Generic(GenericPacket::decode(frame)),
        }
    }

    /// Same as [`Message::decode`] with an explicit DM25 framing.
    pub fn decode_with(frame: &RawFrame, framing: FreezeFrameFraming) -> Self {
        if frame.pgn == Dm25ExpandedFreezeFrame::PGN {
            return Message::Dm25(Dm25ExpandedFreezeFrame::decode_with(frame, framing));
        }
        Self::decode(frame)
    }

    /// `true` when a dedicated decoder exists for `pgn`.
    pub fn is_supported(pgn: u32) -> bool {
        DECODERS
            .binary_search_by_key(&pgn, |(pgn, _)| *pgn)
            .is_ok()
    }

    pub fn as_acknowledgment(&self) -> Option<&Acknowledgment> {
        match self {
            Message::Acknowledgment(ack) => Some(ack),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
