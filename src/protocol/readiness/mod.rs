//! Readiness: per-module monitored-system status (DM5, DM26) and its
//! aggregation into one vehicle-level status per system.
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

/// Emission-related systems monitored by OBD, with their stable composite ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompositeSystem {
    Misfire,
    FuelSystem,
    ComprehensiveComponent,
    Catalyst,
    HeatedCatalyst,
    EvaporativeSystem,
    SecondaryAirSystem,
    AcSystemRefrigerant,
    ExhaustGasSensor,
    ExhaustGasSensorHeater,
    EgrVvtSystem,
    ColdStartAidSystem,
    BoostPressureControlSystem,
    DieselParticulateFilter,
    NoxCatalystAbsorber,
    NmhcConvertingCatalyst,
}

/// Continuously monitored systems, by bit position (byte 3, bits 0..2).
pub const CONTINUOUS_SYSTEMS: [CompositeSystem; 3] = [
    CompositeSystem::Misfire,
    CompositeSystem::FuelSystem,
    CompositeSystem::ComprehensiveComponent,
];

/// Non-continuously monitored systems, by bit position in the little-endian
/// 16-bit support / status words.
pub const NON_CONTINUOUS_SYSTEMS: [CompositeSystem; 13] = [
    CompositeSystem::Catalyst,
    CompositeSystem::HeatedCatalyst,
    CompositeSystem::EvaporativeSystem,
    CompositeSystem::SecondaryAirSystem,
    CompositeSystem::AcSystemRefrigerant,
    CompositeSystem::ExhaustGasSensor,
    CompositeSystem::ExhaustGasSensorHeater,
    CompositeSystem::EgrVvtSystem,
    CompositeSystem::ColdStartAidSystem,
    CompositeSystem::BoostPressureControlSystem,
    CompositeSystem::DieselParticulateFilter,
    CompositeSystem::NoxCatalystAbsorber,
    CompositeSystem::NmhcConvertingCatalyst,
];

impl CompositeSystem {
    pub const fn id(self) -> u8 {
        match self {
            CompositeSystem::Misfire => 1,
            CompositeSystem::FuelSystem => 2,
            CompositeSystem::ComprehensiveComponent => 3,
            CompositeSystem::Catalyst => 4,
            CompositeSystem::HeatedCatalyst => 5,
            CompositeSystem::EvaporativeSystem => 6,
            CompositeSystem::SecondaryAirSystem => 7,
            CompositeSystem::AcSystemRefrigerant => 8,
            CompositeSystem::ExhaustGasSensor => 9,
            CompositeSystem::ExhaustGasSensorHeater => 10,
            CompositeSystem::EgrVvtSystem => 11,
            CompositeSystem::ColdStartAidSystem => 12,
            CompositeSystem::BoostPressureControlSystem => 13,
            CompositeSystem::DieselParticulateFilter => 14,
            CompositeSystem::NoxCatalystAbsorber => 15,
            CompositeSystem::NmhcConvertingCatalyst => 16,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CompositeSystem::Misfire => "Misfire",
            CompositeSystem::FuelSystem => "Fuel System",
            CompositeSystem::ComprehensiveComponent => "Comprehensive component",
            CompositeSystem::Catalyst => "Catalyst",
            CompositeSystem::HeatedCatalyst => "Heated catalyst",
            CompositeSystem::EvaporativeSystem => "Evaporative system",
            CompositeSystem::SecondaryAirSystem => "Secondary air system",
            CompositeSystem::AcSystemRefrigerant => "A/C system refrigerant",
            CompositeSystem::ExhaustGasSensor => "Exhaust Gas Sensor",
            CompositeSystem::ExhaustGasSensorHeater => "Exhaust Gas Sensor heater",
            CompositeSystem::EgrVvtSystem => "EGR/VVT system",
            CompositeSystem::ColdStartAidSystem => "Cold start aid system",
            CompositeSystem::BoostPressureControlSystem => "Boost pressure control sys",
            CompositeSystem::DieselParticulateFilter => "Diesel Particulate Filter",
            CompositeSystem::NoxCatalystAbsorber => "NOx catalyst/adsorber",
            CompositeSystem::NmhcConvertingCatalyst => "NMHC converting catalyst",
        }
    }

    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            CompositeSystem::Misfire
                | CompositeSystem::FuelSystem
                | CompositeSystem::ComprehensiveComponent
        )
    }
}

/// Support and completion of one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorStatus {
    pub supported: bool,
    pub complete: bool,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supported = if self.supported {
            "supported"
        } else {
            "not supported"
        };
        let complete = if self.complete {
            "complete"
        } else {
            "not complete"
        };
        write!(f, "{:>13}, {:>12}", supported, complete)
    }
}

/// Status of one system as reported by one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitoredSystem {
    pub system: CompositeSystem,
    pub source_address: u8,
    pub status: MonitorStatus,
}

impl MonitoredSystem {
    pub fn name(&self) -> &'static str {
        self.system.name()
    }
}

impl fmt::Display for MonitoredSystem {
    /// `    Catalyst                       supported,     complete`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    {:<26} {}", self.system.name(), self.status)
    }
}

/// Decode monitored systems from support/status bit words.
///
/// A set support bit means supported; a cleared status bit means complete.
pub fn systems_from_bits(
    systems: &[CompositeSystem],
    source_address: u8,
    support: u16,
    status: u16,
) -> Vec<MonitoredSystem> {
    systems
        .iter()
        .enumerate()
        .map(|(bit, system)| MonitoredSystem {
            system: *system,
            source_address,
            status: MonitorStatus {
                supported: support & (1 << bit) != 0,
                complete: status & (1 << bit) == 0,
            },
        })
        .collect()
}

//==================================================================================COMPOSITE
/// One system merged across every module that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeMonitoredSystem {
    pub system: CompositeSystem,
    pub status: MonitorStatus,
    /// Modules whose report contributed, in report order.
    pub members: Vec<MonitoredSystem>,
}

impl CompositeMonitoredSystem {
    pub fn id(&self) -> u8 {
        self.system.id()
    }

    pub fn name(&self) -> &'static str {
        self.system.name()
    }
}

impl PartialOrd for CompositeMonitoredSystem {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompositeMonitoredSystem {
    /// Id first, then name, then status.
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id()
            .cmp(&other.id())
            .then_with(|| self.name().cmp(other.name()))
            .then_with(|| self.status.cmp(&other.status))
            .then_with(|| self.members.len().cmp(&other.members.len()))
    }
}

impl fmt::Display for CompositeMonitoredSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    {:<26} {}", self.name(), self.status)
    }
}

/// Merge per-module reports into one entry per composite system, sorted by id.
///
/// `supported` is true when any module supports the system; `complete` is false
/// only when a supporting module reports the monitor incomplete.
pub fn merge<I>(systems: I) -> Vec<CompositeMonitoredSystem>
where
    I: IntoIterator<Item = MonitoredSystem>,
{
    let mut grouped: BTreeMap<u8, CompositeMonitoredSystem> = BTreeMap::new();
    for member in systems {
        let entry = grouped
            .entry(member.system.id())
            .or_insert_with(|| CompositeMonitoredSystem {
                system: member.system,
                status: MonitorStatus {
                    supported: false,
                    complete: true,
                },
                members: Vec::new(),
            });
        entry.status.supported |= member.status.supported;
        if member.status.supported && !member.status.complete {
            entry.status.complete = false;
        }
        entry.members.push(member);
    }
    let mut merged: Vec<CompositeMonitoredSystem> = grouped.into_values().collect();
    merged.sort();
    merged
}
