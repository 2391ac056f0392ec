//! Parameter Group Numbers used by the diagnostic layer.

/// Request (PDU1).
pub const REQUEST_PGN: u32 = 0xEA00;
/// Acknowledgment (PDU1).
pub const ACKNOWLEDGMENT_PGN: u32 = 0xE800;

pub const DM1_PGN: u32 = 65226;
pub const DM2_PGN: u32 = 65227;
pub const DM3_PGN: u32 = 65228;
pub const DM5_PGN: u32 = 65230;
pub const DM6_PGN: u32 = 65231;
/// Command non-continuously monitored test (PDU1).
pub const DM7_PGN: u32 = 0xE300;
pub const DM11_PGN: u32 = 65235;
pub const DM12_PGN: u32 = 65236;
pub const DM19_PGN: u32 = 54016;
pub const DM20_PGN: u32 = 49664;
pub const DM21_PGN: u32 = 49408;
/// Individual DTC clear/reset (PDU1).
pub const DM22_PGN: u32 = 49920;
pub const DM23_PGN: u32 = 64949;
pub const DM24_PGN: u32 = 64950;
pub const DM25_PGN: u32 = 64951;
pub const DM26_PGN: u32 = 64952;
pub const DM27_PGN: u32 = 64898;
pub const DM28_PGN: u32 = 64896;
pub const DM29_PGN: u32 = 40448;
pub const DM30_PGN: u32 = 41984;
pub const DM31_PGN: u32 = 41728;
pub const DM32_PGN: u32 = 41472;
pub const DM33_PGN: u32 = 41216;
pub const DM56_PGN: u32 = 64711;
pub const DM58_PGN: u32 = 64722;

pub const VEHICLE_IDENTIFICATION_PGN: u32 = 65260;
pub const COMPONENT_IDENTIFICATION_PGN: u32 = 65259;
pub const ECU_IDENTIFICATION_PGN: u32 = 64965;

pub const GHG_TRACKING_LIFETIME_PGN: u32 = 64255;
pub const GHG_TRACKING_STORED_100_HOUR_PGN: u32 = 64256;
pub const GHG_TRACKING_ACTIVE_100_HOUR_PGN: u32 = 64257;

/// NOx binning, one quantity per group and 16 bins per quantity.
pub const NOX_LIFETIME_SYSTEM_OUT_PGN: u32 = 64262;
pub const NOX_LIFETIME_ENGINE_OUT_PGN: u32 = 64263;
pub const NOX_LIFETIME_ENGINE_ENERGY_PGN: u32 = 64264;
pub const NOX_STORED_100_HOUR_SYSTEM_OUT_PGN: u32 = 64268;
pub const NOX_STORED_100_HOUR_ENGINE_OUT_PGN: u32 = 64269;
pub const NOX_STORED_100_HOUR_ENGINE_ENERGY_PGN: u32 = 64270;
pub const NOX_ACTIVE_100_HOUR_SYSTEM_OUT_PGN: u32 = 64274;
pub const NOX_ACTIVE_100_HOUR_ENGINE_OUT_PGN: u32 = 64275;
pub const NOX_ACTIVE_100_HOUR_ENGINE_ENERGY_PGN: u32 = 64276;
