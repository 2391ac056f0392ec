//! Static lookup tables used when rendering diagnostic messages: preferred
//! source addresses, failure mode indicators and OBD compliance codes.
use alloc::{format, string::String};

/// Preferred addresses of the J1939 industry group 0 table, sorted by address.
static SOURCE_ADDRESSES: &[(u8, &str)] = &[
    (0, "Engine #1"),
    (1, "Engine #2"),
    (2, "Turbocharger"),
    (3, "Transmission #1"),
    (4, "Transmission #2"),
    (5, "Shift Console - Primary"),
    (11, "Brakes - System Controller"),
    (15, "Retarder - Engine #1"),
    (16, "Retarder - Driveline"),
    (17, "Cruise Control"),
    (23, "Instrument Cluster #1"),
    (33, "Body Controller"),
    (49, "Cab Controller - Primary"),
    (61, "Exhaust Emission Controller"),
    (66, "Hybrid System"),
    (249, "Off Board Diagnostic-Service Tool #1"),
    (250, "Off Board Diagnostic-Service Tool #2"),
    (254, "Null"),
    (255, "Global"),
];

/// Failure Mode Indicator descriptions, indexed by FMI.
static FMI_DESCRIPTIONS: [&str; 32] = [
    "Data Valid But Above Normal Operational Range - Most Severe Level",
    "Data Valid But Below Normal Operational Range - Most Severe Level",
    "Data Erratic, Intermittent Or Incorrect",
    "Voltage Above Normal, Or Shorted To High Source",
    "Voltage Below Normal, Or Shorted To Low Source",
    "Current Below Normal Or Open Circuit",
    "Current Above Normal Or Grounded Circuit",
    "Mechanical System Not Responding Or Out Of Adjustment",
    "Abnormal Frequency Or Pulse Width Or Period",
    "Abnormal Update Rate",
    "Abnormal Rate Of Change",
    "Root Cause Not Known",
    "Bad Intelligent Device Or Component",
    "Out Of Calibration",
    "Special Instructions",
    "Data Valid But Above Normal Operating Range - Least Severe Level",
    "Data Valid But Above Normal Operating Range - Moderately Severe Level",
    "Data Valid But Below Normal Operating Range - Least Severe Level",
    "Data Valid But Below Normal Operating Range - Moderately Severe Level",
    "Received Network Data In Error",
    "Data Drifted High",
    "Data Drifted Low",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Reserved For SAE Assignment",
    "Condition Exists",
];

/// OBD compliance (SPN 1220) names, indexed by code; `None` marks reserved codes.
static OBD_COMPLIANCE: [Option<&str>; 23] = [
    None,
    Some("OBD II (California ARB)"),
    Some("OBD (Federal, EPA)"),
    Some("OBD and OBD II"),
    Some("OBD I"),
    Some("Not intended to meet OBD II requirements"),
    Some("EOBD"),
    Some("EOBD and OBD II"),
    Some("EOBD and OBD"),
    Some("EOBD, OBD and OBD II"),
    Some("JOBD"),
    Some("JOBD and OBD II"),
    Some("JOBD and EOBD"),
    Some("JOBD, EOBD and OBD II"),
    Some("Heavy Duty Vehicles (EURO IV) B1"),
    Some("Heavy Duty Vehicles (EURO V) B2"),
    Some("Heavy Duty Vehicles (EURO EEC) C (gas engines)"),
    Some("Engine Manufacturer Diagnostics (EMD)"),
    Some("Engine Manufacturer Diagnostics Enhanced (EMD+)"),
    Some("Heavy Duty On-Board Diagnostics (Partial)"),
    Some("Heavy Duty On-Board Diagnostics"),
    Some("World Wide Harmonized OBD"),
    Some("Heavy Duty Euro OBD Stage VI"),
];

/// Name of a preferred source address, `"Unknown"` otherwise.
pub fn source_address_name(address: u8) -> &'static str {
    SOURCE_ADDRESSES
        .binary_search_by_key(&address, |(sa, _)| *sa)
        .map(|index| SOURCE_ADDRESSES[index].1)
        .unwrap_or("Unknown")
}

/// `"Engine #1 (0)"`.
pub fn source_address_label(address: u8) -> String {
    format!("{} ({})", source_address_name(address), address)
}

pub fn fmi_description(fmi: u8) -> &'static str {
    FMI_DESCRIPTIONS
        .get(fmi as usize)
        .copied()
        .unwrap_or("Unknown FMI")
}

pub fn obd_compliance_name(code: u8) -> Option<&'static str> {
    OBD_COMPLIANCE.get(code as usize).copied().flatten()
}

/// Rendering of an OBD compliance code: its name, `"value N"` for reserved
/// codes, `"Error"` (254) or `"Not available"` (255).
pub fn obd_compliance_label(code: u8) -> String {
    match code {
        0xFE => String::from("Error"),
        0xFF => String::from("Not available"),
        _ => match obd_compliance_name(code) {
            Some(name) => String::from(name),
            None => format!("value {}", code),
        },
    }
}
