//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// SLOT tables (general scaling definitions plus DM30 test-result SLOTs).
pub(crate) const SLOTS_PATH: &str = "build_core/var/slots.json";
/// PGN/SPN layouts used by the generic decoder.
pub(crate) const DEFINITIONS_PATH: &str = "build_core/var/pgn_definitions.json";
/// Environment variable overriding `DEFINITIONS_PATH`.
pub(crate) const DEFINITIONS_ENV_VAR: &str = "KORRI_J1939_DEFINITIONS_PATH";
/// Generated SLOT file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_SLOT_FILE_NAME: &str = "generated_slots.rs";
/// Generated PGN definition file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_DEFINITION_FILE_NAME: &str = "generated_definitions.rs";
