//! Cargo build script: generates the SLOT tables and the PGN definition repository.

// Re-export the core module from src/core.rs so build_core can reuse it
#[path = "src/core.rs"]
mod core;

mod build_core;
use crate::build_core::{
    conf::*,
    domain::{DefinitionDocument, SlotDocument},
    errors::BuildError,
    gen_definitions::run_definitions_gen,
    gen_slots::run_slots_gen,
};

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

// The build script turns the declarative J1939 data tables (JSON) into static Rust
// arrays consumed by the value codec and the generic decoder in `src/infra/codec/`.
// Every cross reference (SPN -> SLOT, bit layout -> PGN length) is checked here so
// the runtime lookups never meet an inconsistent table.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", SLOTS_PATH);
    println!("cargo:rerun-if-changed={}", DEFINITIONS_PATH);
    println!("cargo:rerun-if-env-changed={}", DEFINITIONS_ENV_VAR);

    // 1. SLOT tables (general + test results).
    let slots_path = PathBuf::from_str(SLOTS_PATH).map_err(|_| BuildError::ReadPath {
        path: SLOTS_PATH,
    })?;
    let slots_string = fs::read_to_string(&slots_path).map_err(|e| BuildError::ReadFile {
        path: slots_path.clone(),
        source: e,
    })?;
    let slots: SlotDocument = serde_json::from_str(&slots_string)?;

    // 2. PGN definitions. Priority order:
    //   1. KORRI_J1939_DEFINITIONS_PATH environment variable
    //   2. Default definitions shipped with the crate
    let default_definitions_path =
        PathBuf::from_str(DEFINITIONS_PATH).map_err(|_| BuildError::ReadPath {
            path: DEFINITIONS_PATH,
        })?;

    let definitions_path = match std::env::var(DEFINITIONS_ENV_VAR).ok().map(PathBuf::from) {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom PGN definitions from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom definitions path specified but file not found: {:?}",
                path
            );
            println!("cargo:warning=Falling back to the default PGN definitions");
            default_definitions_path
        }
        None => default_definitions_path,
    };

    let definitions_string =
        fs::read_to_string(&definitions_path).map_err(|e| BuildError::ReadFile {
            path: definitions_path.clone(),
            source: e,
        })?;
    let definitions: DefinitionDocument = serde_json::from_str(&definitions_string)?;

    // 3. Generate code (validation happens inside the generators).
    let slot_code = run_slots_gen(&slots)?;
    let definition_code = run_definitions_gen(&definitions, &slots)?;

    // 4. Write the generated code into `OUT_DIR`.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let dest_path = PathBuf::from(out_dir_str);
    let slot_file_path = dest_path.join(OUT_DIR_SLOT_FILE_NAME);
    let definition_file_path = dest_path.join(OUT_DIR_DEFINITION_FILE_NAME);

    fs::write(&slot_file_path, &slot_code).map_err(|e| BuildError::WriteFile {
        path: slot_file_path,
        source: e,
    })?;

    fs::write(&definition_file_path, &definition_code).map_err(|e| BuildError::WriteFile {
        path: definition_file_path,
        source: e,
    })?;

    Ok(())
}
