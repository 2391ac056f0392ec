//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, table validation, code generation).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing one of the JSON tables.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid or missing.
    #[error("[MESSAGE]:Failed to read path. [PATH]:{path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// I/O-oriented variant of the previous error.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnIoErr {
        #[from]
        source: io::Error,
    },

    /// Two entries of the same table share an identifier.
    #[error("[MESSAGE]:Duplicate identifier [TABLE]:{table} [ID]:{id}")]
    DuplicateId { table: &'static str, id: u32 },

    /// A SLOT entry has an unusable bit length.
    #[error("[MESSAGE]:Invalid bit length [TABLE]:{table} [ID]:{id} [LENGTH]:{length}")]
    BitLengthErr {
        table: &'static str,
        id: u32,
        length: u8,
    },

    /// An SPN references a SLOT missing from `slots.json`.
    #[error("[MESSAGE]:Unknown SLOT reference [PGN]:{pgn} [SPN]:{spn} [SLOT]:{slot}")]
    UnknownSlot { pgn: u32, spn: u32, slot: u16 },

    /// SPN and SLOT disagree on the field width.
    #[error("[MESSAGE]:SLOT width mismatch [PGN]:{pgn} [SPN]:{spn} [SPN BITS]:{spn_bits} [SLOT BITS]:{slot_bits}")]
    SlotWidthMismatch {
        pgn: u32,
        spn: u32,
        spn_bits: u8,
        slot_bits: u8,
    },

    /// The SPN layout does not fit in the declared PGN length or SPN range.
    #[error("[MESSAGE]:Invalid SPN layout [PGN]:{pgn} [SPN]:{spn} [COMMENT]:{comment}")]
    LayoutErr {
        pgn: u32,
        spn: u32,
        comment: &'static str,
    },
}
