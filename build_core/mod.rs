//! Workspace for the build script: data structures and code generators.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_definitions;
pub mod gen_slots;
pub mod literals;
