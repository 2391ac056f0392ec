//! Binary codec: bit access, SLOT scaling, repeating groups and the
//! table-driven PGN decoder.
pub mod bits;
pub mod engine;
pub mod groups;
pub mod slot;
pub mod traits;
