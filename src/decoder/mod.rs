//! Data Matrix decoding, from module grid to text
//!
//! - Region stripping and codeword placement
//! - Block de-interleaving and Reed-Solomon correction
//! - Data encodation modes (ASCII, C40, Text, X12, EDIFACT, Base 256, ECI)

/// Big-endian bit reader over codewords
pub mod bit_source;
/// Block interleaving
pub mod blocks;
/// Data encodation modes
pub mod modes;
/// ECC 200 module placement
pub mod placement;
/// Reed-Solomon error correction over GF(256)
pub mod reed_solomon;
/// Alignment pattern handling
pub mod regions;
/// Grid to text
pub mod symbol_decoder;

pub use symbol_decoder::{DecodedSymbol, decode_symbol};
