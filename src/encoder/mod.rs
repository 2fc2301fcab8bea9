//! Minimal ECC 200 symbol generator (ASCII encodation only).
//!
//! Produces module grids for fixtures, benches, and round-trip checks.

pub mod render;

pub use render::render;

use crate::decoder::modes::ascii::{PAD, UPPER_SHIFT};
use crate::decoder::placement::Placement;
use crate::decoder::{blocks, regions};
use crate::error::EncodeError;
use crate::models::{BitMatrix, SymbolVersion};

/// ASCII encodation of `text`: digit pairs, plain ASCII, upper shift for
/// the ISO-8859-1 upper half.
pub fn encode_ascii(text: &str) -> Result<Vec<u8>, EncodeError> {
    let chars: Vec<char> = text.chars().collect();
    let mut codewords = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match (c.to_digit(10), chars.get(i + 1).and_then(|n| n.to_digit(10))) {
            (Some(d1), Some(d2)) => {
                codewords.push(130 + (d1 * 10 + d2) as u8);
                i += 2;
                continue;
            }
            _ => {}
        }
        let value = c as u32;
        if value < 128 {
            codewords.push(value as u8 + 1);
        } else if value < 256 {
            codewords.push(UPPER_SHIFT);
            codewords.push((value - 128) as u8 + 1);
        } else {
            return Err(EncodeError::UnsupportedCharacter(c));
        }
        i += 1;
    }
    Ok(codewords)
}

/// 253-state randomizing applied to pad codewords at 1-based `position`
fn randomize_253(value: u8, position: usize) -> u8 {
    let pseudo = (149 * position) % 253 + 1;
    let sum = value as usize + pseudo;
    (if sum <= 254 { sum } else { sum - 254 }) as u8
}

/// Fill the remaining data capacity with pad codewords
pub fn pad_codewords(codewords: &mut Vec<u8>, capacity: usize) {
    if codewords.len() < capacity {
        codewords.push(PAD);
    }
    while codewords.len() < capacity {
        let position = codewords.len() + 1;
        codewords.push(randomize_253(PAD, position));
    }
}

/// Build a symbol from already-encoded data codewords
pub fn encode_codewords(data: &[u8], version: &SymbolVersion) -> Result<BitMatrix, EncodeError> {
    if data.len() > version.data_codewords {
        return Err(EncodeError::Capacity {
            needed: data.len(),
            rows: version.rows,
            cols: version.cols,
        });
    }
    let mut padded = data.to_vec();
    pad_codewords(&mut padded, version.data_codewords);

    let all = blocks::interleave_with_ecc(version, &padded);
    let mapping = Placement::new(version.mapping_rows(), version.mapping_cols()).write(&all);
    Ok(regions::assemble_symbol(&mapping, version))
}

/// Encode `text` in the given symbol size
pub fn encode_in(text: &str, version: &SymbolVersion) -> Result<BitMatrix, EncodeError> {
    encode_codewords(&encode_ascii(text)?, version)
}

/// Encode `text` in the smallest square symbol that holds it
pub fn encode(text: &str) -> Result<BitMatrix, EncodeError> {
    let data = encode_ascii(text)?;
    let version =
        SymbolVersion::smallest_for(data.len(), true).ok_or(EncodeError::TooLong(data.len()))?;
    encode_codewords(&data, version)
}
