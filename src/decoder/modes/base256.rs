//! Base 256 encodation: a length field followed by raw bytes, each
//! whitened with the 255-state pseudo-random algorithm.
use super::TextBuilder;
use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;

/// Undo 255-state randomizing of the codeword at 1-based `position`
pub fn unrandomize_255(randomized: u8, position: usize) -> u8 {
    let pseudo = ((149 * position) % 255 + 1) as i32;
    let value = randomized as i32 - pseudo;
    (if value >= 0 { value } else { value + 256 }) as u8
}

/// Apply 255-state randomizing; used by the encoder
pub fn randomize_255(value: u8, position: usize) -> u8 {
    let pseudo = (149 * position) % 255 + 1;
    let sum = value as usize + pseudo;
    (if sum <= 255 { sum } else { sum - 256 }) as u8
}

pub fn decode_segment(bits: &mut BitSource, out: &mut TextBuilder) -> Result<(), DecodeError> {
    let truncated = || DecodeError::Format("truncated Base 256 field");
    // Codeword positions are 1-based over the whole data stream
    let mut position = bits.byte_offset() + 1;
    let mut next = |bits: &mut BitSource| -> Result<u8, DecodeError> {
        let byte = bits.read_byte().ok_or_else(truncated)?;
        let value = unrandomize_255(byte, position);
        position += 1;
        Ok(value)
    };

    let d1 = next(bits)? as usize;
    let count = match d1 {
        0 => bits.available() / 8,
        1..=249 => d1,
        _ => 250 * (d1 - 249) + next(bits)? as usize,
    };

    if count * 8 > bits.available() {
        return Err(truncated());
    }
    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        bytes.push(next(bits)?);
    }
    out.extend(&bytes);
    Ok(())
}
