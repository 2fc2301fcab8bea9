//! EDIFACT encodation: four 6-bit values per three codewords. The value
//! 0x1F returns to ASCII at the next codeword boundary.
use super::TextBuilder;
use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;

const UNLATCH: u32 = 0x1F;

pub fn decode_segment(bits: &mut BitSource, out: &mut TextBuilder) -> Result<(), DecodeError> {
    // Two or fewer codewords left are ASCII encoded
    while bits.available() > 16 {
        for _ in 0..4 {
            let value = bits
                .read_bits(6)
                .ok_or(DecodeError::Format("truncated EDIFACT"))?;
            if value == UNLATCH {
                let offset = bits.bit_offset();
                if offset != 0 {
                    bits.read_bits(8 - offset);
                }
                return Ok(());
            }
            // Values without bit 6 map to 0x40-0x5F, the rest to 0x20-0x3F
            let c = if value & 0x20 == 0 { value | 0x40 } else { value };
            out.push(c as u8);
        }
    }
    Ok(())
}
