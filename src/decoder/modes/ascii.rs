//! ASCII encodation (the default mode): one character or two digits per
//! codeword, plus the latch and function codewords.
use super::{Mode, SegmentState, TextBuilder};
use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;
use crate::models::StructuredAppend;

pub const PAD: u8 = 129;
pub const LATCH_C40: u8 = 230;
pub const LATCH_BASE256: u8 = 231;
pub const FNC1: u8 = 232;
pub const STRUCTURED_APPEND: u8 = 233;
pub const READER_PROGRAMMING: u8 = 234;
pub const UPPER_SHIFT: u8 = 235;
pub const MACRO_05: u8 = 236;
pub const MACRO_06: u8 = 237;
pub const LATCH_X12: u8 = 238;
pub const LATCH_TEXT: u8 = 239;
pub const LATCH_EDIFACT: u8 = 240;
pub const ECI: u8 = 241;
pub const UNLATCH: u8 = 254;

const GROUP_SEPARATOR: u8 = 0x1D;

/// Decode ASCII codewords until a latch, padding, or the end of data
pub fn decode_segment(
    bits: &mut BitSource,
    out: &mut TextBuilder,
    state: &mut SegmentState,
) -> Result<Mode, DecodeError> {
    let mut upper_shift = false;

    while let Some(codeword) = bits.read_byte() {
        let first_codeword = bits.byte_offset() == 1;
        match codeword {
            0 => return Err(DecodeError::Format("ASCII codeword 0")),
            1..=128 => {
                let value = codeword - 1;
                out.push(if upper_shift { value + 128 } else { value });
                upper_shift = false;
            }
            PAD => return Ok(Mode::Pad),
            130..=229 => {
                let pair = codeword - 130;
                out.push(b'0' + pair / 10);
                out.push(b'0' + pair % 10);
            }
            LATCH_C40 => return Ok(Mode::C40),
            LATCH_BASE256 => return Ok(Mode::Base256),
            FNC1 => out.push(GROUP_SEPARATOR),
            STRUCTURED_APPEND => {
                if !first_codeword {
                    return Err(DecodeError::Format("structured append not at start"));
                }
                state.structured_append = Some(read_structured_append(bits)?);
            }
            READER_PROGRAMMING => {
                if !first_codeword {
                    return Err(DecodeError::Format("reader programming not at start"));
                }
            }
            UPPER_SHIFT => upper_shift = true,
            MACRO_05 => {
                out.push_str("[)>\u{1E}05\u{1D}");
                state.trailer = Some("\u{1E}\u{04}");
            }
            MACRO_06 => {
                out.push_str("[)>\u{1E}06\u{1D}");
                state.trailer = Some("\u{1E}\u{04}");
            }
            LATCH_X12 => return Ok(Mode::AnsiX12),
            LATCH_TEXT => return Ok(Mode::Text),
            LATCH_EDIFACT => return Ok(Mode::Edifact),
            ECI => return Ok(Mode::Eci),
            // Some encoders end with an unlatch even in ASCII
            UNLATCH if bits.available() == 0 => {}
            _ => return Err(DecodeError::Format("invalid ASCII codeword")),
        }
    }

    Ok(Mode::Ascii)
}

fn read_structured_append(bits: &mut BitSource) -> Result<StructuredAppend, DecodeError> {
    let truncated = || DecodeError::Format("truncated structured append");
    let sequence = bits.read_byte().ok_or_else(truncated)?;
    let id_high = bits.read_byte().ok_or_else(truncated)?;
    let id_low = bits.read_byte().ok_or_else(truncated)?;

    let position = (sequence >> 4) + 1;
    let total = 17 - (sequence & 0x0F);
    if position > total {
        return Err(DecodeError::Format("structured append position out of range"));
    }
    Ok(StructuredAppend {
        position,
        total,
        file_id: (u16::from(id_high) << 8) | u16::from(id_low),
    })
}
