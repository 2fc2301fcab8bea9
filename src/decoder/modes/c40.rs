//! C40 and Text encodation. Each codeword pair packs three values in base
//! 40; values 0-2 select a shift set for the next value.
use super::TextBuilder;
use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    /// Upper-case basic set
    C40,
    /// Lower-case basic set
    Text,
}

const C40_BASIC: &[u8; 40] = b"*** 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TEXT_BASIC: &[u8; 40] = b"*** 0123456789abcdefghijklmnopqrstuvwxyz";
const SHIFT2: &[u8; 27] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_";
const TEXT_SHIFT3: &[u8; 32] = b"`ABCDEFGHIJKLMNOPQRSTUVWXYZ{|}~\x7F";

/// Split a codeword pair into its three base-40 values
pub(crate) fn unpack_triple(first: u8, second: u8) -> [u8; 3] {
    let full = (((first as u32) << 8) | second as u32).saturating_sub(1);
    let c1 = full / 1600;
    let c2 = (full - c1 * 1600) / 40;
    let c3 = full - c1 * 1600 - c2 * 40;
    [c1 as u8, c2 as u8, c3 as u8]
}

/// Read codeword pairs until an unlatch (254), a lone trailing codeword
/// (which is ASCII), or the end of data.
pub(crate) fn read_pairs(
    bits: &mut BitSource,
    mut on_triple: impl FnMut([u8; 3]) -> Result<(), DecodeError>,
) -> Result<(), DecodeError> {
    loop {
        if bits.available() <= 8 {
            return Ok(());
        }
        let first = bits.read_byte().ok_or(DecodeError::Format("truncated pair"))?;
        if first == 254 {
            return Ok(());
        }
        let second = bits.read_byte().ok_or(DecodeError::Format("truncated pair"))?;
        on_triple(unpack_triple(first, second))?;
    }
}

fn emit(out: &mut TextBuilder, value: u8, upper_shift: &mut bool) {
    out.push(if *upper_shift { value.wrapping_add(128) } else { value });
    *upper_shift = false;
}

pub fn decode_segment(
    bits: &mut BitSource,
    out: &mut TextBuilder,
    set: CharacterSet,
) -> Result<(), DecodeError> {
    let basic = match set {
        CharacterSet::C40 => C40_BASIC,
        CharacterSet::Text => TEXT_BASIC,
    };
    let mut shift = 0u8;
    let mut upper_shift = false;

    read_pairs(bits, |triple| {
        for value in triple {
            match shift {
                0 => {
                    if value < 3 {
                        shift = value + 1;
                    } else if let Some(&c) = basic.get(value as usize) {
                        emit(out, c, &mut upper_shift);
                    } else {
                        return Err(DecodeError::Format("invalid C40 value"));
                    }
                }
                1 => {
                    emit(out, value, &mut upper_shift);
                    shift = 0;
                }
                2 => {
                    match value {
                        0..=26 => emit(out, SHIFT2[value as usize], &mut upper_shift),
                        27 => out.push(0x1D),
                        30 => upper_shift = true,
                        _ => return Err(DecodeError::Format("invalid shift 2 value")),
                    }
                    shift = 0;
                }
                _ => {
                    match set {
                        CharacterSet::C40 => emit(out, value + 96, &mut upper_shift),
                        CharacterSet::Text => {
                            let c = TEXT_SHIFT3
                                .get(value as usize)
                                .ok_or(DecodeError::Format("invalid shift 3 value"))?;
                            emit(out, *c, &mut upper_shift);
                        }
                    }
                    shift = 0;
                }
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(values: [u8; 3]) -> [u8; 2] {
        let v = 1600 * values[0] as u32 + 40 * values[1] as u32 + values[2] as u32 + 1;
        [(v >> 8) as u8, v as u8]
    }

    fn run(codewords: &[u8], set: CharacterSet) -> Result<String, DecodeError> {
        let mut bits = BitSource::new(codewords);
        let mut out = TextBuilder::new();
        decode_segment(&mut bits, &mut out, set)?;
        Ok(out.finish())
    }

    #[test]
    fn test_unpack_triple() {
        assert_eq!(unpack_triple(89, 233), [14, 15, 16]);
        let [a, b] = pack([3, 39, 4]);
        assert_eq!(unpack_triple(a, b), [3, 39, 4]);
    }

    #[test]
    fn test_c40_basic_and_shifts() {
        // "A1" then shift 2 "!" (value 0), then "Z" ...
        let mut cw = Vec::new();
        cw.extend(pack([14, 5, 1]));
        cw.extend(pack([0, 39, 3]));
        cw.push(254);
        assert_eq!(run(&cw, CharacterSet::C40).unwrap(), "A1!Z ");
    }

    #[test]
    fn test_text_is_lower_case() {
        let mut cw = Vec::new();
        cw.extend(pack([14, 15, 16]));
        // shift 3 value 1 is upper-case A in Text
        cw.extend(pack([2, 1, 3]));
        assert_eq!(run(&cw, CharacterSet::Text).unwrap(), "abcA ");
    }

    #[test]
    fn test_upper_shift_and_fnc1() {
        let mut cw = Vec::new();
        // shift 2 value 30 = upper shift, then "A" becomes 0xC1
        cw.extend(pack([1, 30, 14]));
        // shift 2 value 27 = FNC1
        cw.extend(pack([1, 27, 3]));
        assert_eq!(run(&cw, CharacterSet::C40).unwrap(), "\u{C1}\u{1D} ");
    }

    #[test]
    fn test_lone_trailing_codeword_is_left_for_ascii() {
        let mut cw = pack([14, 14, 14]).to_vec();
        cw.push(66);
        let mut bits = BitSource::new(&cw);
        let mut out = TextBuilder::new();
        decode_segment(&mut bits, &mut out, CharacterSet::C40).unwrap();
        assert_eq!(out.finish(), "AAA");
        assert_eq!(bits.available(), 8);
    }

    #[test]
    fn test_invalid_shift2_value() {
        let cw = pack([1, 29, 3]);
        assert!(run(&cw, CharacterSet::C40).is_err());
    }
}
