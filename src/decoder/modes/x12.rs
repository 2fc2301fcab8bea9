//! ANSI X12 encodation: base-40 triples drawn from CR, `*`, `>`, space,
//! digits and upper-case letters.
use super::TextBuilder;
use super::c40::read_pairs;
use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;

fn x12_char(value: u8) -> Option<u8> {
    match value {
        0 => Some(b'\r'),
        1 => Some(b'*'),
        2 => Some(b'>'),
        3 => Some(b' '),
        4..=13 => Some(b'0' + value - 4),
        14..=39 => Some(b'A' + value - 14),
        _ => None,
    }
}

pub fn decode_segment(bits: &mut BitSource, out: &mut TextBuilder) -> Result<(), DecodeError> {
    read_pairs(bits, |triple| {
        for value in triple {
            let c = x12_char(value).ok_or(DecodeError::Format("invalid X12 value"))?;
            out.push(c);
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x12_values() {
        // [0, 1, 2] = CR * >, [3, 4, 39] = space 0 Z
        let mut cw = Vec::new();
        for values in [[0u32, 1, 2], [3, 4, 39]] {
            let v = 1600 * values[0] + 40 * values[1] + values[2] + 1;
            cw.push((v >> 8) as u8);
            cw.push(v as u8);
        }
        cw.push(254);

        let mut bits = BitSource::new(&cw);
        let mut out = TextBuilder::new();
        decode_segment(&mut bits, &mut out).unwrap();
        assert_eq!(out.finish(), "\r*> 0Z");
        // A lone final unlatch is left to the ASCII decoder
        assert_eq!(bits.available(), 8);
    }

    #[test]
    fn test_out_of_range_value() {
        // 0xFF 0xFF unpacks to a first value of 40
        let mut bits = BitSource::new(&[0xFF, 0xFF]);
        let mut out = TextBuilder::new();
        assert!(decode_segment(&mut bits, &mut out).is_err());
    }
}
