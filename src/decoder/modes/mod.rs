//! ECC 200 data encodation modes
//!
//! A symbol's data codewords start in ASCII encodation and may latch into:
//! - C40 / Text: three characters per codeword pair, upper / lower case
//! - ANSI X12: three characters per pair from the EDI terminator set
//! - EDIFACT: four 6-bit values per three codewords
//! - Base 256: raw bytes behind a length field, whitened
//! - ECI: switches the character set of everything that follows

pub mod ascii;
pub mod base256;
pub mod c40;
pub mod edifact;
pub mod x12;

use crate::decoder::bit_source::BitSource;
use crate::error::DecodeError;
use crate::models::StructuredAppend;

/// Encodation a codeword run is interpreted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Padding reached; the rest of the symbol carries no data
    Pad,
    Ascii,
    C40,
    Text,
    AnsiX12,
    Edifact,
    Base256,
    Eci,
}

/// Character set selected by ECI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Latin1,
    Utf8,
    Ascii,
}

impl Charset {
    fn from_eci(value: u32) -> Option<Self> {
        match value {
            1 | 3 => Some(Charset::Latin1),
            26 => Some(Charset::Utf8),
            27 | 170 => Some(Charset::Ascii),
            _ => None,
        }
    }

    fn decode_into(self, bytes: &[u8], out: &mut String) {
        match self {
            Charset::Utf8 => out.push_str(&String::from_utf8_lossy(bytes)),
            Charset::Ascii => out.extend(
                bytes
                    .iter()
                    .map(|&b| if b < 0x80 { b as char } else { char::REPLACEMENT_CHARACTER }),
            ),
            Charset::Latin1 => out.extend(bytes.iter().map(|&b| b as char)),
        }
    }
}

/// Accumulates decoded bytes, converting each run with the character set
/// in force when it was written.
#[derive(Debug)]
pub struct TextBuilder {
    text: String,
    pending: Vec<u8>,
    charset: Charset,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            pending: Vec::new(),
            charset: Charset::Latin1,
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.pending.push(byte);
    }

    pub fn push_str(&mut self, s: &str) {
        self.pending.extend_from_slice(s.as_bytes());
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    pub fn switch_charset(&mut self, charset: Charset) {
        self.flush();
        self.charset = charset;
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.charset.decode_into(&self.pending, &mut self.text);
            self.pending.clear();
        }
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.text
    }
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of interpreting the corrected data codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedData {
    pub text: String,
    pub structured_append: Option<StructuredAppend>,
}

/// Per-symbol state shared by the segment decoders
#[derive(Debug, Default)]
pub struct SegmentState {
    pub trailer: Option<&'static str>,
    pub structured_append: Option<StructuredAppend>,
}

/// Interpret data codewords as text
pub fn decode(codewords: &[u8]) -> Result<DecodedData, DecodeError> {
    let mut bits = BitSource::new(codewords);
    let mut out = TextBuilder::new();
    let mut state = SegmentState::default();
    let mut mode = Mode::Ascii;

    loop {
        mode = match mode {
            Mode::Ascii => ascii::decode_segment(&mut bits, &mut out, &mut state)?,
            Mode::C40 => {
                c40::decode_segment(&mut bits, &mut out, c40::CharacterSet::C40)?;
                Mode::Ascii
            }
            Mode::Text => {
                c40::decode_segment(&mut bits, &mut out, c40::CharacterSet::Text)?;
                Mode::Ascii
            }
            Mode::AnsiX12 => {
                x12::decode_segment(&mut bits, &mut out)?;
                Mode::Ascii
            }
            Mode::Edifact => {
                edifact::decode_segment(&mut bits, &mut out)?;
                Mode::Ascii
            }
            Mode::Base256 => {
                base256::decode_segment(&mut bits, &mut out)?;
                Mode::Ascii
            }
            Mode::Eci => {
                decode_eci_segment(&mut bits, &mut out)?;
                Mode::Ascii
            }
            Mode::Pad => break,
        };
        if mode == Mode::Pad || bits.available() == 0 {
            break;
        }
    }

    if let Some(trailer) = state.trailer {
        out.push_str(trailer);
    }

    Ok(DecodedData {
        text: out.finish(),
        structured_append: state.structured_append,
    })
}

/// Extended Channel Interpretation designator: one to three codewords
fn decode_eci_segment(bits: &mut BitSource, out: &mut TextBuilder) -> Result<(), DecodeError> {
    let truncated = || DecodeError::Format("truncated ECI designator");
    let mut next = || bits.read_bits(8).map(i64::from).ok_or_else(truncated);

    let c1 = next()?;
    let value = if c1 <= 127 {
        c1 - 1
    } else if c1 <= 191 {
        let c2 = next()?;
        (c1 - 128) * 254 + 127 + c2 - 1
    } else {
        let c2 = next()?;
        let c3 = next()?;
        (c1 - 192) * 64516 + 16383 + (c2 - 1) * 254 + c3 - 1
    };
    let value = u32::try_from(value).map_err(|_| DecodeError::Format("invalid ECI designator"))?;

    let charset = Charset::from_eci(value).ok_or(DecodeError::Format("unsupported ECI"))?;
    log::trace!("ECI {value} selects {charset:?}");
    out.switch_charset(charset);
    Ok(())
}
