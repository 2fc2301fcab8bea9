/// Reads big-endian bit fields from a codeword slice.
pub struct BitSource<'a> {
    bytes: &'a [u8],
    byte_offset: usize,
    bit_offset: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    /// Index of the codeword the next read starts in
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Bits already consumed from the current codeword
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Bits left to read
    pub fn available(&self) -> usize {
        8 * (self.bytes.len() - self.byte_offset) - self.bit_offset
    }

    /// Read `num_bits` (1..=32) bits; `None` past the end
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u32> {
        if num_bits == 0 || num_bits > 32 || num_bits > self.available() {
            return None;
        }

        let mut result = 0u32;
        let mut remaining = num_bits;
        while remaining > 0 {
            let bits_left_in_byte = 8 - self.bit_offset;
            let take = remaining.min(bits_left_in_byte);
            let shift = bits_left_in_byte - take;
            let mask = ((1u32 << take) - 1) as u8;
            let chunk = (self.bytes[self.byte_offset] >> shift) & mask;
            result = (result << take) | chunk as u32;

            remaining -= take;
            self.bit_offset += take;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }
        Some(result)
    }

    /// Read one whole codeword
    pub fn read_byte(&mut self) -> Option<u8> {
        self.read_bits(8).map(|b| b as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_across_bytes() {
        let bytes = [0b1010_1100, 0b0111_0001];
        let mut source = BitSource::new(&bytes);
        assert_eq!(source.available(), 16);
        assert_eq!(source.read_bits(3), Some(0b101));
        assert_eq!(source.read_bits(6), Some(0b01100_0));
        assert_eq!(source.byte_offset(), 1);
        assert_eq!(source.bit_offset(), 1);
        assert_eq!(source.read_bits(7), Some(0b111_0001));
        assert_eq!(source.available(), 0);
        assert_eq!(source.read_bits(1), None);
    }

    #[test]
    fn test_read_byte() {
        let mut source = BitSource::new(&[200, 7]);
        assert_eq!(source.read_byte(), Some(200));
        assert_eq!(source.read_byte(), Some(7));
        assert_eq!(source.read_byte(), None);
    }
}
