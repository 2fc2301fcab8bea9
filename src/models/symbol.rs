/// One ECC 200 symbol size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolVersion {
    /// Position in the size table (1-24 square, 25-30 rectangular)
    pub number: u8,
    /// Symbol height in modules, including the finder and clock tracks
    pub rows: usize,
    /// Symbol width in modules
    pub cols: usize,
    /// Height of one data region
    pub region_rows: usize,
    /// Width of one data region
    pub region_cols: usize,
    /// Data codewords in the whole symbol
    pub data_codewords: usize,
    /// Error correction codewords per interleaved block
    pub ecc_per_block: usize,
    /// Number of interleaved blocks
    pub blocks: usize,
}

#[allow(clippy::too_many_arguments)]
const fn version(
    number: u8,
    rows: usize,
    cols: usize,
    region_rows: usize,
    region_cols: usize,
    data_codewords: usize,
    ecc_per_block: usize,
    blocks: usize,
) -> SymbolVersion {
    SymbolVersion {
        number,
        rows,
        cols,
        region_rows,
        region_cols,
        data_codewords,
        ecc_per_block,
        blocks,
    }
}

/// ISO/IEC 16022 Table 7
static VERSIONS: [SymbolVersion; 30] = [
    version(1, 10, 10, 8, 8, 3, 5, 1),
    version(2, 12, 12, 10, 10, 5, 7, 1),
    version(3, 14, 14, 12, 12, 8, 10, 1),
    version(4, 16, 16, 14, 14, 12, 12, 1),
    version(5, 18, 18, 16, 16, 18, 14, 1),
    version(6, 20, 20, 18, 18, 22, 18, 1),
    version(7, 22, 22, 20, 20, 30, 20, 1),
    version(8, 24, 24, 22, 22, 36, 24, 1),
    version(9, 26, 26, 24, 24, 44, 28, 1),
    version(10, 32, 32, 14, 14, 62, 36, 1),
    version(11, 36, 36, 16, 16, 86, 42, 1),
    version(12, 40, 40, 18, 18, 114, 48, 1),
    version(13, 44, 44, 20, 20, 144, 56, 1),
    version(14, 48, 48, 22, 22, 174, 68, 1),
    version(15, 52, 52, 24, 24, 204, 42, 2),
    version(16, 64, 64, 14, 14, 280, 56, 2),
    version(17, 72, 72, 16, 16, 368, 36, 4),
    version(18, 80, 80, 18, 18, 456, 48, 4),
    version(19, 88, 88, 20, 20, 576, 56, 4),
    version(20, 96, 96, 22, 22, 696, 68, 4),
    version(21, 104, 104, 24, 24, 816, 56, 6),
    version(22, 120, 120, 18, 18, 1050, 68, 6),
    version(23, 132, 132, 20, 20, 1304, 62, 8),
    version(24, 144, 144, 22, 22, 1558, 62, 10),
    version(25, 8, 18, 6, 16, 5, 7, 1),
    version(26, 8, 32, 6, 14, 10, 11, 1),
    version(27, 12, 26, 10, 24, 16, 14, 1),
    version(28, 12, 36, 10, 16, 22, 18, 1),
    version(29, 16, 36, 14, 16, 32, 24, 1),
    version(30, 16, 48, 14, 22, 49, 28, 1),
];

impl SymbolVersion {
    /// Every ECC 200 size, square sizes first
    pub fn all() -> &'static [SymbolVersion] {
        &VERSIONS
    }

    /// Look up a size by its module dimensions
    pub fn for_dimensions(rows: usize, cols: usize) -> Option<&'static SymbolVersion> {
        VERSIONS.iter().find(|v| v.rows == rows && v.cols == cols)
    }

    /// Smallest symbol with room for `data_len` data codewords, optionally
    /// restricted to square sizes
    pub fn smallest_for(data_len: usize, square_only: bool) -> Option<&'static SymbolVersion> {
        VERSIONS
            .iter()
            .filter(|v| v.data_codewords >= data_len && (!square_only || v.is_square()))
            .min_by_key(|v| (v.data_codewords, v.rows * v.cols))
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Data regions stacked vertically
    pub fn regions_down(&self) -> usize {
        self.rows / (self.region_rows + 2)
    }

    /// Data regions side by side
    pub fn regions_across(&self) -> usize {
        self.cols / (self.region_cols + 2)
    }

    /// Height of the mapping matrix (symbol without alignment patterns)
    pub fn mapping_rows(&self) -> usize {
        self.regions_down() * self.region_rows
    }

    /// Width of the mapping matrix
    pub fn mapping_cols(&self) -> usize {
        self.regions_across() * self.region_cols
    }

    pub fn ecc_codewords(&self) -> usize {
        self.ecc_per_block * self.blocks
    }

    pub fn total_codewords(&self) -> usize {
        self.data_codewords + self.ecc_codewords()
    }

    /// Whether the module at symbol position (`row`, `col`) belongs to the
    /// finder, clock track, or region alignment pattern, and its colour if so.
    pub fn alignment_module(&self, row: usize, col: usize) -> Option<bool> {
        let block_rows = self.region_rows + 2;
        let block_cols = self.region_cols + 2;
        let r = row % block_rows;
        let c = col % block_cols;
        if c == 0 || r == block_rows - 1 {
            Some(true)
        } else if r == 0 {
            Some(c % 2 == 0)
        } else if c == block_cols - 1 {
            Some(r % 2 == 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codeword_capacity_matches_mapping_area() {
        for v in SymbolVersion::all() {
            let modules = v.mapping_rows() * v.mapping_cols();
            assert_eq!(
                modules / 8,
                v.total_codewords(),
                "{}x{} capacity",
                v.rows,
                v.cols
            );
            assert_eq!(v.regions_down() * (v.region_rows + 2), v.rows);
            assert_eq!(v.regions_across() * (v.region_cols + 2), v.cols);
        }
    }

    #[test]
    fn test_lookup() {
        let v = SymbolVersion::for_dimensions(16, 48).unwrap();
        assert_eq!(v.number, 30);
        assert!(!v.is_square());
        assert!(SymbolVersion::for_dimensions(11, 11).is_none());

        assert_eq!(SymbolVersion::smallest_for(3, true).unwrap().rows, 10);
        assert_eq!(SymbolVersion::smallest_for(4, true).unwrap().rows, 12);
        assert_eq!(SymbolVersion::smallest_for(10, false).unwrap().cols, 32);
        assert_eq!(SymbolVersion::smallest_for(10, true).unwrap().cols, 16);
        assert!(SymbolVersion::smallest_for(1559, false).is_none());
    }

    #[test]
    fn test_alignment_pattern() {
        let v = SymbolVersion::for_dimensions(10, 10).unwrap();
        // L finder
        assert_eq!(v.alignment_module(5, 0), Some(true));
        assert_eq!(v.alignment_module(9, 7), Some(true));
        // clock tracks
        assert_eq!(v.alignment_module(0, 2), Some(true));
        assert_eq!(v.alignment_module(0, 3), Some(false));
        assert_eq!(v.alignment_module(0, 9), Some(false));
        assert_eq!(v.alignment_module(1, 9), Some(true));
        assert_eq!(v.alignment_module(2, 9), Some(false));
        // data
        assert_eq!(v.alignment_module(4, 4), None);
    }
}
