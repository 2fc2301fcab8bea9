//! Conversion between a full symbol and its mapping matrix. Every data
//! region is framed by its own finder edges and clock tracks; stripping
//! those frames leaves the mapping matrix codewords are placed in.
use crate::models::{BitMatrix, SymbolVersion};

/// Strip alignment patterns from a sampled symbol (`x` = column, `y` = row)
pub fn extract_mapping(symbol: &BitMatrix, version: &SymbolVersion) -> BitMatrix {
    let (rr, rc) = (version.region_rows, version.region_cols);
    BitMatrix::from_fn(version.mapping_cols(), version.mapping_rows(), |x, y| {
        let sym_row = (y / rr) * (rr + 2) + 1 + y % rr;
        let sym_col = (x / rc) * (rc + 2) + 1 + x % rc;
        symbol.get(sym_col, sym_row)
    })
}

/// Add alignment patterns around a mapping matrix
pub fn assemble_symbol(mapping: &BitMatrix, version: &SymbolVersion) -> BitMatrix {
    let (rr, rc) = (version.region_rows, version.region_cols);
    BitMatrix::from_fn(version.cols, version.rows, |col, row| {
        match version.alignment_module(row, col) {
            Some(dark) => dark,
            None => {
                let map_row = (row / (rr + 2)) * rr + row % (rr + 2) - 1;
                let map_col = (col / (rc + 2)) * rc + col % (rc + 2) - 1;
                mapping.get(map_col, map_row)
            }
        }
    })
}

/// Fraction of alignment modules that match the expected pattern
pub fn alignment_agreement(symbol: &BitMatrix, version: &SymbolVersion) -> f32 {
    let mut total = 0usize;
    let mut matching = 0usize;
    for row in 0..version.rows {
        for col in 0..version.cols {
            if let Some(dark) = version.alignment_module(row, col) {
                total += 1;
                if symbol.get(col, row) == dark {
                    matching += 1;
                }
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    matching as f32 / total as f32
}
