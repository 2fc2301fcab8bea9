use crate::decoder::placement::Placement;
use crate::decoder::{blocks, modes, regions};
use crate::error::DecodeError;
use crate::models::{BitMatrix, StructuredAppend, SymbolVersion};

/// Contents recovered from a module grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub text: String,
    /// Corrected data codewords
    pub codewords: Vec<u8>,
    pub corrected_errors: usize,
    pub structured_append: Option<StructuredAppend>,
}

/// Decode a sampled symbol: one cell per module, `x` = column.
pub fn decode_symbol(
    symbol: &BitMatrix,
    version: &SymbolVersion,
) -> Result<DecodedSymbol, DecodeError> {
    if symbol.width() != version.cols || symbol.height() != version.rows {
        return Err(DecodeError::NotFound);
    }

    let mapping = regions::extract_mapping(symbol, version);
    let placement = Placement::new(version.mapping_rows(), version.mapping_cols());
    let raw = placement.read(&mapping);

    let (codewords, corrected_errors) = blocks::correct(version, &raw)?;
    if corrected_errors > 0 {
        log::debug!(
            "{}x{}: corrected {corrected_errors} codewords",
            version.rows,
            version.cols
        );
    }

    let decoded = modes::decode(&codewords)?;
    Ok(DecodedSymbol {
        text: decoded.text,
        codewords,
        corrected_errors,
        structured_append: decoded.structured_append,
    })
}
