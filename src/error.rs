use thiserror::Error;

/// Why a decode attempt produced no text.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The image file could not be read
    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a raster image the `image` crate understands
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// No Data Matrix symbol could be located
    #[error("no Data Matrix symbol found")]
    NotFound,

    /// Reed-Solomon correction could not repair the codewords
    #[error("error correction failed")]
    Checksum,

    /// The corrected codewords violate the encodation rules
    #[error("malformed symbol data: {0}")]
    Format(&'static str),
}

impl DecodeError {
    /// How far the decoder got before failing. When several attempts fail,
    /// the one that got furthest is the most informative.
    pub(crate) fn stage(&self) -> u8 {
        match self {
            DecodeError::Io(_) | DecodeError::Image(_) => 0,
            DecodeError::NotFound => 1,
            DecodeError::Checksum => 2,
            DecodeError::Format(_) => 3,
        }
    }
}

/// Errors from the symbol encoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// ASCII encodation covers ISO-8859-1 only
    #[error("character {0:?} cannot be encoded")]
    UnsupportedCharacter(char),

    /// No symbol in the size table holds this many data codewords
    #[error("{0} data codewords do not fit in any symbol")]
    TooLong(usize),

    /// The requested symbol is too small for the data
    #[error("{needed} data codewords do not fit in a {rows}x{cols} symbol")]
    Capacity {
        /// Data codewords required
        needed: usize,
        /// Requested symbol rows
        rows: usize,
        /// Requested symbol columns
        cols: usize,
    },
}
