//! rust_dmtx - Data Matrix (ECC 200) reading library
//!
//! Locates a Data Matrix symbol in a raster image, samples its modules,
//! corrects errors with Reed-Solomon and decodes the data encodation modes.
//! The `decode_data_matrix` binary wraps [`decode_data_matrix`]; `dmtool`
//! decodes batches of files.
//!
//! ```no_run
//! use rust_dmtx::{DataMatrixReader, DecodeHints};
//!
//! let bytes = std::fs::read("label.png").unwrap();
//! let reader = DataMatrixReader::new(DecodeHints::new().try_harder(true));
//! match reader.decode_bytes(&bytes) {
//!     Ok(symbol) => println!("{} ({}x{})", symbol.text, symbol.version.rows, symbol.version.cols),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

/// Command-line entry point of `decode_data_matrix`
pub mod cli;
/// Decode hints and search limits
pub mod config;
/// Module grid to text (placement, error correction, encodation modes)
pub mod decoder;
/// Symbol location (candidate regions, L finder, sizing, sampling)
pub mod detector;
/// ECC 200 symbol generator used for fixtures
pub mod encoder;
/// Error types
pub mod error;
/// Core data structures (DataMatrix, BitMatrix, Point, SymbolVersion)
pub mod models;
mod pipeline;
/// Reader entry points
pub mod reader;
/// Batch tool reporters
pub mod report;
/// Image helpers (luminance, binarization, geometry)
pub mod utils;

use std::path::Path;

pub use config::DecodeHints;
pub use error::{DecodeError, EncodeError};
pub use models::{BitMatrix, DataMatrix, Point, StructuredAppend, SymbolVersion};
pub use reader::{DataMatrixReader, SymbolReader};

/// Decode the Data Matrix symbol in the image file at `path`, trying hard.
///
/// Returns the decoded text, or an empty string if the file cannot be read,
/// is not an image, holds no symbol, or the symbol fails error correction
/// or decoding.
pub fn decode_data_matrix<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    decode_file(path, &cli::default_reader()).unwrap_or_else(|err| {
        log::debug!("{}: {err}", path.display());
        String::new()
    })
}

/// Read the whole file, then hand its bytes to `reader`. The file is closed
/// before decoding starts.
pub fn decode_file<P, R>(path: P, reader: &R) -> Result<String, DecodeError>
where
    P: AsRef<Path>,
    R: SymbolReader + ?Sized,
{
    let bytes = std::fs::read(path)?;
    reader.read_symbol(&bytes)
}
