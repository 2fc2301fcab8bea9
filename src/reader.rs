//! Reader entry points: raw image bytes or decoded images in, symbols out.
use std::io::Cursor;

use image::DynamicImage;
use image::io::Reader as ImageReader;

use crate::config::{DecodeHints, ReaderConfig};
use crate::error::DecodeError;
use crate::models::DataMatrix;
use crate::pipeline::{self, Located};
use crate::utils::grayscale::LuminanceImage;

/// Anything that can turn an encoded image into the text of one symbol.
///
/// The CLI depends on this rather than on [`DataMatrixReader`] so tests can
/// substitute a reader with canned results.
pub trait SymbolReader {
    /// Decode the first symbol found in `image`, an encoded raster file
    /// (PNG, JPEG, GIF, BMP, ...).
    fn read_symbol(&self, image: &[u8]) -> Result<String, DecodeError>;
}

/// Data Matrix (ECC 200) reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataMatrixReader {
    hints: DecodeHints,
}

impl DataMatrixReader {
    pub fn new(hints: DecodeHints) -> Self {
        Self { hints }
    }

    pub fn hints(&self) -> DecodeHints {
        self.hints
    }

    /// Decode image file contents; the format is detected from the bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DataMatrix, DecodeError> {
        self.decode_image(&load(bytes)?)
    }

    pub fn decode_image(&self, image: &DynamicImage) -> Result<DataMatrix, DecodeError> {
        self.decode_luminance(&LuminanceImage::from_dynamic(image))
    }

    pub fn decode_luminance(&self, image: &LuminanceImage) -> Result<DataMatrix, DecodeError> {
        let config = ReaderConfig::from(self.hints);
        pipeline::decode_luminance(image, &config).map(symbol)
    }

    /// Every distinct symbol in the image file, de-duplicated by text.
    /// Fails with the furthest error reached when none decodes.
    pub fn decode_all_bytes(&self, bytes: &[u8]) -> Result<Vec<DataMatrix>, DecodeError> {
        self.decode_all_image(&load(bytes)?)
    }

    pub fn decode_all_image(&self, image: &DynamicImage) -> Result<Vec<DataMatrix>, DecodeError> {
        let config = ReaderConfig::from(self.hints);
        let located = pipeline::decode_all_luminance(&LuminanceImage::from_dynamic(image), &config)?;
        Ok(located.into_iter().map(symbol).collect())
    }
}

fn load(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    Ok(ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?)
}

fn symbol(located: Located) -> DataMatrix {
    DataMatrix {
        text: located.decoded.text,
        codewords: located.decoded.codewords,
        version: *located.version,
        corners: located.corners.to_array(),
        corrected_errors: located.decoded.corrected_errors,
        structured_append: located.decoded.structured_append,
    }
}

impl SymbolReader for DataMatrixReader {
    fn read_symbol(&self, image: &[u8]) -> Result<String, DecodeError> {
        self.decode_bytes(image).map(|symbol| symbol.text)
    }
}
