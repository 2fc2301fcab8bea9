//! Decode hints and the search limits derived from them.

/// Caller-facing switches for a decode attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeHints {
    /// Spend more time looking for a symbol: extra binarizer, rotations near
    /// 45 degrees, mirrored symbols, sharpened and downscaled images.
    pub try_harder: bool,
    /// The image holds nothing but one upright symbol (plus quiet zone).
    pub pure_barcode: bool,
}

impl DecodeHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_harder(mut self, enabled: bool) -> Self {
        self.try_harder = enabled;
        self
    }

    pub fn pure_barcode(mut self, enabled: bool) -> Self {
        self.pure_barcode = enabled;
        self
    }
}

/// Concrete limits used by the search pipeline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReaderConfig {
    /// Connected components examined per binarized image
    pub max_candidates: usize,
    /// Minimum fraction of dark samples along both L-finder edges
    pub min_finder_darkness: f32,
    /// Minimum fraction of clock-track modules matching the expected pattern
    pub min_clock_agreement: f32,
    /// Symbol sizes tried per located quad
    pub max_versions: usize,
    /// Also derive quads from axis-aligned extremes
    pub axis_quads: bool,
    /// Also read the symbol as if mirrored
    pub mirrored: bool,
    /// Fall back to a global (Otsu) threshold
    pub global_binarizer: bool,
    /// Retry on an unsharp-masked copy
    pub sharpen: bool,
    /// Downscale divisors tried after the full-size image
    pub downscales: &'static [u32],
    pub pure_barcode: bool,
}

impl From<DecodeHints> for ReaderConfig {
    fn from(hints: DecodeHints) -> Self {
        if hints.try_harder {
            Self {
                max_candidates: 40,
                min_finder_darkness: 0.65,
                min_clock_agreement: 0.8,
                max_versions: 3,
                axis_quads: true,
                mirrored: true,
                global_binarizer: true,
                sharpen: true,
                downscales: &[2, 4],
                pure_barcode: hints.pure_barcode,
            }
        } else {
            Self {
                max_candidates: 10,
                min_finder_darkness: 0.8,
                min_clock_agreement: 0.8,
                max_versions: 1,
                axis_quads: false,
                mirrored: false,
                global_binarizer: false,
                sharpen: false,
                downscales: &[],
                pure_barcode: hints.pure_barcode,
            }
        }
    }
}
