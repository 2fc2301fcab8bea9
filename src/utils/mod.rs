//! Image processing helpers
//!
//! - Luminance conversion, resizing and sharpening
//! - Binarization (hybrid local thresholds, Otsu, fixed threshold)
//! - Perspective transforms between grid and image space

pub mod binarization;
pub mod geometry;
pub mod grayscale;
