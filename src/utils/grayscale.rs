//! Luminance source: an 8-bit grayscale plane derived from any raster
//! image. RGBA converts as Y = (306*R + 601*G + 117*B + 512) >> 10, with
//! fully transparent pixels treated as white.
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};

const COEF_R: u32 = 306;
const COEF_G: u32 = 601;
const COEF_B: u32 = 117;

/// Grayscale pixels, row-major, one byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

/// Convert packed RGBA bytes to luminance
pub fn rgba_to_luminance(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .map(|px| {
            if px[3] == 0 {
                return 0xFF;
            }
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            ((COEF_R * r + COEF_G * g + COEF_B * b + 0x200) >> 10) as u8
        })
        .collect()
}

impl LuminanceImage {
    /// `None` if `pixels` does not hold exactly `width * height` bytes
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let pixels = match image {
            DynamicImage::ImageLuma8(gray) => gray.as_raw().clone(),
            other => rgba_to_luminance(other.to_rgba8().as_raw()),
        };
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_gray(image: &GrayImage) -> Self {
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            pixels: image.as_raw().clone(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    fn to_gray_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
    }

    /// Shrink by an integer factor with a triangle filter; `None` when the
    /// result would be degenerate.
    pub fn downscaled(&self, divisor: u32) -> Option<Self> {
        let divisor = divisor.max(1) as usize;
        let (w, h) = (self.width / divisor, self.height / divisor);
        if w == 0 || h == 0 {
            return None;
        }
        let resized = imageops::resize(
            &self.to_gray_image()?,
            w as u32,
            h as u32,
            FilterType::Triangle,
        );
        Some(Self::from_gray(&resized))
    }

    /// Unsharp-masked copy; recovers edges of blurred symbols
    pub fn sharpened(&self) -> Option<Self> {
        let sharpened = imageops::unsharpen(&self.to_gray_image()?, 3.0, 0);
        Some(Self::from_gray(&sharpened))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_rgba_to_luminance() {
        let rgba = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 255, 255, 255, // white
            0, 0, 0, 0, // transparent
        ];
        let gray = rgba_to_luminance(&rgba);
        assert_eq!(gray, vec![76, 150, 29, 255, 255]);
    }

    #[test]
    fn test_from_dynamic_keeps_gray() {
        let gray = GrayImage::from_fn(4, 2, |x, y| image::Luma([(x * 10 + y) as u8]));
        let lum = LuminanceImage::from_dynamic(&DynamicImage::ImageLuma8(gray));
        assert_eq!((lum.width(), lum.height()), (4, 2));
        assert_eq!(lum.row(1), &[1, 11, 21, 31]);
    }

    #[test]
    fn test_from_dynamic_rgba() {
        let rgba = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        let lum = LuminanceImage::from_dynamic(&DynamicImage::ImageRgba8(rgba));
        assert!(lum.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_new_checks_length() {
        assert!(LuminanceImage::new(2, 2, vec![0; 3]).is_none());
        assert!(LuminanceImage::new(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn test_downscaled() {
        let lum = LuminanceImage::new(8, 6, vec![200; 48]).unwrap();
        let half = lum.downscaled(2).unwrap();
        assert_eq!((half.width(), half.height()), (4, 3));
        assert!(half.pixels().iter().all(|&p| p.abs_diff(200) <= 1));
        assert!(lum.downscaled(16).is_none());
    }
}
