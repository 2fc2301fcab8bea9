use image::{GrayImage, Luma};

use crate::models::BitMatrix;

/// Draw a module grid as black-on-white pixels with a light quiet zone of
/// `quiet_zone` modules on every side.
pub fn render(symbol: &BitMatrix, module_px: u32, quiet_zone: u32) -> GrayImage {
    let module_px = module_px.max(1);
    let width = (symbol.width() as u32 + 2 * quiet_zone) * module_px;
    let height = (symbol.height() as u32 + 2 * quiet_zone) * module_px;

    GrayImage::from_fn(width, height, |px, py| {
        let mx = (px / module_px) as i64 - quiet_zone as i64;
        let my = (py / module_px) as i64 - quiet_zone as i64;
        if symbol.get_signed(mx, my) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_scales_and_pads() {
        let symbol = BitMatrix::from_fn(2, 1, |x, _| x == 0);
        let img = render(&symbol, 3, 1);
        assert_eq!(img.dimensions(), (12, 9));
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(3, 3)[0], 0);
        assert_eq!(img.get_pixel(5, 5)[0], 0);
        assert_eq!(img.get_pixel(6, 3)[0], 255);
    }
}
