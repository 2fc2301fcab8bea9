use super::{Point, SymbolVersion};

/// Position of a symbol within a structured-append sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// 1-based position of this symbol
    pub position: u8,
    /// Total symbols in the sequence
    pub total: u8,
    /// File identification, shared by every symbol of the sequence
    pub file_id: u16,
}

/// A decoded Data Matrix symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DataMatrix {
    /// Decoded text
    pub text: String,
    /// Error-corrected data codewords, in symbol order
    pub codewords: Vec<u8>,
    /// Symbol size
    pub version: SymbolVersion,
    /// Outer corners in image pixels: top-left, top-right, bottom-right,
    /// bottom-left as read (the L finder is left and bottom)
    pub corners: [Point; 4],
    /// Codewords repaired by Reed-Solomon
    pub corrected_errors: usize,
    pub structured_append: Option<StructuredAppend>,
}

impl DataMatrix {
    /// Axis-aligned bounding box `(left, top, width, height)` in pixels
    pub fn bounding_box(&self) -> (f32, f32, f32, f32) {
        let xs = self.corners.map(|p| p.x);
        let ys = self.corners.map(|p| p.y);
        let left = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let right = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let top = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let bottom = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (left, top, right - left, bottom - top)
    }
}
