/// Packed grid of dark/light cells, `true` = dark.
///
/// Used for binarized images (one cell per pixel) and for sampled symbols
/// (one cell per module). Coordinates are `(x, y)` = `(column, row)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    words: Vec<u32>,
}

impl BitMatrix {
    /// Create an all-light matrix
    pub fn new(width: usize, height: usize) -> Self {
        let words = (width * height).div_ceil(32);
        Self {
            width,
            height,
            words: vec![0; words],
        }
    }

    /// Build a matrix by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    matrix.set(x, y, true);
                }
            }
        }
        matrix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range cells read as light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.words[index / 32] >> (index % 32)) & 1 == 1
    }

    /// Signed lookup, for samplers that may step outside the image
    pub fn get_signed(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    /// Out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let mask = 1u32 << (index % 32);
        if value {
            self.words[index / 32] |= mask;
        } else {
            self.words[index / 32] &= !mask;
        }
    }

    pub fn flip(&mut self, x: usize, y: usize) {
        let current = self.get(x, y);
        self.set(x, y, !current);
    }

    /// Number of dark cells
    pub fn count_dark(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bounding box `(left, top, right, bottom)` of all dark cells, inclusive
    pub fn dark_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.get(x, y) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
                });
            }
        }
        bounds
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
