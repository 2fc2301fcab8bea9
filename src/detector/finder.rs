//! L-finder detection: turns dark regions into oriented symbol outlines.
//!
//! Each candidate region gives a quad of outer corners in clockwise order.
//! The L finder is the one corner whose two sides are both solid dark;
//! it becomes the bottom-left corner, and the fourth corner (the light
//! one between the clock tracks) is completed as a parallelogram.
use super::connected_components::{AXES, DIAGONALS, Extreme, Region, find_candidate_regions};
use crate::models::{BitMatrix, Point};

/// Distance in pixels the side samples are moved into the symbol
const SIDE_INSET: f32 = 0.5;
const MIN_SIDE_SAMPLES: usize = 8;

/// Outer corners of a symbol in reading orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl SymbolCorners {
    /// Parallelogram from the three corners of the L
    pub fn from_l(top_left: Point, bottom_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            top_right: top_left + bottom_right - bottom_left,
            bottom_right,
            bottom_left,
        }
    }

    /// Top-left, top-right, bottom-right, bottom-left
    pub fn to_array(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Length of the bottom edge in pixels
    pub fn width(&self) -> f32 {
        self.bottom_left.distance(&self.bottom_right)
    }

    /// Length of the left edge in pixels
    pub fn height(&self) -> f32 {
        self.bottom_left.distance(&self.top_left)
    }

    pub fn centre(&self) -> Point {
        (self.top_left + self.bottom_right) * 0.5
    }

    /// Axis-aligned bounds as `(left, top, right, bottom)`
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        self.to_array().iter().fold(
            (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            |(left, top, right, bottom), p| (left.min(p.x), top.min(p.y), right.max(p.x), bottom.max(p.y)),
        )
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            top_left: self.top_left * factor,
            top_right: self.top_right * factor,
            bottom_right: self.bottom_right * factor,
            bottom_left: self.bottom_left * factor,
        }
    }
}

/// Search switches for one detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderOptions {
    pub max_candidates: usize,
    pub min_darkness: f32,
    pub axis_quads: bool,
    pub mirrored: bool,
}

pub struct FinderDetector;

impl FinderDetector {
    /// Oriented outlines for every candidate region whose L finder is dark
    /// enough, largest region first.
    pub fn detect(matrix: &BitMatrix, options: &FinderOptions) -> Vec<SymbolCorners> {
        let regions = find_candidate_regions(matrix, options.max_candidates);
        log::trace!("{} candidate regions", regions.len());

        let mut found = Vec::new();
        for region in &regions {
            let mut quads = vec![diagonal_quad(region)];
            if options.axis_quads {
                quads.push(axis_quad(region));
            }
            for quad in &quads {
                let corners = Self::l_corners(matrix, quad, options.min_darkness);
                if corners.is_empty() {
                    log::trace!(
                        "region at ({}, {}): no L finder",
                        region.left,
                        region.top
                    );
                }
                for corner in corners {
                    found.push(orient(quad, corner, false));
                    if options.mirrored {
                        found.push(orient(quad, corner, true));
                    }
                }
            }
        }
        found
    }

    /// Quad corners whose two sides are both at least `min_darkness` dark,
    /// largest enclosed parallelogram first. A clock track that is not
    /// connected to the L leaves a short stub side next to an L end, so the
    /// area separates the real L corner from those.
    pub fn l_corners(matrix: &BitMatrix, quad: &[Point; 4], min_darkness: f32) -> Vec<usize> {
        let centroid = quad.iter().fold(Point::default(), |acc, &p| acc + p) * 0.25;
        let sides: Vec<f32> = (0..4)
            .map(|i| side_darkness(matrix, quad[i], quad[(i + 1) % 4], centroid))
            .collect();

        let mut corners: Vec<(usize, f32)> = (0..4)
            .filter(|&k| sides[k].min(sides[(k + 3) % 4]) >= min_darkness)
            .map(|k| {
                let before = quad[(k + 3) % 4] - quad[k];
                let after = quad[(k + 1) % 4] - quad[k];
                (k, before.cross(&after).abs())
            })
            .filter(|&(_, area)| area > 0.0)
            .collect();
        corners.sort_by(|a, b| b.1.total_cmp(&a.1));
        corners.into_iter().map(|(k, _)| k).collect()
    }

    /// The image is one upright symbol: its outline is the bounding box of
    /// all dark pixels.
    pub fn pure_symbol(matrix: &BitMatrix) -> Option<SymbolCorners> {
        let (left, top, right, bottom) = matrix.dark_bounds()?;
        let (l, t) = (left as f32, top as f32);
        let (r, b) = ((right + 1) as f32, (bottom + 1) as f32);
        Some(SymbolCorners::from_l(
            Point::new(l, t),
            Point::new(l, b),
            Point::new(r, b),
        ))
    }
}

/// Outer pixel corner of an extreme pixel in direction `(dx, dy)`
fn outer_corner(extreme: &Extreme, (dx, dy): (i64, i64)) -> Point {
    Point::new(
        extreme.x as f32 + (1 + dx) as f32 / 2.0,
        extreme.y as f32 + (1 + dy) as f32 / 2.0,
    )
}

fn diagonal_quad(region: &Region) -> [Point; 4] {
    [0, 1, 2, 3].map(|i| outer_corner(&region.diagonal[i], DIAGONALS[i]))
}

/// Quad from the topmost, rightmost, bottommost and leftmost pixels; fits
/// symbols rotated near 45 degrees.
fn axis_quad(region: &Region) -> [Point; 4] {
    [0, 1, 2, 3].map(|i| outer_corner(&region.axis[i], AXES[i]))
}

/// Assign reading orientation with the L corner at index `corner`. In the
/// normal case the bottom-right corner precedes it clockwise; a mirrored
/// symbol has the two swapped.
fn orient(quad: &[Point; 4], corner: usize, mirrored: bool) -> SymbolCorners {
    let before = quad[(corner + 3) % 4];
    let after = quad[(corner + 1) % 4];
    let bottom_left = quad[corner];
    if mirrored {
        SymbolCorners::from_l(before, bottom_left, after)
    } else {
        SymbolCorners::from_l(after, bottom_left, before)
    }
}

/// Fraction of dark pixels along the side `a -> b`, sampled just inside the
/// quad.
fn side_darkness(matrix: &BitMatrix, a: Point, b: Point, centroid: Point) -> f32 {
    let direction = b - a;
    let length = direction.length();
    if length < 2.0 {
        return 0.0;
    }

    let mut normal = Point::new(-direction.y, direction.x) * (1.0 / length);
    let inward = centroid - a.lerp(&b, 0.5);
    if normal.x * inward.x + normal.y * inward.y < 0.0 {
        normal = normal * -1.0;
    }
    let offset = normal * SIDE_INSET;

    let samples = (length as usize).max(MIN_SIDE_SAMPLES);
    let dark = (0..samples)
        .filter(|&i| {
            // Skip the last 5% at each end, where corners are rounded off
            let t = 0.05 + 0.9 * (i as f32 + 0.5) / samples as f32;
            let p = a.lerp(&b, t) + offset;
            matrix.get_signed(p.x.floor() as i64, p.y.floor() as i64)
        })
        .count();
    dark as f32 / samples as f32
}
