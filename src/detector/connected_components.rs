//! Connected components for symbol candidate detection
//! Finds dark regions and filters by size/shape; the solid L finder keeps a
//! symbol's outline inside a single component.
use crate::models::BitMatrix;

const MIN_SIDE: usize = 8;
const MAX_ASPECT: usize = 7;

/// Union-Find data structure
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            self.parent[root_x as usize] = root_y;
        }
    }
}

/// A pixel holding the extreme value of some projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extreme {
    pub x: usize,
    pub y: usize,
    score: i64,
}

impl Extreme {
    fn new(x: usize, y: usize, score: i64) -> Self {
        Self { x, y, score }
    }

    fn offer(&mut self, x: usize, y: usize, score: i64) {
        if score > self.score {
            *self = Self::new(x, y, score);
        }
    }
}

/// Directions in clockwise order starting at the top-left diagonal
pub const DIAGONALS: [(i64, i64); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];
/// Directions in clockwise order starting at the top
pub const AXES: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// One 8-connected dark region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub area: usize,
    /// Extremes along [`DIAGONALS`]
    pub diagonal: [Extreme; 4],
    /// Extremes along [`AXES`]
    pub axis: [Extreme; 4],
}

impl Region {
    fn new(x: usize, y: usize) -> Self {
        let project = |(dx, dy): (i64, i64)| Extreme::new(x, y, dx * x as i64 + dy * y as i64);
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
            area: 0,
            diagonal: DIAGONALS.map(project),
            axis: AXES.map(project),
        }
    }

    fn add(&mut self, x: usize, y: usize) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x);
        self.bottom = self.bottom.max(y);
        self.area += 1;
        for (extreme, (dx, dy)) in self.diagonal.iter_mut().zip(DIAGONALS) {
            extreme.offer(x, y, dx * x as i64 + dy * y as i64);
        }
        for (extreme, (dx, dy)) in self.axis.iter_mut().zip(AXES) {
            extreme.offer(x, y, dx * x as i64 + dy * y as i64);
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    fn box_area(&self) -> usize {
        self.width() * self.height()
    }

    /// Large enough and not too elongated to be a symbol outline
    fn is_candidate(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w >= MIN_SIDE && h >= MIN_SIDE && w <= h * MAX_ASPECT && h <= w * MAX_ASPECT
    }
}

/// Label dark regions and return the plausible ones, largest bounding box
/// first, at most `limit` of them.
pub fn find_candidate_regions(matrix: &BitMatrix, limit: usize) -> Vec<Region> {
    let width = matrix.width();
    let height = matrix.height();

    let mut labels = vec![0u32; width * height];
    let mut next_label = 1u32;
    let mut uf = UnionFind::new(width * height + 1);

    // First pass: provisional labels from already visited neighbours
    for y in 0..height {
        for x in 0..width {
            if !matrix.get(x, y) {
                continue;
            }

            let mut neighbours = [0u32; 4];
            let mut count = 0;
            let mut visit = |nx: usize, ny: usize| {
                let label = labels[ny * width + nx];
                if label != 0 {
                    neighbours[count] = label;
                    count += 1;
                }
            };
            if x > 0 {
                visit(x - 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
                if x > 0 {
                    visit(x - 1, y - 1);
                }
                if x + 1 < width {
                    visit(x + 1, y - 1);
                }
            }

            let idx = y * width + x;
            match neighbours[..count].iter().min() {
                None => {
                    labels[idx] = next_label;
                    next_label += 1;
                }
                Some(&min_label) => {
                    labels[idx] = min_label;
                    for &label in &neighbours[..count] {
                        uf.union(label, min_label);
                    }
                }
            }
        }
    }

    // Second pass: accumulate per root
    let mut regions: Vec<Option<Region>> = vec![None; next_label as usize];
    for y in 0..height {
        for x in 0..width {
            let label = labels[y * width + x];
            if label == 0 {
                continue;
            }
            let root = uf.find(label) as usize;
            regions[root].get_or_insert_with(|| Region::new(x, y)).add(x, y);
        }
    }

    let mut candidates: Vec<Region> = regions
        .into_iter()
        .flatten()
        .filter(Region::is_candidate)
        .collect();
    candidates.sort_by(|a, b| b.box_area().cmp(&a.box_area()));
    candidates.truncate(limit);
    candidates
}
