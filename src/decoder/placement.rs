//! ECC 200 codeword placement within the mapping matrix.
//!
//! Codewords are laid out as diagonal sweeps of the 8-module "utah" shape,
//! with four special shapes for codewords that wrap around a corner. The
//! same walk serves both reading (decoder) and writing (encoder).

use crate::models::BitMatrix;

/// Module coordinates `(row, col)` of one codeword, most significant bit first
pub type CodewordModules = [(usize, usize); 8];

/// Precomputed module positions for a mapping matrix of a given size.
#[derive(Debug, Clone)]
pub struct Placement {
    rows: usize,
    cols: usize,
    codewords: Vec<CodewordModules>,
    filler: bool,
}

struct Walker {
    rows: i64,
    cols: i64,
    assigned: Vec<bool>,
    codewords: Vec<CodewordModules>,
}

impl Walker {
    fn wrap(&self, mut row: i64, mut col: i64) -> (usize, usize) {
        if row < 0 {
            row += self.rows;
            col += 4 - ((self.rows + 4) % 8);
        }
        if col < 0 {
            col += self.cols;
            row += 4 - ((self.cols + 4) % 8);
        }
        (row as usize, col as usize)
    }

    fn is_assigned(&self, row: i64, col: i64) -> bool {
        if row < 0 || col < 0 || row >= self.rows || col >= self.cols {
            return true;
        }
        self.assigned[(row * self.cols + col) as usize]
    }

    fn push(&mut self, raw: [(i64, i64); 8]) {
        let mut modules = [(0usize, 0usize); 8];
        for (slot, &(r, c)) in modules.iter_mut().zip(&raw) {
            let (row, col) = self.wrap(r, c);
            self.assigned[row * self.cols as usize + col] = true;
            *slot = (row, col);
        }
        self.codewords.push(modules);
    }

    fn utah(&mut self, r: i64, c: i64) {
        self.push([
            (r - 2, c - 2),
            (r - 2, c - 1),
            (r - 1, c - 2),
            (r - 1, c - 1),
            (r - 1, c),
            (r, c - 2),
            (r, c - 1),
            (r, c),
        ]);
    }

    /// row == rows, col == 0
    fn corner_a(&mut self) {
        let (nr, nc) = (self.rows, self.cols);
        self.push([
            (nr - 1, 0),
            (nr - 1, 1),
            (nr - 1, 2),
            (0, nc - 2),
            (0, nc - 1),
            (1, nc - 1),
            (2, nc - 1),
            (3, nc - 1),
        ]);
    }

    /// row == rows - 2, col == 0, cols not a multiple of 4
    fn corner_b(&mut self) {
        let (nr, nc) = (self.rows, self.cols);
        self.push([
            (nr - 3, 0),
            (nr - 2, 0),
            (nr - 1, 0),
            (0, nc - 4),
            (0, nc - 3),
            (0, nc - 2),
            (0, nc - 1),
            (1, nc - 1),
        ]);
    }

    /// row == rows + 4, col == 2, cols a multiple of 8
    fn corner_c(&mut self) {
        let (nr, nc) = (self.rows, self.cols);
        self.push([
            (nr - 1, 0),
            (nr - 1, nc - 1),
            (0, nc - 3),
            (0, nc - 2),
            (0, nc - 1),
            (1, nc - 3),
            (1, nc - 2),
            (1, nc - 1),
        ]);
    }

    /// row == rows - 2, col == 0, cols = 4 (mod 8)
    fn corner_d(&mut self) {
        let (nr, nc) = (self.rows, self.cols);
        self.push([
            (nr - 3, 0),
            (nr - 2, 0),
            (nr - 1, 0),
            (0, nc - 2),
            (0, nc - 1),
            (1, nc - 1),
            (2, nc - 1),
            (3, nc - 1),
        ]);
    }
}

impl Placement {
    /// Walk a `rows` x `cols` mapping matrix
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut walker = Walker {
            rows: rows as i64,
            cols: cols as i64,
            assigned: vec![false; rows * cols],
            codewords: Vec::with_capacity(rows * cols / 8),
        };
        let (nr, nc) = (walker.rows, walker.cols);
        let (mut row, mut col) = (4i64, 0i64);
        let mut corners = [false; 4];

        loop {
            if row == nr && col == 0 && !corners[0] {
                corners[0] = true;
                walker.corner_a();
                row -= 2;
                col += 2;
            } else if row == nr - 2 && col == 0 && nc % 4 != 0 && !corners[1] {
                corners[1] = true;
                walker.corner_b();
                row -= 2;
                col += 2;
            } else if row == nr + 4 && col == 2 && nc % 8 == 0 && !corners[2] {
                corners[2] = true;
                walker.corner_c();
                row -= 2;
                col += 2;
            } else if row == nr - 2 && col == 0 && nc % 8 == 4 && !corners[3] {
                corners[3] = true;
                walker.corner_d();
                row -= 2;
                col += 2;
            } else {
                // Sweep up and to the right
                loop {
                    if row < nr && col >= 0 && !walker.is_assigned(row, col) {
                        walker.utah(row, col);
                    }
                    row -= 2;
                    col += 2;
                    if row < 0 || col >= nc {
                        break;
                    }
                }
                row += 1;
                col += 3;

                // Sweep down and to the left
                loop {
                    if row >= 0 && col < nc && !walker.is_assigned(row, col) {
                        walker.utah(row, col);
                    }
                    row += 2;
                    col -= 2;
                    if row >= nr || col < 0 {
                        break;
                    }
                }
                row += 3;
                col += 1;
            }

            if row >= nr && col >= nc {
                break;
            }
        }

        let filler = rows >= 2 && cols >= 2 && !walker.is_assigned(nr - 1, nc - 1);
        Self {
            rows,
            cols,
            codewords: walker.codewords,
            filler,
        }
    }

    /// Module positions per codeword, in placement order
    pub fn codewords(&self) -> &[CodewordModules] {
        &self.codewords
    }

    /// Whether the bottom-right 2x2 corner is left to the fixed filler pattern
    pub fn has_filler(&self) -> bool {
        self.filler
    }

    /// Read codewords from a mapping matrix (`x` = column, `y` = row)
    pub fn read(&self, mapping: &BitMatrix) -> Vec<u8> {
        self.codewords
            .iter()
            .map(|modules| {
                modules
                    .iter()
                    .fold(0u8, |acc, &(r, c)| (acc << 1) | mapping.get(c, r) as u8)
            })
            .collect()
    }

    /// Lay codewords into a fresh mapping matrix. Missing codewords leave
    /// their modules light.
    pub fn write(&self, codewords: &[u8]) -> BitMatrix {
        let mut mapping = BitMatrix::new(self.cols, self.rows);
        for (modules, &value) in self.codewords.iter().zip(codewords) {
            for (bit, &(r, c)) in modules.iter().enumerate() {
                mapping.set(c, r, (value >> (7 - bit)) & 1 == 1);
            }
        }
        if self.filler {
            mapping.set(self.cols - 1, self.rows - 1, true);
            mapping.set(self.cols - 2, self.rows - 2, true);
        }
        mapping
    }
}
