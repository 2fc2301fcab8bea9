//! Symbol size estimation and module grid sampling
use super::finder::SymbolCorners;
use crate::models::{BitMatrix, SymbolVersion};
use crate::utils::geometry::PerspectiveTransform;

/// Smallest module pitch, in pixels, worth sampling
const MIN_MODULE_PX: f32 = 0.9;
/// Allowed deviation between the measured and the expected aspect ratio
const MAX_ASPECT_ERROR: f32 = 1.5;

/// A symbol size with the fraction of its alignment modules that matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeEstimate {
    pub version: &'static SymbolVersion,
    pub agreement: f32,
}

/// Score every plausible symbol size against the finder and clock tracks
/// seen through `corners`, best first. Sizes below `min_agreement` are
/// dropped; ties keep table order.
pub fn rank_versions(
    matrix: &BitMatrix,
    corners: &SymbolCorners,
    min_agreement: f32,
) -> Vec<SizeEstimate> {
    let (width, height) = (corners.width(), corners.height());
    if width < 1.0 || height < 1.0 {
        return Vec::new();
    }

    let mut estimates: Vec<SizeEstimate> = SymbolVersion::all()
        .iter()
        .filter(|v| plausible_size(v, width, height))
        .filter_map(|version| {
            let transform =
                PerspectiveTransform::grid_to_image(version.cols, version.rows, &corners.to_array())?;
            let agreement = alignment_agreement(matrix, &transform, version);
            (agreement >= min_agreement).then_some(SizeEstimate { version, agreement })
        })
        .collect();
    estimates.sort_by(|a, b| b.agreement.total_cmp(&a.agreement));

    if let Some(best) = estimates.first() {
        log::trace!(
            "best size {}x{} ({:.2} agreement, {} candidates)",
            best.version.rows,
            best.version.cols,
            best.agreement,
            estimates.len()
        );
    }
    estimates
}

fn plausible_size(version: &SymbolVersion, width: f32, height: f32) -> bool {
    let (cols, rows) = (version.cols as f32, version.rows as f32);
    if width / cols < MIN_MODULE_PX || height / rows < MIN_MODULE_PX {
        return false;
    }
    let ratio = (width / height) / (cols / rows);
    (1.0 / MAX_ASPECT_ERROR..=MAX_ASPECT_ERROR).contains(&ratio)
}

fn sample(matrix: &BitMatrix, transform: &PerspectiveTransform, col: usize, row: usize) -> bool {
    transform
        .transform(col as f64 + 0.5, row as f64 + 0.5)
        .is_some_and(|p| matrix.get_signed(p.x.floor() as i64, p.y.floor() as i64))
}

/// Fraction of finder, clock and region alignment modules that match
fn alignment_agreement(
    matrix: &BitMatrix,
    transform: &PerspectiveTransform,
    version: &SymbolVersion,
) -> f32 {
    let mut total = 0usize;
    let mut matching = 0usize;
    for row in 0..version.rows {
        for col in 0..version.cols {
            if let Some(dark) = version.alignment_module(row, col) {
                total += 1;
                if sample(matrix, transform, col, row) == dark {
                    matching += 1;
                }
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    matching as f32 / total as f32
}

/// Read one module per grid cell at its centre
pub fn sample_grid(
    matrix: &BitMatrix,
    corners: &SymbolCorners,
    version: &SymbolVersion,
) -> Option<BitMatrix> {
    let transform =
        PerspectiveTransform::grid_to_image(version.cols, version.rows, &corners.to_array())?;
    let mut grid = BitMatrix::new(version.cols, version.rows);
    for row in 0..version.rows {
        for col in 0..version.cols {
            if sample(matrix, &transform, col, row) {
                grid.set(col, row, true);
            }
        }
    }
    Some(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::regions::assemble_symbol;
    use crate::models::Point;

    /// Symbol drawn at `module` px per module with a 2 module margin
    fn draw(symbol: &BitMatrix, module: usize) -> BitMatrix {
        let margin = 2 * module;
        BitMatrix::from_fn(
            symbol.width() * module + 2 * margin,
            symbol.height() * module + 2 * margin,
            |x, y| {
                x >= margin
                    && y >= margin
                    && symbol.get((x - margin) / module, (y - margin) / module)
            },
        )
    }

    fn outline(symbol: &BitMatrix, module: usize) -> SymbolCorners {
        let m = module as f32;
        let (w, h) = (symbol.width() as f32 * m, symbol.height() as f32 * m);
        let origin = 2.0 * m;
        SymbolCorners::from_l(
            Point::new(origin, origin),
            Point::new(origin, origin + h),
            Point::new(origin + w, origin + h),
        )
    }

    fn pattern(version: &SymbolVersion) -> BitMatrix {
        let mapping = BitMatrix::from_fn(version.mapping_cols(), version.mapping_rows(), |x, y| {
            (x * 7 + y * 3) % 5 < 2
        });
        assemble_symbol(&mapping, version)
    }

    #[test]
    fn test_rank_finds_true_size() {
        for (rows, cols) in [(10, 10), (24, 24), (32, 32), (12, 36)] {
            let version = SymbolVersion::for_dimensions(rows, cols).unwrap();
            let symbol = pattern(version);
            let image = draw(&symbol, 3);

            let ranked = rank_versions(&image, &outline(&symbol, 3), 0.8);
            assert_eq!(ranked[0].version, version, "{rows}x{cols}");
            assert_eq!(ranked[0].agreement, 1.0);
        }
    }

    #[test]
    fn test_sample_grid_reads_modules() {
        let version = SymbolVersion::for_dimensions(16, 16).unwrap();
        let symbol = pattern(version);
        let image = draw(&symbol, 5);
        let grid = sample_grid(&image, &outline(&symbol, 5), version).unwrap();
        assert_eq!(grid, symbol);
    }

    #[test]
    fn test_blank_area_has_no_size() {
        let image = BitMatrix::new(60, 60);
        let corners = SymbolCorners::from_l(
            Point::new(10.0, 10.0),
            Point::new(10.0, 50.0),
            Point::new(50.0, 50.0),
        );
        assert!(rank_versions(&image, &corners, 0.8).is_empty());
    }
}
