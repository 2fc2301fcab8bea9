//! Projective mapping between symbol grid space and image space
use crate::models::Point;

/// Perspective transformation matrix (3x3, a33 = 1)
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Transform taking each `src[i]` onto `dst[i]`; `None` when three of the
    /// points are collinear.
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        solve_linear_system(a, b).map(|s| Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        })
    }

    /// Map symbol grid coordinates `(col, row)` to image pixels. The grid
    /// spans `(0, 0)` at the top-left outer corner to `(cols, rows)` at the
    /// bottom-right one; `corners` are top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn grid_to_image(cols: usize, rows: usize, corners: &[Point; 4]) -> Option<Self> {
        let (w, h) = (cols as f32, rows as f32);
        let grid = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        Self::from_points(&grid, corners)
    }

    /// Transform a point using this perspective matrix
    pub fn transform(&self, x: f64, y: f64) -> Option<Point> {
        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-12 {
            return None;
        }
        let tx = (self.a11 * x + self.a12 * y + self.a13) / denominator;
        let ty = (self.a21 * x + self.a22 * y + self.a23) / denominator;
        Some(Point::new(tx as f32, ty as f32))
    }
}

/// Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    let n = 8;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }
        if a[max_row][i].abs() < 1e-12 {
            return None;
        }
        a.swap(i, max_row);
        b.swap(i, max_row);

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(p: Point, x: f32, y: f32) -> bool {
        (p.x - x).abs() < 1e-3 && (p.y - y).abs() < 1e-3
    }

    #[test]
    fn test_scale_transform() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(close(t.transform(50.0, 50.0).unwrap(), 25.0, 25.0));
    }

    #[test]
    fn test_grid_to_rotated_quad() {
        // 10x10 grid rotated 90 degrees clockwise into a 100px square
        let corners = [
            Point::new(110.0, 10.0),
            Point::new(110.0, 110.0),
            Point::new(10.0, 110.0),
            Point::new(10.0, 10.0),
        ];
        let t = PerspectiveTransform::grid_to_image(10, 10, &corners).unwrap();
        assert!(close(t.transform(0.5, 0.5).unwrap(), 105.0, 15.0));
        assert!(close(t.transform(9.5, 0.5).unwrap(), 105.0, 105.0));
    }

    #[test]
    fn test_degenerate_quad() {
        let p = Point::new(1.0, 1.0);
        let corners = [p, p, p, p];
        assert!(PerspectiveTransform::grid_to_image(10, 10, &corners).is_none());
    }
}
