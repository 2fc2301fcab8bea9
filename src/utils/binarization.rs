use crate::models::BitMatrix;

const BLOCK_SIZE_POWER: usize = 3;
const BLOCK_SIZE: usize = 1 << BLOCK_SIZE_POWER;
const MIN_DIMENSION: usize = BLOCK_SIZE * 5;
const MIN_DYNAMIC_RANGE: u32 = 24;

/// Locally adaptive binarization.
///
/// The image is split into 8x8 blocks. Each block gets a black point (its
/// mean, or an estimate from its neighbours when the block is flat), and
/// every pixel is thresholded against the average black point of the 5x5
/// blocks around its own. Dark pixels are those `<=` the threshold.
///
/// Images smaller than 40 pixels on either side fall back to Otsu.
pub fn hybrid_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    if width < MIN_DIMENSION || height < MIN_DIMENSION || gray.len() < width * height {
        return otsu_binarize(gray, width, height);
    }

    let sub_width = width.div_ceil(BLOCK_SIZE);
    let sub_height = height.div_ceil(BLOCK_SIZE);
    let black_points = calculate_black_points(gray, sub_width, sub_height, width, height);

    let mut binary = BitMatrix::new(width, height);
    let max_y_offset = height - BLOCK_SIZE;
    let max_x_offset = width - BLOCK_SIZE;
    let cap = |value: usize, max: usize| value.clamp(2, max);

    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        let top = cap(y, sub_height - 3);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);
            let left = cap(x, sub_width - 3);

            let mut sum = 0u32;
            for row in &black_points[top - 2..=top + 2] {
                sum += row[left - 2..=left + 2].iter().map(|&v| v as u32).sum::<u32>();
            }
            let threshold = (sum / 25) as u8;

            for yy in 0..BLOCK_SIZE {
                let offset = (y_offset + yy) * width + x_offset;
                for xx in 0..BLOCK_SIZE {
                    if gray[offset + xx] <= threshold {
                        binary.set(x_offset + xx, y_offset + yy, true);
                    }
                }
            }
        }
    }

    binary
}

fn calculate_black_points(
    gray: &[u8],
    sub_width: usize,
    sub_height: usize,
    width: usize,
    height: usize,
) -> Vec<Vec<u8>> {
    let max_y_offset = height - BLOCK_SIZE;
    let max_x_offset = width - BLOCK_SIZE;
    let mut black_points = vec![vec![0u8; sub_width]; sub_height];

    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);

            let mut sum = 0u32;
            let mut min = u8::MAX;
            let mut max = u8::MIN;
            for yy in 0..BLOCK_SIZE {
                let start = (y_offset + yy) * width + x_offset;
                for &pixel in &gray[start..start + BLOCK_SIZE] {
                    sum += pixel as u32;
                    min = min.min(pixel);
                    max = max.max(pixel);
                }
            }

            let mut average = (sum >> (2 * BLOCK_SIZE_POWER)) as u8;
            if (max - min) as u32 <= MIN_DYNAMIC_RANGE {
                // Flat block: assume it is background unless the neighbours
                // suggest it lies inside a dark area
                average = min / 2;
                if y > 0 && x > 0 {
                    let neighbours = (black_points[y - 1][x] as u32
                        + 2 * black_points[y][x - 1] as u32
                        + black_points[y - 1][x - 1] as u32)
                        / 4;
                    if (min as u32) < neighbours {
                        average = neighbours as u8;
                    }
                }
            }
            black_points[y][x] = average;
        }
    }

    black_points
}

/// Convert grayscale image to binary using Otsu's thresholding method
/// Returns a BitMatrix where true = black, false = white
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let threshold = calculate_otsu_threshold(gray);
    threshold_binarize(gray, width, height, threshold)
}

/// Otsu's optimal threshold from a cumulative histogram
fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut below_count = 0f64;
    let mut below_sum = 0f64;
    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    // Pixels strictly below `threshold` form the dark class
    for threshold in 1..=255usize {
        below_count += histogram[threshold - 1] as f64;
        below_sum += (threshold - 1) as f64 * histogram[threshold - 1] as f64;
        let above_count = total - below_count;
        if below_count == 0.0 || above_count == 0.0 {
            continue;
        }

        let below_mean = below_sum / below_count;
        let above_mean = (total_sum - below_sum) / above_count;
        let variance = below_count * above_count * (below_mean - above_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    BitMatrix::from_fn(width, height, |x, y| {
        gray.get(y * width + x).is_some_and(|&p| p < threshold)
    })
}
