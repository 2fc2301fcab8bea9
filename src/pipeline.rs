//! Search strategy: binarize, locate, sample and decode until a symbol reads.
//!
//! A normal search is a single pass over the hybrid-binarized image. Trying
//! harder adds a global threshold, axis-aligned quads, mirrored symbols,
//! runner-up sizes, a sharpened copy and downscaled copies, in that order.
//! A full search runs every attempt and keeps each distinct symbol.
use std::borrow::Cow;

use crate::config::ReaderConfig;
use crate::decoder::{DecodedSymbol, decode_symbol};
use crate::detector::{FinderDetector, FinderOptions, SymbolCorners, rank_versions, sample_grid};
use crate::error::DecodeError;
use crate::models::{BitMatrix, SymbolVersion};
use crate::utils::binarization::{hybrid_binarize, otsu_binarize};
use crate::utils::grayscale::LuminanceImage;

/// Downscaled copies smaller than this on either side are skipped
const MIN_SCALED_DIMENSION: usize = 40;

/// A symbol that decoded, with where it was found
#[derive(Debug)]
pub(crate) struct Located {
    pub decoded: DecodedSymbol,
    pub version: &'static SymbolVersion,
    /// In the coordinates of the input image
    pub corners: SymbolCorners,
}

impl Located {
    fn scaled(mut self, factor: f32) -> Self {
        self.corners = self.corners.scaled(factor);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Original,
    Sharpened,
    Downscaled(u32),
}

impl Variant {
    fn render<'a>(&self, image: &'a LuminanceImage) -> Option<(f32, Cow<'a, LuminanceImage>)> {
        match *self {
            Variant::Original => Some((1.0, Cow::Borrowed(image))),
            Variant::Sharpened => Some((1.0, Cow::Owned(image.sharpened()?))),
            Variant::Downscaled(divisor) => {
                let d = divisor as usize;
                if image.width() / d < MIN_SCALED_DIMENSION
                    || image.height() / d < MIN_SCALED_DIMENSION
                {
                    return None;
                }
                Some((divisor as f32, Cow::Owned(image.downscaled(divisor)?)))
            }
        }
    }
}

fn variants(config: &ReaderConfig) -> Vec<Variant> {
    let mut variants = vec![Variant::Original];
    if config.sharpen {
        variants.push(Variant::Sharpened);
    }
    variants.extend(config.downscales.iter().map(|&d| Variant::Downscaled(d)));
    variants
}

/// Finder and sizing switches for one sweep over the binarized images
#[derive(Debug, Clone, Copy)]
struct Pass {
    finder: FinderOptions,
    max_versions: usize,
}

fn passes(config: &ReaderConfig) -> Vec<Pass> {
    let basic = FinderOptions {
        max_candidates: config.max_candidates,
        min_darkness: config.min_finder_darkness,
        axis_quads: false,
        mirrored: false,
    };
    let mut passes = vec![Pass {
        finder: basic,
        max_versions: 1,
    }];
    if config.axis_quads || config.mirrored || config.max_versions > 1 {
        passes.push(Pass {
            finder: FinderOptions {
                axis_quads: config.axis_quads,
                mirrored: config.mirrored,
                ..basic
            },
            max_versions: config.max_versions,
        });
    }
    passes
}

/// Tracks the failure that got furthest through the pipeline
struct Attempts {
    furthest: DecodeError,
    tried: usize,
}

impl Attempts {
    fn new() -> Self {
        Self {
            furthest: DecodeError::NotFound,
            tried: 0,
        }
    }

    fn record(&mut self, error: DecodeError) {
        self.tried += 1;
        if error.stage() > self.furthest.stage() {
            self.furthest = error;
        }
    }
}

/// Candidate corners on one binarized variant
struct Outline<'a> {
    binary: &'a BitMatrix,
    corners: SymbolCorners,
    /// Maps variant coordinates back to the input image
    scale: f32,
}

/// Symbols decoded so far. A single search stops at the first one, a full
/// search keeps going and skips outlines that fall on a symbol it already
/// has.
struct Found {
    all: bool,
    symbols: Vec<Located>,
}

impl Found {
    fn new(all: bool) -> Self {
        Self {
            all,
            symbols: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        !self.all && !self.symbols.is_empty()
    }

    /// Whether the centre of `corners` lies inside a decoded symbol
    fn covers(&self, corners: &SymbolCorners) -> bool {
        let centre = corners.centre();
        self.symbols.iter().any(|symbol| {
            let (left, top, right, bottom) = symbol.corners.bounds();
            (left..=right).contains(&centre.x) && (top..=bottom).contains(&centre.y)
        })
    }

    /// Try to decode `outline` unless it lies on a known symbol. Returns
    /// `true` once the search can stop.
    fn consider(
        &mut self,
        outline: Outline<'_>,
        config: &ReaderConfig,
        max_versions: usize,
        attempts: &mut Attempts,
    ) -> bool {
        if self.covers(&outline.corners.scaled(outline.scale)) {
            return false;
        }
        let decoded = try_outline(outline.binary, outline.corners, config, max_versions, attempts);
        if let Some(located) = decoded {
            self.add(located.scaled(outline.scale));
        }
        self.done()
    }

    /// Keep `located` unless a symbol with the same text is already kept
    fn add(&mut self, located: Located) {
        if self
            .symbols
            .iter()
            .any(|symbol| symbol.decoded.text == located.decoded.text)
        {
            log::trace!("duplicate symbol {:?}", located.decoded.text);
            return;
        }
        self.symbols.push(located);
    }
}

/// Find and decode the first readable symbol in `image`
pub(crate) fn decode_luminance(
    image: &LuminanceImage,
    config: &ReaderConfig,
) -> Result<Located, DecodeError> {
    let mut symbols = search(image, config, false)?;
    Ok(symbols.swap_remove(0))
}

/// Find and decode every readable symbol in `image`, one per distinct text,
/// in the order they were found
pub(crate) fn decode_all_luminance(
    image: &LuminanceImage,
    config: &ReaderConfig,
) -> Result<Vec<Located>, DecodeError> {
    search(image, config, true)
}

/// Never returns an empty list
fn search(
    image: &LuminanceImage,
    config: &ReaderConfig,
    all: bool,
) -> Result<Vec<Located>, DecodeError> {
    let mut attempts = Attempts::new();
    let mut found = Found::new(all);

    for variant in variants(config) {
        let Some((scale, scaled)) = variant.render(image) else {
            continue;
        };
        log::debug!(
            "{variant:?}: searching {}x{} image",
            scaled.width(),
            scaled.height()
        );
        search_image(&scaled, scale, config, &mut attempts, &mut found);
        if found.done() {
            break;
        }
    }

    if found.symbols.is_empty() {
        log::debug!(
            "no symbol after {} decode attempts: {}",
            attempts.tried,
            attempts.furthest
        );
        return Err(attempts.furthest);
    }
    Ok(found.symbols)
}

/// Search one image variant; `scale` maps its coordinates back to the input
fn search_image(
    image: &LuminanceImage,
    scale: f32,
    config: &ReaderConfig,
    attempts: &mut Attempts,
    found: &mut Found,
) {
    let (width, height) = (image.width(), image.height());
    let mut binaries = vec![("hybrid", hybrid_binarize(image.pixels(), width, height))];
    if config.global_binarizer {
        binaries.push(("otsu", otsu_binarize(image.pixels(), width, height)));
    }

    if config.pure_barcode {
        for (_, binary) in &binaries {
            if let Some(corners) = FinderDetector::pure_symbol(binary) {
                let outline = Outline { binary, corners, scale };
                if found.consider(outline, config, config.max_versions, attempts) {
                    return;
                }
            }
        }
    }

    for pass in passes(config) {
        for (name, binary) in &binaries {
            let outlines = FinderDetector::detect(binary, &pass.finder);
            log::trace!("{name}: {} outlines", outlines.len());
            for corners in outlines {
                let outline = Outline { binary, corners, scale };
                if found.consider(outline, config, pass.max_versions, attempts) {
                    return;
                }
            }
        }
    }
}

fn try_outline(
    binary: &BitMatrix,
    corners: SymbolCorners,
    config: &ReaderConfig,
    max_versions: usize,
    attempts: &mut Attempts,
) -> Option<Located> {
    let sizes = rank_versions(binary, &corners, config.min_clock_agreement);
    for estimate in sizes.iter().take(max_versions) {
        let Some(grid) = sample_grid(binary, &corners, estimate.version) else {
            continue;
        };
        match decode_symbol(&grid, estimate.version) {
            Ok(decoded) => {
                log::debug!(
                    "decoded {}x{} symbol at ({:.1}, {:.1})",
                    estimate.version.rows,
                    estimate.version.cols,
                    corners.bottom_left.x,
                    corners.bottom_left.y
                );
                return Some(Located {
                    decoded,
                    version: estimate.version,
                    corners,
                });
            }
            Err(error) => {
                log::trace!(
                    "{}x{} failed: {error}",
                    estimate.version.rows,
                    estimate.version.cols
                );
                attempts.record(error);
            }
        }
    }
    None
}
