//! Data Matrix detection modules
//!
//! This module contains all the logic for locating symbols in a binary image:
//! - Connected dark regions (symbol candidates)
//! - L-finder detection and orientation
//! - Symbol size estimation from the clock tracks
//! - Module grid sampling through a perspective transform

/// Dark region labeling and filtering
pub mod connected_components;
/// L-finder detection and orientation
pub mod finder;
/// Size estimation and grid sampling
pub mod sampling;

pub use finder::{FinderDetector, FinderOptions, SymbolCorners};
pub use sampling::{SizeEstimate, rank_versions, sample_grid};
