pub mod data_matrix;
pub mod matrix;
pub mod point;
pub mod symbol;

pub use data_matrix::{DataMatrix, StructuredAppend};
pub use matrix::BitMatrix;
pub use point::Point;
pub use symbol::SymbolVersion;
