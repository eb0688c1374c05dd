//! Data model for typed, labeled cells

mod cell;
mod types;
mod value;

pub use cell::{row_from_values, Cell, Row};
pub use types::{CellType, ISO_DATE};
pub use value::CellValue;
