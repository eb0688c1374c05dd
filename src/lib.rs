//! rowpipe - Lazy, format-agnostic row pipeline for messy tabular data
//!
//! A [`RowSet`] turns raw rows from any source into typed, labeled cells by
//! applying offset skipping, best-effort type casting and header binding on
//! every pass. A [`TableSet`] groups the RowSets found in one source, such as
//! the sheets of a workbook.

pub mod config;
pub mod error;
pub mod guess;
pub mod model;
pub mod output;
pub mod parser;
pub mod rowset;
pub mod tableset;

pub use config::Config;
pub use error::{CastError, Error, Result};
pub use model::{Cell, CellType, CellValue, Row};
pub use rowset::{RowSet, RowSource};
pub use tableset::TableSet;
