//! Cells and rows

use serde::{Deserialize, Serialize};

use super::types::CellType;
use super::value::CellValue;

/// One observed value plus its interpreted meaning.
///
/// `value`, `column` and `cell_type` are rewritten in place as a row flows
/// through the casting and header-binding stages of a
/// [`RowSet`](crate::rowset::RowSet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    /// Column label, unset until header-bound
    pub column: Option<String>,
    /// The label was synthesized rather than supplied
    pub column_autogenerated: bool,
    #[serde(rename = "type")]
    pub cell_type: CellType,
}

/// An ordered sequence of cells, one per column position.
pub type Row = Vec<Cell>;

impl Cell {
    /// Create an unlabeled cell of the default string type
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self::with_type(value, CellType::default())
    }

    /// Create an unlabeled cell with an explicit type
    pub fn with_type(value: impl Into<CellValue>, cell_type: CellType) -> Self {
        Self {
            value: value.into(),
            column: None,
            column_autogenerated: false,
            cell_type,
        }
    }

    /// Placeholder holding the missing value
    pub fn missing() -> Self {
        Self::new(CellValue::Null)
    }

    /// Attach a column label
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// True for the missing value or a value whose text is all whitespace
    pub fn is_empty(&self) -> bool {
        match &self.value {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            other => other.display().trim().is_empty(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::missing()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "Cell({}={}:{})", column, self.cell_type, self.value),
            None => write!(f, "Cell({}:{})", self.cell_type, self.value),
        }
    }
}

/// Build a row of default-typed cells from raw values
pub fn row_from_values<I, V>(values: I) -> Row
where
    I: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    values.into_iter().map(Cell::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_type_is_string() {
        let cell = Cell::new(42i64);
        assert_eq!(cell.cell_type, CellType::String);
        assert_eq!(cell.column, None);
        assert!(!cell.column_autogenerated);
    }

    #[test]
    fn test_empty() {
        assert!(Cell::missing().is_empty());
        assert!(Cell::new("").is_empty());
        assert!(Cell::new("   ").is_empty());
        assert!(!Cell::new("0").is_empty());
        assert!(!Cell::new(0i64).is_empty());
        assert!(!Cell::new("x").is_empty());
        assert!(!Cell::new(false).is_empty());
    }

    #[test]
    fn test_display() {
        let cell = Cell::with_type(1i64, CellType::Integer).with_column("id");
        assert_eq!(cell.to_string(), "Cell(id=integer:1)");
        assert_eq!(Cell::new("a").to_string(), "Cell(string:a)");
    }
}
