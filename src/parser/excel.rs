//! Spreadsheet workbooks (xlsx, xls, xlsb, ods)

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Cell, CellType, CellValue, Row};
use crate::rowset::{RawRows, RowSet, RowSource};
use crate::tableset::TableSet;

/// Every sheet of a workbook, one RowSet each, in workbook order
pub struct WorkbookTableSet {
    tables: Vec<RowSet>,
}

/// Restartable source over a decoded sheet
pub struct SheetSource {
    range: Range<Data>,
}

impl SheetSource {
    pub fn new(range: Range<Data>) -> Self {
        Self { range }
    }
}

impl RowSource for SheetSource {
    fn raw(&self) -> Result<RawRows<'_>> {
        Ok(Box::new(
            self.range
                .rows()
                .map(|row| Ok(row.iter().map(convert_cell).collect::<Row>())),
        ))
    }

    fn restartable(&self) -> bool {
        true
    }
}

impl WorkbookTableSet {
    fn from_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>) -> Result<Self> {
        let names = workbook.sheet_names();
        if names.is_empty() {
            return Err(Error::EmptyWorkbook);
        }

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name)?;
            debug!(sheet = %name, size = ?range.get_size(), "loaded sheet");
            tables.push(RowSet::new(name, SheetSource::new(range)));
        }
        Ok(Self { tables })
    }
}

impl TableSet for WorkbookTableSet {
    /// Workbook containers need random access, so the reader is buffered
    /// in memory before decoding.
    fn from_reader<R: Read + 'static>(mut reader: R, _config: &Config) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_workbook(open_workbook_auto_from_rs(Cursor::new(bytes))?)
    }

    fn from_path(path: &Path, _config: &Config) -> Result<Self> {
        Self::from_workbook(open_workbook_auto(path)?)
    }

    fn tables(&self) -> &[RowSet] {
        &self.tables
    }

    fn tables_mut(&mut self) -> &mut [RowSet] {
        &mut self.tables
    }
}

/// Raw spreadsheet cell, typed by what the workbook stored
fn convert_cell(cell: &Data) -> Cell {
    let value = convert_value(cell);
    let cell_type = CellType::of(&value);
    Cell::with_type(value, cell_type)
}

fn convert_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::from(s.clone()),
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(ref dt) => {
            // calamine ExcelDateTime - use Display to convert and parse
            let s = format!("{}", dt);
            if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(datetime) =
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
            {
                CellValue::DateTime(datetime)
            } else if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                CellValue::Date(date)
            } else {
                CellValue::from(s)
            }
        }
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::from(s.clone())
            }
        }
        Data::DurationIso(s) => CellValue::from(s.clone()),
        Data::Error(e) => CellValue::from(format!("#{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Range<Data> {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("name".into()));
        range.set_value((0, 1), Data::String("score".into()));
        range.set_value((1, 0), Data::String("ann".into()));
        range.set_value((1, 1), Data::Float(3.0));
        range.set_value((2, 0), Data::String("bo".into()));
        range.set_value((2, 1), Data::Float(2.5));
        range
    }

    #[test]
    fn test_convert_value() {
        assert_eq!(convert_value(&Data::Empty), CellValue::Null);
        assert_eq!(convert_value(&Data::Float(4.0)), CellValue::Int(4));
        assert_eq!(convert_value(&Data::Float(4.5)), CellValue::Float(4.5));
        assert_eq!(convert_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            convert_value(&Data::DateTimeIso("2024-05-06".into())),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 5, 6).unwrap())
        );
    }

    #[test]
    fn test_native_types_are_kept() {
        let cell = convert_cell(&Data::Float(1.25));
        assert_eq!(cell.cell_type, CellType::Float);
        let cell = convert_cell(&Data::String(" ".into()));
        assert_eq!(cell.cell_type, CellType::String);
        assert!(cell.is_empty());
    }

    #[test]
    fn test_sheet_source_through_pipeline() {
        let mut row_set = RowSet::new("Sheet1", SheetSource::new(sheet()));
        assert!(row_set.restartable());
        row_set.set_row_offset(1);
        row_set.set_column_headers(["name", "score"]);

        let dicts: Vec<_> = row_set.dicts().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(dicts.len(), 2);
        assert_eq!(dicts[0]["score"], CellValue::Int(3));
        assert_eq!(dicts[1]["score"], CellValue::Float(2.5));
        // Restartable: a second pass sees the same rows
        assert_eq!(row_set.dicts().unwrap().count(), 2);
    }

    #[test]
    fn test_invalid_workbook_bytes() {
        let data = Cursor::new(b"definitely not a workbook".to_vec());
        assert!(WorkbookTableSet::from_reader(data, &Config::default()).is_err());
    }
}
