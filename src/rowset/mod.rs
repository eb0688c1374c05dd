//! RowSet: one logical table and its offset, type and header pipeline

mod source;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::model::{Cell, CellType, CellValue, Row};

pub use source::{MemorySource, RawRows, RowSource, StreamSource};

/// Ordered column-name to value mapping produced by [`RowSet::dicts`]
pub type RowDict = IndexMap<String, CellValue>;

/// A named, iterable collection of rows from one tabular source.
///
/// Every pass applies, in order: offset skip, type casting (once types have
/// been set), and header binding (when headers are set). Each stage is a
/// no-op while its configuration is unset.
pub struct RowSet {
    /// Identifies this RowSet within its TableSet
    pub name: String,
    /// Leading raw rows discarded before the pipeline starts
    pub row_offset: Option<usize>,
    /// Column names bound to cells by position
    pub column_headers: Option<Vec<String>>,
    column_types: Option<Vec<CellType>>,
    typed: bool,
    source: Box<dyn RowSource>,
}

impl RowSet {
    /// Create an unconfigured RowSet over a raw row source
    pub fn new(name: impl Into<String>, source: impl RowSource + 'static) -> Self {
        Self {
            name: name.into(),
            row_offset: None,
            column_headers: None,
            column_types: None,
            typed: false,
            source: Box::new(source),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the type applied to each column position. Marks the RowSet typed,
    /// even for an empty list.
    pub fn set_column_types(&mut self, types: Vec<CellType>) {
        self.typed = true;
        self.column_types = Some(types);
    }

    pub fn column_types(&self) -> Option<&[CellType]> {
        self.column_types.as_deref()
    }

    /// True once column types have been set explicitly
    pub fn typed(&self) -> bool {
        self.typed
    }

    pub fn set_row_offset(&mut self, offset: usize) {
        self.row_offset = Some(offset);
    }

    pub fn set_column_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_headers = Some(headers.into_iter().map(Into::into).collect());
    }

    /// True if each pass re-reads the full source
    pub fn restartable(&self) -> bool {
        self.source.restartable()
    }

    /// Start an unfiltered pass over the backing source
    pub fn raw(&self) -> Result<RawRows<'_>> {
        self.source.raw()
    }

    /// Leading raw rows, before any offset, casting or header binding
    pub fn sample(&self, size: usize) -> Result<Vec<Row>> {
        self.source.sample(size)
    }

    /// Cast each cell with the column type at its position.
    ///
    /// Cells beyond the declared types are left untouched. A failed cast
    /// keeps the cell's value and type as they were.
    pub fn apply_types(&self, mut row: Row) -> Row {
        let Some(types) = &self.column_types else {
            return row;
        };
        for (index, (cell, cell_type)) in row.iter_mut().zip(types).enumerate() {
            match cell_type.cast(&cell.value) {
                Ok(value) => {
                    cell.value = value;
                    cell.cell_type = cell_type.clone();
                }
                Err(err) => {
                    trace!(table = %self.name, column = index, %err, "keeping uncast value");
                }
            }
        }
        row
    }

    /// Label cells with the configured headers, producing a new row.
    ///
    /// Rows shorter than the headers are padded with missing cells. A padded
    /// cell still takes the configured header and is not autogenerated. Only
    /// positions whose header is absent or empty get `column_<index>`.
    pub fn apply_headers(&self, row: Row) -> Row {
        let headers = self.column_headers.as_deref().unwrap_or(&[]);
        let width = row.len().max(headers.len());
        let mut cells = row.into_iter();

        (0..width)
            .map(|index| {
                let mut cell = cells.next().unwrap_or_else(Cell::missing);
                match headers.get(index) {
                    Some(header) if !header.is_empty() => {
                        cell.column = Some(header.clone());
                        cell.column_autogenerated = false;
                    }
                    _ => {
                        cell.column = Some(format!("column_{}", index));
                        cell.column_autogenerated = true;
                    }
                }
                cell
            })
            .collect()
    }

    /// Start a filtered pass. Configuration is read fresh for every pass.
    pub fn iter(&self) -> Result<Rows<'_>> {
        let raw = self.source.raw()?;
        debug!(
            table = %self.name,
            row_offset = ?self.row_offset,
            typed = self.typed,
            headers = self.column_headers.as_ref().map(Vec::len),
            "starting pass"
        );
        Ok(Rows {
            row_set: self,
            raw,
            skip: self.row_offset.unwrap_or(0),
            finished: false,
        })
    }

    /// Project each filtered row to an ordered column-name to value map.
    ///
    /// Fails before reading any row if no headers are configured. When two
    /// cells resolve to the same name the later one wins.
    pub fn dicts(&self) -> Result<Dicts<'_>> {
        match &self.column_headers {
            Some(headers) if !headers.is_empty() => {}
            _ => return Err(Error::NoColumnHeaders),
        }
        Ok(Dicts { rows: self.iter()? })
    }

    fn process(&self, mut row: Row) -> Row {
        if self.typed {
            row = self.apply_types(row);
        }
        if self.column_headers.is_some() {
            row = self.apply_headers(row);
        }
        row
    }
}

impl std::fmt::Debug for RowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSet")
            .field("name", &self.name)
            .field("row_offset", &self.row_offset)
            .field("column_headers", &self.column_headers)
            .field("column_types", &self.column_types)
            .field("typed", &self.typed)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for RowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RowSet({})", self.name)
    }
}

/// One pass over a [`RowSet`]. Stops after the first source error.
pub struct Rows<'a> {
    row_set: &'a RowSet,
    raw: RawRows<'a>,
    skip: usize,
    finished: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.skip > 0 {
            self.skip -= 1;
            match self.raw.next() {
                Some(Ok(_)) => {}
                Some(Err(err)) => return self.fail(err),
                None => return self.finish(),
            }
        }
        match self.raw.next() {
            Some(Ok(row)) => Some(Ok(self.row_set.process(row))),
            Some(Err(err)) => self.fail(err),
            None => self.finish(),
        }
    }
}

impl Rows<'_> {
    fn fail(&mut self, err: Error) -> Option<Result<Row>> {
        self.finished = true;
        Some(Err(err))
    }

    fn finish(&mut self) -> Option<Result<Row>> {
        self.finished = true;
        None
    }
}

/// Dict projection of one pass, see [`RowSet::dicts`]
pub struct Dicts<'a> {
    rows: Rows<'a>,
}

impl Iterator for Dicts<'_> {
    type Item = Result<RowDict>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err)),
        };
        Some(Ok(row
            .into_iter()
            .map(|cell| (cell.column.unwrap_or_default(), cell.value))
            .collect()))
    }
}
