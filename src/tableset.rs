//! Collections of named RowSets read from one source

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::rowset::RowSet;

/// A set of tables bundled in one source, such as the sheets of a workbook.
///
/// Each format provides its own implementation. Single-table formats hold
/// exactly one RowSet.
pub trait TableSet {
    /// Read a table set from an open byte source
    fn from_reader<R: Read + 'static>(reader: R, config: &Config) -> Result<Self>
    where
        Self: Sized;

    /// Read a table set from a file
    fn from_path(path: &Path, config: &Config) -> Result<Self>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, config)
    }

    /// Tables in source order
    fn tables(&self) -> &[RowSet];

    fn tables_mut(&mut self) -> &mut [RowSet];

    /// Look up a table by name
    fn table(&self, name: &str) -> Option<&RowSet> {
        self.tables().iter().find(|t| t.name() == name)
    }

    fn table_mut(&mut self, name: &str) -> Option<&mut RowSet> {
        self.tables_mut().iter_mut().find(|t| t.name() == name)
    }

    /// Table names in source order
    fn table_names(&self) -> Vec<&str> {
        self.tables().iter().map(RowSet::name).collect()
    }
}
