//! Format-specific TableSets and format detection

mod csv;
mod excel;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::tableset::TableSet;

pub use self::csv::{sniff_delimiter, CsvFileSource, CsvTableSet, DEFAULT_TABLE_NAME};
pub use self::excel::{SheetSource, WorkbookTableSet};

/// Supported tabular container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Workbook,
}

impl Format {
    /// Check if a file extension belongs to a known format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" | "tsv" | "txt" | "psv" => Some(Format::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Format::Workbook),
            _ => None,
        }
    }

    /// Detect the format from leading bytes. Binary content that is not a
    /// known workbook container gives `None`.
    pub fn sniff(head: &[u8]) -> Option<Self> {
        // ZIP containers (xlsx, ods) and OLE compound files (xls)
        if head.starts_with(b"PK\x03\x04") || head.starts_with(b"\xD0\xCF\x11\xE0") {
            Some(Format::Workbook)
        } else if head.contains(&0) {
            None
        } else {
            Some(Format::Csv)
        }
    }

    /// Detect the format of a file by content
    pub fn detect(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        Self::sniff(reader.fill_buf()?)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }

    /// Format of `path`, by extension first and content second
    pub fn for_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
        {
            Some(format) => Ok(format),
            None => Self::detect(path),
        }
    }
}

/// Open a file as the TableSet matching its format
pub fn open(path: &Path, config: &Config) -> Result<Box<dyn TableSet>> {
    Ok(match Format::for_path(path)? {
        Format::Csv => Box::new(CsvTableSet::from_path(path, config)?),
        Format::Workbook => Box::new(WorkbookTableSet::from_path(path, config)?),
    })
}

/// Read a TableSet of the given format from an open byte source
pub fn from_reader<R: Read + 'static>(
    reader: R,
    format: Format,
    config: &Config,
) -> Result<Box<dyn TableSet>> {
    Ok(match format {
        Format::Csv => Box::new(CsvTableSet::from_reader(reader, config)?),
        Format::Workbook => Box::new(WorkbookTableSet::from_reader(reader, config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("CSV"), Some(Format::Csv));
        assert_eq!(Format::from_extension("ods"), Some(Format::Workbook));
        assert_eq!(Format::from_extension("parquet"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(Format::sniff(b"PK\x03\x04rest"), Some(Format::Workbook));
        assert_eq!(Format::sniff(b"\xD0\xCF\x11\xE0"), Some(Format::Workbook));
        assert_eq!(Format::sniff(b"a,b\n"), Some(Format::Csv));
        assert_eq!(Format::sniff(b""), Some(Format::Csv));
        assert_eq!(Format::sniff(b"PAR1\x00\x15"), None);
    }

    #[test]
    fn test_open_without_extension_sniffs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();
        let tables = open(file.path(), &Config::default()).unwrap();
        assert_eq!(tables.tables().len(), 1);
        assert_eq!(tables.tables()[0].iter().unwrap().count(), 2);
    }

    #[test]
    fn test_unknown_extension_sniffs() {
        let mut file = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
        write!(file, "a;b\n1;2\n").unwrap();
        assert_eq!(Format::for_path(file.path()).unwrap(), Format::Csv);
        let tables = open(file.path(), &Config::default()).unwrap();
        assert_eq!(tables.tables()[0].iter().unwrap().count(), 2);
    }

    #[test]
    fn test_binary_content_is_unsupported() {
        let mut file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        file.write_all(b"PAR1\x00\x15\x04").unwrap();
        let err = open(file.path(), &Config::default()).err().unwrap();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_unknown_extension_missing_file() {
        let err = open(Path::new("/missing/data.dat"), &Config::default()).err().unwrap();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_from_reader_streams_csv() {
        let data = std::io::Cursor::new(b"x;y\n".to_vec());
        let mut tables = from_reader(data, Format::Csv, &Config::default()).unwrap();
        let row_set = tables.table_mut(DEFAULT_TABLE_NAME).unwrap();
        row_set.set_column_headers(["x", "y"]);
        assert_eq!(row_set.dicts().unwrap().count(), 1);
    }
}
