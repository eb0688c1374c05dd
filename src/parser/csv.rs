//! Delimited text tables

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Cell, CellValue, Row};
use crate::rowset::{RawRows, RowSet, RowSource, StreamSource};
use crate::tableset::TableSet;

/// Delimiters tried when none is configured, in order of preference
const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Leading lines inspected when sniffing the delimiter
const SNIFF_LINES: usize = 20;

/// Table name used for sources that have no file name
pub const DEFAULT_TABLE_NAME: &str = "table";

/// A delimited text file holding a single table
pub struct CsvTableSet {
    tables: Vec<RowSet>,
}

/// Reader settings resolved once per source
#[derive(Debug, Clone, Copy)]
struct Dialect {
    delimiter: u8,
    quote: u8,
}

impl Dialect {
    fn reader<R: Read>(&self, reader: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .from_reader(reader)
    }
}

/// Restartable source that re-opens its file for every pass
pub struct CsvFileSource {
    path: PathBuf,
    dialect: Dialect,
}

impl RowSource for CsvFileSource {
    fn raw(&self) -> Result<RawRows<'_>> {
        let file = File::open(&self.path).map_err(|source| Error::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(records(self.dialect.reader(BufReader::new(file))))
    }

    fn restartable(&self) -> bool {
        true
    }
}

impl CsvTableSet {
    /// The single table
    pub fn row_set(&self) -> &RowSet {
        &self.tables[0]
    }

    pub fn into_row_set(mut self) -> RowSet {
        self.tables.remove(0)
    }
}

impl TableSet for CsvTableSet {
    /// Stream from any reader. The resulting RowSet is single-pass.
    fn from_reader<R: Read + 'static>(reader: R, config: &Config) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let dialect = resolve_dialect(&mut reader, config)?;
        let source = StreamSource::new(records(dialect.reader(reader)));
        Ok(Self {
            tables: vec![RowSet::new(DEFAULT_TABLE_NAME, source)],
        })
    }

    /// Open a file. The resulting RowSet re-reads the file on every pass.
    fn from_path(path: &Path, config: &Config) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let dialect = resolve_dialect(&mut BufReader::new(file), config)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_TABLE_NAME)
            .to_string();
        let source = CsvFileSource {
            path: path.to_path_buf(),
            dialect,
        };
        Ok(Self {
            tables: vec![RowSet::new(name, source)],
        })
    }

    fn tables(&self) -> &[RowSet] {
        &self.tables
    }

    fn tables_mut(&mut self) -> &mut [RowSet] {
        &mut self.tables
    }
}

fn resolve_dialect<R: Read>(reader: &mut BufReader<R>, config: &Config) -> Result<Dialect> {
    let delimiter = match config.delimiter {
        Some(delimiter) => delimiter,
        None => {
            let delimiter = sniff_delimiter(reader.fill_buf()?);
            debug!(delimiter = %char::from(delimiter), "sniffed delimiter");
            delimiter
        }
    };
    Ok(Dialect {
        delimiter,
        quote: config.quote,
    })
}

/// Pick the candidate delimiter that splits the leading lines of `head`
/// most consistently, ignoring quoted text. Lines without any candidate,
/// such as a title above the table, do not count. Defaults to a comma.
pub fn sniff_delimiter(head: &[u8]) -> u8 {
    let per_line: Vec<[usize; CANDIDATE_DELIMITERS.len()]> = head
        .split(|&b| b == b'\n')
        .take(SNIFF_LINES)
        .map(count_candidates)
        .filter(|counts| counts.iter().any(|&n| n > 0))
        .collect();

    let mut best = 0;
    let mut best_score = (0, 0);
    for i in 0..CANDIDATE_DELIMITERS.len() {
        let mut frequency: FxHashMap<usize, usize> = FxHashMap::default();
        for counts in per_line.iter().filter(|counts| counts[i] > 0) {
            *frequency.entry(counts[i]).or_insert(0) += 1;
        }
        // (lines sharing the modal count, modal count)
        let score = frequency
            .into_iter()
            .map(|(count, lines)| (lines, count))
            .max()
            .unwrap_or((0, 0));
        if score > best_score {
            best = i;
            best_score = score;
        }
    }
    CANDIDATE_DELIMITERS[best]
}

fn count_candidates(line: &[u8]) -> [usize; CANDIDATE_DELIMITERS.len()] {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for &byte in line {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == byte) {
                counts[i] += 1;
            }
        }
    }
    counts
}

fn records<'a, R: Read + 'a>(reader: csv::Reader<R>) -> RawRows<'a> {
    Box::new(
        reader
            .into_byte_records()
            .map(|record| record.map(|r| convert_record(&r)).map_err(Error::from)),
    )
}

fn convert_record(record: &csv::ByteRecord) -> Row {
    record
        .iter()
        .map(|field| Cell::new(CellValue::from(String::from_utf8_lossy(field).into_owned())))
        .collect()
}
