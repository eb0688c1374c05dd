//! JSON lines output format

use std::io::Write;

use anyhow::{Context, Result};
use termcolor::WriteColor;

use crate::error::Error;
use crate::model::CellValue;
use crate::rowset::RowSet;

use super::OutputFormatter;

/// One JSON document per row: an object keyed by column when headers are
/// bound, otherwise an array of values.
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(
        &self,
        row_set: &RowSet,
        limit: Option<usize>,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let limit = limit.unwrap_or(usize::MAX);
        match row_set.dicts() {
            Ok(dicts) => {
                for dict in dicts.take(limit) {
                    let dict = dict.with_context(|| format!("Failed to read {}", row_set))?;
                    serde_json::to_writer(&mut *writer, &dict)?;
                    writeln!(writer)?;
                }
            }
            Err(Error::NoColumnHeaders) => {
                let rows = row_set
                    .iter()
                    .with_context(|| format!("Failed to read {}", row_set))?;
                for row in rows.take(limit) {
                    let row = row.with_context(|| format!("Failed to read {}", row_set))?;
                    let values: Vec<&CellValue> = row.iter().map(|c| &c.value).collect();
                    serde_json::to_writer(&mut *writer, &values)?;
                    writeln!(writer)?;
                }
            }
            Err(err) => return Err(err).with_context(|| format!("Failed to read {}", row_set)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;
    use crate::rowset::MemorySource;
    use termcolor::Buffer;

    fn render(row_set: &RowSet, limit: Option<usize>) -> String {
        let mut buffer = Buffer::no_color();
        JsonOutput::new().render(row_set, limit, &mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_objects_with_headers() {
        let mut row_set = RowSet::new("t", MemorySource::new(vec![vec!["1", "a"], vec!["2", "b"]]));
        row_set.set_column_headers(["n", "s"]);
        row_set.set_column_types(vec![CellType::Integer]);
        assert_eq!(
            render(&row_set, None),
            "{\"n\":1,\"s\":\"a\"}\n{\"n\":2,\"s\":\"b\"}\n"
        );
    }

    #[test]
    fn test_arrays_without_headers() {
        let row_set = RowSet::new("t", MemorySource::new(vec![vec!["1", ""], vec!["2", "b"]]));
        assert_eq!(render(&row_set, Some(1)), "[\"1\",\"\"]\n");
    }
}
