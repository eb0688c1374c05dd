//! Colored terminal output

use std::io::Write;

use anyhow::{Context, Result};
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::Row;
use crate::rowset::RowSet;

use super::OutputFormatter;

/// Terminal output: a colored title and a boxed table per RowSet
pub struct TerminalOutput {
    title_color: Color,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            title_color: Color::Cyan,
        }
    }

    fn write_title(&self, row_set: &RowSet, writer: &mut dyn WriteColor) -> Result<()> {
        writer.set_color(ColorSpec::new().set_bold(true).set_fg(Some(self.title_color)))?;
        write!(writer, "{}", row_set.name())?;
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_rows(
        &self,
        row_set: &RowSet,
        rows: &[Row],
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            writeln!(writer, "(no rows)")?;
            return Ok(());
        }

        let types = row_set.column_types().unwrap_or(&[]);
        let header: Vec<String> = (0..width)
            .map(|index| {
                let label = rows
                    .iter()
                    .find_map(|row| row.get(index).and_then(|c| c.column.clone()))
                    .unwrap_or_else(|| index.to_string());
                match types.get(index) {
                    Some(cell_type) => format!("{}\n{}", label, cell_type),
                    None => label,
                }
            })
            .collect();

        let mut builder = Builder::default();
        builder.push_record(header);
        for row in rows {
            let mut record: Vec<String> = row.iter().map(|c| c.value.to_string()).collect();
            record.resize(width, String::new());
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        writeln!(writer, "{}", table)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(
        &self,
        row_set: &RowSet,
        limit: Option<usize>,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        self.write_title(row_set, writer)?;

        let rows: Vec<Row> = row_set
            .iter()
            .and_then(|rows| rows.take(limit.unwrap_or(usize::MAX)).collect())
            .with_context(|| format!("Failed to read {}", row_set))?;

        self.write_rows(row_set, &rows, writer)?;
        writeln!(writer, "{} row(s)", rows.len())?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;
    use crate::rowset::MemorySource;
    use termcolor::Buffer;

    fn render(row_set: &RowSet) -> String {
        let mut buffer = Buffer::no_color();
        TerminalOutput::new().render(row_set, None, &mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_renders_labels_types_and_values() {
        let source = MemorySource::new(vec![vec!["ann", "31"], vec!["bo"]]);
        let mut row_set = RowSet::new("people", source);
        row_set.set_column_headers(["name"]);
        row_set.set_column_types(vec![CellType::String, CellType::Integer]);

        let out = render(&row_set);
        assert!(out.starts_with("people\n"));
        assert!(out.contains("name"));
        assert!(out.contains("column_1"));
        assert!(out.contains("integer"));
        assert!(out.contains("31"));
        assert!(out.ends_with("2 row(s)\n\n"));
    }

    #[test]
    fn test_empty_table() {
        let row_set = RowSet::new("empty", MemorySource::default());
        let out = render(&row_set);
        assert!(out.contains("(no rows)"));
        assert!(out.contains("0 row(s)"));
    }
}
