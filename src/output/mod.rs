//! Rendering of prepared RowSets

mod json;
mod terminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::rowset::RowSet;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render up to `limit` rows of one table
    fn render(&self, row_set: &RowSet, limit: Option<usize>, writer: &mut dyn WriteColor)
        -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render tables to stdout
pub fn render_to_stdout<'a>(
    tables: impl IntoIterator<Item = &'a RowSet>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for row_set in tables {
        formatter.render(row_set, limit, &mut stdout)?;
    }
    Ok(())
}
