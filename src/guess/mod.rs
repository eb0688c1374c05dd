//! Header and type guessing from sample rows

mod headers;
mod types;

use tracing::debug;

use crate::config::{Config, HeaderMode};
use crate::error::Result;
use crate::model::CellType;
use crate::rowset::RowSet;

pub use headers::{column_count_modal, headers_guess};
pub use types::type_guess;

/// Rows a header may lag behind the modal row width
pub const HEADER_TOLERANCE: usize = 1;

/// Configure offset, headers and (optionally) column types on a RowSet.
///
/// A single sample of `config.window` raw rows drives both guesses, so
/// single-pass sources are not consumed.
pub fn prepare(row_set: &mut RowSet, config: &Config) -> Result<()> {
    let base = config.row_offset.unwrap_or(0);
    let needs_sample = matches!(config.headers, HeaderMode::Guess) || config.guess_types;
    let sample = if needs_sample {
        row_set.sample(base + config.window)?
    } else {
        Vec::new()
    };
    let sample = sample.get(base..).unwrap_or(&[]);

    let mut offset = base;
    match &config.headers {
        HeaderMode::Guess => {
            if let Some((index, headers)) = headers_guess(sample, HEADER_TOLERANCE) {
                debug!(table = %row_set.name, row = base + index, ?headers, "guessed header row");
                offset = base + index + 1;
                row_set.set_column_headers(headers);
            } else {
                debug!(table = %row_set.name, "no header row found");
            }
        }
        HeaderMode::Explicit(headers) => row_set.set_column_headers(headers.iter().cloned()),
        HeaderMode::None => {}
    }
    if offset > 0 {
        row_set.set_row_offset(offset);
    }

    if config.guess_types {
        let body = sample.get(offset - base..).unwrap_or(&[]);
        let types = type_guess(body, &CellType::guess_candidates(), config.strict_types);
        debug!(table = %row_set.name, types = %display_types(&types), "guessed column types");
        row_set.set_column_types(types);
    }

    Ok(())
}

fn display_types(types: &[CellType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
