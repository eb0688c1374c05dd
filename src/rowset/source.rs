//! Raw row sources backing a RowSet

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Cell, CellValue, Row};

/// Lazy, finite, forward-only sequence of raw rows.
pub type RawRows<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Capability that produces raw rows for a [`RowSet`](super::RowSet).
///
/// Whether a second call to `raw` re-reads the data is declared per source
/// through `restartable`.
pub trait RowSource {
    /// Start a pass over the raw rows
    fn raw(&self) -> Result<RawRows<'_>>;

    /// True if every call to `raw` yields the full data again
    fn restartable(&self) -> bool;

    /// Leading raw rows, without using up the next pass if possible.
    ///
    /// A single-pass source may stop short at a source error and report it
    /// on the next pass instead.
    fn sample(&self, size: usize) -> Result<Vec<Row>> {
        self.raw()?.take(size).collect()
    }
}

/// Restartable in-memory rows. Each pass builds fresh cells.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<Vec<CellValue>>,
}

impl MemorySource {
    pub fn new<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for MemorySource {
    fn raw(&self) -> Result<RawRows<'_>> {
        Ok(Box::new(self.rows.iter().map(|values| {
            Ok(values.iter().cloned().map(Cell::new).collect())
        })))
    }

    fn restartable(&self) -> bool {
        true
    }
}

/// Single-pass source over any row iterator.
///
/// Rows pulled by [`RowSource::sample`] are kept in a window and replayed at
/// the start of the pass. An error hit while sampling ends the sample early
/// and is replayed right after the window, at its original position. Once
/// the pass has started the source is consumed.
pub struct StreamSource<I> {
    state: RefCell<StreamState<I>>,
}

struct StreamState<I> {
    rows: Option<I>,
    window: Vec<Row>,
    pending: Option<Error>,
}

impl<I> StreamSource<I>
where
    I: Iterator<Item = Result<Row>>,
{
    pub fn new(rows: I) -> Self {
        Self {
            state: RefCell::new(StreamState {
                rows: Some(rows),
                window: Vec::new(),
                pending: None,
            }),
        }
    }

    /// True once a pass has taken the underlying iterator
    pub fn is_consumed(&self) -> bool {
        self.state.borrow().rows.is_none()
    }
}

impl<I> RowSource for StreamSource<I>
where
    I: Iterator<Item = Result<Row>>,
{
    fn raw(&self) -> Result<RawRows<'_>> {
        let mut state = self.state.borrow_mut();
        let Some(rows) = state.rows.take() else {
            warn!("attempted to re-read a single-pass row source");
            return Err(Error::SourceConsumed);
        };
        let window = std::mem::take(&mut state.window);
        let pending = state.pending.take();
        Ok(Box::new(
            window
                .into_iter()
                .map(Ok)
                .chain(pending.map(Err))
                .chain(rows),
        ))
    }

    fn restartable(&self) -> bool {
        false
    }

    fn sample(&self, size: usize) -> Result<Vec<Row>> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let rows = state.rows.as_mut().ok_or(Error::SourceConsumed)?;
        while state.pending.is_none() && state.window.len() < size {
            match rows.next() {
                Some(Ok(row)) => state.window.push(row),
                Some(Err(err)) => {
                    debug!(%err, sampled = state.window.len(), "sample stopped at source error");
                    state.pending = Some(err);
                }
                None => break,
            }
        }
        Ok(state.window.iter().take(size).cloned().collect())
    }
}
