//! Row-level filtering on top of another scanner.

use bytes::Bytes;
use regex::bytes::Regex;

use super::{error::ScanError, InternalScanner};
use crate::{
    cell::Cell,
    observability::{log_debug, log_warn},
};

/// Predicate over a complete row.
pub trait RowFilter {
    /// Return `true` to keep `row`.
    fn filter_row(&self, row: &[Cell]) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&[Cell]) -> bool,
{
    fn filter_row(&self, row: &[Cell]) -> bool {
        self(row)
    }
}

/// Keeps rows whose key starts with a prefix.
#[derive(Clone, Debug)]
pub struct RowPrefixFilter {
    prefix: Bytes,
}

impl RowPrefixFilter {
    /// Filter on `prefix`.
    pub fn new(prefix: impl Into<Bytes>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl RowFilter for RowPrefixFilter {
    fn filter_row(&self, row: &[Cell]) -> bool {
        row.first()
            .is_some_and(|cell| cell.row().starts_with(&self.prefix))
    }
}

/// Keeps rows where at least one cell value matches a byte regex.
#[derive(Clone, Debug)]
pub struct ValueFilter {
    pattern: Regex,
}

impl ValueFilter {
    /// Compile `pattern`; it is unanchored.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl RowFilter for ValueFilter {
    fn filter_row(&self, row: &[Cell]) -> bool {
        row.iter().any(|cell| self.pattern.is_match(cell.value()))
    }
}

/// Scanner that drops whole rows rejected by a [`RowFilter`].
///
/// Rows are pulled one at a time from the wrapped scanner. The next kept
/// row is held back so the returned flag stays exact.
pub struct FilterScanner<S, F> {
    inner: S,
    filter: F,
    lookahead: Option<Vec<Cell>>,
    primed: bool,
    inner_more: bool,
    failed: bool,
    closed: bool,
    rows_dropped: u64,
}

impl<S, F> FilterScanner<S, F>
where
    S: InternalScanner,
    F: RowFilter,
{
    /// Wrap `inner`, keeping only rows accepted by `filter`.
    pub fn new(inner: S, filter: F) -> Self {
        Self {
            inner,
            filter,
            lookahead: None,
            primed: false,
            inner_more: true,
            failed: false,
            closed: false,
            rows_dropped: 0,
        }
    }

    /// Rows rejected by the filter so far.
    pub fn rows_dropped(&self) -> u64 {
        self.rows_dropped
    }

    /// The wrapped scanner.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn read_kept(&mut self) -> Result<Option<Vec<Cell>>, ScanError> {
        while self.inner_more {
            let mut row = Vec::new();
            self.inner_more = self.inner.next(&mut row)?;
            if row.is_empty() {
                continue;
            }
            if self.filter.filter_row(&row) {
                return Ok(Some(row));
            }
            self.rows_dropped += 1;
        }
        Ok(None)
    }

    fn fill(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError> {
        if !self.primed {
            self.primed = true;
            self.lookahead = self.read_kept()?;
        }
        let mut emitted = 0;
        while emitted < limit {
            let Some(row) = self.lookahead.take() else {
                break;
            };
            results.extend(row);
            emitted += 1;
            self.lookahead = self.read_kept()?;
        }
        Ok(self.lookahead.is_some())
    }
}

impl<S, F> InternalScanner for FilterScanner<S, F>
where
    S: InternalScanner,
    F: RowFilter,
{
    fn next_with_limit(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError> {
        if self.closed {
            return Err(ScanError::IllegalState("scanner is closed"));
        }
        if self.failed {
            return Err(ScanError::IllegalState(
                "scanner failed on an earlier call",
            ));
        }
        self.fill(results, limit.max(1)).inspect_err(|err| {
            self.failed = true;
            log_warn!(
                component = "filter",
                event = "scanner_poisoned",
                error = %err,
            );
        })
    }

    fn close(&mut self) -> Result<(), ScanError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.lookahead = None;
        log_debug!(
            component = "filter",
            event = "scanner_closed",
            rows_dropped = self.rows_dropped,
        );
        self.inner.close()
    }
}
