//! Row scanners.
//!
//! [`RowMergeScanner`] merges several [`SortedEntrySource`]s into complete
//! rows; [`FilterScanner`] drops rows from any other scanner. Both are
//! driven through [`InternalScanner`].
//!
//! [`SortedEntrySource`]: crate::source::SortedEntrySource

mod accumulator;
mod delete;
mod error;
mod filter;
mod merge;
mod metrics;

pub use self::{
    error::{ScanError, SourceOp},
    filter::{FilterScanner, RowFilter, RowPrefixFilter, ValueFilter},
    merge::RowMergeScanner,
    metrics::ScanMetrics,
};
use crate::cell::Cell;

/// Pull interface shared by every scanner.
///
/// Rows are appended to `results` whole; a call never leaves part of a row
/// behind, even when it fails.
pub trait InternalScanner {
    /// Append up to `limit` rows to `results`. A limit of zero is treated as
    /// one.
    ///
    /// Returns `true` if at least one more row is available. Once `false`
    /// has been returned, further calls append nothing and return `false`.
    fn next_with_limit(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError>;

    /// Append the next row to `results`.
    fn next(&mut self, results: &mut Vec<Cell>) -> Result<bool, ScanError> {
        self.next_with_limit(results, 1)
    }

    /// Release the underlying sources. Closing twice is a no-op; calling
    /// `next` afterwards fails with [`ScanError::IllegalState`].
    fn close(&mut self) -> Result<(), ScanError>;
}

impl<S> InternalScanner for Box<S>
where
    S: InternalScanner + ?Sized,
{
    fn next_with_limit(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError> {
        (**self).next_with_limit(results, limit)
    }

    fn next(&mut self, results: &mut Vec<Cell>) -> Result<bool, ScanError> {
        (**self).next(results)
    }

    fn close(&mut self) -> Result<(), ScanError> {
        (**self).close()
    }
}
