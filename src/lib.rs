#![deny(missing_docs)]
//! Row-oriented internal scanning over sorted, versioned cell sources.
//!
//! Cells are `(row, family, qualifier, timestamp, type) -> value` entries
//! kept in key order by each [`SortedEntrySource`]. A [`RowMergeScanner`]
//! merges any number of sources, applies delete markers, column selection
//! and version limits, and hands back one complete row per step through the
//! [`InternalScanner`] interface:
//!
//! ```
//! use rowscan::{
//!     Cell, ColumnSelection, InternalScanner, MemStore, RowMergeScanner, ScanOptions,
//!     SortedEntrySource, Timestamp,
//! };
//!
//! let store = MemStore::new();
//! store.insert(Cell::put("r1", "cf", "a", Timestamp::new(5), "x"));
//! store.insert(Cell::put("r2", "cf", "a", Timestamp::new(1), "z"));
//!
//! let options = ScanOptions::default().columns(ColumnSelection::family("cf"));
//! let sources: Vec<Box<dyn SortedEntrySource>> = vec![Box::new(store.source())];
//! let mut scanner = RowMergeScanner::new(sources, options);
//!
//! let mut row = Vec::new();
//! assert!(scanner.next(&mut row)?);
//! assert_eq!(row[0].value(), "x");
//! scanner.close()?;
//! # Ok::<(), rowscan::ScanError>(())
//! ```

pub mod cell;
pub mod column;
pub mod mvcc;
mod observability;
/// Per-scan configuration.
pub mod option;
pub mod scanner;
pub mod source;

#[cfg(test)]
mod test_util;

pub use crate::{
    cell::{Cell, CellKey, CellType},
    column::{ColumnMatcher, ColumnSelection},
    mvcc::{TimeRange, Timestamp},
    option::{DeleteMode, ScanOptions},
    scanner::{
        FilterScanner, InternalScanner, RowFilter, RowMergeScanner, RowPrefixFilter, ScanError,
        ScanMetrics, SourceOp, ValueFilter,
    },
    source::{
        memstore::{MemStore, MemStoreSource},
        segment::{Segment, SegmentBuilder, SegmentError, SegmentSource},
        SortedEntrySource, SourcePriority,
    },
};
