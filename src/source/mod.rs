//! Sorted cell sources consumed by the scanners.
//!
//! A source yields cells in [`CellKey`](crate::cell::CellKey) order and is
//! driven through `peek`/`advance`. The mutable in-memory store and the
//! immutable segment are the two concrete kinds; the scanners only ever see
//! the [`SortedEntrySource`] trait.

pub mod memstore;
pub mod segment;

use std::io;

use crate::cell::Cell;

/// Source priority applied while reconciling identical cells from several
/// sources. Lower sorts first and wins.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SourcePriority {
    /// Live mutable memory store (highest priority).
    Memory,
    /// Frozen memory store awaiting flush.
    Snapshot,
    /// Persisted immutable segment (lowest priority).
    Segment,
}

/// Ordered cell iterator with an explicit peek/advance cursor.
///
/// Implementations must yield cells in strictly ascending key order. Once
/// `peek` returns `None` the source is exhausted and `advance` is a no-op.
pub trait SortedEntrySource: Send {
    /// Look at the next unread cell without consuming it.
    fn peek(&mut self) -> io::Result<Option<&Cell>>;

    /// Consume the cell returned by the most recent `peek`.
    fn advance(&mut self) -> io::Result<()>;

    /// Release the source. Calling it again is a no-op.
    fn close(&mut self) -> io::Result<()>;

    /// Position the cursor on the first cell whose row is `>= row`.
    ///
    /// Seeking never moves the cursor backwards. The default implementation
    /// advances cell by cell.
    fn seek_row(&mut self, row: &[u8]) -> io::Result<()> {
        loop {
            match self.peek()? {
                Some(cell) if cell.row().as_ref() < row => {}
                _ => return Ok(()),
            }
            self.advance()?;
        }
    }

    /// Tie-break priority of this source.
    fn priority(&self) -> SourcePriority {
        SourcePriority::Segment
    }
}

impl<S> SortedEntrySource for Box<S>
where
    S: SortedEntrySource + ?Sized,
{
    fn peek(&mut self) -> io::Result<Option<&Cell>> {
        (**self).peek()
    }

    fn advance(&mut self) -> io::Result<()> {
        (**self).advance()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn seek_row(&mut self, row: &[u8]) -> io::Result<()> {
        (**self).seek_row(row)
    }

    fn priority(&self) -> SourcePriority {
        (**self).priority()
    }
}
