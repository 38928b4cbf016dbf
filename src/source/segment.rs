//! Immutable sorted segment, shared read-only by any number of sources.

use std::{cmp::Ordering, io, sync::Arc};

use bytes::Bytes;
use thiserror::Error;

use super::{SortedEntrySource, SourcePriority};
use crate::cell::{Cell, CellKey};

/// Error raised while assembling a segment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    /// A pushed cell did not sort strictly after its predecessor.
    #[error("cell at position {position} does not sort after its predecessor")]
    OutOfOrder {
        /// Zero-based position of the offending cell.
        position: usize,
    },
}

/// Immutable, sorted run of cells.
///
/// Cloning is cheap; every clone and every source shares the same cells.
#[derive(Clone, Debug)]
pub struct Segment {
    cells: Arc<[Cell]>,
    priority: SourcePriority,
}

impl Segment {
    /// Start building a persisted-segment priority segment.
    pub fn builder() -> SegmentBuilder {
        SegmentBuilder::default()
    }

    pub(crate) fn from_sorted(cells: Vec<Cell>, priority: SourcePriority) -> Self {
        debug_assert!(cells.windows(2).all(|pair| pair[0].key() < pair[1].key()));
        Self {
            cells: cells.into(),
            priority,
        }
    }

    /// Override the tie-break priority reported by this segment's sources.
    pub fn with_priority(self, priority: SourcePriority) -> Self {
        Self { priority, ..self }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the segment holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in key order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Open a cursor positioned on the first cell.
    pub fn source(&self) -> SegmentSource {
        SegmentSource {
            cells: Some(Arc::clone(&self.cells)),
            pos: 0,
            priority: self.priority,
        }
    }
}

impl TryFrom<Vec<Cell>> for Segment {
    type Error = SegmentError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        let mut builder = Segment::builder();
        builder.extend(cells)?;
        Ok(builder.build())
    }
}

/// Accumulates cells in order and seals them into a [`Segment`].
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    cells: Vec<Cell>,
}

impl SegmentBuilder {
    /// Append a cell; it must sort strictly after the previous one.
    pub fn push(&mut self, cell: Cell) -> Result<(), SegmentError> {
        if let Some(last) = self.cells.last() {
            if last.key().cmp(cell.key()) != Ordering::Less {
                return Err(SegmentError::OutOfOrder {
                    position: self.cells.len(),
                });
            }
        }
        self.cells.push(cell);
        Ok(())
    }

    /// Append every cell of `cells` in order.
    pub fn extend(&mut self, cells: impl IntoIterator<Item = Cell>) -> Result<(), SegmentError> {
        for cell in cells {
            self.push(cell)?;
        }
        Ok(())
    }

    /// Seal the builder.
    pub fn build(self) -> Segment {
        Segment::from_sorted(self.cells, SourcePriority::Segment)
    }
}

/// Cursor over a [`Segment`].
#[derive(Debug)]
pub struct SegmentSource {
    cells: Option<Arc<[Cell]>>,
    pos: usize,
    priority: SourcePriority,
}

impl SortedEntrySource for SegmentSource {
    fn peek(&mut self) -> io::Result<Option<&Cell>> {
        Ok(self.cells.as_ref().and_then(|cells| cells.get(self.pos)))
    }

    fn advance(&mut self) -> io::Result<()> {
        if let Some(cells) = self.cells.as_ref() {
            if self.pos < cells.len() {
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.cells = None;
        Ok(())
    }

    fn seek_row(&mut self, row: &[u8]) -> io::Result<()> {
        if let Some(cells) = self.cells.as_ref() {
            let target = CellKey::first_on_row(Bytes::copy_from_slice(row));
            let skip = cells[self.pos..].partition_point(|cell| cell.key() < &target);
            self.pos += skip;
        }
        Ok(())
    }

    fn priority(&self) -> SourcePriority {
        self.priority
    }
}
