use bytes::Bytes;

use crate::cell::Cell;

/// Buffer for the row currently being assembled.
///
/// Lives only as long as one row inside one `next` call; cells reach the
/// caller only once the row is complete.
#[derive(Debug)]
pub(crate) struct ScanAccumulator {
    row: Bytes,
    cells: Vec<Cell>,
}

impl ScanAccumulator {
    pub(crate) fn new(row: Bytes) -> Self {
        Self {
            row,
            cells: Vec::new(),
        }
    }

    pub(crate) fn row(&self) -> &Bytes {
        &self.row
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        debug_assert_eq!(cell.row(), &self.row);
        self.cells.push(cell);
    }

    /// The completed row, or `None` if nothing was accepted.
    pub(crate) fn take_row(self) -> Option<Vec<Cell>> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells)
        }
    }
}
