//! Mutable in-memory store backed by a concurrent skiplist.

use std::{fmt, io, ops::Bound, sync::Arc};

use bytes::Bytes;
use crossbeam_skiplist::{map::Entry, SkipMap};

use super::{segment::Segment, SortedEntrySource, SourcePriority};
use crate::cell::{Cell, CellKey};

/// Sorted, concurrently writable cell store.
///
/// Clones share the same underlying map. Writers may keep inserting while
/// sources created by [`MemStore::source`] are reading.
#[derive(Clone, Default)]
pub struct MemStore {
    cells: Arc<SkipMap<CellKey, Bytes>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell. A cell with an identical key replaces the stored value.
    pub fn insert(&self, cell: Cell) {
        let (key, value) = cell.into_parts();
        self.cells.insert(key, value);
    }

    /// Number of cells held.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the store holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Open a cursor over the store.
    pub fn source(&self) -> MemStoreSource {
        MemStoreSource {
            cells: Some(Arc::clone(&self.cells)),
            head: None,
            last: None,
            exhausted: false,
        }
    }

    /// Copy the current contents into an immutable snapshot segment.
    pub fn freeze(&self) -> Segment {
        let cells: Vec<Cell> = self.cells.iter().map(|entry| to_cell(&entry)).collect();
        Segment::from_sorted(cells, SourcePriority::Snapshot)
    }
}

impl fmt::Debug for MemStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemStore")
            .field("len", &self.cells.len())
            .finish()
    }
}

fn to_cell(entry: &Entry<'_, CellKey, Bytes>) -> Cell {
    Cell::new(entry.key().clone(), entry.value().clone())
}

/// Cursor over a [`MemStore`].
///
/// The cursor remembers the last consumed key and re-enters the skiplist
/// strictly after it, so it observes cells inserted ahead of its position.
pub struct MemStoreSource {
    cells: Option<Arc<SkipMap<CellKey, Bytes>>>,
    head: Option<Cell>,
    last: Option<CellKey>,
    exhausted: bool,
}

impl MemStoreSource {
    fn fill_head(&mut self) {
        if self.head.is_some() || self.exhausted {
            return;
        }
        let Some(cells) = self.cells.as_ref() else {
            self.exhausted = true;
            return;
        };
        let next = match &self.last {
            Some(last) => cells.lower_bound(Bound::Excluded(last)),
            None => cells.front(),
        };
        match next {
            Some(entry) => self.head = Some(to_cell(&entry)),
            None => self.exhausted = true,
        }
    }
}

impl SortedEntrySource for MemStoreSource {
    fn peek(&mut self) -> io::Result<Option<&Cell>> {
        self.fill_head();
        Ok(self.head.as_ref())
    }

    fn advance(&mut self) -> io::Result<()> {
        self.fill_head();
        if let Some(head) = self.head.take() {
            self.last = Some(head.into_parts().0);
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.cells = None;
        self.head = None;
        self.exhausted = true;
        Ok(())
    }

    fn seek_row(&mut self, row: &[u8]) -> io::Result<()> {
        let target = CellKey::first_on_row(Bytes::copy_from_slice(row));
        match self.peek()? {
            Some(head) if head.key() < &target => {}
            _ => return Ok(()),
        }
        if let Some(cells) = self.cells.as_ref() {
            self.head = cells
                .lower_bound(Bound::Included(&target))
                .map(|entry| to_cell(&entry));
            self.exhausted = self.head.is_none();
        }
        Ok(())
    }

    fn priority(&self) -> SourcePriority {
        SourcePriority::Memory
    }
}

impl fmt::Debug for MemStoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemStoreSource")
            .field("head", &self.head)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
