//! Test-only sources and cell constructors.

use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    cell::Cell,
    mvcc::Timestamp,
    source::{SortedEntrySource, SourcePriority},
};

pub(crate) fn put(
    row: &'static str,
    family: &'static str,
    qualifier: &'static str,
    ts: u64,
    value: &'static str,
) -> Cell {
    Cell::put(row, family, qualifier, Timestamp::new(ts), value)
}

pub(crate) fn delete(row: &'static str, family: &'static str, qualifier: &'static str, ts: u64) -> Cell {
    Cell::delete(row, family, qualifier, Timestamp::new(ts))
}

pub(crate) fn delete_column(
    row: &'static str,
    family: &'static str,
    qualifier: &'static str,
    ts: u64,
) -> Cell {
    Cell::delete_column(row, family, qualifier, Timestamp::new(ts))
}

pub(crate) fn delete_family(row: &'static str, family: &'static str, ts: u64) -> Cell {
    Cell::delete_family(row, family, Timestamp::new(ts))
}

/// Read every remaining cell of `source`.
pub(crate) fn drain(source: &mut impl SortedEntrySource) -> Vec<Cell> {
    let mut cells = Vec::new();
    while let Some(cell) = source.peek().expect("peek") {
        cells.push(cell.clone());
        source.advance().expect("advance");
    }
    cells
}

/// `(row, family:qualifier, value)` triples for compact assertions.
pub(crate) fn flatten(cells: &[Cell]) -> Vec<(String, String, String)> {
    cells
        .iter()
        .map(|cell| {
            (
                String::from_utf8_lossy(cell.row()).into_owned(),
                format!(
                    "{}:{}",
                    String::from_utf8_lossy(cell.family()),
                    String::from_utf8_lossy(cell.qualifier())
                ),
                String::from_utf8_lossy(cell.value()).into_owned(),
            )
        })
        .collect()
}

/// Scripted in-memory source that counts releases and can be told to fail.
pub(crate) struct ScriptedSource {
    cells: Vec<Cell>,
    pos: usize,
    priority: SourcePriority,
    fail_peek_at: Option<usize>,
    fail_advance_at: Option<usize>,
    fail_close: bool,
    closed: bool,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            pos: 0,
            priority: SourcePriority::Segment,
            fail_peek_at: None,
            fail_advance_at: None,
            fail_close: false,
            closed: false,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_priority(mut self, priority: SourcePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Fail the first `peek` issued while positioned at `pos`.
    pub(crate) fn fail_peek_at(mut self, pos: usize) -> Self {
        self.fail_peek_at = Some(pos);
        self
    }

    /// Fail the first `advance` issued while positioned at `pos`.
    pub(crate) fn fail_advance_at(mut self, pos: usize) -> Self {
        self.fail_advance_at = Some(pos);
        self
    }

    pub(crate) fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Shared count of every `close` call; anything above one is a double
    /// release.
    pub(crate) fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    pub(crate) fn boxed(self) -> Box<dyn SortedEntrySource> {
        Box::new(self)
    }
}

impl SortedEntrySource for ScriptedSource {
    fn peek(&mut self) -> io::Result<Option<&Cell>> {
        if self.closed {
            return Err(io::Error::other("peek after close"));
        }
        if self.fail_peek_at == Some(self.pos) {
            self.fail_peek_at = None;
            return Err(io::Error::other("injected peek failure"));
        }
        Ok(self.cells.get(self.pos))
    }

    fn advance(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("advance after close"));
        }
        if self.fail_advance_at == Some(self.pos) {
            self.fail_advance_at = None;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "injected advance failure",
            ));
        }
        if self.pos < self.cells.len() {
            self.pos += 1;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        // Counted even when already closed so tests can detect double release.
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        if self.fail_close {
            return Err(io::Error::other("injected close failure"));
        }
        Ok(())
    }

    fn priority(&self) -> SourcePriority {
        self.priority
    }
}
