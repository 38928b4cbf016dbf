//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use rowscan::{Cell, InternalScanner, Segment, SortedEntrySource, Timestamp};

pub fn put(row: &str, family: &str, qualifier: &str, ts: u64, value: &str) -> Cell {
    Cell::put(
        row.to_owned(),
        family.to_owned(),
        qualifier.to_owned(),
        Timestamp::new(ts),
        value.to_owned(),
    )
}

/// Build a segment, sorting `cells` first.
pub fn segment(mut cells: Vec<Cell>) -> Segment {
    cells.sort_by(|a, b| a.key().cmp(b.key()));
    Segment::try_from(cells).expect("sorted cells should form a segment")
}

/// Drain `scanner` one row per call, returning `(row, column, value)` rows.
pub fn collect_rows(scanner: &mut impl InternalScanner) -> Vec<Vec<(String, String, String)>> {
    let mut rows = Vec::new();
    loop {
        let mut batch = Vec::new();
        let more = scanner.next(&mut batch).expect("scan should succeed");
        if !batch.is_empty() {
            rows.push(render(&batch));
        }
        if !more {
            return rows;
        }
    }
}

pub fn render(cells: &[Cell]) -> Vec<(String, String, String)> {
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

/// Source over a fixed cell list that fails `advance` after `fail_after`
/// successful advances and counts `close` calls.
pub struct FlakySource {
    cells: Vec<Cell>,
    pos: usize,
    fail_after: Option<usize>,
    closes: Arc<AtomicUsize>,
}

impl FlakySource {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            pos: 0,
            fail_after: None,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fail_after(mut self, advances: usize) -> Self {
        self.fail_after = Some(advances);
        self
    }

    pub fn closes(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl SortedEntrySource for FlakySource {
    fn peek(&mut self) -> io::Result<Option<&Cell>> {
        Ok(self.cells.get(self.pos))
    }

    fn advance(&mut self) -> io::Result<()> {
        if self.fail_after == Some(self.pos) {
            return Err(io::Error::other("disk went away"));
        }
        self.pos = (self.pos + 1).min(self.cells.len());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
