//! Row-grouping merge over several sorted sources.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt,
};

use bytes::Bytes;
use ulid::Ulid;

use super::{
    accumulator::ScanAccumulator,
    delete::DeleteTracker,
    error::{ScanError, SourceOp},
    metrics::ScanMetrics,
    InternalScanner,
};
use crate::{
    cell::{Cell, CellKey, CellType},
    column::ColumnMatcher,
    observability::{log_debug, log_error, log_warn},
    option::{DeleteMode, ScanOptions},
    source::{SortedEntrySource, SourcePriority},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Sources have not been positioned yet.
    Unprimed,
    Open,
    Exhausted,
    /// A source failed; only `close` is allowed.
    Failed,
    Closed,
}

struct SourceSlot {
    source: Box<dyn SortedEntrySource>,
    priority: SourcePriority,
    released: bool,
}

/// Merges sorted sources into row groups.
///
/// Each call to [`InternalScanner::next_with_limit`] appends up to `limit`
/// complete, non-empty rows. The scanner keeps the following row assembled
/// ahead of time so the returned flag is exact: `true` means another
/// non-empty row will be produced.
///
/// Cells with identical keys in several sources collapse to one, taken from
/// the source with the lowest [`SourcePriority`] and then the lowest
/// position in the source list.
pub struct RowMergeScanner {
    scan_id: Ulid,
    sources: Vec<SourceSlot>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
    matcher: ColumnMatcher,
    options: ScanOptions,
    state: ScanState,
    last_key: Option<CellKey>,
    lookahead: Option<Vec<Cell>>,
    deletes: DeleteTracker,
    versions: VersionCounter,
    metrics: ScanMetrics,
}

impl RowMergeScanner {
    /// Bind a scanner to `sources`.
    ///
    /// No source is touched until the first `next` call.
    pub fn new(sources: Vec<Box<dyn SortedEntrySource>>, options: ScanOptions) -> Self {
        let scan_id = Ulid::new();
        let matcher = options.matcher();
        log_debug!(
            component = "merge",
            event = "scanner_opened",
            scan_id = %scan_id,
            sources = sources.len(),
            wildcard = matcher.is_wildcard(),
        );
        let sources = sources
            .into_iter()
            .map(|source| SourceSlot {
                priority: source.priority(),
                source,
                released: false,
            })
            .collect::<Vec<_>>();
        Self {
            scan_id,
            heap: BinaryHeap::with_capacity(sources.len()),
            sources,
            matcher,
            options,
            state: ScanState::Unprimed,
            last_key: None,
            lookahead: None,
            deletes: DeleteTracker::default(),
            versions: VersionCounter::default(),
            metrics: ScanMetrics::default(),
        }
    }

    /// Fetch rows using the configured default batch limit.
    pub fn next_batch(&mut self, results: &mut Vec<Cell>) -> Result<bool, ScanError> {
        let limit = self.options.default_batch_limit;
        self.next_with_limit(results, limit)
    }

    /// Identifier used in this scanner's log events.
    pub fn scan_id(&self) -> Ulid {
        self.scan_id
    }

    /// Counters collected so far.
    pub fn metrics(&self) -> ScanMetrics {
        self.metrics
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state == ScanState::Closed
    }

    fn prime(&mut self) -> Result<(), ScanError> {
        for idx in 0..self.sources.len() {
            if let Some(start_row) = self.options.start_row.clone() {
                let source = &mut self.sources[idx].source;
                source
                    .seek_row(&start_row)
                    .map_err(|err| self.source_failed(idx, SourceOp::Seek, err))?;
            }
            self.refill(idx)?;
        }
        Ok(())
    }

    /// Push the current head of source `idx` onto the heap, if any.
    fn refill(&mut self, idx: usize) -> Result<(), ScanError> {
        let slot = &mut self.sources[idx];
        let priority = slot.priority;
        match slot.source.peek() {
            Ok(Some(cell)) => {
                self.heap.push(Reverse(HeapEntry {
                    cell: cell.clone(),
                    priority,
                    source_idx: idx,
                }));
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => Err(self.source_failed(idx, SourceOp::Peek, err)),
        }
    }

    fn source_failed(&self, idx: usize, op: SourceOp, err: std::io::Error) -> ScanError {
        log_error!(
            component = "merge",
            event = "source_failed",
            scan_id = %self.scan_id,
            source_index = idx,
            op = %op,
            error = %err,
        );
        ScanError::io(idx, op, err)
    }

    /// Row of the smallest pending cell.
    fn peek_row(&self) -> Option<Bytes> {
        self.heap
            .peek()
            .map(|Reverse(entry)| entry.cell.row().clone())
    }

    /// Pop the next distinct cell of `row`, collapsing duplicates.
    fn pop_in_row(&mut self, row: &Bytes) -> Result<Option<Cell>, ScanError> {
        loop {
            match self.heap.peek() {
                Some(Reverse(entry)) if entry.cell.row() == row => {}
                _ => return Ok(None),
            }
            let Some(Reverse(entry)) = self.heap.pop() else {
                return Ok(None);
            };
            let idx = entry.source_idx;
            self.sources[idx]
                .source
                .advance()
                .map_err(|err| self.source_failed(idx, SourceOp::Advance, err))?;
            self.refill(idx)?;

            if self.last_key.as_ref() == Some(entry.cell.key()) {
                self.metrics.duplicates_collapsed += 1;
                continue;
            }
            self.last_key = Some(entry.cell.key().clone());
            return Ok(Some(entry.cell));
        }
    }

    /// Assemble the next non-empty row, consuming empty ones on the way.
    fn read_row(&mut self) -> Result<Option<Vec<Cell>>, ScanError> {
        while let Some(row) = self.peek_row() {
            if !self.options.before_stop_row(&row) {
                return Ok(None);
            }
            self.metrics.rows_visited += 1;
            self.deletes.reset();
            self.versions.reset();

            let mut acc = ScanAccumulator::new(row);
            while let Some(cell) = self.pop_in_row(acc.row())? {
                self.accept(cell, &mut acc);
            }
            if let Some(cells) = acc.take_row() {
                return Ok(Some(cells));
            }
        }
        Ok(None)
    }

    fn accept(&mut self, cell: Cell, acc: &mut ScanAccumulator) {
        self.metrics.cells_scanned += 1;
        let key = cell.key();
        if self.options.delete_mode == DeleteMode::Apply {
            if key.cell_type().is_delete() {
                self.deletes.add(key);
                self.metrics.cells_deleted += 1;
                return;
            }
            if self.deletes.is_deleted(key) {
                self.metrics.cells_deleted += 1;
                return;
            }
        }
        if !self.matcher.matches(key) {
            self.metrics.cells_filtered += 1;
            return;
        }
        if key.cell_type() == CellType::Put
            && !self.versions.admit(key, self.options.max_versions)
        {
            self.metrics.cells_filtered += 1;
            return;
        }
        acc.push(cell);
    }

    fn fill(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError> {
        if self.state == ScanState::Unprimed {
            self.prime()?;
            self.state = ScanState::Open;
            self.lookahead = self.read_row()?;
        }
        let mut emitted = 0;
        while emitted < limit {
            let Some(row) = self.lookahead.take() else {
                break;
            };
            self.metrics.rows_returned += 1;
            self.metrics.cells_returned += row.len() as u64;
            results.extend(row);
            emitted += 1;
            self.lookahead = self.read_row()?;
        }
        if self.lookahead.is_none() {
            self.state = ScanState::Exhausted;
            return Ok(false);
        }
        Ok(true)
    }
}

impl InternalScanner for RowMergeScanner {
    fn next_with_limit(&mut self, results: &mut Vec<Cell>, limit: usize) -> Result<bool, ScanError> {
        match self.state {
            ScanState::Closed => return Err(ScanError::IllegalState("scanner is closed")),
            ScanState::Failed => {
                return Err(ScanError::IllegalState(
                    "scanner failed on an earlier call",
                ))
            }
            ScanState::Exhausted => return Ok(false),
            ScanState::Unprimed | ScanState::Open => {}
        }
        self.fill(results, limit.max(1)).inspect_err(|err| {
            self.state = ScanState::Failed;
            log_warn!(
                component = "merge",
                event = "scanner_poisoned",
                scan_id = %self.scan_id,
                error = %err,
            );
        })
    }

    fn close(&mut self) -> Result<(), ScanError> {
        if self.state == ScanState::Closed {
            return Ok(());
        }
        self.state = ScanState::Closed;
        self.heap.clear();
        self.lookahead = None;

        let mut first_error = None;
        for (idx, slot) in self.sources.iter_mut().enumerate() {
            if slot.released {
                continue;
            }
            slot.released = true;
            if let Err(err) = slot.source.close() {
                log_warn!(
                    component = "merge",
                    event = "source_close_failed",
                    scan_id = %self.scan_id,
                    source_index = idx,
                    error = %err,
                );
                if first_error.is_none() {
                    first_error = Some(ScanError::io(idx, SourceOp::Close, err));
                }
            }
        }
        log_debug!(
            component = "merge",
            event = "scanner_closed",
            scan_id = %self.scan_id,
            rows_visited = self.metrics.rows_visited,
            rows_returned = self.metrics.rows_returned,
            cells_scanned = self.metrics.cells_scanned,
            cells_returned = self.metrics.cells_returned,
            duplicates_collapsed = self.metrics.duplicates_collapsed,
        );
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for RowMergeScanner {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log_warn!(
                component = "merge",
                event = "close_on_drop_failed",
                scan_id = %self.scan_id,
                error = %err,
            );
        }
    }
}

impl fmt::Debug for RowMergeScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMergeScanner")
            .field("scan_id", &self.scan_id)
            .field("sources", &self.sources.len())
            .field("state", &self.state)
            .field("metrics", &self.metrics)
            .finish()
    }
}

struct HeapEntry {
    cell: Cell,
    priority: SourcePriority,
    source_idx: usize,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cell
            .key()
            .cmp(other.cell.key())
            .then(self.priority.cmp(&other.priority))
            .then(self.source_idx.cmp(&other.source_idx))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

/// Counts puts returned for the current column.
#[derive(Debug, Default)]
struct VersionCounter {
    column: Option<(Bytes, Bytes)>,
    seen: usize,
}

impl VersionCounter {
    fn reset(&mut self) {
        self.column = None;
        self.seen = 0;
    }

    /// Whether one more version of `key`'s column fits under `max_versions`.
    fn admit(&mut self, key: &CellKey, max_versions: usize) -> bool {
        let same_column = self
            .column
            .as_ref()
            .is_some_and(|(family, qualifier)| family == key.family() && qualifier == key.qualifier());
        if !same_column {
            self.column = Some((key.family().clone(), key.qualifier().clone()));
            self.seen = 0;
        }
        if self.seen >= max_versions {
            return false;
        }
        self.seen += 1;
        true
    }
}
