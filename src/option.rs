use bytes::Bytes;

use crate::{
    column::{ColumnMatcher, ColumnSelection},
    mvcc::TimeRange,
};

/// How delete markers found in the merged stream are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// The scanner is the authoritative merge point: markers mask the cells
    /// they cover and are never emitted.
    #[default]
    Apply,
    /// Markers are emitted like any other cell and mask nothing.
    Raw,
}

/// Per-scan configuration.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub(crate) columns: ColumnSelection,
    pub(crate) time_range: TimeRange,
    pub(crate) max_versions: usize,
    pub(crate) delete_mode: DeleteMode,
    pub(crate) start_row: Option<Bytes>,
    pub(crate) stop_row: Option<Bytes>,
    pub(crate) default_batch_limit: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            columns: ColumnSelection::All,
            time_range: TimeRange::all(),
            max_versions: 1,
            delete_mode: DeleteMode::Apply,
            start_row: None,
            stop_row: None,
            default_batch_limit: 1,
        }
    }
}

impl ScanOptions {
    /// Columns to return.
    pub fn columns(self, columns: ColumnSelection) -> Self {
        ScanOptions { columns, ..self }
    }

    /// Time range applied to explicit column selections.
    pub fn time_range(self, time_range: TimeRange) -> Self {
        ScanOptions { time_range, ..self }
    }

    /// Newest versions returned per column. Zero is treated as one.
    pub fn max_versions(self, max_versions: usize) -> Self {
        ScanOptions {
            max_versions: max_versions.max(1),
            ..self
        }
    }

    /// Delete marker handling.
    pub fn delete_mode(self, delete_mode: DeleteMode) -> Self {
        ScanOptions {
            delete_mode,
            ..self
        }
    }

    /// First row to return (inclusive).
    pub fn start_row(self, start_row: impl Into<Bytes>) -> Self {
        ScanOptions {
            start_row: Some(start_row.into()),
            ..self
        }
    }

    /// Row at which the scan ends (exclusive).
    pub fn stop_row(self, stop_row: impl Into<Bytes>) -> Self {
        ScanOptions {
            stop_row: Some(stop_row.into()),
            ..self
        }
    }

    /// Row limit used by `next_batch`. Zero is treated as one.
    pub fn default_batch_limit(self, default_batch_limit: usize) -> Self {
        ScanOptions {
            default_batch_limit: default_batch_limit.max(1),
            ..self
        }
    }
}

impl ScanOptions {
    pub(crate) fn matcher(&self) -> ColumnMatcher {
        ColumnMatcher::new(self.columns.clone(), self.time_range)
    }

    pub(crate) fn before_stop_row(&self, row: &[u8]) -> bool {
        self.stop_row
            .as_ref()
            .map_or(true, |stop| row < stop.as_ref())
    }
}
