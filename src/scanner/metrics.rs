/// Counters collected over the lifetime of one scanner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanMetrics {
    /// Row groups walked, including rows that produced no output.
    pub rows_visited: u64,
    /// Non-empty rows handed to the caller.
    pub rows_returned: u64,
    /// Cells pulled from the merge, after duplicate collapsing.
    pub cells_scanned: u64,
    /// Cells handed to the caller.
    pub cells_returned: u64,
    /// Identical cells dropped because a higher-priority source supplied them.
    pub duplicates_collapsed: u64,
    /// Delete markers plus the puts they masked.
    pub cells_deleted: u64,
    /// Cells rejected by the column matcher or the version cap.
    pub cells_filtered: u64,
}
