use super::{ColumnSelection, WildcardColumns};
use crate::{
    cell::{CellKey, CellType},
    mvcc::TimeRange,
};

/// Per-cell column predicate built once per scan.
///
/// Wildcard selections ignore the time range: members of a family may have
/// been written at different times and all of them must surface. Explicit
/// selections apply it, so the named columns line up on one point in time.
#[derive(Clone, Debug, Default)]
pub struct ColumnMatcher {
    selection: ColumnSelection,
    time_range: TimeRange,
}

impl ColumnMatcher {
    /// Build a matcher from the requested columns and the time policy used in
    /// explicit mode.
    pub fn new(selection: ColumnSelection, time_range: TimeRange) -> Self {
        Self {
            selection,
            time_range,
        }
    }

    /// Whether the selection is family- or pattern-based.
    pub fn is_wildcard(&self) -> bool {
        self.selection.is_wildcard()
    }

    /// Requested columns.
    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Time range applied to explicit selections.
    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    /// Whether the cell addressed by `key` is wanted.
    ///
    /// Family delete markers carry no qualifier, so only their family is
    /// checked.
    pub fn matches(&self, key: &CellKey) -> bool {
        let family_marker = key.cell_type() == CellType::DeleteFamily;
        match &self.selection {
            ColumnSelection::All => true,
            ColumnSelection::Wildcard(WildcardColumns::Family(family)) => key.family() == family,
            ColumnSelection::Wildcard(WildcardColumns::Pattern { family, qualifier }) => {
                key.family() == family && (family_marker || qualifier.is_match(key.qualifier()))
            }
            ColumnSelection::Explicit(columns) => {
                let listed = if family_marker {
                    columns.contains_family(key.family())
                } else {
                    columns.contains(key.family(), key.qualifier())
                };
                listed && self.time_range.contains(key.timestamp())
            }
        }
    }
}
