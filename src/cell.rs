//! Cells: the `(row, family, qualifier, timestamp, type, value)` tuples that
//! sources yield and scanners emit.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use bytes::Bytes;

use crate::mvcc::Timestamp;

/// Kind of a cell.
///
/// Declaration order is sort order: at an equal `(row, column, timestamp)`
/// delete markers sort ahead of the puts they mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellType {
    /// Masks every column of a family at or below the marker timestamp.
    DeleteFamily,
    /// Masks every version of one column at or below the marker timestamp.
    DeleteColumn,
    /// Masks exactly one version of one column.
    Delete,
    /// A value.
    Put,
}

impl CellType {
    /// Whether this is one of the delete markers.
    pub fn is_delete(self) -> bool {
        !matches!(self, CellType::Put)
    }
}

/// Sort key of a cell.
///
/// Ordered by row, family and qualifier ascending, then timestamp descending
/// (newest first), then [`CellType`].
#[derive(Clone, Debug)]
pub struct CellKey {
    row: Bytes,
    family: Bytes,
    qualifier: Bytes,
    ts: Timestamp,
    cell_type: CellType,
}

impl CellKey {
    /// Build a key from its parts.
    pub fn new(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        ts: Timestamp,
        cell_type: CellType,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            ts,
            cell_type,
        }
    }

    /// Smallest key of `row`; every cell of the row sorts at or after it.
    pub fn first_on_row(row: impl Into<Bytes>) -> Self {
        Self::new(
            row,
            Bytes::new(),
            Bytes::new(),
            Timestamp::MAX,
            CellType::DeleteFamily,
        )
    }

    /// Row key.
    pub fn row(&self) -> &Bytes {
        &self.row
    }

    /// Column family.
    pub fn family(&self) -> &Bytes {
        &self.family
    }

    /// Column qualifier. Empty for family delete markers.
    pub fn qualifier(&self) -> &Bytes {
        &self.qualifier
    }

    /// Write timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.ts
    }

    /// Cell kind.
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Whether both keys address the same `(family, qualifier)` column.
    pub fn same_column(&self, other: &CellKey) -> bool {
        self.family == other.family && self.qualifier == other.qualifier
    }

    /// Ordering of the `(row, family, qualifier)` prefix only.
    pub fn cmp_column(&self, other: &CellKey) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.family.cmp(&other.family))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_column(other)
            .then_with(|| other.ts.cmp(&self.ts))
            .then_with(|| self.cell_type.cmp(&other.cell_type))
    }
}

impl Hash for CellKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.family.hash(state);
        self.qualifier.hash(state);
        self.ts.hash(state);
        self.cell_type.hash(state);
    }
}

/// One immutable versioned value (or delete marker) of a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    key: CellKey,
    value: Bytes,
}

impl Cell {
    /// Pair a key with its value.
    pub fn new(key: CellKey, value: impl Into<Bytes>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// A put of `value` into `family:qualifier` at `ts`.
    pub fn put(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        ts: Timestamp,
        value: impl Into<Bytes>,
    ) -> Self {
        Self::new(
            CellKey::new(row, family, qualifier, ts, CellType::Put),
            value,
        )
    }

    /// Marker deleting the single version of `family:qualifier` written at `ts`.
    pub fn delete(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        ts: Timestamp,
    ) -> Self {
        Self::new(
            CellKey::new(row, family, qualifier, ts, CellType::Delete),
            Bytes::new(),
        )
    }

    /// Marker deleting every version of `family:qualifier` at or below `ts`.
    pub fn delete_column(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        ts: Timestamp,
    ) -> Self {
        Self::new(
            CellKey::new(row, family, qualifier, ts, CellType::DeleteColumn),
            Bytes::new(),
        )
    }

    /// Marker deleting every column of `family` at or below `ts`.
    pub fn delete_family(
        row: impl Into<Bytes>,
        family: impl Into<Bytes>,
        ts: Timestamp,
    ) -> Self {
        Self::new(
            CellKey::new(
                row,
                family,
                Bytes::new(),
                ts,
                CellType::DeleteFamily,
            ),
            Bytes::new(),
        )
    }

    /// Sort key.
    pub fn key(&self) -> &CellKey {
        &self.key
    }

    /// Row key.
    pub fn row(&self) -> &Bytes {
        self.key.row()
    }

    /// Column family.
    pub fn family(&self) -> &Bytes {
        self.key.family()
    }

    /// Column qualifier.
    pub fn qualifier(&self) -> &Bytes {
        self.key.qualifier()
    }

    /// Write timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.key.timestamp()
    }

    /// Cell kind.
    pub fn cell_type(&self) -> CellType {
        self.key.cell_type()
    }

    /// Stored value; empty for delete markers.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Decompose the cell.
    pub fn into_parts(self) -> (CellKey, Bytes) {
        (self.key, self.value)
    }
}
