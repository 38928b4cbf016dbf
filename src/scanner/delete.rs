use bytes::Bytes;

use crate::{
    cell::{CellKey, CellType},
    mvcc::Timestamp,
};

/// Delete markers seen so far in the current row.
///
/// Cells arrive in key order, so markers always precede the puts they mask
/// and only the current family and column need to be remembered.
#[derive(Debug, Default)]
pub(crate) struct DeleteTracker {
    family: Option<(Bytes, Timestamp)>,
    column: Option<ColumnDeletes>,
}

#[derive(Debug)]
struct ColumnDeletes {
    family: Bytes,
    qualifier: Bytes,
    up_to: Option<Timestamp>,
    exact: Vec<Timestamp>,
}

impl DeleteTracker {
    /// Forget everything; called at each row boundary.
    pub(crate) fn reset(&mut self) {
        self.family = None;
        self.column = None;
    }

    /// Record a delete marker.
    pub(crate) fn add(&mut self, key: &CellKey) {
        self.roll(key);
        let ts = key.timestamp();
        match key.cell_type() {
            CellType::DeleteFamily => match &mut self.family {
                Some((family, max)) if *family == *key.family() => *max = (*max).max(ts),
                _ => self.family = Some((key.family().clone(), ts)),
            },
            CellType::DeleteColumn => {
                let column = self.column_mut(key);
                column.up_to = Some(column.up_to.map_or(ts, |up_to| up_to.max(ts)));
            }
            CellType::Delete => self.column_mut(key).exact.push(ts),
            CellType::Put => {}
        }
    }

    /// Whether a put is masked by a marker recorded earlier in the row.
    pub(crate) fn is_deleted(&mut self, key: &CellKey) -> bool {
        self.roll(key);
        let ts = key.timestamp();
        if let Some((_, max)) = &self.family {
            if ts <= *max {
                return true;
            }
        }
        match &self.column {
            Some(column) => {
                column.up_to.is_some_and(|up_to| ts <= up_to) || column.exact.contains(&ts)
            }
            None => false,
        }
    }

    fn roll(&mut self, key: &CellKey) {
        if self
            .family
            .as_ref()
            .is_some_and(|(family, _)| family != key.family())
        {
            self.family = None;
        }
        if self.column.as_ref().is_some_and(|column| {
            &column.family != key.family() || &column.qualifier != key.qualifier()
        }) {
            self.column = None;
        }
    }

    fn column_mut(&mut self, key: &CellKey) -> &mut ColumnDeletes {
        self.column.get_or_insert_with(|| ColumnDeletes {
            family: key.family().clone(),
            qualifier: key.qualifier().clone(),
            up_to: None,
            exact: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{delete, delete_column, delete_family, put};

    #[test]
    fn exact_delete_masks_one_version() {
        let mut tracker = DeleteTracker::default();
        tracker.add(delete("r", "cf", "a", 5).key());
        assert!(tracker.is_deleted(put("r", "cf", "a", 5, "").key()));
        assert!(!tracker.is_deleted(put("r", "cf", "a", 4, "").key()));
    }

    #[test]
    fn column_delete_masks_older_versions() {
        let mut tracker = DeleteTracker::default();
        tracker.add(delete_column("r", "cf", "a", 5).key());
        assert!(tracker.is_deleted(put("r", "cf", "a", 5, "").key()));
        assert!(tracker.is_deleted(put("r", "cf", "a", 1, "").key()));
        assert!(!tracker.is_deleted(put("r", "cf", "b", 1, "").key()));
    }

    #[test]
    fn family_delete_spans_qualifiers_but_not_families() {
        let mut tracker = DeleteTracker::default();
        tracker.add(delete_family("r", "cf", 5).key());
        assert!(tracker.is_deleted(put("r", "cf", "a", 5, "").key()));
        assert!(tracker.is_deleted(put("r", "cf", "z", 2, "").key()));
        assert!(!tracker.is_deleted(put("r", "cf", "z", 6, "").key()));
        assert!(!tracker.is_deleted(put("r", "dd", "a", 1, "").key()));
    }

    #[test]
    fn reset_forgets_markers() {
        let mut tracker = DeleteTracker::default();
        tracker.add(delete_column("r", "cf", "a", 9).key());
        tracker.reset();
        assert!(!tracker.is_deleted(put("s", "cf", "a", 1, "").key()));
    }
}
