//! Column selection: which `(family, qualifier)` pairs a scan wants, and the
//! per-cell predicate derived from it.

mod matcher;

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use regex::bytes::Regex;

pub use self::matcher::ColumnMatcher;

/// Columns requested by a scan.
#[derive(Clone, Debug, Default)]
pub enum ColumnSelection {
    /// Every column of every family.
    #[default]
    All,
    /// A whole family, or a family filtered by a qualifier pattern.
    Wildcard(WildcardColumns),
    /// A fixed set of named columns.
    Explicit(ExplicitColumns),
}

impl ColumnSelection {
    /// Select every qualifier of `family`.
    pub fn family(family: impl Into<Bytes>) -> Self {
        ColumnSelection::Wildcard(WildcardColumns::Family(family.into()))
    }

    /// Select qualifiers of `family` matching `pattern`.
    ///
    /// The pattern is unanchored: it matches if it occurs anywhere in the
    /// qualifier.
    pub fn pattern(family: impl Into<Bytes>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(ColumnSelection::Wildcard(WildcardColumns::Pattern {
            family: family.into(),
            qualifier: Regex::new(pattern)?,
        }))
    }

    /// Select exactly the listed `(family, qualifier)` pairs.
    pub fn explicit<F, Q, I>(columns: I) -> Self
    where
        F: Into<Bytes>,
        Q: Into<Bytes>,
        I: IntoIterator<Item = (F, Q)>,
    {
        ColumnSelection::Explicit(columns.into_iter().collect())
    }

    /// Whether the selection matches columns by family or pattern rather
    /// than by name.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, ColumnSelection::Explicit(_))
    }
}

/// Family-level column selection.
#[derive(Clone, Debug)]
pub enum WildcardColumns {
    /// Any qualifier of the family.
    Family(Bytes),
    /// Qualifiers of `family` matching `qualifier`.
    Pattern {
        /// Family the pattern applies to.
        family: Bytes,
        /// Byte regex tested against each qualifier.
        qualifier: Regex,
    },
}

impl WildcardColumns {
    /// Family this selection is scoped to.
    pub fn family(&self) -> &Bytes {
        match self {
            WildcardColumns::Family(family) => family,
            WildcardColumns::Pattern { family, .. } => family,
        }
    }
}

/// Named `(family, qualifier)` pairs, grouped by family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplicitColumns {
    columns: BTreeMap<Bytes, BTreeSet<Bytes>>,
}

impl ExplicitColumns {
    /// Empty selection; matches nothing until columns are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `family:qualifier` to the selection.
    pub fn with(mut self, family: impl Into<Bytes>, qualifier: impl Into<Bytes>) -> Self {
        self.insert(family, qualifier);
        self
    }

    /// Add `family:qualifier` to the selection.
    pub fn insert(&mut self, family: impl Into<Bytes>, qualifier: impl Into<Bytes>) {
        self.columns
            .entry(family.into())
            .or_default()
            .insert(qualifier.into());
    }

    /// Whether `family:qualifier` was requested.
    pub fn contains(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.columns
            .get(family)
            .is_some_and(|qualifiers| qualifiers.contains(qualifier))
    }

    /// Whether any column of `family` was requested.
    pub fn contains_family(&self, family: &[u8]) -> bool {
        self.columns.contains_key(family)
    }

    /// Number of requested columns.
    pub fn len(&self) -> usize {
        self.columns.values().map(BTreeSet::len).sum()
    }

    /// Whether no column was requested.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<F, Q> FromIterator<(F, Q)> for ExplicitColumns
where
    F: Into<Bytes>,
    Q: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (F, Q)>>(iter: I) -> Self {
        let mut columns = ExplicitColumns::new();
        for (family, qualifier) in iter {
            columns.insert(family, qualifier);
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_columns_group_by_family() {
        let columns: ExplicitColumns = [("cf", "a"), ("cf", "b"), ("meta", "a"), ("cf", "a")]
            .into_iter()
            .collect();
        assert_eq!(columns.len(), 3);
        assert!(columns.contains(b"cf", b"b"));
        assert!(!columns.contains(b"cf", b"c"));
        assert!(columns.contains_family(b"meta"));
        assert!(!columns.contains_family(b"other"));
    }

    #[test]
    fn selection_modes() {
        assert!(ColumnSelection::All.is_wildcard());
        assert!(ColumnSelection::family("cf").is_wildcard());
        assert!(ColumnSelection::pattern("cf", "^a").expect("regex").is_wildcard());
        assert!(!ColumnSelection::explicit([("cf", "a")]).is_wildcard());
    }

    #[test]
    fn bad_pattern_is_reported() {
        assert!(ColumnSelection::pattern("cf", "(unclosed").is_err());
    }
}
