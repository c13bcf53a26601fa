use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::iter::FromIterator;

/// Identifies a column within a planning session, ids start at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColumnId(pub u32);

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies a table referenced by the query, ids start at 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TableId(pub u32);

/// An ordered list of columns, ie the columns produced by a values clause.
pub type ColList = Vec<ColumnId>;

/// An unordered set of columns.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ColSet(BTreeSet<ColumnId>);

impl ColSet {
    pub fn new() -> Self {
        ColSet::default()
    }

    pub fn insert(&mut self, column: ColumnId) {
        self.0.insert(column);
    }

    pub fn contains(&self, column: ColumnId) -> bool {
        self.0.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ColumnId> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &ColSet) -> ColSet {
        self.0.union(&other.0).copied().collect()
    }

    pub fn intersection(&self, other: &ColSet) -> ColSet {
        self.0.intersection(&other.0).copied().collect()
    }

    pub fn difference(&self, other: &ColSet) -> ColSet {
        self.0.difference(&other.0).copied().collect()
    }

    pub fn union_with(&mut self, other: &ColSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn is_subset(&self, other: &ColSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn intersects(&self, other: &ColSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }
}

impl FromIterator<ColumnId> for ColSet {
    fn from_iter<T: IntoIterator<Item = ColumnId>>(iter: T) -> Self {
        ColSet(iter.into_iter().collect())
    }
}

impl From<&[ColumnId]> for ColSet {
    fn from(list: &[ColumnId]) -> Self {
        list.iter().copied().collect()
    }
}

impl Display for ColSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cols = self.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        f.write_fmt(format_args!("({})", cols.join(",")))
    }
}
