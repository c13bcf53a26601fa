mod builder;
mod cardinality;

pub(crate) use builder::{infer_function_type, PropsBuilder};
pub use cardinality::Cardinality;

use ast::ColSet;
use data::DataType;

/// Logical properties of a group, computed once when the group is created.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LogicalProps {
    Relational(RelationalProps),
    Scalar(ScalarProps),
}

impl LogicalProps {
    pub fn is_relational(&self) -> bool {
        matches!(self, LogicalProps::Relational(_))
    }

    pub fn outer_cols(&self) -> &ColSet {
        match self {
            LogicalProps::Relational(props) => &props.outer_cols,
            LogicalProps::Scalar(props) => &props.outer_cols,
        }
    }

    pub fn has_correlated_subquery(&self) -> bool {
        match self {
            LogicalProps::Relational(props) => props.has_correlated_subquery,
            LogicalProps::Scalar(props) => props.has_correlated_subquery,
        }
    }

    /// Panics for scalar groups, callers are expected to have validated the
    /// operand kind already.
    pub fn relational(&self) -> &RelationalProps {
        match self {
            LogicalProps::Relational(props) => props,
            LogicalProps::Scalar(_) => panic!("Expected relational props, found scalar"),
        }
    }

    pub fn scalar(&self) -> &ScalarProps {
        match self {
            LogicalProps::Scalar(props) => props,
            LogicalProps::Relational(_) => panic!("Expected scalar props, found relational"),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RelationalProps {
    /// Columns produced by the expression.
    pub output_cols: ColSet,
    /// Columns referenced but not produced by the expression or its inputs.
    pub outer_cols: ColSet,
    /// Output columns that can never be null.
    pub not_null_cols: ColSet,
    /// Column sets that are unique across all rows not containing a null.
    /// The list is kept minimal, no key is a superset of another.
    pub weak_keys: Vec<ColSet>,
    pub cardinality: Cardinality,
    pub has_correlated_subquery: bool,
}

impl RelationalProps {
    /// Adds a weak key unless a subset of it is already a key, dropping any
    /// existing keys that the new one makes redundant.
    pub fn add_weak_key(&mut self, key: ColSet) {
        if self.weak_keys.iter().any(|existing| existing.is_subset(&key)) {
            return;
        }
        self.weak_keys.retain(|existing| !key.is_subset(existing));
        self.weak_keys.push(key);
    }

    pub fn strong_keys(&self) -> impl Iterator<Item = &ColSet> + '_ {
        self.weak_keys
            .iter()
            .filter(move |key| key.is_subset(&self.not_null_cols))
    }

    /// The strong key with the fewest columns, ties go to the first added.
    pub fn shortest_strong_key(&self) -> Option<&ColSet> {
        self.strong_keys().fold(None, |shortest: Option<&ColSet>, key| {
            match shortest {
                Some(current) if current.len() <= key.len() => Some(current),
                _ => Some(key),
            }
        })
    }

    /// True if the given columns contain a strong key, ie no two rows share the
    /// same non null values for them.
    pub fn cols_are_strong_key(&self, cols: &ColSet) -> bool {
        self.strong_keys().any(|key| key.is_subset(cols))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScalarProps {
    pub datatype: DataType,
    pub outer_cols: ColSet,
    pub has_correlated_subquery: bool,
}
