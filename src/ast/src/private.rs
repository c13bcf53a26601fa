use crate::columns::{ColList, ColSet, ColumnId, TableId};
use data::{DataType, Datum};
use std::fmt::{Display, Formatter};

/// The non group operands of an operator. Privates are interned by the memo so
/// structurally equal payloads always share a handle.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Private {
    Column(ColumnId),
    ColList(ColList),
    Constant(Datum, DataType),
    Type(DataType),
    Scan(ScanDef),
    Projections(ProjectionsDef),
    GroupBy(GroupByDef),
    Ordering(Ordering),
    RowNumber(RowNumberDef),
}

/// Used by operator shapes to declare which private an operand slot holds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrivateKind {
    Column,
    ColList,
    Constant,
    Type,
    Scan,
    Projections,
    GroupBy,
    Ordering,
    RowNumber,
}

impl Private {
    pub fn kind(&self) -> PrivateKind {
        match self {
            Private::Column(_) => PrivateKind::Column,
            Private::ColList(_) => PrivateKind::ColList,
            Private::Constant(..) => PrivateKind::Constant,
            Private::Type(_) => PrivateKind::Type,
            Private::Scan(_) => PrivateKind::Scan,
            Private::Projections(_) => PrivateKind::Projections,
            Private::GroupBy(_) => PrivateKind::GroupBy,
            Private::Ordering(_) => PrivateKind::Ordering,
            Private::RowNumber(_) => PrivateKind::RowNumber,
        }
    }

    pub fn as_column(&self) -> Option<ColumnId> {
        if let Private::Column(column) = self {
            Some(*column)
        } else {
            None
        }
    }

    pub fn as_col_list(&self) -> Option<&ColList> {
        if let Private::ColList(cols) = self {
            Some(cols)
        } else {
            None
        }
    }

    pub fn as_constant(&self) -> Option<(&Datum, DataType)> {
        if let Private::Constant(value, datatype) = self {
            Some((value, *datatype))
        } else {
            None
        }
    }

    pub fn as_type(&self) -> Option<DataType> {
        if let Private::Type(datatype) = self {
            Some(*datatype)
        } else {
            None
        }
    }

    pub fn as_scan(&self) -> Option<&ScanDef> {
        if let Private::Scan(def) = self {
            Some(def)
        } else {
            None
        }
    }

    pub fn as_projections(&self) -> Option<&ProjectionsDef> {
        if let Private::Projections(def) = self {
            Some(def)
        } else {
            None
        }
    }

    pub fn as_group_by(&self) -> Option<&GroupByDef> {
        if let Private::GroupBy(def) = self {
            Some(def)
        } else {
            None
        }
    }

    pub fn as_ordering(&self) -> Option<&Ordering> {
        if let Private::Ordering(ordering) = self {
            Some(ordering)
        } else {
            None
        }
    }

    pub fn as_row_number(&self) -> Option<&RowNumberDef> {
        if let Private::RowNumber(def) = self {
            Some(def)
        } else {
            None
        }
    }
}

/// Which table to scan and which of its columns are needed.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ScanDef {
    pub table: TableId,
    pub cols: ColSet,
}

/// Describes the columns output by a projections operator.
/// Passthrough columns are copied from the input, synthesized columns are computed
/// by the projection's list elements, in the same order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct ProjectionsDef {
    pub passthrough: ColSet,
    pub synthesized: ColList,
}

impl ProjectionsDef {
    pub fn all_cols(&self) -> ColSet {
        let mut cols = self.passthrough.clone();
        cols.union_with(&ColSet::from(self.synthesized.as_slice()));
        cols
    }
}

/// The grouping columns for a group by or distinct on. Distinct on also carries
/// the ordering used to pick which row of each group survives.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct GroupByDef {
    pub grouping_cols: ColSet,
    pub ordering: Ordering,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct OrderingColumn {
    pub column: ColumnId,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Ordering(pub Vec<OrderingColumn>);

impl Ordering {
    pub fn asc(columns: &[ColumnId]) -> Self {
        Ordering(
            columns
                .iter()
                .map(|column| OrderingColumn {
                    column: *column,
                    descending: false,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn col_set(&self) -> ColSet {
        self.0.iter().map(|oc| oc.column).collect()
    }
}

impl Display for Ordering {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cols = self
            .0
            .iter()
            .map(|oc| format!("{}{}", if oc.descending { "-" } else { "+" }, oc.column))
            .collect::<Vec<_>>();
        f.write_str(&cols.join(","))
    }
}

/// The column a row number operator numbers its rows into.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct RowNumberDef {
    pub column: ColumnId,
}
