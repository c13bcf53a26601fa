use crate::memo::GroupId;
use ast::{ColumnId, OperandKind, Operator, TableId};
use catalog::CatalogError;
use functions::registry::FunctionResolutionError;
use thiserror::Error;

/// An error from the normalizer. Every variant is a defect in the caller or in
/// the rules, user facing errors are caught before construction. Once one has been
/// returned the factory should be discarded.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum NormError {
    #[error("{op} expects {expected} operands, got {actual}")]
    ShapeMismatch {
        op: Operator,
        expected: usize,
        actual: usize,
    },
    #[error("Operand {idx} of {op} should be {expected:?}, got {actual}")]
    OperandKind {
        op: Operator,
        idx: usize,
        expected: OperandKind,
        actual: String,
    },
    #[error("Tuple length mismatch, left has {0} elements, right has {1}")]
    TupleLengthMismatch(usize, usize),
    #[error(transparent)]
    NoOverload(#[from] FunctionResolutionError),
    #[error("Column {0} is not registered in the metadata")]
    UnknownColumn(ColumnId),
    #[error("Table {0:?} is not registered in the metadata")]
    UnknownTable(TableId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Rewrite depth exceeded {0} nested rule applications")]
    RewriteDepthExceeded(usize),
    #[error("Invalid {op} expression{}: {reason}", in_group(.group))]
    InvalidExpression {
        op: Operator,
        /// The offending group, `None` when the expression was never memoized.
        group: Option<GroupId>,
        reason: String,
    },
}

fn in_group(group: &Option<GroupId>) -> String {
    group.map(|group| format!(" in {}", group)).unwrap_or_default()
}
