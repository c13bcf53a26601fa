use crate::private::PrivateKind;
use std::fmt::{Display, Formatter};

/// Every operator the memo can hold. Relational operators produce rows, scalar
/// operators produce a single value per row.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Operator {
    // Relational
    Scan,
    Values,
    Select,
    Project,
    InnerJoin,
    LeftJoin,
    RightJoin,
    FullJoin,
    SemiJoin,
    AntiJoin,
    InnerJoinApply,
    LeftJoinApply,
    RightJoinApply,
    FullJoinApply,
    GroupBy,
    DistinctOn,
    Limit,
    Offset,
    Sort,
    RowNumber,

    // Scalar
    Variable,
    Const,
    Null,
    True,
    False,
    And,
    Or,
    Not,
    Filters,
    Tuple,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    In,
    NotIn,
    Plus,
    Minus,
    Mult,
    Div,
    Concat,
    UnaryMinus,
    Coalesce,
    Exists,
    Subquery,
    Projections,
    Aggregations,
    CountRows,
    Sum,
    Min,
    Max,
}

/// What an operand slot of an operator holds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OperandKind {
    Relational,
    Scalar,
    List,
    Private(PrivateKind),
}

use OperandKind::*;

const SCAN: &[OperandKind] = &[Private(PrivateKind::Scan)];
const VALUES: &[OperandKind] = &[List, Private(PrivateKind::ColList)];
const REL_SCALAR: &[OperandKind] = &[Relational, Scalar];
const JOIN: &[OperandKind] = &[Relational, Relational, Scalar];
const GROUP_BY: &[OperandKind] = &[Relational, Scalar, Private(PrivateKind::GroupBy)];
const SORT: &[OperandKind] = &[Relational, Private(PrivateKind::Ordering)];
const ROW_NUMBER: &[OperandKind] = &[Relational, Private(PrivateKind::RowNumber)];
const VARIABLE: &[OperandKind] = &[Private(PrivateKind::Column)];
const CONST: &[OperandKind] = &[Private(PrivateKind::Constant)];
const NULL: &[OperandKind] = &[Private(PrivateKind::Type)];
const NONE: &[OperandKind] = &[];
const LIST: &[OperandKind] = &[List];
const UNARY: &[OperandKind] = &[Scalar];
const BINARY: &[OperandKind] = &[Scalar, Scalar];
const EXISTS: &[OperandKind] = &[Relational];
const SUBQUERY: &[OperandKind] = &[Relational, Private(PrivateKind::Column)];
const PROJECTIONS: &[OperandKind] = &[List, Private(PrivateKind::Projections)];
const AGGREGATIONS: &[OperandKind] = &[List, Private(PrivateKind::ColList)];

impl Operator {
    /// The operand slots this operator is constructed from, in order.
    pub fn shape(self) -> &'static [OperandKind] {
        match self {
            Operator::Scan => SCAN,
            Operator::Values => VALUES,
            Operator::Select | Operator::Project | Operator::Limit | Operator::Offset => {
                REL_SCALAR
            }
            Operator::InnerJoin
            | Operator::LeftJoin
            | Operator::RightJoin
            | Operator::FullJoin
            | Operator::SemiJoin
            | Operator::AntiJoin
            | Operator::InnerJoinApply
            | Operator::LeftJoinApply
            | Operator::RightJoinApply
            | Operator::FullJoinApply => JOIN,
            Operator::GroupBy | Operator::DistinctOn => GROUP_BY,
            Operator::Sort => SORT,
            Operator::RowNumber => ROW_NUMBER,
            Operator::Variable => VARIABLE,
            Operator::Const => CONST,
            Operator::Null => NULL,
            Operator::True | Operator::False | Operator::CountRows => NONE,
            Operator::And
            | Operator::Or
            | Operator::Filters
            | Operator::Tuple
            | Operator::Coalesce => LIST,
            Operator::Not
            | Operator::UnaryMinus
            | Operator::Sum
            | Operator::Min
            | Operator::Max => UNARY,
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Le
            | Operator::Gt
            | Operator::Ge
            | Operator::Is
            | Operator::IsNot
            | Operator::In
            | Operator::NotIn
            | Operator::Plus
            | Operator::Minus
            | Operator::Mult
            | Operator::Div
            | Operator::Concat => BINARY,
            Operator::Exists => EXISTS,
            Operator::Subquery => SUBQUERY,
            Operator::Projections => PROJECTIONS,
            Operator::Aggregations => AGGREGATIONS,
        }
    }

    pub fn is_relational(self) -> bool {
        self <= Operator::RowNumber
    }

    pub fn is_scalar(self) -> bool {
        !self.is_relational()
    }

    pub fn is_join(self) -> bool {
        Operator::InnerJoin <= self && self <= Operator::FullJoinApply
    }

    pub fn is_join_apply(self) -> bool {
        Operator::InnerJoinApply <= self && self <= Operator::FullJoinApply
    }

    /// Constant valued operators, these sort before everything else in canonical lists.
    pub fn is_const_value(self) -> bool {
        matches!(
            self,
            Operator::Const | Operator::Null | Operator::True | Operator::False
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Lt
                | Operator::Le
                | Operator::Gt
                | Operator::Ge
                | Operator::Is
                | Operator::IsNot
                | Operator::In
                | Operator::NotIn
        )
    }

    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            Operator::CountRows | Operator::Sum | Operator::Min | Operator::Max
        )
    }

    /// The name the operator's overloads are registered under in the function registry.
    pub fn function_name(self) -> Option<&'static str> {
        let name = match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mult => "*",
            Operator::Div => "/",
            Operator::Concat => "||",
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Not => "not",
            Operator::UnaryMinus => "neg",
            _ => return None,
        };
        Some(name)
    }

    /// The comparison that produces the logical inverse of this one.
    pub fn negate(self) -> Option<Operator> {
        let negated = match self {
            Operator::Eq => Operator::Ne,
            Operator::Ne => Operator::Eq,
            Operator::Lt => Operator::Ge,
            Operator::Ge => Operator::Lt,
            Operator::Le => Operator::Gt,
            Operator::Gt => Operator::Le,
            Operator::Is => Operator::IsNot,
            Operator::IsNot => Operator::Is,
            Operator::In => Operator::NotIn,
            Operator::NotIn => Operator::In,
            _ => return None,
        };
        Some(negated)
    }

    /// The comparison to use when the operands are swapped, ie `a < b` becomes `b > a`.
    pub fn commute_inequality(self) -> Option<Operator> {
        let commuted = match self {
            Operator::Eq => Operator::Eq,
            Operator::Ne => Operator::Ne,
            Operator::Lt => Operator::Gt,
            Operator::Gt => Operator::Lt,
            Operator::Le => Operator::Ge,
            Operator::Ge => Operator::Le,
            Operator::Is => Operator::Is,
            Operator::IsNot => Operator::IsNot,
            _ => return None,
        };
        Some(commuted)
    }

    /// Lower case dashed name used in explain output, ie `inner-join`.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Scan => "scan",
            Operator::Values => "values",
            Operator::Select => "select",
            Operator::Project => "project",
            Operator::InnerJoin => "inner-join",
            Operator::LeftJoin => "left-join",
            Operator::RightJoin => "right-join",
            Operator::FullJoin => "full-join",
            Operator::SemiJoin => "semi-join",
            Operator::AntiJoin => "anti-join",
            Operator::InnerJoinApply => "inner-join-apply",
            Operator::LeftJoinApply => "left-join-apply",
            Operator::RightJoinApply => "right-join-apply",
            Operator::FullJoinApply => "full-join-apply",
            Operator::GroupBy => "group-by",
            Operator::DistinctOn => "distinct-on",
            Operator::Limit => "limit",
            Operator::Offset => "offset",
            Operator::Sort => "sort",
            Operator::RowNumber => "row-number",
            Operator::Variable => "variable",
            Operator::Const => "const",
            Operator::Null => "null",
            Operator::True => "true",
            Operator::False => "false",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Filters => "filters",
            Operator::Tuple => "tuple",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Is => "is",
            Operator::IsNot => "is-not",
            Operator::In => "in",
            Operator::NotIn => "not-in",
            Operator::Plus => "plus",
            Operator::Minus => "minus",
            Operator::Mult => "mult",
            Operator::Div => "div",
            Operator::Concat => "concat",
            Operator::UnaryMinus => "unary-minus",
            Operator::Coalesce => "coalesce",
            Operator::Exists => "exists",
            Operator::Subquery => "subquery",
            Operator::Projections => "projections",
            Operator::Aggregations => "aggregations",
            Operator::CountRows => "count-rows",
            Operator::Sum => "sum",
            Operator::Min => "min",
            Operator::Max => "max",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
