//! The rewrite rules the factory applies while constructing expressions.
//!
//! Every rule is a pair of plain functions, `matches` decides whether the rule
//! applies to an about to be constructed expression and `replace` produces the
//! replacement. Rules are looked up by operator and tried in a fixed order, the
//! first to match wins.
mod boolean;
mod comp;
mod groupby;
mod join;
mod limit;
pub(crate) mod list;
mod numeric;
mod project;
mod scalar;
mod select;

use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId};
use ast::Operator;
use std::fmt::{Display, Formatter};

pub type MatchFn = fn(&Factory, &Expr) -> bool;
pub type ReplaceFn = fn(&mut Factory, &Expr) -> Result<Rewrite, NormError>;

/// What a rule replaces the expression with.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Rewrite {
    /// An existing group, ie one of the expression's own children.
    Group(GroupId),
    /// A new expression which is constructed (and normalized) in turn.
    Construct(Expr),
}

#[derive(Copy, Clone)]
pub struct Rule {
    pub name: RuleName,
    pub matches: MatchFn,
    pub replace: ReplaceFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Rule[{}]", self.name))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RuleName {
    // Boolean
    SimplifyAnd,
    SimplifyOr,
    SimplifyFilters,
    EliminateAnd,
    EliminateOr,
    EnsureSortedUniqueAnd,
    EnsureSortedUniqueOr,
    EnsureSortedUniqueFilters,
    FoldNotTrue,
    FoldNotFalse,
    EliminateNot,
    NegateComparison,
    NegateAnd,
    NegateOr,

    // Comparison
    NormalizeTupleEquality,
    CommuteConst,
    CommuteConstInequality,
    NormalizeInConst,
    FoldNullComparison,
    FoldNullInEmpty,
    FoldInNull,

    // Scalar
    NormalizeConstBool,
    NormalizeConstNull,
    SimplifyCoalesce,
    EliminateCoalesce,
    FoldNullUnary,
    FoldNullBinary,
    EliminateExistsProject,

    // Numeric
    FoldPlusZero,
    FoldZeroPlus,
    FoldMinusZero,
    FoldMultOne,
    FoldOneMult,
    FoldDivOne,
    FoldBinary,
    FoldUnary,

    // Select
    EnsureSelectFilters,
    EliminateSelect,
    MergeSelects,
    PushSelectIntoJoinLeft,
    PushSelectIntoJoinRight,

    // Join
    EnsureJoinFilters,
    PushFilterIntoJoinLeft,
    PushFilterIntoJoinRight,
    SimplifyLeftJoin,
    SimplifyRightJoin,

    EliminateDistinctOn,
    EliminateProject,
    MergeProjects,
    EliminateLimit,
    EliminateOffset,

    /// A rule registered by the user of the factory.
    Custom(&'static str),
}

impl Display for RuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleName::Custom(name) => f.write_str(name),
            other => std::fmt::Debug::fmt(other, f),
        }
    }
}

/// The built in rules for an operator in the order they are tried.
pub(crate) fn rules_for(op: Operator) -> &'static [Rule] {
    match op {
        Operator::And => &[
            boolean::SIMPLIFY_AND,
            boolean::ELIMINATE_AND,
            boolean::ENSURE_SORTED_UNIQUE_AND,
        ],
        Operator::Or => &[
            boolean::SIMPLIFY_OR,
            boolean::ELIMINATE_OR,
            boolean::ENSURE_SORTED_UNIQUE_OR,
        ],
        Operator::Filters => &[boolean::SIMPLIFY_FILTERS, boolean::ENSURE_SORTED_UNIQUE_FILTERS],
        Operator::Not => &[
            scalar::FOLD_NULL_UNARY,
            boolean::FOLD_NOT_TRUE,
            boolean::FOLD_NOT_FALSE,
            boolean::ELIMINATE_NOT,
            boolean::NEGATE_COMPARISON,
            boolean::NEGATE_AND,
            boolean::NEGATE_OR,
        ],
        Operator::Eq => &[
            comp::FOLD_NULL_COMPARISON,
            comp::NORMALIZE_TUPLE_EQUALITY,
            numeric::FOLD_BINARY,
            comp::COMMUTE_CONST,
        ],
        Operator::Ne | Operator::Is | Operator::IsNot => &[
            comp::FOLD_NULL_COMPARISON,
            numeric::FOLD_BINARY,
            comp::COMMUTE_CONST,
        ],
        Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => &[
            comp::FOLD_NULL_COMPARISON,
            numeric::FOLD_BINARY,
            comp::COMMUTE_CONST_INEQUALITY,
        ],
        Operator::In | Operator::NotIn => {
            &[
                comp::FOLD_NULL_IN_EMPTY,
                comp::FOLD_NULL_COMPARISON,
                comp::NORMALIZE_IN_CONST,
                comp::FOLD_IN_NULL,
            ]
        }
        Operator::Const => &[scalar::NORMALIZE_CONST_BOOL, scalar::NORMALIZE_CONST_NULL],
        Operator::Coalesce => &[scalar::ELIMINATE_COALESCE, scalar::SIMPLIFY_COALESCE],
        Operator::Exists => &[scalar::ELIMINATE_EXISTS_PROJECT],
        Operator::Plus => &[
            scalar::FOLD_NULL_BINARY,
            numeric::FOLD_BINARY,
            numeric::FOLD_PLUS_ZERO,
            numeric::FOLD_ZERO_PLUS,
            comp::COMMUTE_CONST,
        ],
        Operator::Minus => &[
            scalar::FOLD_NULL_BINARY,
            numeric::FOLD_BINARY,
            numeric::FOLD_MINUS_ZERO,
        ],
        Operator::Mult => &[
            scalar::FOLD_NULL_BINARY,
            numeric::FOLD_BINARY,
            numeric::FOLD_MULT_ONE,
            numeric::FOLD_ONE_MULT,
            comp::COMMUTE_CONST,
        ],
        Operator::Div => &[
            scalar::FOLD_NULL_BINARY,
            numeric::FOLD_BINARY,
            numeric::FOLD_DIV_ONE,
        ],
        Operator::Concat => &[scalar::FOLD_NULL_BINARY, numeric::FOLD_BINARY],
        Operator::UnaryMinus => &[scalar::FOLD_NULL_UNARY, numeric::FOLD_UNARY],
        Operator::Select => &[
            select::ENSURE_SELECT_FILTERS,
            select::ELIMINATE_SELECT,
            select::MERGE_SELECTS,
            select::PUSH_SELECT_INTO_JOIN_LEFT,
            select::PUSH_SELECT_INTO_JOIN_RIGHT,
        ],
        Operator::InnerJoin
        | Operator::InnerJoinApply
        | Operator::LeftJoin
        | Operator::LeftJoinApply
        | Operator::RightJoin
        | Operator::RightJoinApply
        | Operator::FullJoin
        | Operator::FullJoinApply => &[
            join::ENSURE_JOIN_FILTERS,
            join::PUSH_FILTER_INTO_JOIN_LEFT,
            join::PUSH_FILTER_INTO_JOIN_RIGHT,
            join::SIMPLIFY_LEFT_JOIN,
            join::SIMPLIFY_RIGHT_JOIN,
        ],
        Operator::SemiJoin | Operator::AntiJoin => &[join::ENSURE_JOIN_FILTERS],
        Operator::DistinctOn => &[groupby::ELIMINATE_DISTINCT_ON],
        Operator::Project => &[project::ELIMINATE_PROJECT, project::MERGE_PROJECTS],
        Operator::Limit => &[limit::ELIMINATE_LIMIT],
        Operator::Offset => &[limit::ELIMINATE_OFFSET],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_display() {
        assert_eq!(RuleName::SimplifyAnd.to_string(), "SimplifyAnd");
        assert_eq!(RuleName::Custom("CommutePlus").to_string(), "CommutePlus");
    }

    #[test]
    fn test_rules_for() {
        let names: Vec<_> = rules_for(Operator::And).iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                RuleName::SimplifyAnd,
                RuleName::EliminateAnd,
                RuleName::EnsureSortedUniqueAnd
            ]
        );
        assert!(rules_for(Operator::Scan).is_empty());
        assert!(rules_for(Operator::Sort).is_empty());
    }
}
