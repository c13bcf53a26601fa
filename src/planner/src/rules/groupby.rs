use super::{Rewrite, Rule, RuleName};
use crate::factory::Factory;
use crate::memo::Expr;
use ast::Operator;

/// A distinct on without aggregates over columns that are already unique is a
/// no-op, at most it needs to narrow the columns.
pub(super) const ELIMINATE_DISTINCT_ON: Rule = Rule {
    name: RuleName::EliminateDistinctOn,
    matches: |f, e| {
        let aggregations = e.group(1);
        f.op(aggregations) == Operator::Aggregations
            && f.list_of(aggregations).is_empty()
            && grouping_cols_are_key(f, e)
    },
    replace: |f, e| {
        let input = e.group(0);
        let grouping_cols = match f.private(e.private(2)).as_group_by() {
            Some(def) => def.grouping_cols.clone(),
            None => return Ok(Rewrite::Group(input)),
        };
        if f.relational(input).output_cols == grouping_cols {
            Ok(Rewrite::Group(input))
        } else {
            Ok(Rewrite::Group(f.construct_simple_project(input, grouping_cols)?))
        }
    },
};

fn grouping_cols_are_key(f: &Factory, e: &Expr) -> bool {
    match f.private(e.private(2)).as_group_by() {
        Some(def) => f.relational(e.group(0)).cols_are_strong_key(&def.grouping_cols),
        None => false,
    }
}
