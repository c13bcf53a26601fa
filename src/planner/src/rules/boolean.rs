use super::list::{is_sorted_unique, sorted_unique};
use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, Operand};
use ast::Operator;

pub(super) const SIMPLIFY_AND: Rule = Rule {
    name: RuleName::SimplifyAnd,
    matches: |f, e| needs_simplify(f, e, Operator::And),
    replace: |f, e| simplify_conjunction(f, e, Conjunction::AND),
};

pub(super) const SIMPLIFY_OR: Rule = Rule {
    name: RuleName::SimplifyOr,
    matches: |f, e| needs_simplify(f, e, Operator::Or),
    replace: |f, e| simplify_conjunction(f, e, Conjunction::OR),
};

pub(super) const SIMPLIFY_FILTERS: Rule = Rule {
    name: RuleName::SimplifyFilters,
    matches: |f, e| needs_simplify(f, e, Operator::And),
    replace: |f, e| simplify_conjunction(f, e, Conjunction::FILTERS),
};

pub(super) const ELIMINATE_AND: Rule = Rule {
    name: RuleName::EliminateAnd,
    matches: |f, e| f.list(e.list(0)).len() == 1,
    replace: |f, e| Ok(Rewrite::Group(f.list(e.list(0))[0])),
};

pub(super) const ELIMINATE_OR: Rule = Rule {
    name: RuleName::EliminateOr,
    ..ELIMINATE_AND
};

pub(super) const ENSURE_SORTED_UNIQUE_AND: Rule = Rule {
    name: RuleName::EnsureSortedUniqueAnd,
    matches: |f, e| !is_sorted_unique(f.memo(), f.list(e.list(0))),
    replace: ensure_sorted_unique,
};

pub(super) const ENSURE_SORTED_UNIQUE_OR: Rule = Rule {
    name: RuleName::EnsureSortedUniqueOr,
    ..ENSURE_SORTED_UNIQUE_AND
};

pub(super) const ENSURE_SORTED_UNIQUE_FILTERS: Rule = Rule {
    name: RuleName::EnsureSortedUniqueFilters,
    ..ENSURE_SORTED_UNIQUE_AND
};

pub(super) const FOLD_NOT_TRUE: Rule = Rule {
    name: RuleName::FoldNotTrue,
    matches: |f, e| f.op(e.group(0)) == Operator::True,
    replace: |f, _| Ok(Rewrite::Group(f.construct_false()?)),
};

pub(super) const FOLD_NOT_FALSE: Rule = Rule {
    name: RuleName::FoldNotFalse,
    matches: |f, e| f.op(e.group(0)) == Operator::False,
    replace: |f, _| Ok(Rewrite::Group(f.construct_true()?)),
};

pub(super) const ELIMINATE_NOT: Rule = Rule {
    name: RuleName::EliminateNot,
    matches: |f, e| f.op(e.group(0)) == Operator::Not,
    replace: |f, e| Ok(Rewrite::Group(f.expr(e.group(0)).group(0))),
};

pub(super) const NEGATE_COMPARISON: Rule = Rule {
    name: RuleName::NegateComparison,
    matches: |f, e| f.op(e.group(0)).negate().is_some(),
    replace: |f, e| {
        let input = f.expr(e.group(0)).clone();
        match input.op.negate() {
            Some(negated) => Ok(Rewrite::Construct(Expr::new(negated, input.operands))),
            None => Err(NormError::InvalidExpression {
                op: input.op,
                group: Some(e.group(0)),
                reason: "comparison can't be negated".to_string(),
            }),
        }
    },
};

pub(super) const NEGATE_AND: Rule = Rule {
    name: RuleName::NegateAnd,
    matches: |f, e| f.op(e.group(0)) == Operator::And,
    replace: |f, e| negate_conditions(f, e, Operator::Or),
};

pub(super) const NEGATE_OR: Rule = Rule {
    name: RuleName::NegateOr,
    matches: |f, e| f.op(e.group(0)) == Operator::Or,
    replace: |f, e| negate_conditions(f, e, Operator::And),
};

/// How a list of conditions is combined.
struct Conjunction {
    op: Operator,
    // Nested operator whose conditions get merged into the parent list
    flatten: Operator,
    identity: Operator,
    absorbing: Operator,
    // Filters treat a null condition the same as false
    null_is_absorbing: bool,
}

impl Conjunction {
    const AND: Conjunction = Conjunction {
        op: Operator::And,
        flatten: Operator::And,
        identity: Operator::True,
        absorbing: Operator::False,
        null_is_absorbing: false,
    };
    const OR: Conjunction = Conjunction {
        op: Operator::Or,
        flatten: Operator::Or,
        identity: Operator::False,
        absorbing: Operator::True,
        null_is_absorbing: false,
    };
    const FILTERS: Conjunction = Conjunction {
        op: Operator::Filters,
        flatten: Operator::And,
        identity: Operator::True,
        absorbing: Operator::False,
        null_is_absorbing: true,
    };
}

/// An empty list, a nested list to flatten, or an identity/absorbing element.
fn needs_simplify(f: &Factory, e: &Expr, flatten: Operator) -> bool {
    let items = f.list(e.list(0));
    items.is_empty()
        || items.iter().any(|item| {
            let op = f.op(*item);
            op == flatten
                || op == Operator::True
                || op == Operator::False
                || (e.op == Operator::Filters && op == Operator::Null)
        })
}

/// Flattens one level of nesting, drops identity elements and short circuits on
/// the first absorbing element. This is a single left to right pass, an absorbing
/// element wins no matter how many identity elements came before it.
fn simplify_conjunction(
    f: &mut Factory,
    e: &Expr,
    conjunction: Conjunction,
) -> Result<Rewrite, NormError> {
    let mut kept = vec![];
    for item in f.list(e.list(0)) {
        match f.op(*item) {
            op if op == conjunction.absorbing => return Ok(Rewrite::Group(*item)),
            Operator::Null if conjunction.null_is_absorbing => {
                return Ok(Rewrite::Construct(Expr::new(conjunction.absorbing, vec![])));
            }
            op if op == conjunction.identity => {}
            op if op == conjunction.flatten => kept.extend_from_slice(f.list_of(*item)),
            _ => kept.push(*item),
        }
    }

    if kept.is_empty() {
        return Ok(Rewrite::Construct(Expr::new(conjunction.identity, vec![])));
    }
    let list = f.intern_list(kept);
    Ok(Rewrite::Construct(Expr::new(
        conjunction.op,
        vec![Operand::List(list)],
    )))
}

fn ensure_sorted_unique(f: &mut Factory, e: &Expr) -> Result<Rewrite, NormError> {
    let items = sorted_unique(f.memo(), f.list(e.list(0)));
    let list = f.intern_list(items);
    Ok(Rewrite::Construct(Expr::new(e.op, vec![Operand::List(list)])))
}

/// not (a and b) => (not a) or (not b), and the same the other way around.
fn negate_conditions(f: &mut Factory, e: &Expr, op: Operator) -> Result<Rewrite, NormError> {
    let conditions = f.list_of(e.group(0)).to_vec();
    let mut negated = Vec::with_capacity(conditions.len());
    for condition in conditions {
        negated.push(f.construct_not(condition)?);
    }
    let list = f.intern_list(negated);
    Ok(Rewrite::Construct(Expr::new(op, vec![Operand::List(list)])))
}
