use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId, Operand};
use ast::Operator;

/// Select and join filters are always a filters list, or a constant true/false.
pub(super) const ENSURE_SELECT_FILTERS: Rule = Rule {
    name: RuleName::EnsureSelectFilters,
    matches: |f, e| needs_filters(f, e.group(1)),
    replace: |f, e| {
        let filters = f.wrap_in_filters(e.group(1))?;
        Ok(Rewrite::Construct(Expr::new(
            Operator::Select,
            vec![Operand::Group(e.group(0)), Operand::Group(filters)],
        )))
    },
};

pub(super) const ELIMINATE_SELECT: Rule = Rule {
    name: RuleName::EliminateSelect,
    matches: |f, e| f.op(e.group(1)) == Operator::True,
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

pub(super) const MERGE_SELECTS: Rule = Rule {
    name: RuleName::MergeSelects,
    matches: |f, e| f.op(e.group(0)) == Operator::Select,
    replace: |f, e| {
        let inner = f.expr(e.group(0)).clone();
        let filters = f.concat_filters(inner.group(1), e.group(1))?;
        Ok(Rewrite::Construct(Expr::new(
            Operator::Select,
            vec![Operand::Group(inner.group(0)), Operand::Group(filters)],
        )))
    },
};

pub(super) const PUSH_SELECT_INTO_JOIN_LEFT: Rule = Rule {
    name: RuleName::PushSelectIntoJoinLeft,
    matches: |f, e| can_push_into_join(f, e, Side::Left),
    replace: |f, e| push_into_join(f, e, Side::Left),
};

pub(super) const PUSH_SELECT_INTO_JOIN_RIGHT: Rule = Rule {
    name: RuleName::PushSelectIntoJoinRight,
    matches: |f, e| can_push_into_join(f, e, Side::Right),
    replace: |f, e| push_into_join(f, e, Side::Right),
};

pub(super) fn needs_filters(f: &Factory, filter: GroupId) -> bool {
    !matches!(
        f.op(filter),
        Operator::Filters | Operator::True | Operator::False
    )
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Side {
    Left,
    Right,
}

impl Side {
    /// The index of this side's input within a join's operands.
    pub(super) fn operand(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A where condition can be pushed below a join into an input whose rows the
/// join never null extends.
fn can_push_into_join(f: &Factory, e: &Expr, side: Side) -> bool {
    let join = e.group(0);
    let pushable = match (f.op(join), side) {
        (Operator::InnerJoin, _) | (Operator::InnerJoinApply, _) => true,
        (Operator::LeftJoin, Side::Left) | (Operator::LeftJoinApply, Side::Left) => true,
        (Operator::RightJoin, Side::Right) | (Operator::RightJoinApply, Side::Right) => true,
        _ => false,
    };
    if !pushable || f.op(e.group(1)) != Operator::Filters {
        return false;
    }
    let input = f.expr(join).group(side.operand());
    f.list_of(e.group(1))
        .iter()
        .any(|condition| f.is_pushable_condition(*condition, input))
}

/// select (join a b on) where (bound by a) and rest
/// => select (join (select a where (bound by a)) b on) where rest
fn push_into_join(f: &mut Factory, e: &Expr, side: Side) -> Result<Rewrite, NormError> {
    let join = f.expr(e.group(0)).clone();
    let input = join.group(side.operand());
    let (bound, unbound) = f.partition_conditions(e.group(1), input);

    let bound = f.construct_filters(bound)?;
    let pushed = f.construct_select(input, bound)?;

    let mut operands = join.operands.clone();
    operands[side.operand()] = Operand::Group(pushed);
    let new_join = f.construct(Expr::new(join.op, operands))?;

    let remaining = f.construct_filters(unbound)?;
    Ok(Rewrite::Construct(Expr::new(
        Operator::Select,
        vec![Operand::Group(new_join), Operand::Group(remaining)],
    )))
}
