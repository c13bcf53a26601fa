use super::select::{needs_filters, Side};
use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, Operand};
use ast::Operator;

pub(super) const ENSURE_JOIN_FILTERS: Rule = Rule {
    name: RuleName::EnsureJoinFilters,
    matches: |f, e| needs_filters(f, e.group(2)),
    replace: |f, e| {
        let filters = f.wrap_in_filters(e.group(2))?;
        let mut operands = e.operands.clone();
        operands[2] = Operand::Group(filters);
        Ok(Rewrite::Construct(Expr::new(e.op, operands)))
    },
};

pub(super) const PUSH_FILTER_INTO_JOIN_LEFT: Rule = Rule {
    name: RuleName::PushFilterIntoJoinLeft,
    matches: |f, e| can_push_filter(f, e, Side::Left),
    replace: |f, e| push_filter(f, e, Side::Left),
};

pub(super) const PUSH_FILTER_INTO_JOIN_RIGHT: Rule = Rule {
    name: RuleName::PushFilterIntoJoinRight,
    matches: |f, e| can_push_filter(f, e, Side::Right),
    replace: |f, e| push_filter(f, e, Side::Right),
};

/// A left join whose right side always matches, ie `left join (select 1) on true`,
/// never null extends so is an inner join.
pub(super) const SIMPLIFY_LEFT_JOIN: Rule = Rule {
    name: RuleName::SimplifyLeftJoin,
    matches: |f, e| {
        matches!(
            e.op,
            Operator::LeftJoin | Operator::LeftJoinApply | Operator::FullJoin | Operator::FullJoinApply
        ) && always_matches(f, e, Side::Right)
    },
    replace: |_, e| {
        let op = match e.op {
            Operator::LeftJoin => Operator::InnerJoin,
            Operator::LeftJoinApply => Operator::InnerJoinApply,
            Operator::FullJoin => Operator::RightJoin,
            _ => Operator::RightJoinApply,
        };
        Ok(Rewrite::Construct(Expr::new(op, e.operands.clone())))
    },
};

pub(super) const SIMPLIFY_RIGHT_JOIN: Rule = Rule {
    name: RuleName::SimplifyRightJoin,
    matches: |f, e| {
        matches!(
            e.op,
            Operator::RightJoin
                | Operator::RightJoinApply
                | Operator::FullJoin
                | Operator::FullJoinApply
        ) && always_matches(f, e, Side::Left)
    },
    replace: |_, e| {
        let op = match e.op {
            Operator::RightJoin => Operator::InnerJoin,
            Operator::RightJoinApply => Operator::InnerJoinApply,
            Operator::FullJoin => Operator::LeftJoin,
            _ => Operator::LeftJoinApply,
        };
        Ok(Rewrite::Construct(Expr::new(op, e.operands.clone())))
    },
};

/// Every row on the other side finds a match on this side when the join condition
/// is true and this side returns at least one uncorrelated row.
fn always_matches(f: &Factory, e: &Expr, side: Side) -> bool {
    let input = e.group(side.operand());
    let props = f.relational(input);
    f.op(e.group(2)) == Operator::True
        && props.outer_cols.is_empty()
        && !props.cardinality.can_be_zero()
}

/// An on condition can be pushed into an input whose rows the join null extends
/// when they don't match, conditions on the other (preserved) side must stay put.
fn can_push_filter(f: &Factory, e: &Expr, side: Side) -> bool {
    let pushable = match (e.op, side) {
        (Operator::InnerJoin, _) | (Operator::InnerJoinApply, _) => true,
        (Operator::RightJoin, Side::Left) | (Operator::RightJoinApply, Side::Left) => true,
        (Operator::LeftJoin, Side::Right) | (Operator::LeftJoinApply, Side::Right) => true,
        _ => false,
    };
    if !pushable || f.op(e.group(2)) != Operator::Filters {
        return false;
    }
    let input = e.group(side.operand());
    f.list_of(e.group(2))
        .iter()
        .any(|condition| f.is_pushable_condition(*condition, input))
}

/// join a b on (bound by a) and rest => join (select a where (bound by a)) b on rest
fn push_filter(f: &mut Factory, e: &Expr, side: Side) -> Result<Rewrite, NormError> {
    let input = e.group(side.operand());
    let (bound, unbound) = f.partition_conditions(e.group(2), input);

    let bound = f.construct_filters(bound)?;
    let pushed = f.construct_select(input, bound)?;
    let on = f.construct_filters(unbound)?;

    let mut operands = e.operands.clone();
    operands[side.operand()] = Operand::Group(pushed);
    operands[2] = Operand::Group(on);
    Ok(Rewrite::Construct(Expr::new(e.op, operands)))
}

#[cfg(test)]
mod tests {
    use crate::error::NormError;
    use crate::factory::Factory;
    use crate::memo::GroupId;
    use ast::{ColSet, ColumnId, Operator, ScanDef};
    use catalog::{Catalog, Column, DEFAULT_DATABASE};
    use data::{DataType, Datum};

    fn scan(factory: &mut Factory, catalog: &Catalog) -> Result<GroupId, NormError> {
        let table = factory
            .metadata_mut()
            .add_catalog_table(catalog, DEFAULT_DATABASE, "ab")?;
        let cols: ColSet = factory.metadata().table(table)?.columns.iter().copied().collect();
        factory.construct_scan(ScanDef { table, cols })
    }

    fn catalog() -> Result<Catalog, NormError> {
        let mut catalog = Catalog::new();
        catalog.create_table(
            DEFAULT_DATABASE,
            "ab",
            vec![
                Column::new("a", DataType::Integer, false),
                Column::new("b", DataType::Integer, true),
            ],
            vec![0],
        )?;
        Ok(catalog)
    }

    /// A single row values clause producing one new column.
    fn one_row(factory: &mut Factory) -> Result<GroupId, NormError> {
        let column = factory.metadata_mut().add_column("one", DataType::Integer);
        let one = factory.construct_const(Datum::from(1))?;
        let row = factory.construct_tuple(vec![one])?;
        factory.construct_values(vec![row], vec![column])
    }

    #[test]
    fn test_on_condition_is_wrapped() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;
        let right = scan(&mut factory, &catalog)?;
        let a = factory.construct_variable(ColumnId(1))?;
        let c = factory.construct_variable(ColumnId(3))?;
        let eq = factory.construct_binary(Operator::Eq, a, c)?;

        let join = factory.construct_join(Operator::InnerJoin, left, right, eq)?;
        let on = factory.expr(join).group(2);
        assert_eq!(factory.op(on), Operator::Filters);
        assert_eq!(factory.list_of(on), &[eq]);
        Ok(())
    }

    #[test]
    fn test_push_filter_into_null_extended_side() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;
        let right = scan(&mut factory, &catalog)?;
        let d = factory.construct_variable(ColumnId(4))?;
        let b = factory.construct_variable(ColumnId(2))?;
        let five = factory.construct_const(Datum::from(5))?;
        let right_cond = factory.construct_binary(Operator::Gt, d, five)?;
        let left_cond = factory.construct_binary(Operator::Gt, b, five)?;
        let on = factory.construct_filters(vec![left_cond, right_cond])?;

        let join = factory.construct_join(Operator::LeftJoin, left, right, on)?;
        let join_expr = factory.expr(join).clone();
        assert_eq!(join_expr.op, Operator::LeftJoin);
        // The condition on the preserved side stays in the on clause.
        assert_eq!(join_expr.group(0), left);
        assert_eq!(factory.list_of(join_expr.group(2)), &[left_cond]);

        let pushed = join_expr.group(1);
        assert_eq!(factory.op(pushed), Operator::Select);
        assert_eq!(factory.expr(pushed).group(0), right);
        assert_eq!(factory.list_of(factory.expr(pushed).group(1)), &[right_cond]);
        Ok(())
    }

    #[test]
    fn test_inner_join_pushes_both_sides() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;
        let right = scan(&mut factory, &catalog)?;
        let b = factory.construct_variable(ColumnId(2))?;
        let d = factory.construct_variable(ColumnId(4))?;
        let five = factory.construct_const(Datum::from(5))?;
        let left_cond = factory.construct_binary(Operator::Gt, b, five)?;
        let right_cond = factory.construct_binary(Operator::Gt, d, five)?;
        let on = factory.construct_filters(vec![left_cond, right_cond])?;

        let join = factory.construct_join(Operator::InnerJoin, left, right, on)?;
        let join_expr = factory.expr(join).clone();
        assert_eq!(factory.op(join_expr.group(0)), Operator::Select);
        assert_eq!(factory.op(join_expr.group(1)), Operator::Select);
        assert_eq!(factory.op(join_expr.group(2)), Operator::True);
        Ok(())
    }

    #[test]
    fn test_simplify_left_join() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;
        let right = one_row(&mut factory)?;
        let t = factory.construct_true()?;

        let join = factory.construct_join(Operator::LeftJoin, left, right, t)?;
        assert_eq!(factory.op(join), Operator::InnerJoin);

        // Both sides of a full join need rows before it's an inner join.
        let full = factory.construct_join(Operator::FullJoin, left, right, t)?;
        assert_eq!(factory.op(full), Operator::RightJoin);
        let full = factory.construct_join(Operator::FullJoin, right, left, t)?;
        assert_eq!(factory.op(full), Operator::LeftJoin);
        Ok(())
    }

    #[test]
    fn test_no_simplify_when_right_can_be_empty() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;
        let right = scan(&mut factory, &catalog)?;
        let t = factory.construct_true()?;

        let join = factory.construct_join(Operator::LeftJoin, left, right, t)?;
        assert_eq!(factory.op(join), Operator::LeftJoin);
        Ok(())
    }

    #[test]
    fn test_no_simplify_when_right_limit_is_not_literal() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let catalog = catalog()?;
        let left = scan(&mut factory, &catalog)?;

        // The limit comes from a subquery and might evaluate to 0.
        let limit_source = one_row(&mut factory)?;
        let limit_column = factory.relational(limit_source).output_cols.iter().next().unwrap();
        let limit_rows = factory.construct_subquery(limit_source, limit_column)?;
        let limited = one_row(&mut factory)?;
        let right = factory.construct_limit(limited, limit_rows)?;
        assert!(factory.relational(right).cardinality.can_be_zero());

        let t = factory.construct_true()?;
        let join = factory.construct_join(Operator::LeftJoin, left, right, t)?;
        assert_eq!(factory.op(join), Operator::LeftJoin);
        Ok(())
    }
}
