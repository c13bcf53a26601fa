use super::list::{is_sorted_unique, sorted_unique};
use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId, Operand};
use ast::Operator;
use data::DataType;

/// `NULL IN ()` is false and `NULL NOT IN ()` is true, an empty list never
/// compares against the null.
pub(super) const FOLD_NULL_IN_EMPTY: Rule = Rule {
    name: RuleName::FoldNullInEmpty,
    matches: |f, e| f.op(e.group(0)) == Operator::Null && is_empty_tuple(f, e.group(1)),
    replace: |f, e| {
        let folded = match e.op {
            Operator::In => f.construct_false()?,
            _ => f.construct_true()?,
        };
        Ok(Rewrite::Group(folded))
    },
};

pub(super) const FOLD_NULL_COMPARISON: Rule = Rule {
    name: RuleName::FoldNullComparison,
    matches: |f, e| match e.op {
        Operator::In | Operator::NotIn => {
            f.op(e.group(0)) == Operator::Null && !is_empty_tuple(f, e.group(1))
        }
        _ => {
            let (left, right) = (e.group(0), e.group(1));
            (f.op(left) == Operator::Null || f.op(right) == Operator::Null)
                && !f.allows_null_args(e.op, left, right)
        }
    },
    replace: |f, _| Ok(Rewrite::Group(f.construct_null(DataType::Boolean)?)),
};

pub(super) const NORMALIZE_TUPLE_EQUALITY: Rule = Rule {
    name: RuleName::NormalizeTupleEquality,
    matches: |f, e| f.op(e.group(0)) == Operator::Tuple && f.op(e.group(1)) == Operator::Tuple,
    replace: normalize_tuple_equality,
};

/// Moves constants to the right of commutative operators, ie `5 = x` becomes
/// `x = 5`. Only fires when the right side isn't constant itself.
pub(super) const COMMUTE_CONST: Rule = Rule {
    name: RuleName::CommuteConst,
    matches: only_left_constant,
    replace: |_, e| {
        Ok(Rewrite::Construct(Expr::new(
            e.op,
            vec![e.operands[1], e.operands[0]],
        )))
    },
};

/// As above but flips the inequality, ie `5 < x` becomes `x > 5`.
pub(super) const COMMUTE_CONST_INEQUALITY: Rule = Rule {
    name: RuleName::CommuteConstInequality,
    matches: only_left_constant,
    replace: |_, e| match e.op.commute_inequality() {
        Some(commuted) => Ok(Rewrite::Construct(Expr::new(
            commuted,
            vec![e.operands[1], e.operands[0]],
        ))),
        None => Err(NormError::InvalidExpression {
            op: e.op,
            group: Some(e.group(0)),
            reason: "operator can't be commuted".to_string(),
        }),
    },
};

/// Sorts and dedups the constant list on the right of an in.
pub(super) const NORMALIZE_IN_CONST: Rule = Rule {
    name: RuleName::NormalizeInConst,
    matches: |f, e| {
        let list = e.group(1);
        f.op(list) == Operator::Tuple && !is_sorted_unique(f.memo(), f.list_of(list))
    },
    replace: |f, e| {
        let items = sorted_unique(f.memo(), f.list_of(e.group(1)));
        let tuple = f.construct_tuple(items)?;
        Ok(Rewrite::Construct(Expr::new(
            e.op,
            vec![Operand::Group(e.group(0)), Operand::Group(tuple)],
        )))
    },
};

/// `x IN (NULL, NULL)` is null whatever `x` is.
pub(super) const FOLD_IN_NULL: Rule = Rule {
    name: RuleName::FoldInNull,
    matches: |f, e| {
        let list = e.group(1);
        f.op(list) == Operator::Tuple
            && !f.list_of(list).is_empty()
            && f.list_of(list)
                .iter()
                .all(|item| f.op(*item) == Operator::Null)
    },
    replace: |f, _| Ok(Rewrite::Group(f.construct_null(DataType::Boolean)?)),
};

fn is_empty_tuple(f: &Factory, group: GroupId) -> bool {
    f.op(group) == Operator::Tuple && f.list_of(group).is_empty()
}

fn only_left_constant(f: &Factory, e: &Expr) -> bool {
    f.outer_cols(e.group(0)).is_empty() && !f.outer_cols(e.group(1)).is_empty()
}

/// (a, b) = (x, y) => (a = x) AND (b = y)
fn normalize_tuple_equality(f: &mut Factory, e: &Expr) -> Result<Rewrite, NormError> {
    let left = f.list_of(e.group(0)).to_vec();
    let right = f.list_of(e.group(1)).to_vec();
    if left.len() != right.len() {
        return Err(NormError::TupleLengthMismatch(left.len(), right.len()));
    }

    let mut conditions: Vec<GroupId> = Vec::with_capacity(left.len());
    for (left, right) in left.into_iter().zip(right) {
        conditions.push(f.construct_binary(Operator::Eq, left, right)?);
    }
    let list = f.intern_list(conditions);
    Ok(Rewrite::Construct(Expr::new(
        Operator::And,
        vec![Operand::List(list)],
    )))
}

#[cfg(test)]
mod tests {
    use crate::error::NormError;
    use crate::factory::Factory;
    use crate::memo::GroupId;
    use ast::Operator;
    use data::{DataType, Datum};

    fn int_var(factory: &mut Factory, label: &str) -> Result<GroupId, NormError> {
        let column = factory.metadata_mut().add_column(label, DataType::Integer);
        factory.construct_variable(column)
    }

    #[test]
    fn test_tuple_equality() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let a = int_var(&mut factory, "a")?;
        let b = int_var(&mut factory, "b")?;
        let one = factory.construct_const(Datum::from(1))?;
        let two = factory.construct_const(Datum::from(2))?;

        let left = factory.construct_tuple(vec![a, b])?;
        let right = factory.construct_tuple(vec![one, two])?;
        let eq = factory.construct_binary(Operator::Eq, left, right)?;

        let a_eq = factory.construct_binary(Operator::Eq, a, one)?;
        let b_eq = factory.construct_binary(Operator::Eq, b, two)?;
        let expected = factory.construct_and(vec![a_eq, b_eq])?;
        assert_eq!(eq, expected);
        Ok(())
    }

    #[test]
    fn test_tuple_length_mismatch() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let a = int_var(&mut factory, "a")?;
        let left = factory.construct_tuple(vec![a, a])?;
        let right = factory.construct_tuple(vec![a])?;
        assert_eq!(
            factory.construct_binary(Operator::Eq, left, right),
            Err(NormError::TupleLengthMismatch(2, 1))
        );
        Ok(())
    }

    #[test]
    fn test_commute_const() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let x = int_var(&mut factory, "x")?;
        let five = factory.construct_const(Datum::from(5))?;

        let eq = factory.construct_binary(Operator::Eq, five, x)?;
        assert_eq!(eq, factory.construct_binary(Operator::Eq, x, five)?);

        let lt = factory.construct_binary(Operator::Lt, five, x)?;
        let gt = factory.construct_binary(Operator::Gt, x, five)?;
        assert_eq!(lt, gt);
        assert_eq!(factory.expr(gt).group(0), x);
        Ok(())
    }

    #[test]
    fn test_fold_null_comparison() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let x = int_var(&mut factory, "x")?;
        let null = factory.construct_null(DataType::Integer)?;
        let bool_null = factory.construct_null(DataType::Boolean)?;

        assert_eq!(factory.construct_binary(Operator::Eq, x, null)?, bool_null);
        assert_eq!(factory.construct_binary(Operator::Lt, null, x)?, bool_null);

        // IS keeps its null argument
        let is = factory.construct_binary(Operator::Is, x, null)?;
        assert_eq!(factory.op(is), Operator::Is);
        Ok(())
    }

    #[test]
    fn test_fold_constant_comparison() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let one = factory.construct_const(Datum::from(1))?;
        let two = factory.construct_const(Datum::from(2))?;

        let lt = factory.construct_binary(Operator::Lt, one, two)?;
        assert_eq!(lt, factory.construct_true()?);
        let eq = factory.construct_binary(Operator::Eq, one, two)?;
        assert_eq!(eq, factory.construct_false()?);
        Ok(())
    }

    #[test]
    fn test_in_list_is_sorted() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let x = int_var(&mut factory, "x")?;
        let three = factory.construct_const(Datum::from(3))?;
        let one = factory.construct_const(Datum::from(1))?;

        let unsorted = factory.construct_tuple(vec![three, one, three])?;
        let sorted = factory.construct_tuple(vec![one, three])?;
        let in_unsorted = factory.construct_binary(Operator::In, x, unsorted)?;
        let in_sorted = factory.construct_binary(Operator::In, x, sorted)?;
        assert_eq!(in_unsorted, in_sorted);
        Ok(())
    }

    #[test]
    fn test_null_in_empty_list() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let null = factory.construct_null(DataType::Integer)?;
        let empty = factory.construct_tuple(vec![])?;
        let t = factory.construct_true()?;
        let f = factory.construct_false()?;

        assert_eq!(factory.construct_binary(Operator::In, null, empty)?, f);
        assert_eq!(factory.construct_binary(Operator::NotIn, null, empty)?, t);

        // A non empty list still compares against the null.
        let one = factory.construct_const(Datum::from(1))?;
        let list = factory.construct_tuple(vec![one])?;
        let bool_null = factory.construct_null(DataType::Boolean)?;
        assert_eq!(factory.construct_binary(Operator::In, null, list)?, bool_null);
        Ok(())
    }

    #[test]
    fn test_in_list_of_nulls() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let x = int_var(&mut factory, "x")?;
        let null = factory.construct_null(DataType::Integer)?;
        let nulls = factory.construct_tuple(vec![null, null])?;
        let bool_null = factory.construct_null(DataType::Boolean)?;

        assert_eq!(factory.construct_binary(Operator::In, x, nulls)?, bool_null);
        assert_eq!(factory.construct_binary(Operator::NotIn, x, nulls)?, bool_null);

        let one = factory.construct_const(Datum::from(1))?;
        let mixed = factory.construct_tuple(vec![null, one])?;
        let in_mixed = factory.construct_binary(Operator::In, x, mixed)?;
        assert_eq!(factory.op(in_mixed), Operator::In);
        Ok(())
    }

    #[test]
    fn test_in_list_with_equal_values_of_different_types() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let x = int_var(&mut factory, "x")?;
        let int = factory.construct_const(Datum::from(7))?;
        let bigint = factory.construct_const(Datum::from(7_i64))?;

        let int_first = factory.construct_tuple(vec![int, bigint])?;
        let bigint_first = factory.construct_tuple(vec![bigint, int])?;
        let in_int_first = factory.construct_binary(Operator::In, x, int_first)?;
        let in_bigint_first = factory.construct_binary(Operator::In, x, bigint_first)?;
        assert_eq!(in_int_first, in_bigint_first);
        assert_eq!(factory.list_of(factory.expr(in_int_first).group(1)), &[int]);
        Ok(())
    }
}
