use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId};
use crate::props::infer_function_type;
use data::{DataType, Datum};

pub(super) const FOLD_PLUS_ZERO: Rule = Rule {
    name: RuleName::FoldPlusZero,
    matches: |f, e| is_zero(f, e.group(1)) && preserves_type(f, e, e.group(0)),
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

pub(super) const FOLD_ZERO_PLUS: Rule = Rule {
    name: RuleName::FoldZeroPlus,
    matches: |f, e| is_zero(f, e.group(0)) && preserves_type(f, e, e.group(1)),
    replace: |_, e| Ok(Rewrite::Group(e.group(1))),
};

pub(super) const FOLD_MINUS_ZERO: Rule = Rule {
    name: RuleName::FoldMinusZero,
    ..FOLD_PLUS_ZERO
};

pub(super) const FOLD_MULT_ONE: Rule = Rule {
    name: RuleName::FoldMultOne,
    matches: |f, e| is_one(f, e.group(1)) && preserves_type(f, e, e.group(0)),
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

pub(super) const FOLD_ONE_MULT: Rule = Rule {
    name: RuleName::FoldOneMult,
    matches: |f, e| is_one(f, e.group(0)) && preserves_type(f, e, e.group(1)),
    replace: |_, e| Ok(Rewrite::Group(e.group(1))),
};

pub(super) const FOLD_DIV_ONE: Rule = Rule {
    name: RuleName::FoldDivOne,
    ..FOLD_MULT_ONE
};

/// Evaluates a binary operator over constant operands.
pub(super) const FOLD_BINARY: Rule = Rule {
    name: RuleName::FoldBinary,
    matches: |f, e| evaluate(f, e).is_some(),
    replace: |f, e| match evaluate(f, e) {
        Some((value, datatype)) => Ok(Rewrite::Group(f.construct_typed_const(value, datatype)?)),
        None => Err(NormError::InvalidExpression {
            op: e.op,
            group: Some(e.group(0)),
            reason: "operands could not be evaluated".to_string(),
        }),
    },
};

pub(super) const FOLD_UNARY: Rule = Rule {
    name: RuleName::FoldUnary,
    ..FOLD_BINARY
};

fn is_zero(f: &Factory, group: GroupId) -> bool {
    f.op(group) == ast::Operator::Const && f.const_datum(group).map_or(false, |d| d.is_zero())
}

fn is_one(f: &Factory, group: GroupId) -> bool {
    f.op(group) == ast::Operator::Const && f.const_datum(group).map_or(false, |d| d.is_one())
}

/// True if the operator's result has the same type as `operand`, so the operand
/// can stand in for the whole expression.
fn preserves_type(f: &Factory, e: &Expr, operand: GroupId) -> bool {
    let args: Vec<_> = e.child_groups().map(|child| f.scalar_type(child)).collect();
    infer_function_type(f.registry(), e.op, &args)
        .map_or(false, |datatype| datatype == f.scalar_type(operand))
}

/// Runs the operator's function over its constant operands. Returns None when an
/// operand isn't constant, or the value can't be computed at planning time.
fn evaluate(f: &Factory, e: &Expr) -> Option<(Datum, DataType)> {
    let name = e.op.function_name()?;
    let mut args = vec![];
    let mut types = vec![];
    for child in e.child_groups() {
        let datum = f.const_datum(child)?.into_owned();
        let datatype = f.scalar_type(child);
        if !datum.is_null() && !datum.datatype().matches(&datatype) {
            return None;
        }
        args.push(datum);
        types.push(datatype);
    }
    let function = f.registry().resolve(name, &types).ok()?;
    let value = function.execute(&args)?;
    Some((value, function.signature.ret))
}

#[cfg(test)]
mod tests {
    use crate::error::NormError;
    use crate::factory::Factory;
    use ast::Operator;
    use data::rust_decimal::Decimal;
    use data::{DataType, Datum};
    use std::str::FromStr;

    #[test]
    fn test_identity_folding() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let column = factory.metadata_mut().add_column("x", DataType::Integer);
        let x = factory.construct_variable(column)?;
        let zero = factory.construct_const(Datum::from(0))?;
        let one = factory.construct_const(Datum::from(1))?;

        assert_eq!(factory.construct_binary(Operator::Plus, x, zero)?, x);
        assert_eq!(factory.construct_binary(Operator::Plus, zero, x)?, x);
        assert_eq!(factory.construct_binary(Operator::Minus, x, zero)?, x);
        assert_eq!(factory.construct_binary(Operator::Mult, x, one)?, x);
        assert_eq!(factory.construct_binary(Operator::Mult, one, x)?, x);
        assert_eq!(factory.construct_binary(Operator::Div, x, one)?, x);

        // 0 - x isn't x
        let minus = factory.construct_binary(Operator::Minus, zero, x)?;
        assert_eq!(factory.op(minus), Operator::Minus);
        Ok(())
    }

    #[test]
    fn test_div_one_must_preserve_type() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let column = factory
            .metadata_mut()
            .add_column("d", DataType::Decimal(10, 2));
        let d = factory.construct_variable(column)?;
        let one = factory.construct_typed_const(
            Datum::from(Decimal::from_str("1").unwrap()),
            DataType::Decimal(1, 0),
        )?;

        let div = factory.construct_binary(Operator::Div, d, one)?;
        assert_eq!(factory.op(div), Operator::Div);
        assert_eq!(factory.scalar_type(div), DataType::Decimal(28, 14));
        Ok(())
    }

    #[test]
    fn test_constant_folding() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let two = factory.construct_const(Datum::from(2))?;
        let three = factory.construct_const(Datum::from(3))?;
        let five = factory.construct_const(Datum::from(5))?;

        assert_eq!(factory.construct_binary(Operator::Plus, two, three)?, five);
        let neg = factory.construct_unary(Operator::UnaryMinus, five)?;
        assert_eq!(neg, factory.construct_const(Datum::from(-5))?);

        let hello = factory.construct_const(Datum::from("hello "))?;
        let world = factory.construct_const(Datum::from("world"))?;
        let concat = factory.construct_binary(Operator::Concat, hello, world)?;
        assert_eq!(concat, factory.construct_const(Datum::from("hello world"))?);
        Ok(())
    }

    #[test]
    fn test_overflow_is_not_folded() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let max = factory.construct_const(Datum::from(i32::MAX))?;
        let two = factory.construct_const(Datum::from(2))?;
        let zero = factory.construct_const(Datum::from(0))?;

        let plus = factory.construct_binary(Operator::Plus, max, two)?;
        assert_eq!(factory.op(plus), Operator::Plus);
        let div = factory.construct_binary(Operator::Div, two, zero)?;
        assert_eq!(factory.op(div), Operator::Div);
        Ok(())
    }
}
