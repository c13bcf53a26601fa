use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, Operand};
use crate::props::infer_function_type;
use ast::Operator;
use data::Datum;

pub(super) const NORMALIZE_CONST_BOOL: Rule = Rule {
    name: RuleName::NormalizeConstBool,
    matches: |f, e| {
        matches!(
            f.private(e.private(0)).as_constant(),
            Some((Datum::Boolean(_), _))
        )
    },
    replace: |f, e| match f.private(e.private(0)).as_constant() {
        Some((Datum::Boolean(true), _)) => Ok(Rewrite::Construct(Expr::new(Operator::True, vec![]))),
        _ => Ok(Rewrite::Construct(Expr::new(Operator::False, vec![]))),
    },
};

/// A null constant is represented by a typed null operator.
pub(super) const NORMALIZE_CONST_NULL: Rule = Rule {
    name: RuleName::NormalizeConstNull,
    matches: |f, e| matches!(f.private(e.private(0)).as_constant(), Some((Datum::Null, _))),
    replace: |f, e| {
        let datatype = f
            .private(e.private(0))
            .as_constant()
            .map(|(_, datatype)| datatype)
            .unwrap_or(data::DataType::Null);
        Ok(Rewrite::Group(f.construct_null(datatype)?))
    },
};

pub(super) const ELIMINATE_COALESCE: Rule = Rule {
    name: RuleName::EliminateCoalesce,
    matches: |f, e| f.list(e.list(0)).len() == 1,
    replace: |f, e| Ok(Rewrite::Group(f.list(e.list(0))[0])),
};

pub(super) const SIMPLIFY_COALESCE: Rule = Rule {
    name: RuleName::SimplifyCoalesce,
    matches: |f, e| {
        let args = f.list(e.list(0));
        args.len() > 1 && f.is_const_value(args[0])
    },
    replace: simplify_coalesce,
};

pub(super) const FOLD_NULL_UNARY: Rule = Rule {
    name: RuleName::FoldNullUnary,
    matches: |f, e| f.op(e.group(0)) == Operator::Null,
    replace: |f, e| {
        let datatype = infer_function_type(f.registry(), e.op, &[f.scalar_type(e.group(0))])?;
        Ok(Rewrite::Group(f.construct_null(datatype)?))
    },
};

pub(super) const FOLD_NULL_BINARY: Rule = Rule {
    name: RuleName::FoldNullBinary,
    matches: |f, e| {
        let (left, right) = (e.group(0), e.group(1));
        (f.op(left) == Operator::Null || f.op(right) == Operator::Null)
            && !f.allows_null_args(e.op, left, right)
    },
    replace: |f, e| {
        let args = [f.scalar_type(e.group(0)), f.scalar_type(e.group(1))];
        let datatype = infer_function_type(f.registry(), e.op, &args)?;
        Ok(Rewrite::Group(f.construct_null(datatype)?))
    },
};

/// The projection under an exists doesn't change whether any rows come back.
pub(super) const ELIMINATE_EXISTS_PROJECT: Rule = Rule {
    name: RuleName::EliminateExistsProject,
    matches: |f, e| f.op(e.group(0)) == Operator::Project,
    replace: |f, e| {
        let input = f.expr(e.group(0)).group(0);
        Ok(Rewrite::Construct(Expr::new(
            Operator::Exists,
            vec![Operand::Group(input)],
        )))
    },
};

/// Drops leading nulls, a non null constant wins outright, and the first non
/// constant stops folding since its value may turn out to be null.
fn simplify_coalesce(f: &mut Factory, e: &Expr) -> Result<Rewrite, NormError> {
    let args = f.list(e.list(0)).to_vec();
    let (last, leading) = match args.split_last() {
        Some(split) => split,
        None => {
            return Err(NormError::InvalidExpression {
                op: e.op,
                group: None,
                reason: "coalesce needs at least one argument".to_string(),
            })
        }
    };

    for (idx, arg) in leading.iter().enumerate() {
        match f.op(*arg) {
            op if !op.is_const_value() => {
                let list = f.intern_list(args[idx..].to_vec());
                return Ok(Rewrite::Construct(Expr::new(
                    Operator::Coalesce,
                    vec![Operand::List(list)],
                )));
            }
            Operator::Null => {}
            _ => return Ok(Rewrite::Group(*arg)),
        }
    }
    Ok(Rewrite::Group(*last))
}
