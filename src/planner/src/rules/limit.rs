use super::{Rewrite, Rule, RuleName};
use ast::Operator;

/// A limit that can't cut off any rows.
pub(super) const ELIMINATE_LIMIT: Rule = Rule {
    name: RuleName::EliminateLimit,
    matches: |f, e| match f.const_i64(e.group(1)) {
        Some(limit) if limit >= 0 => {
            let cardinality = f.relational(e.group(0)).cardinality;
            !cardinality.is_unbounded() && i64::from(cardinality.max) <= limit
        }
        _ => false,
    },
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

pub(super) const ELIMINATE_OFFSET: Rule = Rule {
    name: RuleName::EliminateOffset,
    matches: |f, e| f.op(e.group(1)) == Operator::Const && f.const_i64(e.group(1)) == Some(0),
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

#[cfg(test)]
mod tests {
    use crate::error::NormError;
    use crate::factory::Factory;
    use crate::memo::GroupId;
    use crate::props::Cardinality;
    use ast::Operator;
    use data::{DataType, Datum};

    fn values(factory: &mut Factory, rows: usize) -> Result<GroupId, NormError> {
        let column = factory.metadata_mut().add_column("a", DataType::Integer);
        let mut tuples = vec![];
        for idx in 0..rows {
            let value = factory.construct_const(Datum::from(idx as i32))?;
            tuples.push(factory.construct_tuple(vec![value])?);
        }
        factory.construct_values(tuples, vec![column])
    }

    #[test]
    fn test_eliminate_limit() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let input = values(&mut factory, 3)?;

        let three = factory.construct_const(Datum::from(3_i64))?;
        assert_eq!(factory.construct_limit(input, three)?, input);

        let two = factory.construct_const(Datum::from(2_i64))?;
        let limit = factory.construct_limit(input, two)?;
        assert_eq!(factory.op(limit), Operator::Limit);
        assert_eq!(factory.relational(limit).cardinality, Cardinality::exactly(2));
        Ok(())
    }

    #[test]
    fn test_eliminate_offset() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let input = values(&mut factory, 3)?;

        let zero = factory.construct_const(Datum::from(0_i64))?;
        assert_eq!(factory.construct_offset(input, zero)?, input);

        let one = factory.construct_const(Datum::from(1_i64))?;
        let offset = factory.construct_offset(input, one)?;
        assert_eq!(factory.op(offset), Operator::Offset);
        assert_eq!(factory.relational(offset).cardinality, Cardinality::exactly(2));
        Ok(())
    }

    #[test]
    fn test_non_literal_limit_can_return_no_rows() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let input = values(&mut factory, 3)?;
        let source = values(&mut factory, 1)?;
        let column = factory.relational(source).output_cols.iter().next().unwrap();
        let rows = factory.construct_subquery(source, column)?;

        let limit = factory.construct_limit(input, rows)?;
        assert_eq!(factory.op(limit), Operator::Limit);
        assert_eq!(
            factory.relational(limit).cardinality,
            Cardinality { min: 0, max: 3 }
        );
        Ok(())
    }

    #[test]
    fn test_negative_row_counts_keep_only_the_upper_bound() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let input = values(&mut factory, 3)?;
        let negative = factory.construct_const(Datum::from(-1_i64))?;

        let limit = factory.construct_limit(input, negative)?;
        assert_eq!(factory.op(limit), Operator::Limit);
        assert_eq!(
            factory.relational(limit).cardinality,
            Cardinality { min: 0, max: 3 }
        );

        let offset = factory.construct_offset(input, negative)?;
        assert_eq!(factory.op(offset), Operator::Offset);
        assert_eq!(
            factory.relational(offset).cardinality,
            Cardinality { min: 0, max: 3 }
        );
        Ok(())
    }
}
