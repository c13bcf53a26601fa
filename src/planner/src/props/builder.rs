use crate::error::NormError;
use crate::memo::{Expr, GroupId, Memo};
use crate::metadata::Metadata;
use crate::props::{Cardinality, LogicalProps, RelationalProps, ScalarProps};
use ast::{ColSet, Operator, ProjectionsDef};
use data::{DataType, Datum, DECIMAL_MAX_PRECISION};
use functions::registry::{FunctionResolutionError, Registry};
use std::convert::TryFrom;

/// Derives the logical properties of a new expression from its operands and the
/// already derived properties of its child groups.
pub(crate) struct PropsBuilder<'a> {
    pub memo: &'a Memo,
    pub metadata: &'a Metadata,
    pub registry: &'a Registry,
}

impl<'a> PropsBuilder<'a> {
    pub fn build(&self, expr: &Expr) -> Result<LogicalProps, NormError> {
        if expr.op.is_relational() {
            let mut props = self.build_relational(expr)?;
            props.not_null_cols = props.not_null_cols.intersection(&props.output_cols);
            if props.cardinality.is_zero_or_one() {
                props.add_weak_key(ColSet::new());
            }
            Ok(LogicalProps::Relational(props))
        } else {
            Ok(LogicalProps::Scalar(self.build_scalar(expr)?))
        }
    }

    fn build_relational(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        match expr.op {
            Operator::Scan => self.build_scan(expr),
            Operator::Values => self.build_values(expr),
            Operator::Select => self.build_select(expr),
            Operator::Project => self.build_project(expr),
            op if op.is_join() => self.build_join(expr),
            Operator::GroupBy | Operator::DistinctOn => self.build_group_by(expr),
            Operator::Limit | Operator::Offset => self.build_limit_offset(expr),
            Operator::Sort => Ok(self.memo.relational(expr.group(0)).clone()),
            Operator::RowNumber => {
                let mut props = self.memo.relational(expr.group(0)).clone();
                let column = self
                    .memo
                    .lookup_private(expr.private(1))
                    .as_row_number()
                    .map(|def| def.column)
                    .ok_or_else(|| self.invalid(expr, "row number private expected"))?;
                props.output_cols.insert(column);
                props.not_null_cols.insert(column);
                props.add_weak_key(ColSet::from(&[column][..]));
                Ok(props)
            }
            _ => Err(self.invalid(expr, "relational operator expected")),
        }
    }

    fn build_scan(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let def = self
            .memo
            .lookup_private(expr.private(0))
            .as_scan()
            .ok_or_else(|| self.invalid(expr, "scan private expected"))?;
        let table = self.metadata.table(def.table)?;
        let mut props = RelationalProps {
            output_cols: def.cols.clone(),
            not_null_cols: self.metadata.table_not_null_cols(def.table)?,
            ..RelationalProps::default()
        };
        if let Some(primary_key) = &table.primary_key {
            if primary_key.is_subset(&def.cols) {
                props.add_weak_key(primary_key.clone());
            }
        }
        Ok(props)
    }

    fn build_values(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let rows = self.memo.lookup_list(expr.list(0));
        let cols = self
            .memo
            .lookup_private(expr.private(1))
            .as_col_list()
            .ok_or_else(|| self.invalid(expr, "column list private expected"))?;

        let mut props = RelationalProps {
            output_cols: ColSet::from(cols.as_slice()),
            cardinality: Cardinality::exactly(rows.len() as u32),
            ..RelationalProps::default()
        };

        // A column is not null if every row holds a non null constant for it.
        let mut not_null = vec![true; cols.len()];
        for row in rows {
            let scalar = self.memo.scalar(*row);
            props.outer_cols.union_with(&scalar.outer_cols);
            props.has_correlated_subquery |= scalar.has_correlated_subquery;

            let row_expr = self.memo.expr(*row);
            if row_expr.op != Operator::Tuple {
                not_null.iter_mut().for_each(|flag| *flag = false);
                continue;
            }
            let elements = self.memo.lookup_list(row_expr.list(0));
            for (idx, flag) in not_null.iter_mut().enumerate() {
                *flag &= elements
                    .get(idx)
                    .map(|element| self.is_non_null_constant(*element))
                    .unwrap_or(false);
            }
        }
        props.not_null_cols = cols
            .iter()
            .zip(not_null)
            .filter(|(_, flag)| *flag)
            .map(|(column, _)| *column)
            .collect();
        Ok(props)
    }

    fn build_select(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let input = self.memo.relational(expr.group(0));
        let filter = expr.group(1);
        let mut props = input.clone();
        self.add_scalar_outer_cols(&mut props, filter, &input.output_cols);
        props
            .not_null_cols
            .union_with(&self.null_rejected_cols(filter));
        props.cardinality = if self.filter_is_false(filter) {
            Cardinality::ZERO
        } else {
            input.cardinality.as_lower_zero()
        };
        Ok(props)
    }

    fn build_project(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let input = self.memo.relational(expr.group(0));
        let projections = expr.group(1);
        let def = self.projections_def(expr, projections)?;

        let mut props = RelationalProps {
            output_cols: def.all_cols(),
            outer_cols: input.outer_cols.clone(),
            not_null_cols: input.not_null_cols.intersection(&def.passthrough),
            cardinality: input.cardinality,
            has_correlated_subquery: input.has_correlated_subquery,
            ..RelationalProps::default()
        };
        self.add_scalar_outer_cols(&mut props, projections, &input.output_cols);
        for key in &input.weak_keys {
            if key.is_subset(&def.passthrough) {
                props.add_weak_key(key.clone());
            }
        }
        Ok(props)
    }

    fn build_join(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let left = self.memo.relational(expr.group(0));
        let right = self.memo.relational(expr.group(1));
        let on = expr.group(2);
        let both = left.output_cols.union(&right.output_cols);

        let mut props = RelationalProps {
            outer_cols: left
                .outer_cols
                .union(&right.outer_cols)
                .union(self.memo.props(on).outer_cols())
                .difference(&both),
            has_correlated_subquery: left.has_correlated_subquery
                || right.has_correlated_subquery
                || self.memo.props(on).has_correlated_subquery(),
            ..RelationalProps::default()
        };

        let filter_is_false = self.filter_is_false(on);
        let cross = self.memo.expr(on).op == Operator::True;
        let matched = if filter_is_false {
            Cardinality::ZERO
        } else if cross {
            left.cardinality.product(right.cardinality)
        } else {
            left.cardinality.product(right.cardinality).as_lower_zero()
        };

        match expr.op {
            Operator::SemiJoin | Operator::AntiJoin => {
                props.output_cols = left.output_cols.clone();
                props.not_null_cols = left.not_null_cols.clone();
                for key in &left.weak_keys {
                    props.add_weak_key(key.clone());
                }
                props.cardinality = left.cardinality.as_lower_zero();
                return Ok(props);
            }
            Operator::InnerJoin | Operator::InnerJoinApply => {
                props.not_null_cols = left
                    .not_null_cols
                    .union(&right.not_null_cols)
                    .union(&self.null_rejected_cols(on));
                props.cardinality = matched;
            }
            Operator::LeftJoin | Operator::LeftJoinApply => {
                props.not_null_cols = left.not_null_cols.clone();
                props.cardinality = Cardinality {
                    min: left.cardinality.min,
                    max: matched.max.max(left.cardinality.max),
                };
            }
            Operator::RightJoin | Operator::RightJoinApply => {
                props.not_null_cols = right.not_null_cols.clone();
                props.cardinality = Cardinality {
                    min: right.cardinality.min,
                    max: matched.max.max(right.cardinality.max),
                };
            }
            _ => {
                props.cardinality = Cardinality {
                    min: left.cardinality.min.max(right.cardinality.min),
                    max: matched
                        .max
                        .saturating_add(left.cardinality.max)
                        .saturating_add(right.cardinality.max),
                };
            }
        }

        props.output_cols = both;
        for left_key in &left.weak_keys {
            for right_key in &right.weak_keys {
                props.add_weak_key(left_key.union(right_key));
            }
        }
        Ok(props)
    }

    fn build_group_by(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let input = self.memo.relational(expr.group(0));
        let aggregations = expr.group(1);
        let def = self
            .memo
            .lookup_private(expr.private(2))
            .as_group_by()
            .ok_or_else(|| self.invalid(expr, "group by private expected"))?;
        let aggregations_expr = self.memo.expr(aggregations);
        if aggregations_expr.op != Operator::Aggregations {
            return Err(self.invalid_child(expr, aggregations, "aggregations expected"));
        }
        let aggregation_cols = self
            .memo
            .lookup_private(aggregations_expr.private(1))
            .as_col_list()
            .ok_or_else(|| self.invalid_child(expr, aggregations, "column list expected"))?;

        let mut props = RelationalProps {
            output_cols: def
                .grouping_cols
                .union(&ColSet::from(aggregation_cols.as_slice())),
            outer_cols: input.outer_cols.clone(),
            not_null_cols: input.not_null_cols.intersection(&def.grouping_cols),
            has_correlated_subquery: input.has_correlated_subquery,
            ..RelationalProps::default()
        };
        self.add_scalar_outer_cols(&mut props, aggregations, &input.output_cols);
        props.add_weak_key(def.grouping_cols.clone());

        let at_least_one = input.cardinality.min.min(1);
        props.cardinality = if def.grouping_cols.is_empty() {
            if expr.op == Operator::GroupBy {
                // A scalar group by always returns exactly one row.
                Cardinality::ONE
            } else {
                Cardinality {
                    min: at_least_one,
                    max: input.cardinality.max.min(1),
                }
            }
        } else {
            Cardinality {
                min: at_least_one,
                max: input.cardinality.max,
            }
        };
        Ok(props)
    }

    fn build_limit_offset(&self, expr: &Expr) -> Result<RelationalProps, NormError> {
        let input = self.memo.relational(expr.group(0));
        let mut props = input.clone();
        self.add_scalar_outer_cols(&mut props, expr.group(1), &input.output_cols);

        if let Some(rows) = self.const_row_count(expr.group(1)) {
            props.cardinality = if expr.op == Operator::Limit {
                input.cardinality.limit(rows)
            } else {
                input.cardinality.skip(rows)
            };
        } else {
            // A non literal or negative row count could still evaluate to zero
            // rows, so only the upper bound of the input survives.
            props.cardinality = input.cardinality.as_lower_zero();
        }
        Ok(props)
    }

    fn build_scalar(&self, expr: &Expr) -> Result<ScalarProps, NormError> {
        let mut props = ScalarProps {
            datatype: DataType::Boolean,
            outer_cols: ColSet::new(),
            has_correlated_subquery: false,
        };

        // Gather up outer columns from the children
        for operand in expr.child_groups() {
            let child = self.memo.props(operand);
            props.outer_cols.union_with(child.outer_cols());
            props.has_correlated_subquery |= child.has_correlated_subquery();
            if child.is_relational() && !child.outer_cols().is_empty() {
                props.has_correlated_subquery = true;
            }
        }
        if let Some(list) = self.list_operand(expr) {
            for item in list {
                let child = self.memo.scalar(*item);
                props.outer_cols.union_with(&child.outer_cols);
                props.has_correlated_subquery |= child.has_correlated_subquery;
            }
        }

        props.datatype = match expr.op {
            Operator::Variable => {
                let column = self.column_private(expr, 0)?;
                props.outer_cols.insert(column);
                self.metadata.column_type(column)?
            }
            Operator::Const => self
                .memo
                .lookup_private(expr.private(0))
                .as_constant()
                .map(|(_, datatype)| datatype)
                .ok_or_else(|| self.invalid(expr, "constant private expected"))?,
            Operator::Null => self
                .memo
                .lookup_private(expr.private(0))
                .as_type()
                .ok_or_else(|| self.invalid(expr, "type private expected"))?,
            Operator::Tuple | Operator::Projections | Operator::Aggregations => DataType::Tuple,
            Operator::Coalesce => self
                .list_operand(expr)
                .unwrap_or(&[])
                .iter()
                .map(|item| self.memo.scalar(*item).datatype)
                .find(|datatype| *datatype != DataType::Null)
                .unwrap_or(DataType::Null),
            Operator::Plus
            | Operator::Minus
            | Operator::Mult
            | Operator::Div
            | Operator::Concat
            | Operator::UnaryMinus => {
                let args: Vec<_> = expr
                    .child_groups()
                    .map(|child| self.memo.scalar(child).datatype)
                    .collect();
                infer_function_type(self.registry, expr.op, &args)?
            }
            Operator::Subquery => self.metadata.column_type(self.column_private(expr, 1)?)?,
            Operator::CountRows => DataType::BigInt,
            Operator::Sum => match self.memo.scalar(expr.group(0)).datatype {
                DataType::Integer | DataType::BigInt => DataType::BigInt,
                DataType::Decimal(_, scale) => DataType::Decimal(DECIMAL_MAX_PRECISION, scale),
                other => other,
            },
            Operator::Min | Operator::Max => self.memo.scalar(expr.group(0)).datatype,
            _ => DataType::Boolean,
        };

        // Passthrough columns are references to the input just like variables.
        if expr.op == Operator::Projections {
            if let Some(def) = self.memo.lookup_private(expr.private(1)).as_projections() {
                props.outer_cols.union_with(&def.passthrough);
            }
        }
        Ok(props)
    }

    fn list_operand(&self, expr: &Expr) -> Option<&'a [GroupId]> {
        match expr.op.shape().first() {
            Some(ast::OperandKind::List) => Some(self.memo.lookup_list(expr.list(0))),
            _ => None,
        }
    }

    fn column_private(&self, expr: &Expr, idx: usize) -> Result<ast::ColumnId, NormError> {
        self.memo
            .lookup_private(expr.private(idx))
            .as_column()
            .ok_or_else(|| self.invalid(expr, "column private expected"))
    }

    /// Fetches the definition of the projections child of a project.
    fn projections_def(&self, expr: &Expr, group: GroupId) -> Result<&'a ProjectionsDef, NormError> {
        let projections = self.memo.expr(group);
        if projections.op != Operator::Projections {
            return Err(self.invalid_child(expr, group, "projections expected"));
        }
        self.memo
            .lookup_private(projections.private(1))
            .as_projections()
            .ok_or_else(|| self.invalid_child(expr, group, "projections private expected"))
    }

    /// Adds the outer columns of a scalar child that aren't bound by the input.
    fn add_scalar_outer_cols(&self, props: &mut RelationalProps, scalar: GroupId, bound: &ColSet) {
        let scalar = self.memo.scalar(scalar);
        props
            .outer_cols
            .union_with(&scalar.outer_cols.difference(bound));
        props.has_correlated_subquery |= scalar.has_correlated_subquery;
    }

    /// Columns that a filter guarantees are not null for any row it lets through.
    fn null_rejected_cols(&self, filter: GroupId) -> ColSet {
        let expr = self.memo.expr(filter);
        let mut cols = ColSet::new();
        match expr.op {
            Operator::Filters | Operator::And => {
                for condition in self.memo.lookup_list(expr.list(0)) {
                    cols.union_with(&self.null_rejected_cols(*condition));
                }
            }
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                for side in expr.child_groups() {
                    if let Some(column) = self.variable_column(side) {
                        cols.insert(column);
                    }
                }
            }
            Operator::In | Operator::NotIn => {
                if let Some(column) = self.variable_column(expr.group(0)) {
                    cols.insert(column);
                }
            }
            Operator::IsNot => {
                if self.memo.expr(expr.group(1)).op == Operator::Null {
                    if let Some(column) = self.variable_column(expr.group(0)) {
                        cols.insert(column);
                    }
                }
            }
            _ => {}
        }
        cols
    }

    fn variable_column(&self, group: GroupId) -> Option<ast::ColumnId> {
        let expr = self.memo.expr(group);
        if expr.op == Operator::Variable {
            self.memo.lookup_private(expr.private(0)).as_column()
        } else {
            None
        }
    }

    fn filter_is_false(&self, filter: GroupId) -> bool {
        let expr = self.memo.expr(filter);
        match expr.op {
            Operator::False => true,
            Operator::Filters => self
                .memo
                .lookup_list(expr.list(0))
                .iter()
                .any(|condition| self.memo.expr(*condition).op == Operator::False),
            _ => false,
        }
    }

    fn is_non_null_constant(&self, group: GroupId) -> bool {
        match self.memo.expr(group).op {
            Operator::True | Operator::False => true,
            Operator::Const => self
                .memo
                .lookup_private(self.memo.expr(group).private(0))
                .as_constant()
                .map(|(datum, _)| !datum.is_null())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The row count held by a limit or offset operand, if it's a usable constant.
    fn const_row_count(&self, group: GroupId) -> Option<u32> {
        let expr = self.memo.expr(group);
        if expr.op != Operator::Const {
            return None;
        }
        let rows = match self.memo.lookup_private(expr.private(0)).as_constant()? {
            (Datum::Integer(rows), _) => i64::from(*rows),
            (Datum::BigInt(rows), _) => *rows,
            _ => return None,
        };
        u32::try_from(rows).ok()
    }

    fn invalid(&self, expr: &Expr, reason: &str) -> NormError {
        NormError::InvalidExpression {
            op: expr.op,
            group: None,
            reason: reason.to_string(),
        }
    }

    fn invalid_child(&self, expr: &Expr, child: GroupId, reason: &str) -> NormError {
        NormError::InvalidExpression {
            op: expr.op,
            group: Some(child),
            reason: reason.to_string(),
        }
    }
}

/// Infers the result type of an operator backed by the function registry.
pub(crate) fn infer_function_type(
    registry: &Registry,
    op: Operator,
    args: &[DataType],
) -> Result<DataType, NormError> {
    let name = op.function_name().ok_or_else(|| {
        FunctionResolutionError::FunctionNotFound(op.name().to_string())
    })?;
    Ok(registry.resolve(name, args)?.signature.ret)
}
