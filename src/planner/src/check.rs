use crate::error::NormError;
use crate::memo::{Expr, GroupId, Memo, Operand};
use crate::metadata::Metadata;
use ast::{ColSet, Operator};

/// Re-validates the structural invariants of an expression that's about to be
/// memoized. Only run when `check_expressions` is on, a failure here means a rule
/// or the caller has built a corrupt tree.
pub(crate) fn check_expr(memo: &Memo, metadata: &Metadata, expr: &Expr) -> Result<(), NormError> {
    let checker = Checker {
        memo,
        metadata,
        expr,
    };
    match expr.op {
        Operator::Variable => checker.check_variable(),
        Operator::Const => checker.check_const(),
        Operator::Values => checker.check_values(),
        Operator::Project => checker.check_project(),
        Operator::Projections => checker.check_projections(),
        Operator::Aggregations => checker.check_aggregations(),
        Operator::GroupBy | Operator::DistinctOn => checker.check_group_by(),
        Operator::Sort => checker.check_sort(),
        Operator::RowNumber => checker.check_row_number(),
        op if op == Operator::Select || op.is_join() => Ok(()),
        _ => checker.check_no_filters(),
    }
}

struct Checker<'a> {
    memo: &'a Memo,
    metadata: &'a Metadata,
    expr: &'a Expr,
}

impl<'a> Checker<'a> {
    fn fail(&self, reason: String) -> NormError {
        NormError::InvalidExpression {
            op: self.expr.op,
            group: None,
            reason,
        }
    }

    fn check_variable(&self) -> Result<(), NormError> {
        let column = self
            .memo
            .lookup_private(self.expr.private(0))
            .as_column()
            .ok_or_else(|| self.fail("column expected".to_string()))?;
        self.metadata.column(column).map(|_| ())
    }

    fn check_const(&self) -> Result<(), NormError> {
        let (value, datatype) = self
            .memo
            .lookup_private(self.expr.private(0))
            .as_constant()
            .ok_or_else(|| self.fail("constant expected".to_string()))?;
        if !value.is_null() && !value.datatype().matches(&datatype) {
            return Err(self.fail(format!(
                "constant of type {} given type {}",
                value.datatype(),
                datatype
            )));
        }
        Ok(())
    }

    fn check_values(&self) -> Result<(), NormError> {
        let cols = self
            .memo
            .lookup_private(self.expr.private(1))
            .as_col_list()
            .ok_or_else(|| self.fail("column list expected".to_string()))?;
        for row in self.memo.lookup_list(self.expr.list(0)) {
            let row_expr = self.memo.expr(*row);
            if row_expr.op != Operator::Tuple {
                return Err(self.fail(format!("row {} is a {}, not a tuple", row, row_expr.op)));
            }
            let len = self.memo.lookup_list(row_expr.list(0)).len();
            if len != cols.len() {
                return Err(self.fail(format!(
                    "row {} has {} elements, expected {}",
                    row,
                    len,
                    cols.len()
                )));
            }
        }
        Ok(())
    }

    fn check_project(&self) -> Result<(), NormError> {
        let projections = self.memo.expr(self.expr.group(1));
        if projections.op != Operator::Projections {
            return Err(self.fail(format!("{} is not a projections", projections.op)));
        }
        let def = self
            .memo
            .lookup_private(projections.private(1))
            .as_projections()
            .ok_or_else(|| self.fail("projections expected".to_string()))?;
        self.check_subset(&def.passthrough, self.expr.group(0), "passthrough columns")
    }

    fn check_projections(&self) -> Result<(), NormError> {
        let def = self
            .memo
            .lookup_private(self.expr.private(1))
            .as_projections()
            .ok_or_else(|| self.fail("projections expected".to_string()))?;
        let len = self.memo.lookup_list(self.expr.list(0)).len();
        if len != def.synthesized.len() {
            return Err(self.fail(format!(
                "{} projections for {} columns",
                len,
                def.synthesized.len()
            )));
        }
        if def
            .synthesized
            .iter()
            .any(|column| def.passthrough.contains(*column))
        {
            return Err(self.fail("synthesized column is also passed through".to_string()));
        }
        Ok(())
    }

    fn check_aggregations(&self) -> Result<(), NormError> {
        let cols = self
            .memo
            .lookup_private(self.expr.private(1))
            .as_col_list()
            .ok_or_else(|| self.fail("column list expected".to_string()))?;
        let aggregates = self.memo.lookup_list(self.expr.list(0));
        if aggregates.len() != cols.len() {
            return Err(self.fail(format!(
                "{} aggregates for {} columns",
                aggregates.len(),
                cols.len()
            )));
        }
        for aggregate in aggregates {
            let op = self.memo.expr(*aggregate).op;
            if !op.is_aggregate() {
                return Err(self.fail(format!("{} is not an aggregate", op)));
            }
        }
        Ok(())
    }

    fn check_group_by(&self) -> Result<(), NormError> {
        let aggregations = self.memo.expr(self.expr.group(1)).op;
        if aggregations != Operator::Aggregations {
            return Err(self.fail(format!("{} is not an aggregations", aggregations)));
        }
        let def = self
            .memo
            .lookup_private(self.expr.private(2))
            .as_group_by()
            .ok_or_else(|| self.fail("group by expected".to_string()))?;
        self.check_subset(&def.grouping_cols, self.expr.group(0), "grouping columns")
    }

    fn check_sort(&self) -> Result<(), NormError> {
        let ordering = self
            .memo
            .lookup_private(self.expr.private(1))
            .as_ordering()
            .ok_or_else(|| self.fail("ordering expected".to_string()))?;
        self.check_subset(&ordering.col_set(), self.expr.group(0), "ordering columns")
    }

    fn check_row_number(&self) -> Result<(), NormError> {
        let def = self
            .memo
            .lookup_private(self.expr.private(1))
            .as_row_number()
            .ok_or_else(|| self.fail("row number expected".to_string()))?;
        if self
            .memo
            .relational(self.expr.group(0))
            .output_cols
            .contains(def.column)
        {
            return Err(self.fail(format!("row number column {} already exists", def.column)));
        }
        Ok(())
    }

    /// Filters only ever appear as the filter of a select or join.
    fn check_no_filters(&self) -> Result<(), NormError> {
        let mut children: Vec<GroupId> = self.expr.child_groups().collect();
        for operand in &self.expr.operands {
            if let Operand::List(list) = operand {
                children.extend_from_slice(self.memo.lookup_list(*list));
            }
        }
        if children
            .iter()
            .any(|child| self.memo.expr(*child).op == Operator::Filters)
        {
            return Err(self.fail("filters nested in a scalar expression".to_string()));
        }
        Ok(())
    }

    fn check_subset(&self, cols: &ColSet, input: GroupId, what: &str) -> Result<(), NormError> {
        let output = &self.memo.relational(input).output_cols;
        if !cols.is_subset(output) {
            return Err(self.fail(format!(
                "{} {} aren't produced by the input {}",
                what, cols, output
            )));
        }
        Ok(())
    }
}
