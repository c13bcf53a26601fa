use crate::factory::Factory;
use crate::memo::{Expr, GroupId, Operand};
use crate::props::LogicalProps;
use ast::{Operator, Private};
use std::fmt::{Display, Formatter};

impl Factory {
    /// Renders the normalized tree rooted at a group, one operator per line with
    /// its columns, keys and cardinality. Scalar operands are rendered inline.
    pub fn explain(&self, group: GroupId) -> String {
        let mut lines = vec![];
        let mut padding = Padding::default();
        self.render_group(group, &mut lines, &mut padding);
        lines.join("\n")
    }

    fn render_group(&self, group: GroupId, lines: &mut Vec<String>, padding: &mut Padding) {
        let expr = self.expr(group);
        let props = match self.props(group) {
            LogicalProps::Relational(props) => props,
            LogicalProps::Scalar(_) => {
                lines.push(format!("{}{}", padding, self.scalar_string(group)));
                return;
            }
        };

        lines.push(format!("{}{} {}", padding, expr.op, group));
        padding.push(" |");
        lines.push(format!("{} columns: {}", padding, props.output_cols));
        if !props.outer_cols.is_empty() {
            lines.push(format!("{} outer: {}", padding, props.outer_cols));
        }
        if !props.weak_keys.is_empty() {
            let keys: Vec<_> = props.weak_keys.iter().map(ToString::to_string).collect();
            lines.push(format!("{} keys: {}", padding, keys.join(" ")));
        }
        lines.push(format!("{} cardinality: {}", padding, props.cardinality));

        for (label, private) in self.relational_privates(expr) {
            lines.push(format!("{} {}: {}", padding, label, private));
        }

        let mut inputs = vec![];
        for operand in &expr.operands {
            match operand {
                Operand::Group(child) if self.props(*child).is_relational() => inputs.push(*child),
                Operand::Group(child) => {
                    let scalar = self.scalar_string(*child);
                    if !scalar.is_empty() {
                        lines.push(format!("{} {}: {}", padding, scalar_label(expr.op), scalar));
                    }
                }
                Operand::List(list) if expr.op == Operator::Values => {
                    for row in self.list(*list) {
                        lines.push(format!("{} row: {}", padding, self.scalar_string(*row)));
                    }
                }
                _ => {}
            }
        }

        for (idx, input) in inputs.iter().enumerate() {
            let label = match (inputs.len(), idx) {
                (1, _) => "input",
                (_, 0) => "left",
                _ => "right",
            };
            lines.push(format!("{} {}:", padding, label));
            padding.push("  ");
            self.render_group(*input, lines, padding);
            padding.pop();
        }
        padding.pop();
    }

    fn relational_privates(&self, expr: &Expr) -> Vec<(&'static str, String)> {
        let mut privates = vec![];
        for operand in &expr.operands {
            if let Operand::Private(private) = operand {
                match self.private(*private) {
                    Private::Scan(def) => privates.push((
                        "table",
                        self.metadata()
                            .table(def.table)
                            .map(|table| table.name.clone())
                            .unwrap_or_else(|_| format!("{:?}", def.table)),
                    )),
                    Private::GroupBy(def) => {
                        privates.push(("grouping", def.grouping_cols.to_string()));
                        if !def.ordering.is_empty() {
                            privates.push(("ordering", def.ordering.to_string()));
                        }
                    }
                    Private::Ordering(ordering) => privates.push(("ordering", ordering.to_string())),
                    Private::RowNumber(def) => privates.push(("row number", def.column.to_string())),
                    _ => {}
                }
            }
        }
        privates
    }

    /// Renders a scalar expression on a single line, ie `(@1 > 5)`.
    pub fn scalar_string(&self, group: GroupId) -> String {
        let expr = self.expr(group);
        match expr.op {
            Operator::Variable => match self.private(expr.private(0)).as_column() {
                Some(column) => format!("@{}", column),
                None => "@?".to_string(),
            },
            Operator::Const => match self.private(expr.private(0)).as_constant() {
                Some((value, _)) => value.to_string(),
                None => "?".to_string(),
            },
            Operator::Null => "NULL".to_string(),
            Operator::True => "TRUE".to_string(),
            Operator::False => "FALSE".to_string(),
            Operator::Tuple => format!("({})", self.list_string(expr)),
            Operator::Projections => {
                let synthesized = self
                    .private(expr.private(1))
                    .as_projections()
                    .map(|def| def.synthesized.clone())
                    .unwrap_or_default();
                self.assignments_string(expr, &synthesized)
            }
            Operator::Aggregations => {
                let cols = self
                    .private(expr.private(1))
                    .as_col_list()
                    .cloned()
                    .unwrap_or_default();
                self.assignments_string(expr, &cols)
            }
            Operator::Exists | Operator::Subquery => format!("{}({})", expr.op, expr.group(0)),
            op if matches!(op.shape(), [ast::OperandKind::List]) => {
                format!("{}({})", op, self.list_string(expr))
            }
            op => match (op.function_name(), expr.operands.len()) {
                (Some(name), 2) => format!(
                    "({} {} {})",
                    self.scalar_string(expr.group(0)),
                    name,
                    self.scalar_string(expr.group(1))
                ),
                (Some(name), 1) => format!("{}({})", name, self.scalar_string(expr.group(0))),
                _ => {
                    let args: Vec<_> = expr
                        .child_groups()
                        .map(|child| self.scalar_string(child))
                        .collect();
                    format!("{}({})", op, args.join(", "))
                }
            },
        }
    }

    fn list_string(&self, expr: &Expr) -> String {
        self.list(expr.list(0))
            .iter()
            .map(|item| self.scalar_string(*item))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn assignments_string(&self, expr: &Expr, cols: &[ast::ColumnId]) -> String {
        self.list(expr.list(0))
            .iter()
            .zip(cols)
            .map(|(item, column)| format!("@{} := {}", column, self.scalar_string(*item)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn scalar_label(op: Operator) -> &'static str {
    match op {
        Operator::Select => "filter",
        Operator::Project => "projections",
        Operator::GroupBy | Operator::DistinctOn => "aggregations",
        Operator::Limit => "limit",
        Operator::Offset => "offset",
        op if op.is_join() => "on",
        _ => "arg",
    }
}

/// A helper to deal with pushing and popping padding
#[derive(Default)]
struct Padding {
    pads: Vec<&'static str>,
}

impl Padding {
    fn push(&mut self, pad: &'static str) {
        self.pads.push(pad);
    }

    fn pop(&mut self) {
        self.pads.pop();
    }
}

impl Display for Padding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for pad in &self.pads {
            f.write_str(pad)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::NormError;
    use crate::factory::Factory;
    use ast::Operator;
    use data::{DataType, Datum};

    #[test]
    fn test_explain_select_over_values() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let a = factory.metadata_mut().add_column("a", DataType::Integer);
        let one = factory.construct_const(Datum::from(1))?;
        let two = factory.construct_const(Datum::from(2))?;
        let rows = vec![
            factory.construct_tuple(vec![one])?,
            factory.construct_tuple(vec![two])?,
        ];
        let values = factory.construct_values(rows, vec![a])?;
        let var = factory.construct_variable(a)?;
        let gt = factory.construct_binary(Operator::Gt, var, one)?;
        let select = factory.construct_select(values, gt)?;

        let expected = format!(
            "select {}\n | columns: (1)\n | cardinality: [0 - 2]\n | filter: filters((@1 > 1))\n | input:\n |  values {}\n |   | columns: (1)\n |   | cardinality: [2 - 2]\n |   | row: (1)\n |   | row: (2)",
            select, values
        );
        assert_eq!(factory.explain(select), expected);
        Ok(())
    }

    #[test]
    fn test_scalar_string() -> Result<(), NormError> {
        let mut factory = Factory::new_for_test();
        let a = factory.metadata_mut().add_column("a", DataType::Integer);
        let var = factory.construct_variable(a)?;
        let neg = factory.construct_unary(Operator::UnaryMinus, var)?;
        let five = factory.construct_const(Datum::from(5))?;
        let plus = factory.construct_binary(Operator::Plus, neg, five)?;
        assert_eq!(factory.scalar_string(plus), "(neg(@1) + 5)");
        Ok(())
    }
}
