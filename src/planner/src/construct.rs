//! Typed helpers over `Factory::construct`, one per operator. These intern the
//! operator's lists and privates so callers only ever deal in groups.
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId, Operand};
use ast::{
    ColList, ColSet, ColumnId, GroupByDef, Operator, Ordering, Private, ProjectionsDef,
    RowNumberDef, ScanDef,
};
use data::{DataType, Datum};

impl Factory {
    fn construct_list_op(&mut self, op: Operator, items: Vec<GroupId>) -> Result<GroupId, NormError> {
        let list = self.intern_list(items);
        self.construct(Expr::new(op, vec![Operand::List(list)]))
    }

    fn construct_nullary(&mut self, op: Operator) -> Result<GroupId, NormError> {
        self.construct(Expr::new(op, vec![]))
    }

    // Scalar

    pub fn construct_variable(&mut self, column: ColumnId) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Column(column));
        self.construct(Expr::new(Operator::Variable, vec![Operand::Private(private)]))
    }

    /// A constant typed by its value.
    pub fn construct_const(&mut self, value: Datum) -> Result<GroupId, NormError> {
        let datatype = value.datatype();
        self.construct_typed_const(value, datatype)
    }

    pub fn construct_typed_const(
        &mut self,
        value: Datum,
        datatype: DataType,
    ) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Constant(value, datatype));
        self.construct(Expr::new(Operator::Const, vec![Operand::Private(private)]))
    }

    pub fn construct_null(&mut self, datatype: DataType) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Type(datatype));
        self.construct(Expr::new(Operator::Null, vec![Operand::Private(private)]))
    }

    pub fn construct_true(&mut self) -> Result<GroupId, NormError> {
        self.construct_nullary(Operator::True)
    }

    pub fn construct_false(&mut self) -> Result<GroupId, NormError> {
        self.construct_nullary(Operator::False)
    }

    pub fn construct_and(&mut self, conditions: Vec<GroupId>) -> Result<GroupId, NormError> {
        self.construct_list_op(Operator::And, conditions)
    }

    pub fn construct_or(&mut self, conditions: Vec<GroupId>) -> Result<GroupId, NormError> {
        self.construct_list_op(Operator::Or, conditions)
    }

    /// The conditions of a select or join, all of which must hold.
    pub fn construct_filters(&mut self, conditions: Vec<GroupId>) -> Result<GroupId, NormError> {
        self.construct_list_op(Operator::Filters, conditions)
    }

    pub fn construct_not(&mut self, input: GroupId) -> Result<GroupId, NormError> {
        self.construct_unary(Operator::Not, input)
    }

    pub fn construct_tuple(&mut self, elements: Vec<GroupId>) -> Result<GroupId, NormError> {
        self.construct_list_op(Operator::Tuple, elements)
    }

    pub fn construct_coalesce(&mut self, args: Vec<GroupId>) -> Result<GroupId, NormError> {
        self.construct_list_op(Operator::Coalesce, args)
    }

    /// Comparisons, arithmetic and the like.
    pub fn construct_binary(
        &mut self,
        op: Operator,
        left: GroupId,
        right: GroupId,
    ) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            op,
            vec![Operand::Group(left), Operand::Group(right)],
        ))
    }

    pub fn construct_unary(&mut self, op: Operator, input: GroupId) -> Result<GroupId, NormError> {
        self.construct(Expr::new(op, vec![Operand::Group(input)]))
    }

    pub fn construct_exists(&mut self, input: GroupId) -> Result<GroupId, NormError> {
        self.construct_unary(Operator::Exists, input)
    }

    /// A scalar subquery returning the value of `column` from its single row.
    pub fn construct_subquery(
        &mut self,
        input: GroupId,
        column: ColumnId,
    ) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Column(column));
        self.construct(Expr::new(
            Operator::Subquery,
            vec![Operand::Group(input), Operand::Private(private)],
        ))
    }

    /// The computed columns of a project, `synthesized[i]` holds the value of `items[i]`.
    pub fn construct_projections(
        &mut self,
        items: Vec<GroupId>,
        synthesized: ColList,
        passthrough: ColSet,
    ) -> Result<GroupId, NormError> {
        let list = self.intern_list(items);
        let private = self.intern_private(Private::Projections(ProjectionsDef {
            passthrough,
            synthesized,
        }));
        self.construct(Expr::new(
            Operator::Projections,
            vec![Operand::List(list), Operand::Private(private)],
        ))
    }

    /// The aggregates of a group by, `cols[i]` holds the value of `aggregates[i]`.
    pub fn construct_aggregations(
        &mut self,
        aggregates: Vec<GroupId>,
        cols: ColList,
    ) -> Result<GroupId, NormError> {
        let list = self.intern_list(aggregates);
        let private = self.intern_private(Private::ColList(cols));
        self.construct(Expr::new(
            Operator::Aggregations,
            vec![Operand::List(list), Operand::Private(private)],
        ))
    }

    pub fn construct_count_rows(&mut self) -> Result<GroupId, NormError> {
        self.construct_nullary(Operator::CountRows)
    }

    /// Single argument aggregates, ie sum, min and max.
    pub fn construct_aggregate(&mut self, op: Operator, input: GroupId) -> Result<GroupId, NormError> {
        self.construct_unary(op, input)
    }

    // Relational

    pub fn construct_scan(&mut self, def: ScanDef) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Scan(def));
        self.construct(Expr::new(Operator::Scan, vec![Operand::Private(private)]))
    }

    /// A constant relation, each row is a tuple with one element per column.
    pub fn construct_values(
        &mut self,
        rows: Vec<GroupId>,
        cols: ColList,
    ) -> Result<GroupId, NormError> {
        let list = self.intern_list(rows);
        let private = self.intern_private(Private::ColList(cols));
        self.construct(Expr::new(
            Operator::Values,
            vec![Operand::List(list), Operand::Private(private)],
        ))
    }

    pub fn construct_select(&mut self, input: GroupId, filter: GroupId) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            Operator::Select,
            vec![Operand::Group(input), Operand::Group(filter)],
        ))
    }

    pub fn construct_project(
        &mut self,
        input: GroupId,
        projections: GroupId,
    ) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            Operator::Project,
            vec![Operand::Group(input), Operand::Group(projections)],
        ))
    }

    /// A project that only narrows its input down to the given columns.
    pub fn construct_simple_project(
        &mut self,
        input: GroupId,
        cols: ColSet,
    ) -> Result<GroupId, NormError> {
        let projections = self.construct_projections(vec![], vec![], cols)?;
        self.construct_project(input, projections)
    }

    /// Any of the join operators, including the semi, anti and apply variants.
    pub fn construct_join(
        &mut self,
        op: Operator,
        left: GroupId,
        right: GroupId,
        on: GroupId,
    ) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            op,
            vec![
                Operand::Group(left),
                Operand::Group(right),
                Operand::Group(on),
            ],
        ))
    }

    pub fn construct_group_by(
        &mut self,
        input: GroupId,
        aggregations: GroupId,
        def: GroupByDef,
    ) -> Result<GroupId, NormError> {
        self.construct_grouping(Operator::GroupBy, input, aggregations, def)
    }

    pub fn construct_distinct_on(
        &mut self,
        input: GroupId,
        aggregations: GroupId,
        def: GroupByDef,
    ) -> Result<GroupId, NormError> {
        self.construct_grouping(Operator::DistinctOn, input, aggregations, def)
    }

    fn construct_grouping(
        &mut self,
        op: Operator,
        input: GroupId,
        aggregations: GroupId,
        def: GroupByDef,
    ) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::GroupBy(def));
        self.construct(Expr::new(
            op,
            vec![
                Operand::Group(input),
                Operand::Group(aggregations),
                Operand::Private(private),
            ],
        ))
    }

    pub fn construct_limit(&mut self, input: GroupId, limit: GroupId) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            Operator::Limit,
            vec![Operand::Group(input), Operand::Group(limit)],
        ))
    }

    pub fn construct_offset(&mut self, input: GroupId, offset: GroupId) -> Result<GroupId, NormError> {
        self.construct(Expr::new(
            Operator::Offset,
            vec![Operand::Group(input), Operand::Group(offset)],
        ))
    }

    pub fn construct_sort(&mut self, input: GroupId, ordering: Ordering) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::Ordering(ordering));
        self.construct(Expr::new(
            Operator::Sort,
            vec![Operand::Group(input), Operand::Private(private)],
        ))
    }

    pub fn construct_row_number(
        &mut self,
        input: GroupId,
        column: ColumnId,
    ) -> Result<GroupId, NormError> {
        let private = self.intern_private(Private::RowNumber(RowNumberDef { column }));
        self.construct(Expr::new(
            Operator::RowNumber,
            vec![Operand::Group(input), Operand::Private(private)],
        ))
    }

    /// Returns a group equivalent to `input` that has a strong key, along with that
    /// key. Inputs without one are numbered with a new `rownum` column.
    pub fn ensure_key(&mut self, input: GroupId) -> Result<(GroupId, ColSet), NormError> {
        if let Some(key) = self.relational(input).shortest_strong_key() {
            return Ok((input, key.clone()));
        }
        let column = self.metadata_mut().add_column("rownum", DataType::BigInt);
        let numbered = self.construct_row_number(input, column)?;
        Ok((numbered, ColSet::from(&[column][..])))
    }

    // Filter helpers shared by the select and join rules.

    /// Wraps a lone condition, or the conditions of an and, in a filters list.
    pub(crate) fn wrap_in_filters(&mut self, filter: GroupId) -> Result<GroupId, NormError> {
        let conditions = if self.op(filter) == Operator::And {
            self.list_of(filter).to_vec()
        } else {
            vec![filter]
        };
        self.construct_filters(conditions)
    }

    /// Combines the filters of two stacked selects.
    pub(crate) fn concat_filters(
        &mut self,
        inner: GroupId,
        outer: GroupId,
    ) -> Result<GroupId, NormError> {
        let mut conditions = vec![];
        for filter in [inner, outer].iter() {
            match self.op(*filter) {
                Operator::True => {}
                Operator::False => return Ok(*filter),
                Operator::Filters => conditions.extend_from_slice(self.list_of(*filter)),
                _ => conditions.push(*filter),
            }
        }
        self.construct_filters(conditions)
    }

    /// A condition that only references columns of `input` and can be evaluated
    /// directly against it.
    pub(crate) fn is_pushable_condition(&self, condition: GroupId, input: GroupId) -> bool {
        self.is_bound_by(condition, input) && !self.scalar(condition).has_correlated_subquery
    }

    /// Splits a filters list into the conditions that can be pushed into `input`
    /// and the rest.
    pub(crate) fn partition_conditions(
        &self,
        filters: GroupId,
        input: GroupId,
    ) -> (Vec<GroupId>, Vec<GroupId>) {
        self.list_of(filters)
            .iter()
            .copied()
            .partition(|condition| self.is_pushable_condition(*condition, input))
    }

    /// Combines the columns of two groups into a single projections. A projections
    /// contributes its expressions and passthrough columns, any other group passes
    /// through its output columns. A column synthesized on either side is never
    /// also passed through.
    pub(crate) fn project_cols_from_both(
        &mut self,
        left: GroupId,
        right: GroupId,
    ) -> Result<GroupId, NormError> {
        let mut items = vec![];
        let mut synthesized = ColList::new();
        let mut passthrough = ColSet::new();
        for group in [left, right].iter() {
            match self.projections_parts(*group) {
                Some((elements, def)) => {
                    for (item, column) in elements.into_iter().zip(def.synthesized) {
                        if !synthesized.contains(&column) {
                            items.push(item);
                            synthesized.push(column);
                        }
                    }
                    passthrough.union_with(&def.passthrough);
                }
                None => passthrough.union_with(&self.relational(*group).output_cols),
            }
        }
        let synthesized_cols: ColSet = synthesized.iter().copied().collect();
        let passthrough = passthrough.difference(&synthesized_cols);
        self.construct_projections(items, synthesized, passthrough)
    }

    /// The expressions and definition of a projections group.
    pub(crate) fn projections_parts(&self, group: GroupId) -> Option<(Vec<GroupId>, ProjectionsDef)> {
        let expr = self.expr(group);
        if expr.op != Operator::Projections {
            return None;
        }
        let def = self.private(expr.private(1)).as_projections()?.clone();
        Some((self.list(expr.list(0)).to_vec(), def))
    }

    /// True if the operator's function accepts null arguments, ie `is`. Operators
    /// the registry has no overload for only allow nulls if they're null tests.
    pub(crate) fn allows_null_args(&self, op: Operator, left: GroupId, right: GroupId) -> bool {
        let name = match op.function_name() {
            Some(name) => name,
            None => return false,
        };
        let args = [self.scalar_type(left), self.scalar_type(right)];
        match self.registry().resolve(name, &args) {
            Ok(function) => function.allows_null_args,
            Err(_) => matches!(op, Operator::Is | Operator::IsNot),
        }
    }
}
