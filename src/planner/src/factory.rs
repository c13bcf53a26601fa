use crate::check::check_expr;
use crate::config::NormConfig;
use crate::error::NormError;
use crate::memo::{Expr, GroupId, ListId, Memo, Operand, PrivateId};
use crate::metadata::Metadata;
use crate::props::{LogicalProps, PropsBuilder, RelationalProps, ScalarProps};
use crate::rules::{rules_for, Rewrite, Rule, RuleName};
use ast::{ColSet, OperandKind, Operator, Private};
use data::{DataType, Datum};
use functions::registry::Registry;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, trace};

pub type MatchedRuleFn = Box<dyn FnMut(RuleName) -> bool>;
pub type AppliedRuleFn = Box<dyn FnMut(RuleName, GroupId)>;

/// The normalizing expression builder. Every expression goes through `construct`,
/// which applies any matching rewrite rules before the fully normalized result is
/// memoized. A factory owns all the state of one planning session.
pub struct Factory {
    memo: Memo,
    metadata: Metadata,
    registry: Registry,
    config: NormConfig,
    // Fingerprints of the expressions whose rules are currently being applied,
    // re-entering one of these skips the rules and memoizes as is.
    in_progress: HashSet<Expr>,
    depth: usize,
    custom_rules: Vec<(Operator, Rule)>,
    matched_rule: Option<MatchedRuleFn>,
    applied_rule: Option<AppliedRuleFn>,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("memo", &self.memo)
            .field("metadata", &self.metadata)
            .field("config", &self.config)
            .field("custom_rules", &self.custom_rules)
            .finish()
    }
}

impl Factory {
    pub fn new(registry: Registry, config: NormConfig) -> Self {
        let mut factory = Factory {
            memo: Memo::new(),
            metadata: Metadata::new(),
            registry,
            config,
            in_progress: HashSet::new(),
            depth: 0,
            custom_rules: vec![],
            matched_rule: None,
            applied_rule: None,
        };
        if factory.config.disable_rules {
            factory.disable_optimizations();
        }
        factory
    }

    /// Creates a factory with the default registry and expression checking on.
    pub fn new_for_test() -> Self {
        Factory::new(
            Registry::default(),
            NormConfig {
                check_expressions: true,
                ..NormConfig::default()
            },
        )
    }

    /// Vetoes every rule, the factory then builds exactly the tree it's asked to.
    pub fn disable_optimizations(&mut self) {
        self.notify_on_matched_rule(|_| false);
    }

    /// Registers a callback that's invoked when a rule matches, before it's
    /// applied. Returning false skips the rule.
    pub fn notify_on_matched_rule<F: FnMut(RuleName) -> bool + 'static>(&mut self, matched: F) {
        self.matched_rule = Some(Box::new(matched));
    }

    /// Registers a callback that's invoked after a rule has been applied, with
    /// the group that replaced the original expression.
    pub fn notify_on_applied_rule<F: FnMut(RuleName, GroupId) + 'static>(&mut self, applied: F) {
        self.applied_rule = Some(Box::new(applied));
    }

    /// Adds a rule for the given operator, tried after the built in rules.
    pub fn add_rule(&mut self, op: Operator, rule: Rule) {
        self.custom_rules.push((op, rule));
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &NormConfig {
        &self.config
    }

    /// The canonical expression of a group.
    pub fn expr(&self, group: GroupId) -> &Expr {
        self.memo.expr(group)
    }

    pub fn props(&self, group: GroupId) -> &LogicalProps {
        self.memo.props(group)
    }

    pub fn intern_list(&mut self, items: Vec<GroupId>) -> ListId {
        self.memo.intern_list(items)
    }

    pub fn intern_private(&mut self, private: Private) -> PrivateId {
        self.memo.intern_private(private)
    }

    /// Builds the normalized form of the expression and returns its group.
    pub fn construct(&mut self, expr: Expr) -> Result<GroupId, NormError> {
        self.validate_shape(&expr)?;

        // Memoized expressions are already normalized.
        if let Some(group) = self.memo.lookup(&expr) {
            return Ok(group);
        }

        if self.in_progress.contains(&expr) {
            trace!(op = %expr.op, "rule cycle detected, skipping rules");
            return self.memoize(expr);
        }

        if self.depth >= self.config.max_rewrite_depth {
            return Err(NormError::RewriteDepthExceeded(self.config.max_rewrite_depth));
        }

        self.in_progress.insert(expr.clone());
        self.depth += 1;
        let result = self.try_rules(&expr);
        self.depth -= 1;
        self.in_progress.remove(&expr);

        match result? {
            Some(group) => Ok(group),
            None => self.memoize(expr),
        }
    }

    fn try_rules(&mut self, expr: &Expr) -> Result<Option<GroupId>, NormError> {
        for rule in rules_for(expr.op) {
            if let Some(group) = self.try_rule(*rule, expr)? {
                return Ok(Some(group));
            }
        }
        for idx in 0..self.custom_rules.len() {
            let (op, rule) = self.custom_rules[idx];
            if op == expr.op {
                if let Some(group) = self.try_rule(rule, expr)? {
                    return Ok(Some(group));
                }
            }
        }
        Ok(None)
    }

    fn try_rule(&mut self, rule: Rule, expr: &Expr) -> Result<Option<GroupId>, NormError> {
        if !(rule.matches)(self, expr) {
            return Ok(None);
        }
        if let Some(matched) = self.matched_rule.as_mut() {
            if !matched(rule.name) {
                trace!(rule = %rule.name, "rule vetoed");
                return Ok(None);
            }
        }

        let group = match (rule.replace)(self, expr)? {
            Rewrite::Group(group) => group,
            Rewrite::Construct(replacement) => self.construct(replacement)?,
        };
        debug!(rule = %rule.name, group = group.0, "applied rule");
        if let Some(applied) = self.applied_rule.as_mut() {
            applied(rule.name, group);
        }
        Ok(Some(group))
    }

    fn memoize(&mut self, expr: Expr) -> Result<GroupId, NormError> {
        if self.config.check_expressions {
            check_expr(&self.memo, &self.metadata, &expr)?;
        }
        let metadata = &self.metadata;
        let registry = &self.registry;
        self.memo.memoize(expr, |memo, expr| {
            PropsBuilder {
                memo,
                metadata,
                registry,
            }
            .build(expr)
        })
    }

    /// Checks the operands line up with the operator's declared shape.
    fn validate_shape(&self, expr: &Expr) -> Result<(), NormError> {
        let shape = expr.op.shape();
        if shape.len() != expr.operands.len() {
            return Err(NormError::ShapeMismatch {
                op: expr.op,
                expected: shape.len(),
                actual: expr.operands.len(),
            });
        }

        for (idx, (expected, operand)) in shape.iter().zip(expr.operands.iter()).enumerate() {
            let actual = match operand {
                Operand::Group(group) if self.memo.has_group(*group) => {
                    if self.memo.props(*group).is_relational() {
                        OperandKind::Relational
                    } else {
                        OperandKind::Scalar
                    }
                }
                Operand::List(list) if self.memo.has_list(*list) => {
                    let items = self.memo.lookup_list(*list);
                    if items
                        .iter()
                        .all(|item| self.memo.has_group(*item) && !self.memo.props(*item).is_relational())
                    {
                        OperandKind::List
                    } else {
                        return Err(NormError::OperandKind {
                            op: expr.op,
                            idx,
                            expected: *expected,
                            actual: "a list holding non scalar groups".to_string(),
                        });
                    }
                }
                Operand::Private(private) if self.memo.has_private(*private) => {
                    OperandKind::Private(self.memo.lookup_private(*private).kind())
                }
                other => {
                    return Err(NormError::OperandKind {
                        op: expr.op,
                        idx,
                        expected: *expected,
                        actual: format!("unknown handle {:?}", other),
                    })
                }
            };
            if actual != *expected {
                return Err(NormError::OperandKind {
                    op: expr.op,
                    idx,
                    expected: *expected,
                    actual: format!("{:?}", actual),
                });
            }
        }
        Ok(())
    }

    // Helpers shared by the rules, these assume the groups they're handed have the
    // right kind of properties.

    pub(crate) fn op(&self, group: GroupId) -> Operator {
        self.memo.expr(group).op
    }

    pub(crate) fn list(&self, list: ListId) -> &[GroupId] {
        self.memo.lookup_list(list)
    }

    /// The list held by a group whose first operand is a list, ie an and.
    pub(crate) fn list_of(&self, group: GroupId) -> &[GroupId] {
        self.list(self.memo.expr(group).list(0))
    }

    pub(crate) fn private(&self, private: PrivateId) -> &Private {
        self.memo.lookup_private(private)
    }

    pub(crate) fn relational(&self, group: GroupId) -> &RelationalProps {
        self.memo.relational(group)
    }

    pub(crate) fn scalar(&self, group: GroupId) -> &ScalarProps {
        self.memo.scalar(group)
    }

    pub(crate) fn scalar_type(&self, group: GroupId) -> DataType {
        self.scalar(group).datatype
    }

    pub(crate) fn outer_cols(&self, group: GroupId) -> &ColSet {
        self.memo.props(group).outer_cols()
    }

    /// True if every outer column of `src` is produced by the relational `dst`.
    pub(crate) fn is_bound_by(&self, src: GroupId, dst: GroupId) -> bool {
        self.outer_cols(src).is_subset(&self.relational(dst).output_cols)
    }

    /// The value of a constant valued group.
    pub(crate) fn const_datum(&self, group: GroupId) -> Option<Cow<Datum>> {
        crate::rules::list::const_datum(&self.memo, group)
    }

    pub(crate) fn const_i64(&self, group: GroupId) -> Option<i64> {
        match self.const_datum(group)?.as_ref() {
            Datum::Integer(value) => Some(i64::from(*value)),
            Datum::BigInt(value) => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn is_const_value(&self, group: GroupId) -> bool {
        self.op(group).is_const_value()
    }
}
