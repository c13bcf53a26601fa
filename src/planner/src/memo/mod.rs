mod expr;

pub use expr::*;

use crate::error::NormError;
use crate::interner::Interner;
use crate::props::{LogicalProps, RelationalProps, ScalarProps};
use ast::Private;
use std::collections::HashMap;
use tracing::debug;

/// A group holds the single normalized expression chosen to represent it along
/// with its logical properties. Groups are never modified once created.
#[derive(Debug)]
pub struct Group {
    expr: Expr,
    props: LogicalProps,
}

impl Group {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn props(&self) -> &LogicalProps {
        &self.props
    }
}

/// The handle of the empty list, it's interned when the memo is created.
pub const EMPTY_LIST: ListId = ListId(0);

/// Arena of groups addressed by `GroupId`, plus the interning tables for lists and
/// privates. Owned by a single planning session and dropped as a whole.
#[derive(Debug)]
pub struct Memo {
    groups: Vec<Group>,
    index: HashMap<Expr, GroupId>,
    lists: Interner<Vec<GroupId>>,
    privates: Interner<Private>,
}

impl Default for Memo {
    fn default() -> Self {
        Memo::new()
    }
}

impl Memo {
    pub fn new() -> Self {
        let mut lists = Interner::default();
        lists.intern(vec![]);
        Memo {
            groups: vec![],
            index: HashMap::new(),
            lists,
            privates: Interner::default(),
        }
    }

    pub fn intern_list(&mut self, items: Vec<GroupId>) -> ListId {
        ListId(self.lists.intern(items))
    }

    pub fn intern_private(&mut self, private: Private) -> PrivateId {
        PrivateId(self.privates.intern(private))
    }

    pub fn lookup_list(&self, list: ListId) -> &[GroupId] {
        self.lists.lookup(list.0)
    }

    pub fn lookup_private(&self, private: PrivateId) -> &Private {
        self.privates.lookup(private.0)
    }

    pub fn has_group(&self, group: GroupId) -> bool {
        (group.0 as usize) < self.groups.len()
    }

    pub fn has_list(&self, list: ListId) -> bool {
        self.lists.contains_handle(list.0)
    }

    pub fn has_private(&self, private: PrivateId) -> bool {
        self.privates.contains_handle(private.0)
    }

    /// Returns the group already holding this exact expression, if any.
    pub fn lookup(&self, expr: &Expr) -> Option<GroupId> {
        self.index.get(expr).copied()
    }

    /// Returns the group for the expression, creating it if it doesn't exist yet.
    /// Properties are derived exactly once, when the group is created.
    pub fn memoize<F>(&mut self, expr: Expr, derive: F) -> Result<GroupId, NormError>
    where
        F: FnOnce(&Memo, &Expr) -> Result<LogicalProps, NormError>,
    {
        if let Some(group) = self.lookup(&expr) {
            return Ok(group);
        }

        let props = derive(self, &expr)?;
        let group = GroupId(self.groups.len() as u32);
        debug!(group = group.0, op = %expr.op, "memoized new group");
        self.index.insert(expr.clone(), group);
        self.groups.push(Group { expr, props });
        Ok(group)
    }

    pub fn group(&self, group: GroupId) -> &Group {
        &self.groups[group.0 as usize]
    }

    pub fn expr(&self, group: GroupId) -> &Expr {
        &self.group(group).expr
    }

    pub fn props(&self, group: GroupId) -> &LogicalProps {
        &self.group(group).props
    }

    pub fn relational(&self, group: GroupId) -> &RelationalProps {
        self.props(group).relational()
    }

    pub fn scalar(&self, group: GroupId) -> &ScalarProps {
        self.props(group).scalar()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
