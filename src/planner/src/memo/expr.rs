use ast::Operator;
use std::fmt::{Display, Formatter};

/// Identifies a group in the memo.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GroupId(pub u32);

/// Identifies an interned list of scalar groups.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListId(pub u32);

/// Identifies an interned private value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PrivateId(pub u32);

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("G{}", self.0))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operand {
    Group(GroupId),
    List(ListId),
    Private(PrivateId),
}

/// An operator applied to its operands. Operands only ever hold handles so an
/// expression is cheap to hash and compare, two expressions that compare equal are
/// the same expression. This doubles as the fingerprint used by the cycle guard.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub op: Operator,
    pub operands: Vec<Operand>,
}

impl Expr {
    pub fn new(op: Operator, operands: Vec<Operand>) -> Self {
        Expr { op, operands }
    }

    /// Returns the group at the given operand position.
    /// Only call this on expressions that have passed shape validation.
    pub fn group(&self, idx: usize) -> GroupId {
        match self.operands[idx] {
            Operand::Group(group) => group,
            other => panic!(
                "Operand {} of {} should be a group, found {:?}",
                idx, self.op, other
            ),
        }
    }

    pub fn list(&self, idx: usize) -> ListId {
        match self.operands[idx] {
            Operand::List(list) => list,
            other => panic!(
                "Operand {} of {} should be a list, found {:?}",
                idx, self.op, other
            ),
        }
    }

    pub fn private(&self, idx: usize) -> PrivateId {
        match self.operands[idx] {
            Operand::Private(private) => private,
            other => panic!(
                "Operand {} of {} should be a private, found {:?}",
                idx, self.op, other
            ),
        }
    }

    /// The child groups of this expression, list elements are not included.
    pub fn child_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.operands.iter().filter_map(|operand| {
            if let Operand::Group(group) = operand {
                Some(*group)
            } else {
                None
            }
        })
    }
}
