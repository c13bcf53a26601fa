use crate::memo::{GroupId, Memo};
use ast::Operator;
use data::Datum;
use std::borrow::Cow;
use std::cmp::Ordering;

/// The value of a constant valued group, ie a const, null, true or false.
pub(crate) fn const_datum(memo: &Memo, group: GroupId) -> Option<Cow<Datum>> {
    let expr = memo.expr(group);
    match expr.op {
        Operator::Const => memo
            .lookup_private(expr.private(0))
            .as_constant()
            .map(|(datum, _)| Cow::Borrowed(datum)),
        Operator::Null => Some(Cow::Owned(Datum::Null)),
        Operator::True => Some(Cow::Owned(Datum::Boolean(true))),
        Operator::False => Some(Cow::Owned(Datum::Boolean(false))),
        _ => None,
    }
}

/// Orders list items for canonical set like lists. Constants sort before
/// everything else and compare by value, with the group id breaking ties between
/// equal values of different types. Everything else compares by group id.
pub(crate) fn compare_items(memo: &Memo, left: GroupId, right: GroupId) -> Ordering {
    match (const_datum(memo, left), const_datum(memo, right)) {
        (Some(left_value), Some(right_value)) => left_value
            .sql_cmp(&right_value)
            .then_with(|| left.cmp(&right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(&right),
    }
}

/// True if the two items are duplicates within a set like list, ie the same group
/// or constants of equal value.
fn is_duplicate(memo: &Memo, left: GroupId, right: GroupId) -> bool {
    left == right
        || match (const_datum(memo, left), const_datum(memo, right)) {
            (Some(left), Some(right)) => left.sql_cmp(&right) == Ordering::Equal,
            _ => false,
        }
}

pub(crate) fn is_sorted_unique(memo: &Memo, items: &[GroupId]) -> bool {
    items.windows(2).all(|pair| {
        compare_items(memo, pair[0], pair[1]) == Ordering::Less
            && !is_duplicate(memo, pair[0], pair[1])
    })
}

/// Sorts the items and drops duplicates. Of several equal constants the one with
/// the lowest group id is kept.
pub(crate) fn sorted_unique(memo: &Memo, items: &[GroupId]) -> Vec<GroupId> {
    let mut items = items.to_vec();
    items.sort_by(|left, right| compare_items(memo, *left, *right));
    items.dedup_by(|item, previous| is_duplicate(memo, *previous, *item));
    items
}
