use super::{Rewrite, Rule, RuleName};
use crate::error::NormError;
use crate::factory::Factory;
use crate::memo::{Expr, GroupId, Operand};
use ast::{ColList, ColSet, Operator};

/// A project that passes through every input column and computes nothing new.
pub(super) const ELIMINATE_PROJECT: Rule = Rule {
    name: RuleName::EliminateProject,
    matches: |f, e| {
        let projections = f.expr(e.group(1));
        if projections.op != Operator::Projections || !f.list(projections.list(0)).is_empty() {
            return false;
        }
        match f.private(projections.private(1)).as_projections() {
            Some(def) => def.passthrough == f.relational(e.group(0)).output_cols,
            None => false,
        }
    },
    replace: |_, e| Ok(Rewrite::Group(e.group(0))),
};

/// Collapses a project over a project into one, as long as the outer expressions
/// don't reference columns synthesized by the inner project.
pub(super) const MERGE_PROJECTS: Rule = Rule {
    name: RuleName::MergeProjects,
    matches: |f, e| {
        if f.op(e.group(0)) != Operator::Project {
            return false;
        }
        let inner = f.expr(e.group(0)).group(1);
        match (f.projections_parts(e.group(1)), f.projections_parts(inner)) {
            (Some((outer_items, _)), Some((_, inner_def))) => {
                let inner_synthesized: ColSet = inner_def.synthesized.iter().copied().collect();
                outer_items
                    .iter()
                    .all(|item| !f.outer_cols(*item).intersects(&inner_synthesized))
            }
            _ => false,
        }
    },
    replace: merge_projects,
};

fn merge_projects(f: &mut Factory, e: &Expr) -> Result<Rewrite, NormError> {
    let inner = f.expr(e.group(0)).clone();
    let needed = f.relational(e.group(0)).output_cols.intersection(&passthrough_of(f, e.group(1)));
    let inner_projections = restrict_projections(f, inner.group(1), &needed)?;
    let merged = f.project_cols_from_both(e.group(1), inner_projections)?;
    Ok(Rewrite::Construct(Expr::new(
        Operator::Project,
        vec![Operand::Group(inner.group(0)), Operand::Group(merged)],
    )))
}

fn passthrough_of(f: &Factory, projections: GroupId) -> ColSet {
    f.projections_parts(projections)
        .map(|(_, def)| def.passthrough)
        .unwrap_or_default()
}

/// Narrows a projections down to the given columns.
fn restrict_projections(
    f: &mut Factory,
    projections: GroupId,
    cols: &ColSet,
) -> Result<GroupId, NormError> {
    let (items, def) = match f.projections_parts(projections) {
        Some(parts) => parts,
        None => return Ok(projections),
    };
    let mut kept_items = vec![];
    let mut kept_cols = ColList::new();
    for (item, column) in items.into_iter().zip(def.synthesized) {
        if cols.contains(column) {
            kept_items.push(item);
            kept_cols.push(column);
        }
    }
    f.construct_projections(kept_items, kept_cols, def.passthrough.intersection(cols))
}
