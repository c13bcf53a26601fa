use ast::Operator;
use data::DataType;
use planner::{Expr, Factory, NormConfig, NormError, Rewrite, Rule, RuleName};
use runner::*;
use std::cell::RefCell;
use std::rc::Rc;

mod runner;

/// a + b => b + a, for variables only. Applied blindly this never terminates.
const COMMUTE_PLUS: Rule = Rule {
    name: RuleName::Custom("CommutePlus"),
    matches: |f, e| {
        f.expr(e.group(0)).op == Operator::Variable && f.expr(e.group(1)).op == Operator::Variable
    },
    replace: |_, e| {
        Ok(Rewrite::Construct(Expr::new(
            Operator::Plus,
            vec![e.operands[1], e.operands[0]],
        )))
    },
};

/// -x => -(-x) with the inner negation built first, so every rewrite is a new
/// expression and only the depth limit stops it.
const NEST_UNARY_MINUS: Rule = Rule {
    name: RuleName::Custom("NestUnaryMinus"),
    matches: |_, _| true,
    replace: |f, e| {
        let inner = f.construct_unary(Operator::UnaryMinus, e.group(0))?;
        Ok(Rewrite::Construct(Expr::new(
            Operator::UnaryMinus,
            vec![planner::Operand::Group(inner)],
        )))
    },
};

fn int_vars(factory: &mut Factory) -> (planner::GroupId, planner::GroupId) {
    let a = factory.metadata_mut().add_column("a", DataType::Integer);
    let b = factory.metadata_mut().add_column("b", DataType::Integer);
    (
        factory.construct_variable(a).unwrap(),
        factory.construct_variable(b).unwrap(),
    )
}

#[test]
fn rule_cycles_terminate() -> Result<(), NormError> {
    let mut factory = Factory::new_for_test();
    factory.add_rule(Operator::Plus, COMMUTE_PLUS);
    let fired = Rc::new(RefCell::new(vec![]));
    let log = Rc::clone(&fired);
    factory.notify_on_applied_rule(move |name, group| log.borrow_mut().push((name, group)));

    let (a, b) = int_vars(&mut factory);
    let plus = factory.construct_binary(Operator::Plus, a, b)?;

    let fired = fired.borrow();
    assert!(fired.len() <= 2);
    assert!(fired
        .iter()
        .all(|(name, group)| *name == RuleName::Custom("CommutePlus") && *group == plus));
    assert_eq!(op(&factory, plus), Operator::Plus);
    Ok(())
}

#[test]
fn rewrite_depth_is_bounded() {
    let mut factory = Factory::new(
        functions::registry::Registry::default(),
        NormConfig {
            max_rewrite_depth: 8,
            ..NormConfig::default()
        },
    );
    factory.add_rule(Operator::UnaryMinus, NEST_UNARY_MINUS);
    let (a, _) = int_vars(&mut factory);
    assert_eq!(
        factory.construct_unary(Operator::UnaryMinus, a),
        Err(NormError::RewriteDepthExceeded(8))
    );
}

#[test]
fn matched_hook_can_veto() -> Result<(), NormError> {
    let mut factory = Factory::new_for_test();
    factory.notify_on_matched_rule(|name| name != RuleName::SimplifyAnd);
    let x = bool_vars(&mut factory, 1)[0];
    let t = factory.construct_true()?;

    let and = factory.construct_and(vec![t, x])?;
    assert_eq!(op(&factory, and), Operator::And);

    // Other rules still fire.
    let f = factory.construct_false()?;
    assert_eq!(factory.construct_not(t)?, f);
    Ok(())
}

#[test]
fn applied_hook_reports_rules_innermost_first() -> Result<(), NormError> {
    let mut factory = Factory::new_for_test();
    let applied = Rc::new(RefCell::new(vec![]));
    let log = Rc::clone(&applied);
    factory.notify_on_applied_rule(move |name, group| log.borrow_mut().push((name, group)));

    let x = bool_vars(&mut factory, 1)[0];
    let t = factory.construct_true()?;
    assert_eq!(factory.construct_and(vec![x, t])?, x);
    assert_eq!(
        *applied.borrow(),
        vec![(RuleName::EliminateAnd, x), (RuleName::SimplifyAnd, x)]
    );
    Ok(())
}

#[test]
fn disabled_rules_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = NormConfig::from_json(r#"{"disable_rules": true, "check_expressions": true}"#)?;
    let mut factory = Factory::new(functions::registry::Registry::default(), config);
    let x = bool_vars(&mut factory, 1)[0];
    let t = factory.construct_true()?;
    let and = factory.construct_and(vec![t, x])?;
    assert_eq!(op(&factory, and), Operator::And);
    Ok(())
}

#[test]
fn structural_sharing_and_idempotence() -> Result<(), NormError> {
    let catalog = xyz_catalog();
    let mut factory = Factory::new_for_test();
    let scan = scan_xyz(&mut factory, &catalog)?;
    let y = var(&mut factory, 2);
    let one = int(&mut factory, 1);
    let gt = factory.construct_binary(Operator::Gt, one, y)?;
    let select = factory.construct_select(scan, gt)?;

    let groups = factory.memo().group_count();
    let y_again = var(&mut factory, 2);
    let one_again = int(&mut factory, 1);
    let gt_again = factory.construct_binary(Operator::Gt, one_again, y_again)?;
    assert_eq!(factory.construct_select(scan, gt_again)?, select);
    assert_eq!(factory.memo().group_count(), groups);

    // Rebuilding any normalized expression gives back its own group.
    for idx in 0..groups {
        let group = planner::GroupId(idx as u32);
        let expr = factory.expr(group).clone();
        assert_eq!(factory.construct(expr)?, group);
    }
    assert_eq!(factory.memo().group_count(), groups);
    Ok(())
}

#[test]
fn malformed_operands_are_rejected() {
    let mut factory = Factory::new_for_test();
    let t = factory.construct_true().unwrap();
    assert_eq!(
        factory.construct(Expr::new(Operator::Not, vec![])),
        Err(NormError::ShapeMismatch {
            op: Operator::Not,
            expected: 1,
            actual: 0
        })
    );
    assert!(factory
        .construct(Expr::new(
            Operator::Not,
            vec![planner::Operand::Group(planner::GroupId(99))]
        ))
        .is_err());
    assert!(factory.construct_select(t, t).is_err());
}
