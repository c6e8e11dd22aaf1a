//! Tests for the constant expression validator.

mod common;
use common::*;

use sqlweave_core::ast::{
    AggregateFunction, AggregateKind, DataSource, Expr, FunctionKind, Literal, Node, Query,
    SelectItem,
};
use sqlweave_core::validate::{into_result, ConstantExpressionValidator};

fn error_count(expr: &Expr) -> usize {
    ConstantExpressionValidator::validate(expr).len()
}

// ===================================================================
// Accepted
// ===================================================================

#[test]
fn null_and_booleans() {
    assert_eq!(error_count(&Expr::null()), 0);
    assert_eq!(error_count(&Expr::boolean(true)), 0);
    assert_eq!(error_count(&Expr::boolean(false)), 0);
}

#[test]
fn literals() {
    for literal in [
        Literal::Integer(7),
        Literal::Float(1.5),
        Literal::String("x".into()),
        Literal::Bytes(vec![0xde, 0xad]),
    ] {
        assert_eq!(error_count(&Expr::Literal(literal)), 0);
    }
}

#[test]
fn current_temporal_functions() {
    for kind in [
        FunctionKind::CurrentDate,
        FunctionKind::CurrentTime,
        FunctionKind::CurrentTimestamp,
        FunctionKind::UtcNow,
    ] {
        assert_eq!(error_count(&Expr::function(kind, vec![])), 0);
    }
}

#[test]
fn nested_constant_operators() {
    let expr = Expr::case(
        None,
        vec![(Expr::int(1).lt(Expr::int(2)), Expr::string("lt"))],
        Some(Expr::string("ge")),
    )
    .eq(Expr::function(FunctionKind::Upper, vec![Expr::string("lt")]));
    assert_eq!(error_count(&expr), 0);
}

// ===================================================================
// Rejected
// ===================================================================

#[test]
fn binary_node_with_two_non_constant_operands() {
    let expr = Expr::param("a").add(Expr::param("b"));
    assert_eq!(error_count(&expr), 2);
}

#[test]
fn column_of_finalized_table() {
    let t = finalized_table("public", "t");
    assert_eq!(error_count(&t.field("a")), 1);
}

#[test]
fn column_builder_reference() {
    let fixture = Fixture::new();
    assert_eq!(error_count(&fixture.column("total")), 1);
}

#[test]
fn violations_accumulate_across_the_tree() {
    let fixture = Fixture::new();
    let expr = Expr::function(
        FunctionKind::Coalesce,
        vec![fixture.column("status"), Expr::param("fallback"), Expr::int(0)],
    )
    .gt(Expr::int(1).neg());
    let errors = ConstantExpressionValidator::validate(&expr);
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[1].message,
        "parameter fallback is not allowed in a constant expression"
    );
}

#[test]
fn aggregate_is_one_error() {
    let fixture = Fixture::new();
    let expr = Expr::from(AggregateFunction::new(
        AggregateKind::Sum,
        vec![fixture.column("total")],
    ));
    assert_eq!(error_count(&expr), 1);
}

#[test]
fn subquery_reports_its_data_source() {
    let t = finalized_table("public", "t");
    let query = Query::select(DataSource::new(t), vec![SelectItem::new(Expr::int(1))]);
    assert_eq!(error_count(&Expr::subquery(query)), 1);
}

#[test]
fn record_set_node() {
    let mut validator = ConstantExpressionValidator::new();
    validator.check_node(&Node::RecordSet(finalized_table("public", "t")));
    assert_eq!(validator.errors().len(), 1);
    assert!(into_result(validator.finish()).is_err());
}
