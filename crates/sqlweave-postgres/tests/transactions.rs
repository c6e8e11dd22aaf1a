//! Transaction control, raw statements and custom nodes.

mod common;
use common::*;

use std::any::Any;

use sqlweave_core::ast::{
    AccessMode, Begin, CustomNode, CustomNodeRef, Expr, IsolationLevel, Node, ReleaseSavepoint,
    RollbackToSavepoint, Savepoint, Statement,
};
use sqlweave_core::dialect::Dialect;
use sqlweave_postgres::custom::notify;
use sqlweave_postgres::PostgresInterpreter;

#[derive(Debug)]
struct Vacuum;

impl CustomNode for Vacuum {
    fn name(&self) -> &str {
        "vacuum"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Now;

impl CustomNode for Now {
    fn name(&self) -> &str {
        "now"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self, dialect: &dyn Dialect) -> Option<String> {
        (dialect.name() == "postgresql").then(|| "NOW()".to_string())
    }
}

// ===================================================================
// Transactions
// ===================================================================

#[test]
fn begin_variants() {
    assert_eq!(compile(Begin::default()), "BEGIN");
    assert_eq!(
        compile(Begin {
            isolation: Some(IsolationLevel::Serializable),
            access: None,
        }),
        "BEGIN ISOLATION LEVEL SERIALIZABLE"
    );
    assert_eq!(
        compile(Begin {
            isolation: Some(IsolationLevel::RepeatableRead),
            access: Some(AccessMode::ReadOnly),
        }),
        "BEGIN ISOLATION LEVEL REPEATABLE READ, READ ONLY"
    );
    assert_eq!(
        compile(Begin {
            isolation: None,
            access: Some(AccessMode::ReadWrite),
        }),
        "BEGIN READ WRITE"
    );
}

#[test]
fn commit_rollback_and_savepoints() {
    assert_eq!(compile(Statement::Commit), "COMMIT");
    assert_eq!(compile(Statement::Rollback), "ROLLBACK");
    assert_eq!(
        compile(Statement::Savepoint(Savepoint { name: "sp1".into() })),
        r#"SAVEPOINT "sp1""#
    );
    assert_eq!(
        compile(Statement::ReleaseSavepoint(ReleaseSavepoint { name: "sp1".into() })),
        r#"RELEASE SAVEPOINT "sp1""#
    );
    assert_eq!(
        compile(Statement::RollbackToSavepoint(RollbackToSavepoint {
            name: "sp1".into()
        })),
        r#"ROLLBACK TO SAVEPOINT "sp1""#
    );
}

#[test]
fn raw_statement_is_verbatim() {
    assert_eq!(compile(Statement::raw("VACUUM ANALYZE")), "VACUUM ANALYZE");
}

// ===================================================================
// Custom nodes
// ===================================================================

#[test]
fn notify_statement() {
    assert_eq!(
        compile(notify("jobs", Some("it's done".into()))),
        r#"NOTIFY "jobs", 'it''s done'"#
    );
    assert_eq!(compile(notify("jobs", None)), r#"NOTIFY "jobs""#);
}

#[test]
fn custom_node_renders_itself() {
    let expr = Expr::Custom(CustomNodeRef::new(Now)).eq(Expr::param("t"));
    assert_eq!(compile_expr(&expr), "NOW() = @t");
}

#[test]
fn custom_node_without_rendering_fails() {
    let err = compile_err(Statement::Custom(CustomNodeRef::new(Vacuum)));
    assert!(err.is_unrecognized());
    assert!(err.to_string().contains("vacuum"));
    assert!(matches!(err.node(), Some(Node::Custom(_))));
}

// ===================================================================
// Interpreter state
// ===================================================================

#[test]
fn interpreter_is_reusable_after_error() {
    let mut interpreter = PostgresInterpreter::new();
    let failing = Statement::Custom(CustomNodeRef::new(Vacuum));
    assert!(interpreter.compile(&failing).is_err());

    let compiled = interpreter
        .compile(&Statement::Savepoint(Savepoint { name: "a".into() }))
        .unwrap();
    assert_eq!(compiled.sql, r#"SAVEPOINT "a""#);
    assert!(compiled.parameters.is_empty());
}

#[test]
fn compile_node_accepts_any_node() {
    let mut interpreter = PostgresInterpreter::new();
    let node = Node::Expr(Expr::param("x").add(Expr::int(1)));
    let compiled = interpreter.compile_node(&node).unwrap();
    assert_eq!(compiled.sql, "@x + 1");
    assert_eq!(compiled.parameter_names(), ["x"]);

    let record_set = Node::RecordSet(orders());
    assert_eq!(
        interpreter.compile_node(&record_set).unwrap().sql,
        r#""sales"."orders" AS "o""#
    );
}
