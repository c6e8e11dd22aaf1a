//! DELETE and UPDATE, including the identity CTE rewrite.

mod common;
use common::*;

use std::sync::Arc;

use sqlweave_core::ast::{
    Assignment, CommonTableExpression, DataSource, Delete, Expr, Node, OrderItem, Query,
    RecordSet, SelectItem, Statement, Update,
};
use sqlweave_core::schema::memory::MemoryDatabase;
use sqlweave_core::schema::{Table, View};
use sqlweave_postgres::{InterpreterOptions, PostgresInterpreter};

fn update(source: DataSource, assignments: Vec<Assignment>) -> Update {
    Update {
        source,
        assignments,
        returning: Vec::new(),
    }
}

// ===================================================================
// Simple
// ===================================================================

#[test]
fn simple_delete() {
    let o = orders();
    let delete = Delete::new(DataSource::new(o.clone()).filter(o.field("status").eq(Expr::string("void"))));
    assert_eq!(
        compile(delete),
        r#"DELETE FROM "sales"."orders" AS "o" WHERE "o"."status" = 'void'"#
    );
}

#[test]
fn simple_delete_conjoins_filters_and_returns() {
    let o = orders();
    let mut delete = Delete::new(
        DataSource::new(o.clone())
            .filter(o.field("status").eq(Expr::string("void")))
            .filter(o.field("total").lt(Expr::int(0))),
    );
    delete.returning = vec![SelectItem::new(o.field("id"))];
    assert_eq!(
        compile(delete),
        r#"DELETE FROM "sales"."orders" AS "o" WHERE "o"."status" = 'void' AND "o"."total" < 0 RETURNING "o"."id""#
    );
}

#[test]
fn delete_without_filter() {
    let delete = Delete::new(DataSource::new(RecordSet::table(orders_table())));
    assert_eq!(compile(delete), r#"DELETE FROM "sales"."orders""#);
}

#[test]
fn simple_update() {
    let o = orders();
    let mut statement = update(
        DataSource::new(o.clone()).filter(o.field("id").eq(Expr::param("id"))),
        vec![
            Assignment::new("status", Expr::string("paid")),
            Assignment::new("total", o.field("total").add(Expr::int(1))),
        ],
    );
    statement.returning = vec![SelectItem::aliased(o.field("id"), "order_id")];
    assert_eq!(
        compile(statement),
        r#"UPDATE "sales"."orders" AS "o" SET "status" = 'paid', "total" = "o"."total" + 1 WHERE "o"."id" = @id RETURNING "o"."id" AS "order_id""#
    );
}

#[test]
fn default_schema_is_not_qualified() {
    let o = orders();
    let delete = Delete::new(DataSource::new(o.clone()).filter(o.field("id").eq(Expr::int(1))));
    let sql = PostgresInterpreter::with_options(InterpreterOptions::new().default_schema("sales"))
        .compile(&Statement::Delete(delete))
        .unwrap()
        .sql;
    assert_eq!(sql, r#"DELETE FROM "orders" AS "o" WHERE "o"."id" = 1"#);
}

// ===================================================================
// Two record sets
// ===================================================================

#[test]
fn delete_using_inner_join() {
    let (o, c) = (orders(), customers());
    let delete = Delete::new(
        DataSource::new(o.clone())
            .inner_join(c.clone(), o.field("customer_id").eq(c.field("id")))
            .filter(c.field("name").eq(Expr::param("name"))),
    );
    assert_eq!(
        compile(delete),
        r#"DELETE FROM "sales"."orders" AS "o" USING "sales"."customers" AS "c" WHERE "o"."customer_id" = "c"."id" AND "c"."name" = @name"#
    );
}

#[test]
fn delete_using_cross_join() {
    let (o, c) = (orders(), customers());
    let delete = Delete::new(
        DataSource::new(o.clone())
            .cross_join(c.clone())
            .filter(o.field("customer_id").eq(c.field("id"))),
    );
    assert_eq!(
        compile(delete),
        r#"DELETE FROM "sales"."orders" AS "o" USING "sales"."customers" AS "c" WHERE "o"."customer_id" = "c"."id""#
    );
}

#[test]
fn update_from_inner_join() {
    let (o, c) = (orders(), customers());
    let statement = update(
        DataSource::new(o.clone())
            .inner_join(c.clone(), o.field("customer_id").eq(c.field("id")))
            .filter(c.field("region").eq(Expr::param("region"))),
        vec![Assignment::new("status", Expr::string("vip"))],
    );
    assert_eq!(
        compile(statement),
        r#"UPDATE "sales"."orders" AS "o" SET "status" = 'vip' FROM "sales"."customers" AS "c" WHERE "o"."customer_id" = "c"."id" AND "c"."region" = @region"#
    );
}

// ===================================================================
// Complex
// ===================================================================

#[test]
fn delete_with_order_and_limit_uses_identity_cte() {
    let o = orders();
    let delete = Delete::new(
        DataSource::new(o.clone())
            .filter(o.field("status").eq(Expr::string("open")))
            .order_by(vec![OrderItem::asc(o.field("total"))])
            .limit(Expr::int(10)),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "o"."id" AS "__sw_id_1" FROM "sales"."orders" AS "o" "#,
            r#"WHERE "o"."status" = 'open' ORDER BY "o"."total" LIMIT 10) "#,
            r#"DELETE FROM "sales"."orders" AS "o" USING "__sw_cte_1" "#,
            r#"WHERE "o"."id" = "__sw_cte_1"."__sw_id_1""#
        )
    );
}

#[test]
fn delete_with_left_join_is_complex() {
    let (o, c) = (orders(), customers());
    let delete = Delete::new(
        DataSource::new(o.clone())
            .left_join(c.clone(), o.field("customer_id").eq(c.field("id")))
            .filter(c.field("id").is_null()),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "o"."id" AS "__sw_id_1" FROM "sales"."orders" AS "o" "#,
            r#"LEFT JOIN "sales"."customers" AS "c" ON "o"."customer_id" = "c"."id" WHERE "c"."id" IS NULL) "#,
            r#"DELETE FROM "sales"."orders" AS "o" USING "__sw_cte_1" "#,
            r#"WHERE "o"."id" = "__sw_cte_1"."__sw_id_1""#
        )
    );
}

#[test]
fn three_record_sets_are_complex() {
    let (o, c) = (orders(), customers());
    let regions = RecordSet::raw("regions").alias("r");
    let delete = Delete::new(
        DataSource::new(o.clone())
            .inner_join(c.clone(), o.field("customer_id").eq(c.field("id")))
            .inner_join(regions.clone(), c.field("region").eq(regions.field("code"))),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "o"."id" AS "__sw_id_1" FROM "sales"."orders" AS "o" "#,
            r#"INNER JOIN "sales"."customers" AS "c" ON "o"."customer_id" = "c"."id" "#,
            r#"INNER JOIN regions AS "r" ON "c"."region" = "r"."code") "#,
            r#"DELETE FROM "sales"."orders" AS "o" USING "__sw_cte_1" "#,
            r#"WHERE "o"."id" = "__sw_cte_1"."__sw_id_1""#
        )
    );
}

#[test]
fn keyless_target_correlates_every_column() {
    let audit = RecordSet::table(audit_table()).alias("a");
    let delete = Delete::new(
        DataSource::new(audit.clone())
            .order_by(vec![OrderItem::asc(audit.field("at"))])
            .limit(Expr::int(100)),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "a"."at" AS "__sw_id_1", "#,
            r#""a"."message" AS "__sw_id_2" FROM "sales"."audit" AS "a" "#,
            r#"ORDER BY "a"."at" LIMIT 100) "#,
            r#"DELETE FROM "sales"."audit" AS "a" USING "__sw_cte_1" "#,
            r#"WHERE "a"."at" = "__sw_cte_1"."__sw_id_1" "#,
            r#"AND "a"."message" = "__sw_cte_1"."__sw_id_2""#
        )
    );
}

#[test]
fn grouped_delete_correlates_composite_key() {
    let t = RecordSet::table(composite_table()).alias("x");
    let c = customers();
    let delete = Delete::new(
        DataSource::new(t.clone())
            .inner_join(c.clone(), t.field("b").eq(c.field("id")))
            .group_by(vec![t.field("a"), t.field("c")])
            .having(Expr::int(1).eq(Expr::int(1))),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "x"."a" AS "__sw_id_1", "x"."c" AS "__sw_id_2" "#,
            r#"FROM "s"."t" AS "x" INNER JOIN "sales"."customers" AS "c" ON "x"."b" = "c"."id" "#,
            r#"GROUP BY "x"."a", "x"."c" HAVING 1 = 1) "#,
            r#"DELETE FROM "s"."t" AS "x" USING "__sw_cte_1" "#,
            r#"WHERE "x"."a" = "__sw_cte_1"."__sw_id_1" AND "x"."c" = "__sw_cte_1"."__sw_id_2""#
        )
    );
}

#[test]
fn complex_update_with_returning() {
    let o = orders();
    let mut statement = update(
        DataSource::new(o.clone())
            .order_by(vec![OrderItem::desc(o.field("total"))])
            .limit(Expr::int(3)),
        vec![Assignment::new("status", Expr::string("top"))],
    );
    statement.returning = vec![SelectItem::new(o.field("id"))];
    assert_eq!(
        compile(statement),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "o"."id" AS "__sw_id_1" FROM "sales"."orders" AS "o" "#,
            r#"ORDER BY "o"."total" DESC LIMIT 3) "#,
            r#"UPDATE "sales"."orders" AS "o" SET "status" = 'top' FROM "__sw_cte_1" "#,
            r#"WHERE "o"."id" = "__sw_cte_1"."__sw_id_1" RETURNING "o"."id""#
        )
    );
}

#[test]
fn user_ctes_precede_identity_cte() {
    let o = orders();
    let big = CommonTableExpression::new(
        "big",
        Query::select(
            DataSource::new(o.clone()).filter(o.field("total").gt(Expr::int(100))),
            vec![SelectItem::new(o.field("id"))],
        ),
    );
    let big_set = RecordSet::cte(Arc::clone(&big));
    let delete = Delete::new(
        DataSource::new(o.clone())
            .with(vec![big], false)
            .filter(o.field("id").in_query(Query::select(
                DataSource::new(big_set.clone()),
                vec![SelectItem::new(big_set.field("id"))],
            )))
            .limit(Expr::int(5)),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "big" AS (SELECT "o"."id" FROM "sales"."orders" AS "o" WHERE "o"."total" > 100), "#,
            r#""__sw_cte_1" AS (SELECT "o"."id" AS "__sw_id_1" FROM "sales"."orders" AS "o" "#,
            r#"WHERE "o"."id" IN (SELECT "big"."id" FROM "big") LIMIT 5) "#,
            r#"DELETE FROM "sales"."orders" AS "o" USING "__sw_cte_1" "#,
            r#"WHERE "o"."id" = "__sw_cte_1"."__sw_id_1""#
        )
    );
}

#[test]
fn simple_delete_keeps_user_ctes() {
    let o = orders();
    let stale = CommonTableExpression::new("stale", Query::raw("SELECT 1 AS id"));
    let stale_set = RecordSet::cte(Arc::clone(&stale));
    let delete = Delete::new(
        DataSource::new(o.clone())
            .with(vec![stale], false)
            .inner_join(stale_set.clone(), o.field("id").eq(stale_set.field("id"))),
    );
    assert_eq!(
        compile(delete),
        r#"WITH "stale" AS (SELECT 1 AS id) DELETE FROM "sales"."orders" AS "o" USING "stale" WHERE "o"."id" = "stale"."id""#
    );
}

#[test]
fn builder_target_uses_its_primary_key() {
    let db = MemoryDatabase::new();
    let public = db.add_schema("public");
    let jobs = public.add_table("jobs");
    let _ = jobs.add_column("id");
    let _ = jobs.add_column("state");
    jobs.set_primary_key(&["id"]);
    let target = RecordSet::table_builder(Arc::clone(&jobs).into()).alias("j");

    let delete = Delete::new(
        DataSource::new(target.clone())
            .filter(target.field("state").eq(Expr::string("done")))
            .limit(Expr::int(1)),
    );
    assert_eq!(
        compile(delete),
        concat!(
            r#"WITH "__sw_cte_1" AS (SELECT "j"."id" AS "__sw_id_1" FROM "public"."jobs" AS "j" "#,
            r#"WHERE "j"."state" = 'done' LIMIT 1) "#,
            r#"DELETE FROM "public"."jobs" AS "j" USING "__sw_cte_1" "#,
            r#"WHERE "j"."id" = "__sw_cte_1"."__sw_id_1""#
        )
    );
}

#[test]
fn synthetic_names_restart_per_compilation() {
    let o = orders();
    let statement = Statement::Delete(Delete::new(DataSource::new(o).limit(Expr::int(1))));
    let mut interpreter =
        PostgresInterpreter::with_options(InterpreterOptions::new().synthetic_prefix("x"));
    let first = interpreter.compile(&statement).unwrap().sql;
    let second = interpreter.compile(&statement).unwrap().sql;
    assert_eq!(first, second);
    assert!(first.starts_with(r#"WITH "x_cte_1" AS (SELECT "o"."id" AS "x_id_1""#));
}

// ===================================================================
// Errors
// ===================================================================

#[test]
fn complex_delete_from_query_has_no_identity() {
    let inner = Query::raw("SELECT * FROM sales.orders");
    let delete = Delete::new(DataSource::new(RecordSet::query(inner, "q")).limit(Expr::int(1)));
    let err = compile_err(delete.clone());
    assert!(err.is_structural());
    assert_eq!(err.node(), Some(&Node::Statement(Statement::Delete(delete))));
}

#[test]
fn complex_delete_from_raw_target_fails() {
    let raw = RecordSet::raw("sales.orders");
    let err = compile_err(Delete::new(DataSource::new(raw).limit(Expr::int(1))));
    assert!(err.is_structural());
    assert_eq!(err.visitor(), Some("postgresql"));
}

#[test]
fn complex_delete_from_unaliased_table_fails() {
    let target = RecordSet::table(orders_table());
    let delete = Delete::new(
        DataSource::new(target.clone())
            .filter(target.field("status").eq(Expr::string("void")))
            .limit(Expr::int(1)),
    );
    let err = compile_err(delete.clone());
    assert!(err.is_structural());
    assert_eq!(err.node(), Some(&Node::Statement(Statement::Delete(delete))));
}

#[test]
fn complex_update_from_unaliased_table_fails() {
    let target = RecordSet::table(orders_table());
    let statement = update(
        DataSource::new(target.clone())
            .order_by(vec![OrderItem::asc(target.field("total"))])
            .limit(Expr::int(1)),
        vec![Assignment::new("status", Expr::string("first"))],
    );
    assert!(compile_err(statement).is_structural());
}

#[test]
fn complex_delete_from_columnless_table_fails() {
    let empty = RecordSet::table(Table::new("s", "empty")).alias("e");
    let delete = Delete::new(DataSource::new(empty).limit(Expr::int(1)));
    let err = compile_err(delete.clone());
    assert!(err.is_structural());
    assert_eq!(err.node(), Some(&Node::Statement(Statement::Delete(delete))));
}

#[test]
fn delete_from_view_fails() {
    let view = RecordSet::view(View::new("sales", "open_orders")).alias("v");
    let err = compile_err(Delete::new(DataSource::new(view)));
    assert!(err.is_structural());
}

#[test]
fn update_needs_assignments() {
    let err = compile_err(update(DataSource::new(orders()), Vec::new()));
    assert!(err.is_structural());
    assert!(err.to_string().contains("assignment"));
}
