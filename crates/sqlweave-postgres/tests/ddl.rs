//! Schema-changing statements.

mod common;
use common::*;

use std::sync::Arc;

use sqlweave_core::ast::{
    AddColumn, AddConstraint, AlterColumn, AlterColumnChange, CastTarget, CreateIndex,
    CreateSchema, CreateTable, CreateView, DataSource, DropColumn, DropConstraint, DropIndex,
    DropSchema, DropTable, DropView, Expr, IndexMethod, Node, OrderItem, Query, RecordSet,
    RenameColumn, RenameTable, SelectItem, Statement,
};
use sqlweave_core::schema::memory::MemoryDatabase;
use sqlweave_core::schema::{
    ColumnDefinition, ColumnStorage, ForeignKey, ForeignKeyAction, IdentityGeneration, KeyPart,
    PrimaryKey, TableConstraint, TableDefinition, View,
};
use sqlweave_core::types::LogicalType;
use sqlweave_postgres::{types, InterpreterOptions, PostgresInterpreter};

fn invoices() -> TableDefinition {
    TableDefinition::new("invoices")
        .in_schema("billing")
        .column(
            ColumnDefinition::of::<i64>("id")
                .not_null()
                .identity(IdentityGeneration::Always),
        )
        .column(ColumnDefinition::of::<String>("number").not_null().collation("C"))
        .column(ColumnDefinition::with_type("amount", types::decimal(12, 2).unwrap()).not_null())
        .column(ColumnDefinition::of::<i32>("status").not_null().default_value(Expr::int(0)))
        .primary_key(&["id"])
        .unique(&["number"])
        .check(RecordSet::raw("invoices").field("amount").gt_eq(Expr::int(0)))
}

// ===================================================================
// Tables
// ===================================================================

#[test]
fn create_table_with_constraints() {
    assert_eq!(
        compile(CreateTable::new(invoices())),
        concat!(
            "CREATE TABLE \"billing\".\"invoices\" (\n",
            "    \"id\" INT8 GENERATED ALWAYS AS IDENTITY NOT NULL,\n",
            "    \"number\" VARCHAR COLLATE \"C\" NOT NULL,\n",
            "    \"amount\" DECIMAL(12, 2) NOT NULL,\n",
            "    \"status\" INT4 NOT NULL DEFAULT (0),\n",
            "    PRIMARY KEY (\"id\"),\n",
            "    UNIQUE (\"number\"),\n",
            "    CHECK (\"amount\" >= 0)\n",
            ")"
        )
    );
}

#[test]
fn create_temporary_table_if_not_exists() {
    let mut statement = CreateTable::new(
        TableDefinition::new("scratch")
            .in_schema("billing")
            .temporary()
            .column(ColumnDefinition::new("payload", LogicalType::Json)),
    );
    statement.if_not_exists = true;
    assert_eq!(
        compile(statement),
        "CREATE TEMPORARY TABLE IF NOT EXISTS \"scratch\" (\n    \"payload\" JSONB\n)"
    );
}

#[test]
fn create_empty_table() {
    assert_eq!(
        compile(CreateTable::new(TableDefinition::new("empty"))),
        r#"CREATE TABLE "empty" ()"#
    );
}

#[test]
fn generated_columns() {
    let total = RecordSet::raw("lines");
    let table = TableDefinition::new("lines")
        .column(ColumnDefinition::of::<i32>("qty"))
        .column(ColumnDefinition::of::<i32>("price"))
        .column(ColumnDefinition::of::<i32>("total").computed(
            total.field("qty").mul(total.field("price")),
            ColumnStorage::Stored,
        ))
        .column(ColumnDefinition::of::<i32>("double_qty").computed(
            total.field("qty").mul(Expr::int(2)),
            ColumnStorage::Virtual,
        ));
    let statement = Statement::from(CreateTable::new(table));

    let implicit = PostgresInterpreter::new().compile(&statement).unwrap().sql;
    assert!(implicit.contains(r#""total" INT4 GENERATED ALWAYS AS ("qty" * "price") STORED"#));
    assert!(implicit.ends_with("\"double_qty\" INT4 GENERATED ALWAYS AS (\"qty\" * 2)\n)"));

    let explicit =
        PostgresInterpreter::with_options(InterpreterOptions::new().explicit_virtual_storage(true))
            .compile(&statement)
            .unwrap()
            .sql;
    assert!(explicit.ends_with("\"double_qty\" INT4 GENERATED ALWAYS AS (\"qty\" * 2) VIRTUAL\n)"));
}

#[test]
fn generated_column_with_default_fails() {
    let column = ColumnDefinition::of::<i32>("x")
        .computed(Expr::int(1), ColumnStorage::Stored)
        .default_value(Expr::int(2));
    let err = compile_err(CreateTable::new(TableDefinition::new("t").column(column.clone())));
    assert!(err.is_structural());
    assert_eq!(err.node(), Some(&Node::ColumnDefinition(column)));
}

#[test]
fn expression_primary_key_fails() {
    let key_expr = Expr::function(
        sqlweave_core::ast::FunctionKind::Lower,
        vec![Expr::raw_field("email")],
    );
    let table = TableDefinition::new("users")
        .column(ColumnDefinition::of::<String>("email"))
        .primary_key_parts(PrimaryKey {
            name: Some("users_pk".into()),
            parts: vec![KeyPart::Expression(key_expr.clone())],
        });
    let err = compile_err(CreateTable::new(table));
    assert!(err.is_structural());
    assert_eq!(err.node(), Some(&Node::Expr(key_expr)));
}

#[test]
fn drop_and_rename_table() {
    assert_eq!(
        compile(DropTable {
            table: orders(),
            if_exists: true,
            cascade: true,
        }),
        r#"DROP TABLE IF EXISTS "sales"."orders" CASCADE"#
    );
    assert_eq!(
        compile(RenameTable {
            table: RecordSet::table(orders_table()),
            new_name: "purchases".into(),
        }),
        r#"ALTER TABLE "sales"."orders" RENAME TO "purchases""#
    );
}

#[test]
fn ddl_on_subquery_fails() {
    let err = compile_err(DropTable {
        table: RecordSet::query(Query::raw("SELECT 1"), "q"),
        if_exists: false,
        cascade: false,
    });
    assert!(err.is_structural());
}

#[test]
fn new_table_in_same_batch() {
    let definition = Arc::new(invoices());
    let statement = RenameColumn {
        table: RecordSet::new_table(Arc::clone(&definition)),
        old_name: "number".into(),
        new_name: "code".into(),
    };
    assert_eq!(
        compile(statement),
        r#"ALTER TABLE "billing"."invoices" RENAME COLUMN "number" TO "code""#
    );
}

// ===================================================================
// Columns and constraints
// ===================================================================

#[test]
fn add_and_drop_column() {
    assert_eq!(
        compile(AddColumn {
            table: RecordSet::table(orders_table()),
            column: ColumnDefinition::of::<bool>("paid").not_null().default_value(Expr::boolean(false)),
            if_not_exists: true,
        }),
        r#"ALTER TABLE "sales"."orders" ADD COLUMN IF NOT EXISTS "paid" BOOL NOT NULL DEFAULT (FALSE)"#
    );
    assert_eq!(
        compile(DropColumn {
            table: RecordSet::table(orders_table()),
            column: "paid".into(),
            if_exists: true,
            cascade: false,
        }),
        r#"ALTER TABLE "sales"."orders" DROP COLUMN IF EXISTS "paid""#
    );
}

#[test]
fn alter_column_changes() {
    let alter = |change| {
        compile(AlterColumn {
            table: RecordSet::table(orders_table()),
            column: "status".into(),
            change,
        })
    };
    assert_eq!(
        alter(AlterColumnChange::SetDataType {
            data_type: CastTarget::Logical(LogicalType::Int32),
            using: Some(Expr::raw_field("status").cast(LogicalType::Int32)),
        }),
        r#"ALTER TABLE "sales"."orders" ALTER COLUMN "status" TYPE INT4 USING CAST(status AS INT4)"#
    );
    assert_eq!(
        alter(AlterColumnChange::SetNullable(false)),
        r#"ALTER TABLE "sales"."orders" ALTER COLUMN "status" SET NOT NULL"#
    );
    assert_eq!(
        alter(AlterColumnChange::SetNullable(true)),
        r#"ALTER TABLE "sales"."orders" ALTER COLUMN "status" DROP NOT NULL"#
    );
    assert_eq!(
        alter(AlterColumnChange::SetDefault(Expr::string("open"))),
        r#"ALTER TABLE "sales"."orders" ALTER COLUMN "status" SET DEFAULT 'open'"#
    );
    assert_eq!(
        alter(AlterColumnChange::DropDefault),
        r#"ALTER TABLE "sales"."orders" ALTER COLUMN "status" DROP DEFAULT"#
    );
}

#[test]
fn add_foreign_key() {
    let statement = AddConstraint {
        table: orders(),
        constraint: TableConstraint::ForeignKey(ForeignKey {
            name: Some("orders_customer_fk".into()),
            columns: vec!["customer_id".into()],
            references: customers(),
            referenced_columns: vec!["id".into()],
            on_delete: Some(ForeignKeyAction::Cascade),
            on_update: Some(ForeignKeyAction::NoAction),
        }),
    };
    assert_eq!(
        compile(statement),
        concat!(
            r#"ALTER TABLE "sales"."orders" ADD CONSTRAINT "orders_customer_fk" FOREIGN KEY ("customer_id") "#,
            r#"REFERENCES "sales"."customers" ("id") ON DELETE CASCADE ON UPDATE NO ACTION"#
        )
    );
}

#[test]
fn add_check_and_drop_constraint() {
    let o = orders();
    assert_eq!(
        compile(AddConstraint {
            table: o.clone(),
            constraint: TableConstraint::Check {
                name: Some("positive_total".into()),
                condition: o.field("total").gt(Expr::int(0)),
            },
        }),
        r#"ALTER TABLE "sales"."orders" ADD CONSTRAINT "positive_total" CHECK ("total" > 0)"#
    );
    assert_eq!(
        compile(DropConstraint {
            table: o,
            name: "positive_total".into(),
            if_exists: false,
            cascade: true,
        }),
        r#"ALTER TABLE "sales"."orders" DROP CONSTRAINT "positive_total" CASCADE"#
    );
}

// ===================================================================
// Views
// ===================================================================

fn open_orders() -> Query {
    let o = orders();
    Query::select(
        DataSource::new(o.clone()).filter(o.field("status").eq(Expr::string("open"))),
        vec![SelectItem::new(o.field("id"))],
    )
}

#[test]
fn create_views() {
    let view = RecordSet::view(View::new("sales", "open_orders"));
    assert_eq!(
        compile(CreateView {
            view: view.clone(),
            columns: vec!["order_id".into()],
            query: open_orders(),
            or_replace: true,
            materialized: false,
        }),
        concat!(
            r#"CREATE OR REPLACE VIEW "sales"."open_orders" ("order_id") AS "#,
            r#"SELECT "o"."id" FROM "sales"."orders" AS "o" WHERE "o"."status" = 'open'"#
        )
    );
    assert_eq!(
        compile(CreateView {
            view,
            columns: Vec::new(),
            query: open_orders(),
            or_replace: false,
            materialized: true,
        }),
        concat!(
            r#"CREATE MATERIALIZED VIEW "sales"."open_orders" AS "#,
            r#"SELECT "o"."id" FROM "sales"."orders" AS "o" WHERE "o"."status" = 'open'"#
        )
    );
}

#[test]
fn materialized_or_replace_fails() {
    let err = compile_err(CreateView {
        view: RecordSet::raw("open_orders"),
        columns: Vec::new(),
        query: open_orders(),
        or_replace: true,
        materialized: true,
    });
    assert!(err.is_structural());
}

#[test]
fn view_builder_target() {
    let db = MemoryDatabase::new();
    let reporting = db.add_schema("reporting");
    let view = reporting.add_view("daily");
    assert_eq!(
        compile(DropView {
            view: RecordSet::view_builder(view.into()),
            materialized: true,
            if_exists: true,
            cascade: false,
        }),
        r#"DROP MATERIALIZED VIEW IF EXISTS "reporting"."daily""#
    );
}

#[test]
fn view_statement_on_table_fails() {
    let err = compile_err(DropView {
        view: orders(),
        materialized: false,
        if_exists: false,
        cascade: false,
    });
    assert!(err.is_structural());
}

// ===================================================================
// Indexes and schemas
// ===================================================================

#[test]
fn create_index_variants() {
    let o = orders();
    let mut index = CreateIndex::new(
        "orders_status_idx",
        o.clone(),
        vec![
            OrderItem::asc(o.field("status")),
            OrderItem::desc(Expr::function(
                sqlweave_core::ast::FunctionKind::Lower,
                vec![o.field("status")],
            )),
        ],
    );
    index.unique = true;
    index.concurrently = true;
    index.if_not_exists = true;
    index.method = Some(IndexMethod::BTree);
    index.include = vec!["total".into()];
    index.filter = Some(o.field("status").not_eq(Expr::string("void")));
    assert_eq!(
        compile(index),
        concat!(
            r#"CREATE UNIQUE INDEX CONCURRENTLY IF NOT EXISTS "orders_status_idx" ON "sales"."orders" "#,
            r#"("status", (LOWER("status")) DESC) INCLUDE ("total") WHERE "status" <> 'void'"#
        )
    );

    let mut gin = CreateIndex::new(
        "customers_name_idx",
        RecordSet::table(customers_table()),
        vec![OrderItem::asc(Expr::raw_field("name"))],
    );
    gin.method = Some(IndexMethod::Gin);
    assert_eq!(
        compile(gin),
        r#"CREATE INDEX "customers_name_idx" ON "sales"."customers" USING gin (name)"#
    );
}

#[test]
fn index_without_keys_fails() {
    let index = CreateIndex::new("empty_idx", orders(), Vec::new());
    assert!(compile_err(index).is_structural());
}

#[test]
fn drop_index_and_schemas() {
    assert_eq!(
        compile(DropIndex {
            schema: Some("sales".into()),
            name: "orders_status_idx".into(),
            concurrently: true,
            if_exists: true,
            cascade: false,
        }),
        r#"DROP INDEX CONCURRENTLY IF EXISTS "sales"."orders_status_idx""#
    );
    assert_eq!(
        compile(CreateSchema {
            name: "billing".into(),
            if_not_exists: true,
        }),
        r#"CREATE SCHEMA IF NOT EXISTS "billing""#
    );
    assert_eq!(
        compile(DropSchema {
            name: "billing".into(),
            if_exists: false,
            cascade: true,
        }),
        r#"DROP SCHEMA "billing" CASCADE"#
    );
}
