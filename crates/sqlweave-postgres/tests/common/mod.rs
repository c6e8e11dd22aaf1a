#![allow(dead_code)]

use sqlweave_core::ast::{Expr, Query, RecordSet, Statement};
use sqlweave_core::error::InterpretError;
use sqlweave_core::schema::{Column, PrimaryKey, Table};
use sqlweave_postgres::{types, PostgresInterpreter};

/// `sales.orders(id, customer_id, total, status)` keyed on `id`.
pub fn orders_table() -> Table {
    Table::new("sales", "orders")
        .column(Column::new("id", types::int8()).not_null())
        .column(Column::new("customer_id", types::int8()))
        .column(Column::new("total", types::decimal(10, 2).unwrap()))
        .column(Column::new("status", types::text()))
        .primary_key(PrimaryKey::columns(&["id"]))
}

/// `sales.customers(id, name, region)` keyed on `id`.
pub fn customers_table() -> Table {
    Table::new("sales", "customers")
        .column(Column::new("id", types::int8()).not_null())
        .column(Column::new("name", types::text()))
        .column(Column::new("region", types::text()))
        .primary_key(PrimaryKey::columns(&["id"]))
}

/// `sales.audit(at, message)` without a primary key.
pub fn audit_table() -> Table {
    Table::new("sales", "audit")
        .column(Column::new("at", types::timestamp(None).unwrap()))
        .column(Column::new("message", types::text()))
}

/// `s.t(a, b, c)` keyed on `(a, c)`.
pub fn composite_table() -> Table {
    Table::new("s", "t")
        .column(Column::new("a", types::int8()).not_null())
        .column(Column::new("b", types::int8()))
        .column(Column::new("c", types::int8()).not_null())
        .primary_key(PrimaryKey::columns(&["a", "c"]))
}

pub fn orders() -> RecordSet {
    RecordSet::table(orders_table()).alias("o")
}

pub fn customers() -> RecordSet {
    RecordSet::table(customers_table()).alias("c")
}

pub fn compile(statement: impl Into<Statement>) -> String {
    PostgresInterpreter::new()
        .compile(&statement.into())
        .unwrap()
        .sql
}

pub fn compile_query(query: &Query) -> String {
    PostgresInterpreter::new().compile_query(query).unwrap().sql
}

pub fn compile_expr(expr: &Expr) -> String {
    PostgresInterpreter::new().compile_expr(expr).unwrap().sql
}

pub fn compile_err(statement: impl Into<Statement>) -> InterpretError {
    PostgresInterpreter::new()
        .compile(&statement.into())
        .unwrap_err()
}

pub fn compile_expr_err(expr: &Expr) -> InterpretError {
    PostgresInterpreter::new().compile_expr(expr).unwrap_err()
}
