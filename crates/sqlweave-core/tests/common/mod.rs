#![allow(dead_code)]

use std::sync::Arc;

use sqlweave_core::ast::{Expr, RecordSet};
use sqlweave_core::schema::memory::{MemoryDatabase, MemorySchema, MemoryTable};
use sqlweave_core::schema::{SchemaBuilderRef, Table, TableBuilder};

/// A database with a `public` schema holding `orders(id, total, status)`.
pub struct Fixture {
    pub db: Arc<MemoryDatabase>,
    pub public: Arc<MemorySchema>,
    pub orders: Arc<MemoryTable>,
}

impl Fixture {
    pub fn new() -> Self {
        let db = MemoryDatabase::new();
        let public = db.add_schema("public");
        let orders = public.add_table("orders");
        for name in ["id", "total", "status"] {
            let _ = orders.add_column(name);
        }
        orders.set_primary_key(&["id"]);
        Self { db, public, orders }
    }

    pub fn scope(&self) -> SchemaBuilderRef {
        SchemaBuilderRef::from(Arc::clone(&self.public))
    }

    pub fn orders_set(&self) -> RecordSet {
        RecordSet::table_builder(Arc::clone(&self.orders).into())
    }

    pub fn column(&self, name: &str) -> Expr {
        let column = self
            .orders
            .columns()
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("no column {name}"));
        Expr::column_builder(column)
    }
}

pub fn finalized_table(schema: &str, name: &str) -> RecordSet {
    RecordSet::table(Table::new(schema, name))
}
