//! Schema-changing statements.

use std::sync::Arc;

use super::expression::{CastTarget, Expr};
use super::query::Query;
use super::record_set::RecordSet;
use super::traits::OrderItem;
use crate::schema::{ColumnDefinition, TableConstraint, TableDefinition};

/// `CREATE [TEMPORARY] TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Table definition.
    pub table: Arc<TableDefinition>,
    /// Whether to use IF NOT EXISTS.
    pub if_not_exists: bool,
}

impl CreateTable {
    /// Creates the table.
    #[must_use]
    pub fn new(table: impl Into<Arc<TableDefinition>>) -> Self {
        Self {
            table: table.into(),
            if_not_exists: false,
        }
    }
}

/// `DROP TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    /// Dropped table.
    pub table: RecordSet,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}

/// `ALTER TABLE ... RENAME TO`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameTable {
    /// Renamed table.
    pub table: RecordSet,
    /// New table name.
    pub new_name: String,
}

/// `ALTER TABLE ... ADD COLUMN`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumn {
    /// Altered table.
    pub table: RecordSet,
    /// Column definition.
    pub column: ColumnDefinition,
    /// Whether to use IF NOT EXISTS.
    pub if_not_exists: bool,
}

/// `ALTER TABLE ... DROP COLUMN`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropColumn {
    /// Altered table.
    pub table: RecordSet,
    /// Column name.
    pub column: String,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}

/// `ALTER TABLE ... RENAME COLUMN`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameColumn {
    /// Altered table.
    pub table: RecordSet,
    /// Current column name.
    pub old_name: String,
    /// New column name.
    pub new_name: String,
}

/// Column alteration type.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterColumnChange {
    /// Change the data type, converting existing values with `using`.
    SetDataType {
        /// New type.
        data_type: CastTarget,
        /// Conversion expression.
        using: Option<Expr>,
    },
    /// Set or remove NOT NULL constraint.
    SetNullable(bool),
    /// Set a new default value.
    SetDefault(Expr),
    /// Remove the default value.
    DropDefault,
}

/// `ALTER TABLE ... ALTER COLUMN`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterColumn {
    /// Altered table.
    pub table: RecordSet,
    /// Column name.
    pub column: String,
    /// The change to apply.
    pub change: AlterColumnChange,
}

/// `ALTER TABLE ... ADD CONSTRAINT`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddConstraint {
    /// Altered table.
    pub table: RecordSet,
    /// Constraint.
    pub constraint: TableConstraint,
}

/// `ALTER TABLE ... DROP CONSTRAINT`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropConstraint {
    /// Altered table.
    pub table: RecordSet,
    /// Constraint name.
    pub name: String,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}

/// `CREATE [OR REPLACE] [TEMPORARY] [MATERIALIZED] VIEW`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateView {
    /// The view (raw, finalized or builder).
    pub view: RecordSet,
    /// Column names; empty to derive them from the query.
    pub columns: Vec<String>,
    /// Body.
    pub query: Query,
    /// Whether to use OR REPLACE.
    pub or_replace: bool,
    /// Whether the view is materialized.
    pub materialized: bool,
}

/// `DROP [MATERIALIZED] VIEW`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropView {
    /// Dropped view.
    pub view: RecordSet,
    /// Whether the view is materialized.
    pub materialized: bool,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}

/// Index access method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMethod {
    /// B-tree index (default).
    #[default]
    BTree,
    Hash,
    Gist,
    SpGist,
    Gin,
    Brin,
}

impl IndexMethod {
    /// Returns the method name as accepted by `USING`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BTree => "btree",
            Self::Hash => "hash",
            Self::Gist => "gist",
            Self::SpGist => "spgist",
            Self::Gin => "gin",
            Self::Brin => "brin",
        }
    }
}

/// `CREATE [UNIQUE] INDEX`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: RecordSet,
    /// Indexed columns or expressions with their ordering.
    pub columns: Vec<OrderItem>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Whether to build without locking writes.
    pub concurrently: bool,
    /// Whether to use IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Access method; the dialect default when `None`.
    pub method: Option<IndexMethod>,
    /// Covered non-key columns.
    pub include: Vec<String>,
    /// Partial index condition.
    pub filter: Option<Expr>,
}

impl CreateIndex {
    /// Creates a plain index on `table`.
    #[must_use]
    pub fn new(name: impl Into<String>, table: RecordSet, columns: Vec<OrderItem>) -> Self {
        Self {
            name: name.into(),
            table,
            columns,
            unique: false,
            concurrently: false,
            if_not_exists: false,
            method: None,
            include: Vec::new(),
            filter: None,
        }
    }
}

/// `DROP INDEX`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropIndex {
    /// Schema of the index.
    pub schema: Option<String>,
    /// Index name.
    pub name: String,
    /// Whether to drop without locking.
    pub concurrently: bool,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}

/// `CREATE SCHEMA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchema {
    /// Schema name.
    pub name: String,
    /// Whether to use IF NOT EXISTS.
    pub if_not_exists: bool,
}

/// `DROP SCHEMA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropSchema {
    /// Schema name.
    pub name: String,
    /// Whether to use IF EXISTS.
    pub if_exists: bool,
    /// Whether to cascade.
    pub cascade: bool,
}
