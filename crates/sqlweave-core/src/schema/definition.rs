//! Definitions of tables being created.
//!
//! A [`TableDefinition`] describes a table that does not exist yet. It is
//! rendered by CREATE TABLE and may be used as a record set by statements
//! issued in the same batch.
//!
//! ```
//! use sqlweave_core::ast::Expr;
//! use sqlweave_core::schema::{ColumnDefinition, TableDefinition};
//!
//! let invoices = TableDefinition::new("invoices")
//!     .in_schema("billing")
//!     .column(ColumnDefinition::of::<i64>("id").not_null())
//!     .column(ColumnDefinition::of::<String>("number").not_null())
//!     .column(ColumnDefinition::of::<i32>("status").default_value(Expr::int(0)))
//!     .primary_key(&["id"]);
//!
//! assert_eq!(invoices.columns.len(), 3);
//! ```

use std::sync::Arc;

use crate::ast::{Expr, RecordSet};
use crate::types::{LogicalType, SqlDataType, SqlTyped};

use super::table::PrimaryKey;

/// Storage of a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStorage {
    /// Computed on write.
    Stored,
    /// Computed on read.
    Virtual,
}

/// `GENERATED ALWAYS AS (expr)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedColumn {
    /// Generation expression.
    pub expr: Expr,
    /// Storage mode.
    pub storage: ColumnStorage,
}

/// Identity column generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityGeneration {
    /// `GENERATED ALWAYS AS IDENTITY`.
    Always,
    /// `GENERATED BY DEFAULT AS IDENTITY`.
    ByDefault,
}

/// A column of a table being created or altered.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Logical type.
    pub logical_type: LogicalType,
    /// Explicit data type overriding the dialect default for
    /// `logical_type`.
    pub data_type: Option<Arc<SqlDataType>>,
    /// Whether the column is nullable.
    pub nullable: bool,
    /// Default value.
    pub default: Option<Expr>,
    /// Generation expression.
    pub computed: Option<ComputedColumn>,
    /// Identity generation.
    pub identity: Option<IdentityGeneration>,
    /// Collation for string columns.
    pub collation: Option<String>,
}

impl ColumnDefinition {
    /// Creates a nullable column of a logical type.
    #[must_use]
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            data_type: None,
            nullable: true,
            default: None,
            computed: None,
            identity: None,
            collation: None,
        }
    }

    /// Creates a nullable column whose logical type is that of `T`.
    #[must_use]
    pub fn of<T: SqlTyped>(name: impl Into<String>) -> Self {
        Self::new(name, T::LOGICAL_TYPE)
    }

    /// Creates a column with an explicit data type.
    #[must_use]
    pub fn with_type(name: impl Into<String>, data_type: Arc<SqlDataType>) -> Self {
        let mut column = Self::new(name, data_type.logical_type());
        column.data_type = Some(data_type);
        column
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as nullable (default).
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: Expr) -> Self {
        self.default = Some(value);
        self
    }

    /// Makes the column a generated column.
    #[must_use]
    pub fn computed(mut self, expr: Expr, storage: ColumnStorage) -> Self {
        self.computed = Some(ComputedColumn { expr, storage });
        self
    }

    /// Makes the column an identity column.
    ///
    /// Identity columns are implicitly NOT NULL.
    #[must_use]
    pub fn identity(mut self, generation: IdentityGeneration) -> Self {
        self.identity = Some(generation);
        self.nullable = false;
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A FOREIGN KEY constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: Option<String>,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub references: RecordSet,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: Option<ForeignKeyAction>,
    /// ON UPDATE action.
    pub on_update: Option<ForeignKeyAction>,
}

/// Table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    /// Primary key constraint.
    PrimaryKey(PrimaryKey),
    /// Unique constraint on multiple columns.
    Unique {
        /// Optional constraint name.
        name: Option<String>,
        /// Column names.
        columns: Vec<String>,
    },
    /// Foreign key constraint.
    ForeignKey(ForeignKey),
    /// Check constraint.
    Check {
        /// Optional constraint name.
        name: Option<String>,
        /// Check condition.
        condition: Expr,
    },
}

/// A table to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    /// Owning schema; the search path decides when `None`.
    pub schema: Option<String>,
    /// Table name.
    pub name: String,
    /// Whether the table is temporary.
    pub temporary: bool,
    /// Columns in order.
    pub columns: Vec<ColumnDefinition>,
    /// Primary key.
    pub primary_key: Option<PrimaryKey>,
    /// Other constraints.
    pub constraints: Vec<TableConstraint>,
}

impl TableDefinition {
    /// Creates a table definition without columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            temporary: false,
            columns: Vec::new(),
            primary_key: None,
            constraints: Vec::new(),
        }
    }

    /// Sets the owning schema.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Marks the table as temporary.
    #[must_use]
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets a primary key over plain columns.
    #[must_use]
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = Some(PrimaryKey::columns(columns));
        self
    }

    /// Sets an arbitrary primary key.
    #[must_use]
    pub fn primary_key_parts(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    /// Adds a unique constraint.
    #[must_use]
    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.constraints.push(TableConstraint::Unique {
            name: None,
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        });
        self
    }

    /// Adds a check constraint.
    #[must_use]
    pub fn check(mut self, condition: Expr) -> Self {
        self.constraints.push(TableConstraint::Check {
            name: None,
            condition,
        });
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.constraints.push(TableConstraint::ForeignKey(foreign_key));
        self
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
