//! Finalized schema objects.

use std::sync::Arc;

use crate::ast::Expr;
use crate::types::SqlDataType;

/// One part of a key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPart {
    /// A plain column.
    Column(String),
    /// An expression over the row.
    Expression(Expr),
}

/// A primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    /// Constraint name.
    pub name: Option<String>,
    /// Key parts in order.
    pub parts: Vec<KeyPart>,
}

impl PrimaryKey {
    /// A key over plain columns.
    #[must_use]
    pub fn columns(columns: &[&str]) -> Self {
        Self {
            name: None,
            parts: columns
                .iter()
                .map(|c| KeyPart::Column((*c).to_string()))
                .collect(),
        }
    }

    /// Returns the key columns if every part is a plain column.
    ///
    /// An empty key yields `None`.
    #[must_use]
    pub fn plain_columns(&self) -> Option<Vec<&str>> {
        if self.parts.is_empty() {
            return None;
        }
        self.parts
            .iter()
            .map(|part| match part {
                KeyPart::Column(name) => Some(name.as_str()),
                KeyPart::Expression(_) => None,
            })
            .collect()
    }
}

/// A column of a finalized table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: Arc<SqlDataType>,
    /// Whether the column is nullable.
    pub nullable: bool,
}

impl Column {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: Arc<SqlDataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A finalized table.
///
/// The schema takes part in equality even for temporary tables, whose
/// rendered names omit it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Owning schema.
    pub schema: String,
    /// Table name.
    pub name: String,
    /// Whether the table is temporary.
    pub temporary: bool,
    /// Columns in order.
    pub columns: Vec<Column>,
    /// Primary key.
    pub primary_key: Option<PrimaryKey>,
}

impl Table {
    /// Creates a table without columns.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            temporary: false,
            columns: Vec::new(),
            primary_key: None,
        }
    }

    /// Marks the table as temporary.
    #[must_use]
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the primary key.
    #[must_use]
    pub fn primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A finalized view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Owning schema.
    pub schema: String,
    /// View name.
    pub name: String,
    /// Whether the view is temporary.
    pub temporary: bool,
    /// Column names.
    pub columns: Vec<String>,
}

impl View {
    /// Creates a view.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            temporary: false,
            columns: Vec::new(),
        }
    }
}
