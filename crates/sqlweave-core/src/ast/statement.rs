//! DML statements and the statement sum type.

use super::custom::CustomNodeRef;
use super::ddl::{
    AddColumn, AddConstraint, AlterColumn, CreateIndex, CreateSchema, CreateTable, CreateView,
    DropColumn, DropConstraint, DropIndex, DropSchema, DropTable, DropView, RenameColumn,
    RenameTable,
};
use super::expression::Expr;
use super::query::{Query, SelectItem};
use super::record_set::{DataSource, RecordSet};
use super::transaction::{Begin, ReleaseSavepoint, RollbackToSavepoint, Savepoint};

/// Rows supplied to an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// `VALUES (...), (...)`.
    Values(Vec<Vec<Expr>>),
    /// `INSERT ... SELECT`.
    Query(Box<Query>),
    /// `DEFAULT VALUES`.
    DefaultValues,
}

/// `INSERT INTO target (columns) source [RETURNING ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target record set, optionally aliased.
    pub target: RecordSet,
    /// Target columns; empty to omit the column list.
    pub columns: Vec<String>,
    /// Inserted rows.
    pub source: InsertSource,
    /// `RETURNING` items.
    pub returning: Vec<SelectItem>,
}

impl Insert {
    /// Inserts literal rows.
    #[must_use]
    pub fn values(target: RecordSet, columns: Vec<String>, rows: Vec<Vec<Expr>>) -> Self {
        Self {
            target,
            columns,
            source: InsertSource::Values(rows),
            returning: Vec::new(),
        }
    }

    /// Inserts the rows of a query.
    #[must_use]
    pub fn from_query(target: RecordSet, columns: Vec<String>, query: Query) -> Self {
        Self {
            target,
            columns,
            source: InsertSource::Query(Box::new(query)),
            returning: Vec::new(),
        }
    }

    /// Sets the `RETURNING` items.
    #[must_use]
    pub fn returning(mut self, items: Vec<SelectItem>) -> Self {
        self.returning = items;
        self
    }
}

/// `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Assigned column, unqualified.
    pub column: String,
    /// New value.
    pub value: Expr,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// What an upsert does with a conflicting row.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    /// `DO NOTHING`.
    DoNothing,
    /// `DO UPDATE SET ... [WHERE ...]`.
    DoUpdate {
        /// Assignments; the proposed row is reachable through
        /// [`Expr::excluded`].
        assignments: Vec<Assignment>,
        /// Condition restricting the update.
        filter: Option<Expr>,
    },
}

/// `INSERT ... ON CONFLICT ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    /// The insert.
    pub insert: Insert,
    /// Conflict columns; inferred from the target's primary key when `None`.
    pub conflict_target: Option<Vec<String>>,
    /// Conflict action.
    pub action: ConflictAction,
}

/// `UPDATE ... SET ... [FROM ...] [WHERE ...]`.
///
/// The first record set of `source` is the updated table.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Target, joined sets and traits.
    pub source: DataSource,
    /// Assignments.
    pub assignments: Vec<Assignment>,
    /// `RETURNING` items.
    pub returning: Vec<SelectItem>,
}

/// `DELETE FROM ... [USING ...] [WHERE ...]`.
///
/// The first record set of `source` is the table rows are deleted from.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Target, joined sets and traits.
    pub source: DataSource,
    /// `RETURNING` items.
    pub returning: Vec<SelectItem>,
}

impl Delete {
    /// Deletes from `source`.
    #[must_use]
    pub const fn new(source: DataSource) -> Self {
        Self {
            source,
            returning: Vec::new(),
        }
    }
}

/// `TRUNCATE ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Truncate {
    /// Truncated tables.
    pub record_sets: Vec<RecordSet>,
    /// `RESTART IDENTITY`.
    pub restart_identity: bool,
    /// `CASCADE`.
    pub cascade: bool,
}

/// A statement given as SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    /// SQL text, inserted verbatim.
    pub sql: String,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(Insert),
    Upsert(Upsert),
    Update(Update),
    Delete(Delete),
    Truncate(Truncate),
    Raw(RawStatement),
    CreateTable(CreateTable),
    DropTable(DropTable),
    RenameTable(RenameTable),
    AddColumn(AddColumn),
    DropColumn(DropColumn),
    RenameColumn(RenameColumn),
    AlterColumn(AlterColumn),
    AddConstraint(AddConstraint),
    DropConstraint(DropConstraint),
    CreateView(CreateView),
    DropView(DropView),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    CreateSchema(CreateSchema),
    DropSchema(DropSchema),
    Begin(Begin),
    Commit,
    Rollback,
    Savepoint(Savepoint),
    ReleaseSavepoint(ReleaseSavepoint),
    RollbackToSavepoint(RollbackToSavepoint),
    Custom(CustomNodeRef),
}

impl Statement {
    /// A statement given as SQL text.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(RawStatement { sql: sql.into() })
    }
}

macro_rules! statement_from {
    ($($ty:ident),* $(,)?) => {
        $(impl From<$ty> for Statement {
            fn from(statement: $ty) -> Self {
                Self::$ty(statement)
            }
        })*
    };
}

statement_from!(
    Insert,
    Upsert,
    Update,
    Delete,
    Truncate,
    CreateTable,
    DropTable,
    RenameTable,
    AddColumn,
    DropColumn,
    RenameColumn,
    AlterColumn,
    AddConstraint,
    DropConstraint,
    CreateView,
    DropView,
    CreateIndex,
    DropIndex,
    CreateSchema,
    DropSchema,
    Begin,
    Savepoint,
    ReleaseSavepoint,
    RollbackToSavepoint,
);
