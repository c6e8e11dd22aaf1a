//! Abstract Syntax Tree (AST) types.
//!
//! The node model is closed: every construct is a variant of one of the
//! sum types below, and [`NodeVisitor`](crate::visit::NodeVisitor) has one
//! method per variant. The single open variant is the custom node, which
//! dialects and applications implement through [`CustomNode`].
//!
//! Nodes are immutable values. Children are owned; schema objects and CTEs
//! are shared through [`Arc`](std::sync::Arc) so a tree can refer to them
//! from several places.

mod condition;
mod custom;
mod ddl;
mod expression;
mod function;
mod literal;
mod query;
mod record_set;
mod statement;
mod traits;
mod transaction;

pub use condition::{
    Between, Comparison, ComparisonOp, Exists, InList, InQuery, IsNull, Like, LogicalCondition,
    LogicalOp, NotCondition,
};
pub use custom::{
    CustomAggregate, CustomAggregateRef, CustomFunction, CustomFunctionRef, CustomNode,
    CustomNodeRef,
};
pub use ddl::{
    AddColumn, AddConstraint, AlterColumn, AlterColumnChange, CreateIndex, CreateSchema,
    CreateTable, CreateView, DropColumn, DropConstraint, DropIndex, DropSchema, DropTable,
    DropView, IndexMethod, RenameColumn, RenameTable,
};
pub use expression::{
    AllFields, ArithmeticExpr, ArithmeticOp, BitwiseExpr, BitwiseOp, CaseBranch, CaseExpr,
    CastExpr, CastTarget, ColumnBuilderField, ExcludedField, Expr, Field, Parameter, RawField,
    Subquery, UnaryExpr, UnaryOp,
};
pub use function::{
    AggregateFunction, AggregateKind, Arity, DatePart, DateUnit, FrameBound, FrameMode,
    FunctionKind, ScalarFunction, WindowFrame, WindowFunction, WindowKind,
};
pub use literal::Literal;
pub use query::{CompoundQuery, Query, RawQuery, SelectItem, SelectQuery, SetOperator};
pub use record_set::{
    AliasedRecordSet, DataSource, Join, JoinKind, QueryRecordSet, RawRecordSet, RecordSet,
};
pub use statement::{
    Assignment, ConflictAction, Delete, Insert, InsertSource, RawStatement, Statement, Truncate,
    Update, Upsert,
};
pub use traits::{
    CommonTableExpression, CteMaterialization, Distinct, Filter, GroupBy, Having, Limit,
    NullOrdering, Offset, OrderBy, OrderDirection, OrderItem, QueryTrait, TraitChain, TraitKind,
    TraitSlots, WindowClause, WindowDefinition, WithClause,
};
pub use transaction::{
    AccessMode, Begin, IsolationLevel, ReleaseSavepoint, RollbackToSavepoint, Savepoint,
};

use crate::schema::ColumnDefinition;

/// Any node of the tree.
///
/// Used wherever a node of unknown category is reported, e.g. in
/// [`ValidationError`](crate::validate::ValidationError).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expr(Expr),
    RecordSet(RecordSet),
    Join(Join),
    DataSource(DataSource),
    Trait(QueryTrait),
    Query(Query),
    Statement(Statement),
    ColumnDefinition(ColumnDefinition),
    Custom(CustomNodeRef),
}

macro_rules! node_from {
    ($($ty:ident),* $(,)?) => {
        $(impl From<$ty> for Node {
            fn from(node: $ty) -> Self {
                Self::$ty(node)
            }
        })*
    };
}

node_from!(Expr, RecordSet, Join, DataSource, Query, Statement, ColumnDefinition);

impl From<QueryTrait> for Node {
    fn from(node: QueryTrait) -> Self {
        Self::Trait(node)
    }
}

impl From<CustomNodeRef> for Node {
    fn from(node: CustomNodeRef) -> Self {
        Self::Custom(node)
    }
}
