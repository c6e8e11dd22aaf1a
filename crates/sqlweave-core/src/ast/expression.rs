//! Expression nodes.
//!
//! Expressions are immutable value trees. The builder methods on [`Expr`]
//! take `self` and return a new node:
//!
//! ```
//! use sqlweave_core::ast::{Expr, RecordSet};
//!
//! let users = RecordSet::raw("users").alias("u");
//! let cond = users.field("age").gt_eq(Expr::int(18)).and(users.field("active").eq(Expr::boolean(true)));
//! assert!(matches!(cond, Expr::Logical(_)));
//! ```

use std::sync::Arc;

use super::condition::{
    Between, Comparison, ComparisonOp, Exists, InList, InQuery, IsNull, Like, LogicalCondition,
    LogicalOp, NotCondition,
};
use super::custom::CustomNodeRef;
use super::function::{AggregateFunction, FunctionKind, ScalarFunction, WindowFunction};
use super::literal::Literal;
use super::query::Query;
use super::record_set::RecordSet;
use crate::schema::ColumnBuilderRef;
use crate::types::{LogicalType, SqlDataType};

/// A named parameter, rendered as a dialect placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Name without prefix.
    pub name: String,
    /// Declared type, if known.
    pub logical_type: Option<LogicalType>,
}

/// A column of a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Owning record set.
    pub record_set: Box<RecordSet>,
    /// Column name.
    pub name: String,
}

/// Column text inserted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// SQL text.
    pub sql: String,
}

/// A column of a table under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBuilderField {
    /// The column builder.
    pub column: ColumnBuilderRef,
}

/// A column of the row proposed for insertion in an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedField {
    /// Column name.
    pub name: String,
}

/// `*` or `set.*`.
#[derive(Debug, Clone, PartialEq)]
pub struct AllFields {
    /// Qualifying record set.
    pub record_set: Option<Box<RecordSet>>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Negate,
    /// `~`
    BitwiseNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::BitwiseNot => "~",
        }
    }
}

/// A prefix operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// Operator.
    pub op: UnaryOp,
    /// Operand.
    pub operand: Box<Expr>,
}

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// `left <op> right` for arithmetic operators.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticExpr {
    /// Operator.
    pub op: ArithmeticOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// Bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
}

/// `left <op> right` for bitwise operators.
#[derive(Debug, Clone, PartialEq)]
pub struct BitwiseExpr {
    /// Operator.
    pub op: BitwiseOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// One `WHEN ... THEN ...` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    /// Condition, or compared value in a simple CASE.
    pub when: Expr,
    /// Result.
    pub then: Expr,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    /// Compared value of a simple CASE; `None` for a searched CASE.
    pub operand: Option<Box<Expr>>,
    /// Branches in evaluation order.
    pub branches: Vec<CaseBranch>,
    /// `ELSE` result.
    pub otherwise: Option<Box<Expr>>,
}

/// Target of a cast.
#[derive(Debug, Clone, PartialEq)]
pub enum CastTarget {
    /// Resolved through the interpreter's type definitions.
    Logical(LogicalType),
    /// A concrete dialect type.
    Native(Arc<SqlDataType>),
}

/// `CAST(expr AS type)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    /// Converted value.
    pub expr: Box<Expr>,
    /// Target type.
    pub target: CastTarget,
}

/// A scalar subquery.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    /// The query; must yield one column and at most one row.
    pub query: Box<Query>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Boolean(bool),
    Literal(Literal),
    Parameter(Parameter),
    Field(Field),
    RawField(RawField),
    ColumnBuilder(ColumnBuilderField),
    Excluded(ExcludedField),
    All(AllFields),
    Unary(UnaryExpr),
    Arithmetic(ArithmeticExpr),
    Bitwise(BitwiseExpr),
    Comparison(Comparison),
    Logical(LogicalCondition),
    Not(NotCondition),
    IsNull(IsNull),
    Like(Like),
    InList(InList),
    InQuery(InQuery),
    Between(Between),
    Exists(Exists),
    Case(CaseExpr),
    Cast(CastExpr),
    Function(ScalarFunction),
    Aggregate(AggregateFunction),
    Window(WindowFunction),
    Subquery(Subquery),
    Custom(CustomNodeRef),
}

impl Expr {
    // ==================== Leaves ====================

    /// `NULL`.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null
    }

    /// `TRUE` or `FALSE`.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    /// A literal value.
    #[must_use]
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    /// An integer literal.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// An untyped named parameter.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Parameter(Parameter {
            name: name.into(),
            logical_type: None,
        })
    }

    /// A typed named parameter.
    #[must_use]
    pub fn typed_param(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self::Parameter(Parameter {
            name: name.into(),
            logical_type: Some(logical_type),
        })
    }

    /// Column text inserted verbatim.
    #[must_use]
    pub fn raw_field(sql: impl Into<String>) -> Self {
        Self::RawField(RawField { sql: sql.into() })
    }

    /// A column builder reference.
    #[must_use]
    pub const fn column_builder(column: ColumnBuilderRef) -> Self {
        Self::ColumnBuilder(ColumnBuilderField { column })
    }

    /// A column of the proposed row of an upsert.
    #[must_use]
    pub fn excluded(name: impl Into<String>) -> Self {
        Self::Excluded(ExcludedField { name: name.into() })
    }

    /// Unqualified `*`.
    #[must_use]
    pub const fn all() -> Self {
        Self::All(AllFields { record_set: None })
    }

    /// A scalar function call.
    #[must_use]
    pub const fn function(kind: FunctionKind, arguments: Vec<Self>) -> Self {
        Self::Function(ScalarFunction::new(kind, arguments))
    }

    /// A scalar subquery.
    #[must_use]
    pub fn subquery(query: Query) -> Self {
        Self::Subquery(Subquery {
            query: Box::new(query),
        })
    }

    /// `[NOT] EXISTS (query)`.
    #[must_use]
    pub fn exists(query: Query, negated: bool) -> Self {
        Self::Exists(Exists {
            query: Box::new(query),
            negated,
        })
    }

    /// A searched or simple CASE.
    #[must_use]
    pub fn case(operand: Option<Self>, branches: Vec<(Self, Self)>, otherwise: Option<Self>) -> Self {
        Self::Case(CaseExpr {
            operand: operand.map(Box::new),
            branches: branches
                .into_iter()
                .map(|(when, then)| CaseBranch { when, then })
                .collect(),
            otherwise: otherwise.map(Box::new),
        })
    }

    /// Conjoins every expression; `None` if there is none.
    pub fn and_all(exprs: impl IntoIterator<Item = Self>) -> Option<Self> {
        exprs.into_iter().reduce(Self::and)
    }

    // ==================== Comparison ====================

    fn compare(self, op: ComparisonOp, right: Self) -> Self {
        Self::Comparison(Comparison {
            op,
            left: Box::new(self),
            right: Box::new(right),
        })
    }

    /// `self = right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn eq(self, right: Self) -> Self {
        self.compare(ComparisonOp::Eq, right)
    }

    /// `self <> right`.
    #[must_use]
    pub fn not_eq(self, right: Self) -> Self {
        self.compare(ComparisonOp::NotEq, right)
    }

    /// `self < right`.
    #[must_use]
    pub fn lt(self, right: Self) -> Self {
        self.compare(ComparisonOp::Lt, right)
    }

    /// `self <= right`.
    #[must_use]
    pub fn lt_eq(self, right: Self) -> Self {
        self.compare(ComparisonOp::LtEq, right)
    }

    /// `self > right`.
    #[must_use]
    pub fn gt(self, right: Self) -> Self {
        self.compare(ComparisonOp::Gt, right)
    }

    /// `self >= right`.
    #[must_use]
    pub fn gt_eq(self, right: Self) -> Self {
        self.compare(ComparisonOp::GtEq, right)
    }

    // ==================== Logical ====================

    fn connect(self, op: LogicalOp, right: Self) -> Self {
        let mut operands = match self {
            Self::Logical(LogicalCondition { op: left_op, operands }) if left_op == op => operands,
            other => vec![other],
        };
        match right {
            Self::Logical(LogicalCondition {
                op: right_op,
                operands: more,
            }) if right_op == op => operands.extend(more),
            other => operands.push(other),
        }
        Self::Logical(LogicalCondition { op, operands })
    }

    /// `self AND right`, flattening nested conjunctions.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.connect(LogicalOp::And, right)
    }

    /// `self OR right`, flattening nested disjunctions.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.connect(LogicalOp::Or, right)
    }

    /// `NOT self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(NotCondition {
            operand: Box::new(self),
        })
    }

    // ==================== Arithmetic ====================

    fn arithmetic(self, op: ArithmeticOp, right: Self) -> Self {
        Self::Arithmetic(ArithmeticExpr {
            op,
            left: Box::new(self),
            right: Box::new(right),
        })
    }

    /// `self + right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, right: Self) -> Self {
        self.arithmetic(ArithmeticOp::Add, right)
    }

    /// `self - right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, right: Self) -> Self {
        self.arithmetic(ArithmeticOp::Subtract, right)
    }

    /// `self * right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, right: Self) -> Self {
        self.arithmetic(ArithmeticOp::Multiply, right)
    }

    /// `self / right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, right: Self) -> Self {
        self.arithmetic(ArithmeticOp::Divide, right)
    }

    /// `self % right`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn rem(self, right: Self) -> Self {
        self.arithmetic(ArithmeticOp::Modulo, right)
    }

    /// `-self`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        Self::Unary(UnaryExpr {
            op: UnaryOp::Negate,
            operand: Box::new(self),
        })
    }

    // ==================== Bitwise ====================

    /// `self <op> right` for a bitwise operator.
    #[must_use]
    pub fn bitwise(self, op: BitwiseOp, right: Self) -> Self {
        Self::Bitwise(BitwiseExpr {
            op,
            left: Box::new(self),
            right: Box::new(right),
        })
    }

    /// `~self`.
    #[must_use]
    pub fn bit_not(self) -> Self {
        Self::Unary(UnaryExpr {
            op: UnaryOp::BitwiseNot,
            operand: Box::new(self),
        })
    }

    // ==================== Predicates ====================

    /// `self IS NULL`.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull(IsNull {
            expr: Box::new(self),
            negated: false,
        })
    }

    /// `self IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::IsNull(IsNull {
            expr: Box::new(self),
            negated: true,
        })
    }

    /// `self LIKE pattern`.
    #[must_use]
    pub fn like(self, pattern: Self) -> Self {
        Self::Like(Like {
            expr: Box::new(self),
            pattern: Box::new(pattern),
            negated: false,
            case_insensitive: false,
        })
    }

    /// `self ILIKE pattern`.
    #[must_use]
    pub fn ilike(self, pattern: Self) -> Self {
        Self::Like(Like {
            expr: Box::new(self),
            pattern: Box::new(pattern),
            negated: false,
            case_insensitive: true,
        })
    }

    /// `self IN (list...)`.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::InList(InList {
            expr: Box::new(self),
            list,
            negated: false,
        })
    }

    /// `self NOT IN (list...)`.
    #[must_use]
    pub fn not_in_list(self, list: Vec<Self>) -> Self {
        Self::InList(InList {
            expr: Box::new(self),
            list,
            negated: true,
        })
    }

    /// `self IN (query)`.
    #[must_use]
    pub fn in_query(self, query: Query) -> Self {
        Self::InQuery(InQuery {
            expr: Box::new(self),
            query: Box::new(query),
            negated: false,
        })
    }

    /// `self BETWEEN low AND high`.
    #[must_use]
    pub fn between(self, low: Self, high: Self) -> Self {
        Self::Between(Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        })
    }

    /// `CAST(self AS logical)`.
    #[must_use]
    pub fn cast(self, logical: LogicalType) -> Self {
        Self::Cast(CastExpr {
            expr: Box::new(self),
            target: CastTarget::Logical(logical),
        })
    }

    /// `CAST(self AS data_type)`.
    #[must_use]
    pub fn cast_to(self, data_type: Arc<SqlDataType>) -> Self {
        Self::Cast(CastExpr {
            expr: Box::new(self),
            target: CastTarget::Native(data_type),
        })
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<ScalarFunction> for Expr {
    fn from(function: ScalarFunction) -> Self {
        Self::Function(function)
    }
}

impl From<AggregateFunction> for Expr {
    fn from(function: AggregateFunction) -> Self {
        Self::Aggregate(function)
    }
}

impl From<WindowFunction> for Expr {
    fn from(function: WindowFunction) -> Self {
        Self::Window(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_flattens() {
        let cond = Expr::int(1)
            .eq(Expr::int(1))
            .and(Expr::boolean(true))
            .and(Expr::boolean(false).and(Expr::null()));
        match cond {
            Expr::Logical(LogicalCondition { op, operands }) => {
                assert_eq!(op, LogicalOp::And);
                assert_eq!(operands.len(), 4);
            }
            other => panic!("expected AND, got {other:?}"),
        }
    }

    #[test]
    fn test_or_does_not_flatten_into_and() {
        let cond = Expr::boolean(true)
            .and(Expr::boolean(false))
            .or(Expr::null());
        let Expr::Logical(LogicalCondition { op, operands }) = cond else {
            panic!("expected OR");
        };
        assert_eq!(op, LogicalOp::Or);
        assert_eq!(operands.len(), 2);
        assert!(matches!(operands[0], Expr::Logical(_)));
    }

    #[test]
    fn test_and_all() {
        assert_eq!(Expr::and_all(Vec::new()), None);
        assert_eq!(
            Expr::and_all(vec![Expr::boolean(true)]),
            Some(Expr::boolean(true))
        );
    }
}
