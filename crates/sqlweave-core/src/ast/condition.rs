//! Boolean conditions.

use super::expression::Expr;
use super::query::Query;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl ComparisonOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// `left <op> right`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Operator.
    pub op: ComparisonOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// Logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl LogicalOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// An n-ary AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalCondition {
    /// Connective.
    pub op: LogicalOp,
    /// Operands in rendering order.
    pub operands: Vec<Expr>,
}

/// `NOT operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotCondition {
    /// Negated condition.
    pub operand: Box<Expr>,
}

/// `expr IS [NOT] NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct IsNull {
    /// Tested expression.
    pub expr: Box<Expr>,
    /// Whether this is `IS NOT NULL`.
    pub negated: bool,
}

/// `expr [NOT] LIKE pattern`, or `ILIKE` when case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    /// Tested expression.
    pub expr: Box<Expr>,
    /// Pattern.
    pub pattern: Box<Expr>,
    /// Whether this is `NOT LIKE`.
    pub negated: bool,
    /// Whether matching ignores case.
    pub case_insensitive: bool,
}

/// `expr [NOT] IN (list...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InList {
    /// Tested expression.
    pub expr: Box<Expr>,
    /// Candidate values; may be empty.
    pub list: Vec<Expr>,
    /// Whether this is `NOT IN`.
    pub negated: bool,
}

/// `expr [NOT] IN (query)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InQuery {
    /// Tested expression.
    pub expr: Box<Expr>,
    /// Subquery producing the candidates.
    pub query: Box<Query>,
    /// Whether this is `NOT IN`.
    pub negated: bool,
}

/// `expr [NOT] BETWEEN low AND high`.
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    /// Tested expression.
    pub expr: Box<Expr>,
    /// Lower bound.
    pub low: Box<Expr>,
    /// Upper bound.
    pub high: Box<Expr>,
    /// Whether this is `NOT BETWEEN`.
    pub negated: bool,
}

/// `[NOT] EXISTS (query)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Exists {
    /// Subquery.
    pub query: Box<Query>,
    /// Whether this is `NOT EXISTS`.
    pub negated: bool,
}
