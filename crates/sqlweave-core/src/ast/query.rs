//! Queries.

use super::expression::Expr;
use super::record_set::DataSource;
use super::traits::{Limit, Offset, OrderBy, OrderItem, QueryTrait, TraitChain};

/// A query given as SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    /// SQL text, inserted verbatim.
    pub sql: String,
}

/// One item of a selection list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    /// Selected value.
    pub expr: Expr,
    /// Output column name.
    pub alias: Option<String>,
}

impl SelectItem {
    /// Selects `expr` under its own name.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    /// Selects `expr` as `alias`.
    #[must_use]
    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

/// `SELECT selection FROM source ...`.
///
/// The clauses after FROM are the traits of `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Data source with its traits.
    pub source: DataSource,
    /// Selected items; empty renders `*`.
    pub selection: Vec<SelectItem>,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

impl SetOperator {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::IntersectAll => "INTERSECT ALL",
            Self::Except => "EXCEPT",
            Self::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// Queries combined with set operators.
///
/// Accepts the WITH, ORDER BY, LIMIT and OFFSET traits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundQuery {
    /// First operand.
    pub first: Box<Query>,
    /// Following operands with the operator joining each to its predecessor.
    pub rest: Vec<(SetOperator, Query)>,
    /// Clauses applied to the combined result.
    pub traits: TraitChain,
}

impl CompoundQuery {
    /// Adds an operand.
    #[must_use]
    pub fn then(mut self, op: SetOperator, query: Query) -> Self {
        self.rest.push((op, query));
        self
    }

    /// Attaches a trait.
    #[must_use]
    pub fn with_trait(mut self, query_trait: QueryTrait) -> Self {
        self.traits.push(query_trait);
        self
    }

    /// Adds `ORDER BY` items.
    #[must_use]
    pub fn order_by(self, items: Vec<OrderItem>) -> Self {
        self.with_trait(QueryTrait::OrderBy(OrderBy { items }))
    }

    /// Sets `LIMIT`.
    #[must_use]
    pub fn limit(self, count: Expr) -> Self {
        self.with_trait(QueryTrait::Limit(Limit { count }))
    }

    /// Sets `OFFSET`.
    #[must_use]
    pub fn offset(self, count: Expr) -> Self {
        self.with_trait(QueryTrait::Offset(Offset { count }))
    }
}

/// A query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Raw(RawQuery),
    Select(SelectQuery),
    Compound(CompoundQuery),
}

impl Query {
    /// A query given as SQL text.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(RawQuery { sql: sql.into() })
    }

    /// `SELECT selection FROM source`.
    #[must_use]
    pub fn select(source: impl Into<DataSource>, selection: Vec<SelectItem>) -> Self {
        Self::Select(SelectQuery {
            source: source.into(),
            selection,
        })
    }

    /// Starts a compound query with `self` as its first operand.
    #[must_use]
    pub fn compound(self, op: SetOperator, other: Self) -> CompoundQuery {
        CompoundQuery {
            first: Box::new(self),
            rest: vec![(op, other)],
            traits: TraitChain::new(),
        }
    }
}

impl From<CompoundQuery> for Query {
    fn from(query: CompoundQuery) -> Self {
        Self::Compound(query)
    }
}
