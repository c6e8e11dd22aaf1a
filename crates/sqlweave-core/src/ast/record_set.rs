//! Record sets, joins and data sources.

use std::sync::Arc;

use super::expression::{AllFields, Expr, Field};
use super::query::Query;
use super::traits::{
    CommonTableExpression, Distinct, Filter, GroupBy, Having, Limit, Offset, OrderBy, OrderItem,
    QueryTrait, TraitChain, WindowClause, WindowDefinition, WithClause,
};
use crate::schema::{Table, TableBuilderRef, TableDefinition, View, ViewBuilderRef};

/// A record set given as SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecordSet {
    /// SQL text, inserted verbatim.
    pub sql: String,
    /// Alias.
    pub alias: Option<String>,
}

/// A record set renamed with `AS`.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasedRecordSet {
    /// Underlying record set.
    pub inner: Box<RecordSet>,
    /// Alias.
    pub alias: String,
}

/// A subquery used as a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecordSet {
    /// Subquery.
    pub query: Box<Query>,
    /// Alias; required by PostgreSQL.
    pub alias: String,
}

/// Anything rows can be selected from.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    Raw(RawRecordSet),
    /// A finalized table.
    Table(Arc<Table>),
    /// A finalized view.
    View(Arc<View>),
    TableBuilder(TableBuilderRef),
    ViewBuilder(ViewBuilderRef),
    /// A table defined in the same batch of statements.
    NewTable(Arc<TableDefinition>),
    Aliased(AliasedRecordSet),
    Query(QueryRecordSet),
    /// A reference to a CTE declared by a WITH trait.
    Cte(Arc<CommonTableExpression>),
}

impl RecordSet {
    /// A record set given as SQL text.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(RawRecordSet {
            sql: sql.into(),
            alias: None,
        })
    }

    /// A finalized table.
    #[must_use]
    pub fn table(table: impl Into<Arc<Table>>) -> Self {
        Self::Table(table.into())
    }

    /// A finalized view.
    #[must_use]
    pub fn view(view: impl Into<Arc<View>>) -> Self {
        Self::View(view.into())
    }

    /// A table under construction.
    #[must_use]
    pub const fn table_builder(table: TableBuilderRef) -> Self {
        Self::TableBuilder(table)
    }

    /// A view under construction.
    #[must_use]
    pub const fn view_builder(view: ViewBuilderRef) -> Self {
        Self::ViewBuilder(view)
    }

    /// A table defined in the same batch.
    #[must_use]
    pub fn new_table(definition: impl Into<Arc<TableDefinition>>) -> Self {
        Self::NewTable(definition.into())
    }

    /// A subquery record set.
    #[must_use]
    pub fn query(query: Query, alias: impl Into<String>) -> Self {
        Self::Query(QueryRecordSet {
            query: Box::new(query),
            alias: alias.into(),
        })
    }

    /// A CTE reference.
    #[must_use]
    pub const fn cte(cte: Arc<CommonTableExpression>) -> Self {
        Self::Cte(cte)
    }

    /// Renames the record set.
    ///
    /// Re-aliasing replaces the previous alias instead of nesting.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        match self {
            Self::Raw(raw) => Self::Raw(RawRecordSet {
                sql: raw.sql,
                alias: Some(alias),
            }),
            Self::Aliased(aliased) => Self::Aliased(AliasedRecordSet {
                inner: aliased.inner,
                alias,
            }),
            Self::Query(query) => Self::Query(QueryRecordSet {
                query: query.query,
                alias,
            }),
            other => Self::Aliased(AliasedRecordSet {
                inner: Box::new(other),
                alias,
            }),
        }
    }

    /// Returns the alias, if the record set has one.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => raw.alias.as_deref(),
            Self::Aliased(aliased) => Some(&aliased.alias),
            Self::Query(query) => Some(&query.alias),
            _ => None,
        }
    }

    /// Returns the record set without its alias wrapper.
    #[must_use]
    pub fn unaliased(&self) -> &Self {
        match self {
            Self::Aliased(aliased) => aliased.inner.unaliased(),
            other => other,
        }
    }

    /// A column of this record set.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Expr {
        Expr::Field(Field {
            record_set: Box::new(self.clone()),
            name: name.into(),
        })
    }

    /// `set.*`.
    #[must_use]
    pub fn all_fields(&self) -> Expr {
        Expr::All(AllFields {
            record_set: Some(Box::new(self.clone())),
        })
    }
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join onto the preceding record sets of a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Join type.
    pub kind: JoinKind,
    /// Joined record set.
    pub record_set: RecordSet,
    /// Join condition; `None` for cross joins.
    pub on: Option<Expr>,
}

/// A FROM clause with its joins and traits.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    /// First record set.
    pub record_set: RecordSet,
    /// Joins in order.
    pub joins: Vec<Join>,
    /// Clauses applied to the joined rows.
    pub traits: TraitChain,
}

impl DataSource {
    /// Creates a data source over one record set.
    #[must_use]
    pub const fn new(record_set: RecordSet) -> Self {
        Self {
            record_set,
            joins: Vec::new(),
            traits: TraitChain::new(),
        }
    }

    /// Returns the number of record sets, counting joins.
    #[must_use]
    pub fn record_set_count(&self) -> usize {
        self.joins.len() + 1
    }

    /// Adds a join.
    #[must_use]
    pub fn join(mut self, kind: JoinKind, record_set: RecordSet, on: Option<Expr>) -> Self {
        self.joins.push(Join {
            kind,
            record_set,
            on,
        });
        self
    }

    /// Adds an inner join.
    #[must_use]
    pub fn inner_join(self, record_set: RecordSet, on: Expr) -> Self {
        self.join(JoinKind::Inner, record_set, Some(on))
    }

    /// Adds a left join.
    #[must_use]
    pub fn left_join(self, record_set: RecordSet, on: Expr) -> Self {
        self.join(JoinKind::Left, record_set, Some(on))
    }

    /// Adds a cross join.
    #[must_use]
    pub fn cross_join(self, record_set: RecordSet) -> Self {
        self.join(JoinKind::Cross, record_set, None)
    }

    /// Attaches a trait.
    #[must_use]
    pub fn with_trait(mut self, query_trait: QueryTrait) -> Self {
        self.traits.push(query_trait);
        self
    }

    /// Adds a WITH clause.
    #[must_use]
    pub fn with(self, ctes: Vec<Arc<CommonTableExpression>>, recursive: bool) -> Self {
        self.with_trait(QueryTrait::With(WithClause { recursive, ctes }))
    }

    /// Adds `DISTINCT`.
    #[must_use]
    pub fn distinct(self) -> Self {
        self.with_trait(QueryTrait::Distinct(Distinct::default()))
    }

    /// Adds `DISTINCT ON (...)`.
    #[must_use]
    pub fn distinct_on(self, on: Vec<Expr>) -> Self {
        self.with_trait(QueryTrait::Distinct(Distinct { on }))
    }

    /// Adds a WHERE condition, conjoined with any existing one.
    #[must_use]
    pub fn filter(self, condition: Expr) -> Self {
        self.with_trait(QueryTrait::Filter(Filter { condition }))
    }

    /// Adds `GROUP BY` keys.
    #[must_use]
    pub fn group_by(self, exprs: Vec<Expr>) -> Self {
        self.with_trait(QueryTrait::GroupBy(GroupBy { exprs }))
    }

    /// Adds a HAVING condition.
    #[must_use]
    pub fn having(self, condition: Expr) -> Self {
        self.with_trait(QueryTrait::Having(Having { condition }))
    }

    /// Adds named windows.
    #[must_use]
    pub fn window(self, definitions: Vec<WindowDefinition>) -> Self {
        self.with_trait(QueryTrait::Window(WindowClause { definitions }))
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

impl From<RecordSet> for DataSource {
    fn from(record_set: RecordSet) -> Self {
        Self::new(record_set)
    }
}
