//! Query traits.
//!
//! A trait is an optional clause attached to a traits-bearing node (data
//! sources, compound queries, aggregate and window functions). Traits are
//! kept in insertion order; interpreters render them in a fixed clause
//! order no matter how they were added:
//!
//! ```text
//! WITH → DISTINCT → selection → FROM/JOIN → WHERE → GROUP BY → HAVING
//!      → WINDOW → ORDER BY → LIMIT → OFFSET
//! ```

use std::sync::Arc;

use super::expression::Expr;
use super::function::WindowFrame;
use super::query::Query;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// Nulls first.
    First,
    /// Nulls last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// Sort key.
    pub expr: Expr,
    /// Direction.
    pub direction: OrderDirection,
    /// Null placement, dialect default when `None`.
    pub nulls: Option<NullOrdering>,
}

impl OrderItem {
    /// Sorts ascending by `expr`.
    #[must_use]
    pub const fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: OrderDirection::Asc,
            nulls: None,
        }
    }

    /// Sorts descending by `expr`.
    #[must_use]
    pub const fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: OrderDirection::Desc,
            nulls: None,
        }
    }

    /// Sets the null placement.
    #[must_use]
    pub fn nulls(mut self, nulls: NullOrdering) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// Materialization hint of a CTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CteMaterialization {
    Materialized,
    NotMaterialized,
}

/// A named subquery declared by a WITH clause.
///
/// Shared behind an [`Arc`] so that record sets referring to the CTE and
/// the WITH clause declaring it point at the same definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    /// Name.
    pub name: String,
    /// Optional column list.
    pub columns: Vec<String>,
    /// Body.
    pub query: Query,
    /// Materialization hint.
    pub materialization: Option<CteMaterialization>,
}

impl CommonTableExpression {
    /// Creates a CTE.
    #[must_use]
    pub fn new(name: impl Into<String>, query: Query) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            columns: Vec::new(),
            query,
            materialization: None,
        })
    }
}

/// `WITH [RECURSIVE] cte, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    /// Whether `RECURSIVE` is rendered.
    pub recursive: bool,
    /// Declared CTEs in order.
    pub ctes: Vec<Arc<CommonTableExpression>>,
}

/// `DISTINCT` or `DISTINCT ON (...)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distinct {
    /// `DISTINCT ON` expressions; empty for plain `DISTINCT`.
    pub on: Vec<Expr>,
}

/// `WHERE` condition (or `FILTER (WHERE ...)` on an aggregate).
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Condition.
    pub condition: Expr,
}

/// `GROUP BY`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    /// Grouping keys.
    pub exprs: Vec<Expr>,
}

/// `HAVING`.
#[derive(Debug, Clone, PartialEq)]
pub struct Having {
    /// Condition.
    pub condition: Expr,
}

/// A named window declared by a WINDOW clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDefinition {
    /// Name.
    pub name: String,
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderItem>,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
}

/// `WINDOW name AS (...), ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowClause {
    /// Declared windows.
    pub definitions: Vec<WindowDefinition>,
}

/// `ORDER BY`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Sort items.
    pub items: Vec<OrderItem>,
}

/// `LIMIT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    /// Row count.
    pub count: Expr,
}

/// `OFFSET`.
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    /// Rows to skip.
    pub count: Expr,
}

/// Slot of a trait in the canonical clause order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraitKind {
    With,
    Distinct,
    Filter,
    GroupBy,
    Having,
    Window,
    OrderBy,
    Limit,
    Offset,
}

impl TraitKind {
    /// Returns the SQL clause keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::With => "WITH",
            Self::Distinct => "DISTINCT",
            Self::Filter => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::Having => "HAVING",
            Self::Window => "WINDOW",
            Self::OrderBy => "ORDER BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
        }
    }
}

/// A query trait.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTrait {
    With(WithClause),
    Distinct(Distinct),
    Filter(Filter),
    GroupBy(GroupBy),
    Having(Having),
    Window(WindowClause),
    OrderBy(OrderBy),
    Limit(Limit),
    Offset(Offset),
}

impl QueryTrait {
    /// Returns the clause slot of the trait.
    #[must_use]
    pub const fn kind(&self) -> TraitKind {
        match self {
            Self::With(_) => TraitKind::With,
            Self::Distinct(_) => TraitKind::Distinct,
            Self::Filter(_) => TraitKind::Filter,
            Self::GroupBy(_) => TraitKind::GroupBy,
            Self::Having(_) => TraitKind::Having,
            Self::Window(_) => TraitKind::Window,
            Self::OrderBy(_) => TraitKind::OrderBy,
            Self::Limit(_) => TraitKind::Limit,
            Self::Offset(_) => TraitKind::Offset,
        }
    }
}

/// Insertion-ordered list of traits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraitChain(Vec<QueryTrait>);

impl TraitChain {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a trait.
    pub fn push(&mut self, query_trait: QueryTrait) {
        self.0.push(query_trait);
    }

    /// Returns true if no trait is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of attached traits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates the traits in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryTrait> {
        self.0.iter()
    }

    /// Returns true if a trait of `kind` is attached.
    #[must_use]
    pub fn contains(&self, kind: TraitKind) -> bool {
        self.0.iter().any(|t| t.kind() == kind)
    }

    /// Returns true if any trait other than `allowed` is attached.
    #[must_use]
    pub fn contains_other_than(&self, allowed: &[TraitKind]) -> bool {
        self.0.iter().any(|t| !allowed.contains(&t.kind()))
    }

    /// Merges the chain into clause slots.
    #[must_use]
    pub fn slots(&self) -> TraitSlots<'_> {
        let mut slots = TraitSlots::default();
        for query_trait in &self.0 {
            match query_trait {
                QueryTrait::With(with) => {
                    slots.recursive |= with.recursive;
                    slots.ctes.extend(with.ctes.iter());
                }
                QueryTrait::Distinct(distinct) => slots.distinct = Some(&distinct.on),
                QueryTrait::Filter(filter) => slots.filter.push(&filter.condition),
                QueryTrait::GroupBy(group_by) => slots.group_by.extend(group_by.exprs.iter()),
                QueryTrait::Having(having) => slots.having.push(&having.condition),
                QueryTrait::Window(window) => slots.windows.extend(window.definitions.iter()),
                QueryTrait::OrderBy(order_by) => slots.order_by.extend(order_by.items.iter()),
                QueryTrait::Limit(limit) => slots.limit = Some(&limit.count),
                QueryTrait::Offset(offset) => slots.offset = Some(&offset.count),
            }
        }
        slots
    }
}

impl<'a> IntoIterator for &'a TraitChain {
    type Item = &'a QueryTrait;
    type IntoIter = std::slice::Iter<'a, QueryTrait>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<QueryTrait> for TraitChain {
    fn from_iter<I: IntoIterator<Item = QueryTrait>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A trait chain merged into its clause slots.
///
/// FILTER and HAVING conditions are conjoined, list-valued slots are
/// concatenated, DISTINCT, LIMIT and OFFSET keep the last one added.
#[derive(Debug, Default)]
pub struct TraitSlots<'a> {
    /// Whether any WITH clause is recursive.
    pub recursive: bool,
    /// Declared CTEs.
    pub ctes: Vec<&'a Arc<CommonTableExpression>>,
    /// `DISTINCT ON` expressions, or empty for plain DISTINCT.
    pub distinct: Option<&'a [Expr]>,
    /// Conditions to conjoin into WHERE.
    pub filter: Vec<&'a Expr>,
    /// Grouping keys.
    pub group_by: Vec<&'a Expr>,
    /// Conditions to conjoin into HAVING.
    pub having: Vec<&'a Expr>,
    /// Named windows.
    pub windows: Vec<&'a WindowDefinition>,
    /// Sort items.
    pub order_by: Vec<&'a OrderItem>,
    /// Row limit.
    pub limit: Option<&'a Expr>,
    /// Row offset.
    pub offset: Option<&'a Expr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_kind_canonical_order() {
        assert!(TraitKind::With < TraitKind::Distinct);
        assert!(TraitKind::Having < TraitKind::Window);
        assert!(TraitKind::Limit < TraitKind::Offset);
    }

    #[test]
    fn test_slots_merge() {
        let chain: TraitChain = vec![
            QueryTrait::Limit(Limit {
                count: Expr::int(5),
            }),
            QueryTrait::Filter(Filter {
                condition: Expr::boolean(true),
            }),
            QueryTrait::GroupBy(GroupBy {
                exprs: vec![Expr::int(1)],
            }),
            QueryTrait::Filter(Filter {
                condition: Expr::boolean(false),
            }),
            QueryTrait::Limit(Limit {
                count: Expr::int(10),
            }),
            QueryTrait::GroupBy(GroupBy {
                exprs: vec![Expr::int(2)],
            }),
        ]
        .into_iter()
        .collect();

        let slots = chain.slots();
        assert_eq!(slots.filter.len(), 2);
        assert_eq!(slots.group_by, vec![&Expr::int(1), &Expr::int(2)]);
        assert_eq!(slots.limit, Some(&Expr::int(10)));
        assert!(slots.distinct.is_none());
        assert!(chain.contains(TraitKind::GroupBy));
        assert!(!chain.contains(TraitKind::Having));
        assert!(chain.contains_other_than(&[TraitKind::Filter]));
    }
}
