//! Row identity and the shape of DELETE/UPDATE sources.
//!
//! PostgreSQL's DELETE and UPDATE accept one target, at most one extra
//! record set (USING / FROM) and a WHERE clause. Anything richer is
//! rewritten around a CTE that selects the identity of the affected rows.

use sqlweave_core::ast::{DataSource, Join, JoinKind, RecordSet, TraitKind};
use sqlweave_core::schema::PrimaryKey;

/// Traits that a plain DELETE or UPDATE cannot express.
const COMPLEX_TRAITS: [TraitKind; 7] = [
    TraitKind::Distinct,
    TraitKind::GroupBy,
    TraitKind::Having,
    TraitKind::Window,
    TraitKind::OrderBy,
    TraitKind::Limit,
    TraitKind::Offset,
];

/// How a DELETE or UPDATE source renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Shape<'a> {
    /// One record set and a WHERE clause.
    Simple,
    /// The target plus one inner or cross joined record set.
    TwoSet(&'a Join),
    /// Everything else; goes through an identity CTE.
    Complex,
}

impl Shape<'_> {
    pub(super) const fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::TwoSet(_) => "two-set",
            Self::Complex => "complex",
        }
    }
}

/// Whether the record set can appear directly after DELETE FROM / UPDATE.
fn is_direct_target(record_set: &RecordSet) -> bool {
    matches!(
        record_set.unaliased(),
        RecordSet::Raw(_) | RecordSet::Table(_) | RecordSet::TableBuilder(_) | RecordSet::NewTable(_)
    )
}

pub(super) fn classify(source: &DataSource) -> Shape<'_> {
    if COMPLEX_TRAITS.iter().any(|kind| source.traits.contains(*kind))
        || !is_direct_target(&source.record_set)
    {
        return Shape::Complex;
    }
    match source.joins.as_slice() {
        [] => Shape::Simple,
        [join] if matches!(join.kind, JoinKind::Inner | JoinKind::Cross) => Shape::TwoSet(join),
        _ => Shape::Complex,
    }
}

fn plain_key(primary_key: Option<&PrimaryKey>) -> Option<Vec<String>> {
    primary_key
        .and_then(PrimaryKey::plain_columns)
        .map(|columns| columns.into_iter().map(str::to_string).collect())
}

/// Primary key columns of a table target, when the key is made of plain
/// columns only.
pub(super) fn key_columns(record_set: &RecordSet) -> Option<Vec<String>> {
    match record_set.unaliased() {
        RecordSet::Table(table) => plain_key(table.primary_key.as_ref()),
        RecordSet::TableBuilder(table) => plain_key(table.primary_key().as_ref()),
        RecordSet::NewTable(table) => plain_key(table.primary_key.as_ref()),
        _ => None,
    }
}

/// Columns that identify a row: the plain primary key, else every column.
///
/// Only an aliased table can be correlated with the identity CTE; an
/// unaliased target has no identity.
pub(super) fn identity_columns(record_set: &RecordSet) -> Option<Vec<String>> {
    let RecordSet::Aliased(aliased) = record_set else {
        return None;
    };
    if let Some(key) = key_columns(&aliased.inner) {
        return Some(key);
    }
    let columns: Vec<String> = match aliased.inner.unaliased() {
        RecordSet::Table(table) => table.columns.iter().map(|c| c.name.clone()).collect(),
        RecordSet::TableBuilder(table) => table.columns().iter().map(|c| c.name()).collect(),
        RecordSet::NewTable(table) => table.columns.iter().map(|c| c.name.clone()).collect(),
        _ => return None,
    };
    (!columns.is_empty()).then_some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlweave_core::ast::Expr;
    use sqlweave_core::schema::{Column, KeyPart, Table};

    use crate::types;

    fn orders() -> Table {
        Table::new("sales", "orders")
            .column(Column::new("id", types::int8()))
            .column(Column::new("total", types::decimal(10, 2).unwrap()))
    }

    #[test]
    fn test_classify() {
        let target = RecordSet::table(orders());
        assert_eq!(classify(&DataSource::new(target.clone())), Shape::Simple);

        let joined = DataSource::new(target.clone())
            .inner_join(RecordSet::raw("other"), Expr::boolean(true));
        assert!(matches!(classify(&joined), Shape::TwoSet(_)));

        let limited = DataSource::new(target.clone()).limit(Expr::int(5));
        assert_eq!(classify(&limited), Shape::Complex);

        let left = DataSource::new(target.clone())
            .left_join(RecordSet::raw("other"), Expr::boolean(true));
        assert_eq!(classify(&left), Shape::Complex);

        let three = DataSource::new(target)
            .cross_join(RecordSet::raw("a"))
            .cross_join(RecordSet::raw("b"));
        assert_eq!(classify(&three), Shape::Complex);
    }

    #[test]
    fn test_identity_prefers_plain_key() {
        let keyed = orders().primary_key(PrimaryKey::columns(&["id"]));
        assert_eq!(
            identity_columns(&RecordSet::table(keyed).alias("o")),
            Some(vec!["id".to_string()])
        );
        assert_eq!(
            identity_columns(&RecordSet::table(orders()).alias("o")),
            Some(vec!["id".to_string(), "total".to_string()])
        );
    }

    #[test]
    fn test_expression_key_falls_back_to_columns() {
        let keyed = orders().primary_key(PrimaryKey {
            name: None,
            parts: vec![KeyPart::Expression(Expr::raw_field("lower(id)"))],
        });
        let record_set = RecordSet::table(keyed).alias("o");
        assert_eq!(key_columns(&record_set), None);
        assert_eq!(identity_columns(&record_set).map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_no_identity_for_raw_or_columnless() {
        assert_eq!(identity_columns(&RecordSet::raw("t").alias("x")), None);
        assert_eq!(
            identity_columns(&RecordSet::table(Table::new("s", "t")).alias("x")),
            None
        );
    }

    #[test]
    fn test_unaliased_table_has_no_identity() {
        let keyed = orders().primary_key(PrimaryKey::columns(&["id"]));
        assert_eq!(identity_columns(&RecordSet::table(keyed.clone())), None);
        assert_eq!(key_columns(&RecordSet::table(keyed)), Some(vec!["id".to_string()]));
    }

    #[test]
    fn test_view_is_not_a_direct_target() {
        let view = sqlweave_core::schema::View::new("sales", "open_orders");
        assert_eq!(classify(&DataSource::new(RecordSet::view(view))), Shape::Complex);
    }
}
