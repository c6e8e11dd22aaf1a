//! Record sets, trait clauses and queries.

use std::sync::Arc;

use sqlweave_core::ast::{
    CommonTableExpression, CompoundQuery, CteMaterialization, DataSource, Expr, Join, JoinKind,
    Query, RecordSet, SelectItem, SelectQuery, TraitKind, TraitSlots, WindowDefinition,
};
use sqlweave_core::error::InterpretError;

use super::{structural, PostgresInterpreter};

/// Traits a compound query accepts.
const COMPOUND_TRAITS: [TraitKind; 4] = [
    TraitKind::With,
    TraitKind::OrderBy,
    TraitKind::Limit,
    TraitKind::Offset,
];

impl PostgresInterpreter {
    /// `"schema"."name"`, or just `"name"` for temporary objects and the
    /// default schema.
    pub(super) fn qualified_name(&self, schema: Option<&str>, name: &str, temporary: bool) -> String {
        let name = self.quote(name);
        match schema {
            Some(schema)
                if !temporary && self.options.default_schema.as_deref() != Some(schema) =>
            {
                format!("{}.{name}", self.quote(schema))
            }
            _ => name,
        }
    }

    /// The text a field uses to refer to its record set.
    pub(super) fn qualifier(&self, record_set: &RecordSet) -> String {
        match record_set {
            RecordSet::Raw(raw) => raw
                .alias
                .as_ref()
                .map_or_else(|| raw.sql.clone(), |alias| self.quote(alias)),
            RecordSet::Table(table) => {
                self.qualified_name(Some(&table.schema), &table.name, table.temporary)
            }
            RecordSet::View(view) => {
                self.qualified_name(Some(&view.schema), &view.name, view.temporary)
            }
            RecordSet::TableBuilder(table) => {
                self.qualified_name(Some(&table.schema().name()), &table.name(), table.is_temporary())
            }
            RecordSet::ViewBuilder(view) => {
                self.qualified_name(Some(&view.schema().name()), &view.name(), view.is_temporary())
            }
            RecordSet::NewTable(table) => {
                self.qualified_name(table.schema.as_deref(), &table.name, table.temporary)
            }
            RecordSet::Aliased(aliased) => self.quote(&aliased.alias),
            RecordSet::Query(query) => self.quote(&query.alias),
            RecordSet::Cte(cte) => self.quote(&cte.name),
        }
    }

    // ==================== FROM ====================

    pub(super) fn render_join(&mut self, join: &Join) -> Result<(), InterpretError> {
        self.push(join.kind.as_str());
        self.push(" ");
        join.record_set.accept(self)?;
        match (&join.on, join.kind) {
            (Some(_), JoinKind::Cross) => Err(structural(
                join.clone(),
                "CROSS JOIN does not take an ON condition",
            )),
            (Some(on), _) => {
                self.push(" ON ");
                on.accept(self)
            }
            (None, JoinKind::Cross) => Ok(()),
            (None, _) => {
                self.push(" ON TRUE");
                Ok(())
            }
        }
    }

    /// The record set followed by its joins.
    pub(super) fn from_clause(&mut self, source: &DataSource) -> Result<(), InterpretError> {
        source.record_set.accept(self)?;
        for join in &source.joins {
            self.push(" ");
            join.accept(self)?;
        }
        Ok(())
    }

    /// A data source on its own: FROM items, then its clauses.
    pub(super) fn render_data_source(&mut self, source: &DataSource) -> Result<(), InterpretError> {
        let slots = source.traits.slots();
        self.from_clause(source)?;
        self.trailing_clauses(&slots)
    }

    // ==================== Clauses ====================

    /// `WITH [RECURSIVE] ...` without a trailing space.
    pub(super) fn with_clause(
        &mut self,
        recursive: bool,
        ctes: &[&Arc<CommonTableExpression>],
    ) -> Result<(), InterpretError> {
        self.push(if recursive { "WITH RECURSIVE " } else { "WITH " });
        self.separated(ctes.iter().copied(), ", ", Self::cte_definition)
    }

    /// Renders the WITH prefix of a statement, if it has CTEs.
    pub(super) fn with_prefix(&mut self, slots: &TraitSlots<'_>) -> Result<(), InterpretError> {
        if !slots.ctes.is_empty() {
            self.with_clause(slots.recursive, &slots.ctes)?;
            self.push(" ");
        }
        Ok(())
    }

    fn cte_definition(&mut self, cte: &Arc<CommonTableExpression>) -> Result<(), InterpretError> {
        self.push_identifier(&cte.name);
        if !cte.columns.is_empty() {
            self.push(" (");
            self.identifiers(&cte.columns);
            self.push(")");
        }
        self.push(" AS ");
        match cte.materialization {
            Some(CteMaterialization::Materialized) => self.push("MATERIALIZED "),
            Some(CteMaterialization::NotMaterialized) => self.push("NOT MATERIALIZED "),
            None => {}
        }
        self.push("(");
        cte.query.accept(self)?;
        self.push(")");
        Ok(())
    }

    /// `DISTINCT [ON (...)]` without a trailing space.
    pub(super) fn distinct_clause(&mut self, on: &[Expr]) -> Result<(), InterpretError> {
        self.push("DISTINCT");
        if !on.is_empty() {
            self.push(" ON (");
            self.expr_list(on)?;
            self.push(")");
        }
        Ok(())
    }

    pub(super) fn window_definitions<'a>(
        &mut self,
        definitions: impl IntoIterator<Item = &'a WindowDefinition>,
    ) -> Result<(), InterpretError> {
        self.separated(definitions, ", ", |this, definition| {
            this.push_identifier(&definition.name);
            this.push(" AS (");
            let order_by: Vec<_> = definition.order_by.iter().collect();
            this.window_spec(
                None,
                &definition.partition_by,
                &order_by,
                definition.frame.as_ref(),
            )?;
            this.push(")");
            Ok(())
        })
    }

    /// WHERE through OFFSET, each preceded by a space.
    pub(super) fn trailing_clauses(&mut self, slots: &TraitSlots<'_>) -> Result<(), InterpretError> {
        self.where_clause(&slots.filter)?;
        if !slots.group_by.is_empty() {
            self.push(" GROUP BY ");
            self.expr_list(slots.group_by.iter().copied())?;
        }
        if !slots.having.is_empty() {
            self.push(" HAVING ");
            self.conjunction(&slots.having)?;
        }
        if !slots.windows.is_empty() {
            self.push(" WINDOW ");
            self.window_definitions(slots.windows.iter().copied())?;
        }
        self.paging_clauses(slots)
    }

    /// ORDER BY, LIMIT and OFFSET.
    fn paging_clauses(&mut self, slots: &TraitSlots<'_>) -> Result<(), InterpretError> {
        if !slots.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.order_items(slots.order_by.iter().copied())?;
        }
        if let Some(limit) = slots.limit {
            self.push(" LIMIT ");
            limit.accept(self)?;
        }
        if let Some(offset) = slots.offset {
            self.push(" OFFSET ");
            offset.accept(self)?;
        }
        Ok(())
    }

    pub(super) fn where_clause(&mut self, conditions: &[&Expr]) -> Result<(), InterpretError> {
        if !conditions.is_empty() {
            self.push(" WHERE ");
            self.conjunction(conditions)?;
        }
        Ok(())
    }

    pub(super) fn select_items(&mut self, items: &[SelectItem]) -> Result<(), InterpretError> {
        self.separated(items, ", ", |this, item| {
            item.expr.accept(this)?;
            if let Some(alias) = &item.alias {
                this.push(" AS ");
                this.push_identifier(alias);
            }
            Ok(())
        })
    }

    // ==================== Queries ====================

    pub(super) fn render_select(&mut self, query: &SelectQuery) -> Result<(), InterpretError> {
        let slots = query.source.traits.slots();
        self.with_prefix(&slots)?;
        self.push("SELECT ");
        if let Some(on) = slots.distinct {
            self.distinct_clause(on)?;
            self.push(" ");
        }
        if query.selection.is_empty() {
            self.push("*");
        } else {
            self.select_items(&query.selection)?;
        }
        self.push(" FROM ");
        self.from_clause(&query.source)?;
        self.trailing_clauses(&slots)
    }

    pub(super) fn render_compound(&mut self, query: &CompoundQuery) -> Result<(), InterpretError> {
        if query.traits.contains_other_than(&COMPOUND_TRAITS) {
            return Err(structural(
                Query::Compound(query.clone()),
                "compound queries accept only WITH, ORDER BY, LIMIT and OFFSET",
            ));
        }
        let slots = query.traits.slots();
        self.with_prefix(&slots)?;
        self.compound_operand(&query.first)?;
        for (op, operand) in &query.rest {
            self.push(" ");
            self.push(op.as_str());
            self.push(" ");
            self.compound_operand(operand)?;
        }
        self.paging_clauses(&slots)
    }

    fn compound_operand(&mut self, query: &Query) -> Result<(), InterpretError> {
        let parenthesize = match query {
            Query::Compound(_) => true,
            Query::Select(select) => select
                .source
                .traits
                .iter()
                .any(|t| COMPOUND_TRAITS.contains(&t.kind())),
            Query::Raw(_) => false,
        };
        if parenthesize {
            self.push("(");
            query.accept(self)?;
            self.push(")");
            Ok(())
        } else {
            query.accept(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::InterpreterOptions;
    use sqlweave_core::schema::Table;

    #[test]
    fn test_qualified_name_skips_default_schema() {
        let interpreter =
            PostgresInterpreter::with_options(InterpreterOptions::new().default_schema("public"));
        assert_eq!(interpreter.qualified_name(Some("public"), "t", false), "\"t\"");
        assert_eq!(
            interpreter.qualified_name(Some("sales"), "t", false),
            "\"sales\".\"t\""
        );
        assert_eq!(interpreter.qualified_name(Some("sales"), "t", true), "\"t\"");
        assert_eq!(interpreter.qualified_name(None, "t", false), "\"t\"");
    }

    #[test]
    fn test_qualifier_prefers_alias() {
        let interpreter = PostgresInterpreter::new();
        let table = RecordSet::table(Table::new("s", "t"));
        assert_eq!(interpreter.qualifier(&table), "\"s\".\"t\"");
        assert_eq!(interpreter.qualifier(&table.alias("x")), "\"x\"");
        assert_eq!(interpreter.qualifier(&RecordSet::raw("pg_class")), "pg_class");
    }
}
