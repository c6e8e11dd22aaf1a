//! INSERT, UPSERT, UPDATE, DELETE and TRUNCATE.

use sqlweave_core::ast::{
    Assignment, ConflictAction, DataSource, Delete, Expr, Insert, InsertSource, SelectItem,
    Statement, Truncate, Update, Upsert,
};
use sqlweave_core::error::InterpretError;
use tracing::trace;

use super::identity::{self, Shape};
use super::{structural, PostgresInterpreter};

/// The synthesized CTE of a complex DELETE or UPDATE.
struct IdentityCte {
    name: String,
    /// Target qualifier, e.g. `"o"`.
    target: String,
    /// `(column, alias)` pairs.
    columns: Vec<(String, String)>,
}

impl PostgresInterpreter {
    pub(super) fn render_insert(&mut self, insert: &Insert) -> Result<(), InterpretError> {
        self.insert_body(insert)?;
        self.returning(&insert.returning)
    }

    fn insert_body(&mut self, insert: &Insert) -> Result<(), InterpretError> {
        self.push("INSERT INTO ");
        insert.target.accept(self)?;
        if !insert.columns.is_empty() {
            self.push(" (");
            self.identifiers(&insert.columns);
            self.push(")");
        }
        match &insert.source {
            InsertSource::Values(rows) => {
                if rows.is_empty() {
                    return Err(structural(
                        Statement::Insert(insert.clone()),
                        "INSERT ... VALUES needs at least one row",
                    ));
                }
                self.push(" VALUES ");
                self.separated(rows, ", ", |this, row| {
                    this.push("(");
                    this.expr_list(row)?;
                    this.push(")");
                    Ok(())
                })
            }
            InsertSource::Query(query) => {
                self.push(" ");
                query.accept(self)
            }
            InsertSource::DefaultValues => {
                self.push(" DEFAULT VALUES");
                Ok(())
            }
        }
    }

    pub(super) fn render_upsert(&mut self, upsert: &Upsert) -> Result<(), InterpretError> {
        let target = match &upsert.conflict_target {
            Some(columns) if !columns.is_empty() => Some(columns.clone()),
            _ => identity::key_columns(&upsert.insert.target),
        };
        self.insert_body(&upsert.insert)?;
        self.push(" ON CONFLICT");
        match &upsert.action {
            ConflictAction::DoNothing => {
                if let Some(columns) = &target {
                    self.push(" (");
                    self.identifiers(columns);
                    self.push(")");
                }
                self.push(" DO NOTHING");
            }
            ConflictAction::DoUpdate {
                assignments,
                filter,
            } => {
                let node = || Statement::Upsert(upsert.clone());
                let columns = target.ok_or_else(|| {
                    structural(
                        node(),
                        "ON CONFLICT DO UPDATE needs a conflict target or a primary key of plain columns",
                    )
                })?;
                if assignments.is_empty() {
                    return Err(structural(node(), "ON CONFLICT DO UPDATE needs assignments"));
                }
                self.push(" (");
                self.identifiers(&columns);
                self.push(") DO UPDATE SET ");
                self.assignments(assignments)?;
                if let Some(filter) = filter {
                    self.push(" WHERE ");
                    filter.accept(self)?;
                }
            }
        }
        self.returning(&upsert.insert.returning)
    }

    pub(super) fn render_update(&mut self, update: &Update) -> Result<(), InterpretError> {
        let node = || Statement::Update(update.clone());
        if update.assignments.is_empty() {
            return Err(structural(node(), "UPDATE needs at least one assignment"));
        }
        let source = &update.source;
        let shape = identity::classify(source);
        trace!(shape = shape.name(), "Rendering UPDATE");
        let slots = source.traits.slots();
        match shape {
            Shape::Simple => {
                self.with_prefix(&slots)?;
                self.push("UPDATE ");
                source.record_set.accept(self)?;
                self.push(" SET ");
                self.assignments(&update.assignments)?;
                self.where_clause(&slots.filter)?;
            }
            Shape::TwoSet(join) => {
                self.with_prefix(&slots)?;
                self.push("UPDATE ");
                source.record_set.accept(self)?;
                self.push(" SET ");
                self.assignments(&update.assignments)?;
                self.push(" FROM ");
                join.record_set.accept(self)?;
                let conditions: Vec<&Expr> = join.on.iter().chain(slots.filter.iter().copied()).collect();
                self.where_clause(&conditions)?;
            }
            Shape::Complex => {
                let cte = self.identity_cte(source, node)?;
                self.push("UPDATE ");
                source.record_set.accept(self)?;
                self.push(" SET ");
                self.assignments(&update.assignments)?;
                self.push(" FROM ");
                self.push_identifier(&cte.name);
                self.identity_correlation(&cte);
            }
        }
        self.returning(&update.returning)
    }

    pub(super) fn render_delete(&mut self, delete: &Delete) -> Result<(), InterpretError> {
        let source = &delete.source;
        let shape = identity::classify(source);
        trace!(shape = shape.name(), "Rendering DELETE");
        let slots = source.traits.slots();
        match shape {
            Shape::Simple => {
                self.with_prefix(&slots)?;
                self.push("DELETE FROM ");
                source.record_set.accept(self)?;
                self.where_clause(&slots.filter)?;
            }
            Shape::TwoSet(join) => {
                self.with_prefix(&slots)?;
                self.push("DELETE FROM ");
                source.record_set.accept(self)?;
                self.push(" USING ");
                join.record_set.accept(self)?;
                let conditions: Vec<&Expr> = join.on.iter().chain(slots.filter.iter().copied()).collect();
                self.where_clause(&conditions)?;
            }
            Shape::Complex => {
                let cte = self.identity_cte(source, || Statement::Delete(delete.clone()))?;
                self.push("DELETE FROM ");
                source.record_set.accept(self)?;
                self.push(" USING ");
                self.push_identifier(&cte.name);
                self.identity_correlation(&cte);
            }
        }
        self.returning(&delete.returning)
    }

    /// Renders `WITH [user ctes, ]"cte" AS (SELECT identity FROM source ...) `.
    ///
    /// The target's identity columns are selected under synthetic aliases
    /// so they cannot collide with anything the source joins in.
    fn identity_cte(
        &mut self,
        source: &DataSource,
        node: impl FnOnce() -> Statement,
    ) -> Result<IdentityCte, InterpretError> {
        let columns = identity::identity_columns(&source.record_set).ok_or_else(|| {
            structural(
                node(),
                "target of a complex DELETE or UPDATE must be an aliased table with a primary key or columns",
            )
        })?;
        let name = self.next_cte_name();
        let columns: Vec<(String, String)> = columns
            .into_iter()
            .map(|column| (column, self.next_id_alias()))
            .collect();
        trace!(cte = %name, identity = ?columns, "Synthesized identity CTE");
        let cte = IdentityCte {
            name,
            target: self.qualifier(&source.record_set),
            columns,
        };

        let slots = source.traits.slots();
        if slots.ctes.is_empty() {
            self.push("WITH ");
        } else {
            self.with_clause(slots.recursive, &slots.ctes)?;
            self.push(", ");
        }
        self.push_identifier(&cte.name);
        self.push(" AS (SELECT ");
        if let Some(on) = slots.distinct {
            self.distinct_clause(on)?;
            self.push(" ");
        }
        for (i, (column, alias)) in cte.columns.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&cte.target);
            self.push(".");
            self.push_identifier(column);
            self.push(" AS ");
            self.push_identifier(alias);
        }
        self.push(" FROM ");
        self.from_clause(source)?;
        self.trailing_clauses(&slots)?;
        self.push(") ");
        Ok(cte)
    }

    /// ` WHERE target.col = cte.alias AND ...`.
    fn identity_correlation(&mut self, cte: &IdentityCte) {
        let cte_name = self.quote(&cte.name);
        self.push(" WHERE ");
        for (i, (column, alias)) in cte.columns.iter().enumerate() {
            if i > 0 {
                self.push(" AND ");
            }
            self.push(&cte.target);
            self.push(".");
            self.push_identifier(column);
            self.push(" = ");
            self.push(&cte_name);
            self.push(".");
            self.push_identifier(alias);
        }
    }

    pub(super) fn render_truncate(&mut self, truncate: &Truncate) -> Result<(), InterpretError> {
        if truncate.record_sets.is_empty() {
            return Err(structural(
                Statement::Truncate(truncate.clone()),
                "TRUNCATE needs at least one table",
            ));
        }
        self.push("TRUNCATE TABLE ");
        self.separated(&truncate.record_sets, ", ", |this, record_set| {
            record_set.unaliased().accept(this)
        })?;
        if truncate.restart_identity {
            self.push(" RESTART IDENTITY");
        }
        if truncate.cascade {
            self.push(" CASCADE");
        }
        Ok(())
    }

    fn assignments(&mut self, assignments: &[Assignment]) -> Result<(), InterpretError> {
        self.separated(assignments, ", ", |this, assignment| {
            this.push_identifier(&assignment.column);
            this.push(" = ");
            assignment.value.accept(this)
        })
    }

    fn returning(&mut self, items: &[SelectItem]) -> Result<(), InterpretError> {
        if !items.is_empty() {
            self.push(" RETURNING ");
            self.select_items(items)?;
        }
        Ok(())
    }
}
