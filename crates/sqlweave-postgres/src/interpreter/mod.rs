//! The PostgreSQL node interpreter.
//!
//! [`PostgresInterpreter`] walks a tree once and appends text to a single
//! buffer. The visitor methods below only dispatch; rendering lives in the
//! submodules, grouped the way the node model is.

mod ddl;
mod dml;
mod expr;
mod identity;
mod query;
mod transaction;

use std::sync::Arc;

use sqlweave_core::ast::{
    AddColumn, AddConstraint, AggregateFunction, AliasedRecordSet, AllFields, AlterColumn,
    ArithmeticExpr, Begin, Between, BitwiseExpr, CaseExpr, CastExpr, ColumnBuilderField,
    CommonTableExpression, Comparison, CompoundQuery, CreateIndex, CreateSchema, CreateTable,
    CreateView, CustomNodeRef, DataSource, Delete, Distinct, DropColumn, DropConstraint,
    DropIndex, DropSchema, DropTable, DropView, ExcludedField, Exists, Expr, Field, Filter,
    GroupBy, Having, InList, InQuery, Insert, IsNull, Join, Like, Limit, Literal,
    LogicalCondition, Node, NotCondition, Offset, OrderBy, Parameter, Query, QueryRecordSet,
    RawField, RawQuery, RawRecordSet, RawStatement, ReleaseSavepoint, RenameColumn,
    RenameTable, RollbackToSavepoint, Savepoint, ScalarFunction, SelectQuery, Statement,
    Subquery, Truncate, UnaryExpr, Update, Upsert, WindowClause, WindowFunction, WithClause,
};
use sqlweave_core::dialect::{CompiledParameter, CompiledSql, Dialect};
use sqlweave_core::error::InterpretError;
use sqlweave_core::schema::{
    ColumnDefinition, Table, TableBuilderRef, TableDefinition, View, ViewBuilderRef,
};
use sqlweave_core::types::TypeDefinitions;
use sqlweave_core::visit::NodeVisitor;
use tracing::debug;

use crate::dialect::PostgresDialect;
use crate::options::InterpreterOptions;
use crate::types::PostgresTypeDefinitions;

/// Visitor name carried by every error this interpreter raises.
const VISITOR: &str = "postgresql";

fn structural(node: impl Into<Node>, message: impl Into<String>) -> InterpretError {
    InterpretError::structural(VISITOR, node, message)
}

fn unrecognized(node: impl Into<Node>, kind: impl Into<String>) -> InterpretError {
    InterpretError::unrecognized(VISITOR, node, kind)
}

/// Renders nodes as PostgreSQL text.
///
/// One interpreter compiles one statement at a time. Every `compile_*`
/// method clears the buffer first, so an interpreter can be reused.
///
/// # Example
///
/// ```rust
/// use sqlweave_core::ast::{DataSource, Expr, Query, RecordSet, SelectItem};
/// use sqlweave_core::schema::Table;
/// use sqlweave_postgres::PostgresInterpreter;
///
/// let users = RecordSet::table(Table::new("public", "users")).alias("u");
/// let query = Query::select(
///     DataSource::new(users.clone()).filter(users.field("id").eq(Expr::param("id"))),
///     vec![SelectItem::new(users.field("name"))],
/// );
///
/// let compiled = PostgresInterpreter::new().compile_query(&query).unwrap();
/// assert_eq!(
///     compiled.sql,
///     r#"SELECT "u"."name" FROM "public"."users" AS "u" WHERE "u"."id" = @id"#
/// );
/// assert_eq!(compiled.parameter_names(), vec!["id"]);
/// ```
#[derive(Debug)]
pub struct PostgresInterpreter {
    options: InterpreterOptions,
    types: Arc<dyn TypeDefinitions>,
    dialect: PostgresDialect,
    sql: String,
    parameters: Vec<CompiledParameter>,
    synthetic_ctes: usize,
    synthetic_ids: usize,
    /// Fields render without their record set (CHECK, DEFAULT, index keys).
    unqualified: bool,
}

impl Default for PostgresInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresInterpreter {
    /// Creates an interpreter with default options and the built-in type
    /// catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(InterpreterOptions::default())
    }

    /// Creates an interpreter with the given options.
    #[must_use]
    pub fn with_options(options: InterpreterOptions) -> Self {
        Self {
            options,
            types: Arc::new(PostgresTypeDefinitions),
            dialect: PostgresDialect::new(),
            sql: String::new(),
            parameters: Vec::new(),
            synthetic_ctes: 0,
            synthetic_ids: 0,
            unqualified: false,
        }
    }

    /// Replaces the type catalogue used to resolve logical types.
    #[must_use]
    pub fn with_type_definitions(mut self, types: Arc<dyn TypeDefinitions>) -> Self {
        self.types = types;
        self
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// Returns the type catalogue.
    #[must_use]
    pub fn type_definitions(&self) -> &Arc<dyn TypeDefinitions> {
        &self.types
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &PostgresDialect {
        &self.dialect
    }

    /// Compiles a statement.
    ///
    /// # Errors
    ///
    /// Returns the first [`InterpretError`] raised by any node; nothing is
    /// returned for a partially rendered statement.
    pub fn compile(&mut self, statement: &Statement) -> Result<CompiledSql, InterpretError> {
        self.reset();
        statement.accept(self)?;
        Ok(self.finish())
    }

    /// Compiles a query.
    ///
    /// # Errors
    ///
    /// See [`PostgresInterpreter::compile`].
    pub fn compile_query(&mut self, query: &Query) -> Result<CompiledSql, InterpretError> {
        self.reset();
        query.accept(self)?;
        Ok(self.finish())
    }

    /// Compiles a standalone expression.
    ///
    /// # Errors
    ///
    /// See [`PostgresInterpreter::compile`].
    pub fn compile_expr(&mut self, expr: &Expr) -> Result<CompiledSql, InterpretError> {
        self.reset();
        expr.accept(self)?;
        Ok(self.finish())
    }

    /// Compiles any node.
    ///
    /// # Errors
    ///
    /// See [`PostgresInterpreter::compile`].
    pub fn compile_node(&mut self, node: &Node) -> Result<CompiledSql, InterpretError> {
        self.reset();
        node.accept(self)?;
        Ok(self.finish())
    }

    /// Clears the buffer, the collected parameters and the synthetic name
    /// counters.
    pub fn reset(&mut self) {
        self.sql.clear();
        self.parameters.clear();
        self.synthetic_ctes = 0;
        self.synthetic_ids = 0;
        self.unqualified = false;
    }

    /// Text rendered so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters collected so far.
    #[must_use]
    pub fn parameters(&self) -> &[CompiledParameter] {
        &self.parameters
    }

    /// Takes the rendered text and parameters, leaving the buffer empty.
    pub fn finish(&mut self) -> CompiledSql {
        let compiled = CompiledSql {
            sql: std::mem::take(&mut self.sql),
            parameters: std::mem::take(&mut self.parameters),
        };
        debug!(
            dialect = self.dialect.name(),
            sql = %compiled.sql,
            parameters = compiled.parameters.len(),
            "Compiled SQL"
        );
        compiled
    }

    // ==================== Buffer helpers ====================

    fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    fn push_identifier(&mut self, name: &str) {
        let quoted = self.dialect.quote_identifier(name);
        self.sql.push_str(&quoted);
    }

    fn quote(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn identifiers(&mut self, names: &[String]) {
        let quoted: Vec<String> = names.iter().map(|name| self.quote(name)).collect();
        self.push(&quoted.join(", "));
    }

    /// Renders `items` with `separator` between them.
    fn separated<I, T, F>(
        &mut self,
        items: I,
        separator: &str,
        mut render: F,
    ) -> Result<(), InterpretError>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T) -> Result<(), InterpretError>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            render(self, item)?;
        }
        Ok(())
    }

    /// Runs `render` with field qualification switched off.
    fn unqualified<T>(
        &mut self,
        render: impl FnOnce(&mut Self) -> Result<T, InterpretError>,
    ) -> Result<T, InterpretError> {
        let previous = std::mem::replace(&mut self.unqualified, true);
        let result = render(self);
        self.unqualified = previous;
        result
    }

    fn next_cte_name(&mut self) -> String {
        self.synthetic_ctes += 1;
        format!("{}_cte_{}", self.options.synthetic_prefix, self.synthetic_ctes)
    }

    fn next_id_alias(&mut self) -> String {
        self.synthetic_ids += 1;
        format!("{}_id_{}", self.options.synthetic_prefix, self.synthetic_ids)
    }
}

impl NodeVisitor for PostgresInterpreter {
    type Error = InterpretError;

    // ==================== Expressions ====================

    fn visit_null(&mut self) -> Result<(), InterpretError> {
        self.push("NULL");
        Ok(())
    }

    fn visit_boolean(&mut self, value: bool) -> Result<(), InterpretError> {
        self.push(if value { "TRUE" } else { "FALSE" });
        Ok(())
    }

    fn visit_literal(&mut self, literal: &Literal) -> Result<(), InterpretError> {
        self.render_literal(literal)
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), InterpretError> {
        self.render_parameter(parameter);
        Ok(())
    }

    fn visit_field(&mut self, field: &Field) -> Result<(), InterpretError> {
        self.render_field(field);
        Ok(())
    }

    fn visit_raw_field(&mut self, field: &RawField) -> Result<(), InterpretError> {
        self.push(&field.sql);
        Ok(())
    }

    fn visit_column_builder_field(
        &mut self,
        field: &ColumnBuilderField,
    ) -> Result<(), InterpretError> {
        self.render_column_builder_field(field)
    }

    fn visit_excluded_field(&mut self, field: &ExcludedField) -> Result<(), InterpretError> {
        self.push("EXCLUDED.");
        self.push_identifier(&field.name);
        Ok(())
    }

    fn visit_all_fields(&mut self, fields: &AllFields) -> Result<(), InterpretError> {
        self.render_all_fields(fields);
        Ok(())
    }

    fn visit_unary(&mut self, expr: &UnaryExpr) -> Result<(), InterpretError> {
        self.render_unary(expr)
    }

    fn visit_arithmetic(&mut self, expr: &ArithmeticExpr) -> Result<(), InterpretError> {
        self.render_arithmetic(expr)
    }

    fn visit_bitwise(&mut self, expr: &BitwiseExpr) -> Result<(), InterpretError> {
        self.render_bitwise(expr)
    }

    fn visit_comparison(&mut self, condition: &Comparison) -> Result<(), InterpretError> {
        self.render_comparison(condition)
    }

    fn visit_logical(&mut self, condition: &LogicalCondition) -> Result<(), InterpretError> {
        self.render_logical(condition)
    }

    fn visit_not(&mut self, condition: &NotCondition) -> Result<(), InterpretError> {
        self.render_not(condition)
    }

    fn visit_is_null(&mut self, condition: &IsNull) -> Result<(), InterpretError> {
        self.render_is_null(condition)
    }

    fn visit_like(&mut self, condition: &Like) -> Result<(), InterpretError> {
        self.render_like(condition)
    }

    fn visit_in_list(&mut self, condition: &InList) -> Result<(), InterpretError> {
        self.render_in_list(condition)
    }

    fn visit_in_query(&mut self, condition: &InQuery) -> Result<(), InterpretError> {
        self.render_in_query(condition)
    }

    fn visit_between(&mut self, condition: &Between) -> Result<(), InterpretError> {
        self.render_between(condition)
    }

    fn visit_exists(&mut self, condition: &Exists) -> Result<(), InterpretError> {
        self.render_exists(condition)
    }

    fn visit_case(&mut self, expr: &CaseExpr) -> Result<(), InterpretError> {
        self.render_case(expr)
    }

    fn visit_cast(&mut self, expr: &CastExpr) -> Result<(), InterpretError> {
        self.render_cast(expr)
    }

    fn visit_function(&mut self, function: &ScalarFunction) -> Result<(), InterpretError> {
        self.render_function(function)
    }

    fn visit_aggregate(&mut self, function: &AggregateFunction) -> Result<(), InterpretError> {
        self.render_aggregate(function)
    }

    fn visit_window_function(&mut self, function: &WindowFunction) -> Result<(), InterpretError> {
        self.render_window_function(function)
    }

    fn visit_subquery(&mut self, subquery: &Subquery) -> Result<(), InterpretError> {
        self.render_subquery(subquery)
    }

    // ==================== Record sets ====================

    fn visit_raw_record_set(&mut self, record_set: &RawRecordSet) -> Result<(), InterpretError> {
        self.push(&record_set.sql);
        if let Some(alias) = &record_set.alias {
            self.push(" AS ");
            self.push_identifier(alias);
        }
        Ok(())
    }

    fn visit_table(&mut self, table: &Arc<Table>) -> Result<(), InterpretError> {
        let name = self.qualified_name(Some(&table.schema), &table.name, table.temporary);
        self.push(&name);
        Ok(())
    }

    fn visit_view(&mut self, view: &Arc<View>) -> Result<(), InterpretError> {
        let name = self.qualified_name(Some(&view.schema), &view.name, view.temporary);
        self.push(&name);
        Ok(())
    }

    fn visit_table_builder(&mut self, table: &TableBuilderRef) -> Result<(), InterpretError> {
        let name =
            self.qualified_name(Some(&table.schema().name()), &table.name(), table.is_temporary());
        self.push(&name);
        Ok(())
    }

    fn visit_view_builder(&mut self, view: &ViewBuilderRef) -> Result<(), InterpretError> {
        let name =
            self.qualified_name(Some(&view.schema().name()), &view.name(), view.is_temporary());
        self.push(&name);
        Ok(())
    }

    fn visit_new_table(&mut self, table: &Arc<TableDefinition>) -> Result<(), InterpretError> {
        let name = self.qualified_name(table.schema.as_deref(), &table.name, table.temporary);
        self.push(&name);
        Ok(())
    }

    fn visit_aliased(&mut self, record_set: &AliasedRecordSet) -> Result<(), InterpretError> {
        record_set.inner.accept(self)?;
        self.push(" AS ");
        self.push_identifier(&record_set.alias);
        Ok(())
    }

    fn visit_query_record_set(&mut self, record_set: &QueryRecordSet) -> Result<(), InterpretError> {
        self.push("(");
        record_set.query.accept(self)?;
        self.push(") AS ");
        self.push_identifier(&record_set.alias);
        Ok(())
    }

    fn visit_cte_reference(
        &mut self,
        cte: &Arc<CommonTableExpression>,
    ) -> Result<(), InterpretError> {
        self.push_identifier(&cte.name);
        Ok(())
    }

    fn visit_join(&mut self, join: &Join) -> Result<(), InterpretError> {
        self.render_join(join)
    }

    fn visit_data_source(&mut self, source: &DataSource) -> Result<(), InterpretError> {
        self.render_data_source(source)
    }

    // ==================== Traits ====================

    fn visit_with(&mut self, with: &WithClause) -> Result<(), InterpretError> {
        let ctes: Vec<_> = with.ctes.iter().collect();
        self.with_clause(with.recursive, &ctes)
    }

    fn visit_distinct(&mut self, distinct: &Distinct) -> Result<(), InterpretError> {
        self.distinct_clause(&distinct.on)
    }

    fn visit_filter(&mut self, filter: &Filter) -> Result<(), InterpretError> {
        self.push("WHERE ");
        filter.condition.accept(self)
    }

    fn visit_group_by(&mut self, group_by: &GroupBy) -> Result<(), InterpretError> {
        self.push("GROUP BY ");
        self.expr_list(&group_by.exprs)
    }

    fn visit_having(&mut self, having: &Having) -> Result<(), InterpretError> {
        self.push("HAVING ");
        having.condition.accept(self)
    }

    fn visit_window_clause(&mut self, window: &WindowClause) -> Result<(), InterpretError> {
        self.push("WINDOW ");
        self.window_definitions(window.definitions.iter())
    }

    fn visit_order_by(&mut self, order_by: &OrderBy) -> Result<(), InterpretError> {
        self.push("ORDER BY ");
        self.order_items(&order_by.items)
    }

    fn visit_limit(&mut self, limit: &Limit) -> Result<(), InterpretError> {
        self.push("LIMIT ");
        limit.count.accept(self)
    }

    fn visit_offset(&mut self, offset: &Offset) -> Result<(), InterpretError> {
        self.push("OFFSET ");
        offset.count.accept(self)
    }

    // ==================== Queries ====================

    fn visit_raw_query(&mut self, query: &RawQuery) -> Result<(), InterpretError> {
        self.push(&query.sql);
        Ok(())
    }

    fn visit_select(&mut self, query: &SelectQuery) -> Result<(), InterpretError> {
        self.render_select(query)
    }

    fn visit_compound(&mut self, query: &CompoundQuery) -> Result<(), InterpretError> {
        self.render_compound(query)
    }

    // ==================== Statements ====================

    fn visit_insert(&mut self, insert: &Insert) -> Result<(), InterpretError> {
        self.render_insert(insert)
    }

    fn visit_upsert(&mut self, upsert: &Upsert) -> Result<(), InterpretError> {
        self.render_upsert(upsert)
    }

    fn visit_update(&mut self, update: &Update) -> Result<(), InterpretError> {
        self.render_update(update)
    }

    fn visit_delete(&mut self, delete: &Delete) -> Result<(), InterpretError> {
        self.render_delete(delete)
    }

    fn visit_truncate(&mut self, truncate: &Truncate) -> Result<(), InterpretError> {
        self.render_truncate(truncate)
    }

    fn visit_raw_statement(&mut self, statement: &RawStatement) -> Result<(), InterpretError> {
        self.push(&statement.sql);
        Ok(())
    }

    fn visit_create_table(&mut self, statement: &CreateTable) -> Result<(), InterpretError> {
        self.render_create_table(statement)
    }

    fn visit_drop_table(&mut self, statement: &DropTable) -> Result<(), InterpretError> {
        self.render_drop_table(statement)
    }

    fn visit_rename_table(&mut self, statement: &RenameTable) -> Result<(), InterpretError> {
        self.render_rename_table(statement)
    }

    fn visit_add_column(&mut self, statement: &AddColumn) -> Result<(), InterpretError> {
        self.render_add_column(statement)
    }

    fn visit_drop_column(&mut self, statement: &DropColumn) -> Result<(), InterpretError> {
        self.render_drop_column(statement)
    }

    fn visit_rename_column(&mut self, statement: &RenameColumn) -> Result<(), InterpretError> {
        self.render_rename_column(statement)
    }

    fn visit_alter_column(&mut self, statement: &AlterColumn) -> Result<(), InterpretError> {
        self.render_alter_column(statement)
    }

    fn visit_add_constraint(&mut self, statement: &AddConstraint) -> Result<(), InterpretError> {
        self.render_add_constraint(statement)
    }

    fn visit_drop_constraint(&mut self, statement: &DropConstraint) -> Result<(), InterpretError> {
        self.render_drop_constraint(statement)
    }

    fn visit_create_view(&mut self, statement: &CreateView) -> Result<(), InterpretError> {
        self.render_create_view(statement)
    }

    fn visit_drop_view(&mut self, statement: &DropView) -> Result<(), InterpretError> {
        self.render_drop_view(statement)
    }

    fn visit_create_index(&mut self, statement: &CreateIndex) -> Result<(), InterpretError> {
        self.render_create_index(statement)
    }

    fn visit_drop_index(&mut self, statement: &DropIndex) -> Result<(), InterpretError> {
        self.render_drop_index(statement);
        Ok(())
    }

    fn visit_create_schema(&mut self, statement: &CreateSchema) -> Result<(), InterpretError> {
        self.render_create_schema(statement);
        Ok(())
    }

    fn visit_drop_schema(&mut self, statement: &DropSchema) -> Result<(), InterpretError> {
        self.render_drop_schema(statement);
        Ok(())
    }

    fn visit_begin(&mut self, statement: &Begin) -> Result<(), InterpretError> {
        self.render_begin(statement);
        Ok(())
    }

    fn visit_commit(&mut self) -> Result<(), InterpretError> {
        self.push("COMMIT");
        Ok(())
    }

    fn visit_rollback(&mut self) -> Result<(), InterpretError> {
        self.push("ROLLBACK");
        Ok(())
    }

    fn visit_savepoint(&mut self, statement: &Savepoint) -> Result<(), InterpretError> {
        self.push("SAVEPOINT ");
        self.push_identifier(&statement.name);
        Ok(())
    }

    fn visit_release_savepoint(
        &mut self,
        statement: &ReleaseSavepoint,
    ) -> Result<(), InterpretError> {
        self.push("RELEASE SAVEPOINT ");
        self.push_identifier(&statement.name);
        Ok(())
    }

    fn visit_rollback_to_savepoint(
        &mut self,
        statement: &RollbackToSavepoint,
    ) -> Result<(), InterpretError> {
        self.push("ROLLBACK TO SAVEPOINT ");
        self.push_identifier(&statement.name);
        Ok(())
    }

    // ==================== Other ====================

    fn visit_column_definition(&mut self, column: &ColumnDefinition) -> Result<(), InterpretError> {
        self.column_definition(column)
    }

    fn visit_custom(&mut self, node: &CustomNodeRef) -> Result<(), InterpretError> {
        self.render_custom(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_state() {
        let mut interpreter = PostgresInterpreter::new();
        interpreter.compile_expr(&Expr::param("a")).unwrap();
        interpreter.push("leftover");
        interpreter.next_cte_name();
        interpreter.reset();
        assert_eq!(interpreter.sql(), "");
        assert!(interpreter.parameters().is_empty());
        assert_eq!(interpreter.next_cte_name(), "__sw_cte_1");
    }

    #[test]
    fn test_synthetic_names_use_prefix() {
        let mut interpreter =
            PostgresInterpreter::with_options(InterpreterOptions::new().synthetic_prefix("tmp"));
        assert_eq!(interpreter.next_cte_name(), "tmp_cte_1");
        assert_eq!(interpreter.next_id_alias(), "tmp_id_1");
        assert_eq!(interpreter.next_id_alias(), "tmp_id_2");
        assert_eq!(interpreter.next_cte_name(), "tmp_cte_2");
    }

    #[test]
    fn test_unqualified_restores_flag() {
        let mut interpreter = PostgresInterpreter::new();
        let result: Result<(), InterpretError> = interpreter.unqualified(|this| {
            assert!(this.unqualified);
            Err(structural(Expr::null(), "boom"))
        });
        assert!(result.is_err());
        assert!(!interpreter.unqualified);
    }

    #[test]
    fn test_compile_collects_parameters_once() {
        let expr = Expr::param("a").add(Expr::param("b")).add(Expr::param("a"));
        let compiled = PostgresInterpreter::new().compile_expr(&expr).unwrap();
        assert_eq!(compiled.sql, "@a + @b + @a");
        assert_eq!(compiled.parameter_names(), vec!["a", "b"]);
        assert_eq!(compiled.parameters[0].placeholder, "@a");
    }
}
