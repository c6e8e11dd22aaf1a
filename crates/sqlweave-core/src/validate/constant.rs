use std::convert::Infallible;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{
    AddColumn, AddConstraint, AggregateFunction, AliasedRecordSet, AllFields, AlterColumn,
    ArithmeticExpr, Begin, Between, BitwiseExpr, CaseExpr, CastExpr, ColumnBuilderField,
    CommonTableExpression, Comparison, CompoundQuery, CreateIndex, CreateSchema, CreateTable,
    CreateView, CustomNodeRef, DataSource, Delete, Distinct, DropColumn, DropConstraint,
    DropIndex, DropSchema, DropTable, DropView, ExcludedField, Exists, Expr, Field, Filter,
    GroupBy, Having, InList, InQuery, Insert, IsNull, Join, Like, Limit, Literal,
    LogicalCondition, Node, NotCondition, Offset, OrderBy, Parameter, Query, QueryRecordSet,
    QueryTrait, RawField, RawQuery, RawRecordSet, RawStatement, RecordSet, ReleaseSavepoint,
    RenameColumn, RenameTable, RollbackToSavepoint, Savepoint, ScalarFunction, SelectQuery,
    Statement, Subquery, Truncate, UnaryExpr, Update, Upsert, WindowClause, WindowFunction,
    WithClause,
};
use crate::schema::{ColumnDefinition, Table, TableBuilderRef, TableDefinition, View, ViewBuilderRef};
use crate::visit::{self, NodeVisitor};

use super::{completed, ValidationError};

/// Checks that an expression can be evaluated without any row, table or
/// parameter context.
///
/// Every non-constant node contributes exactly one error and is not
/// descended into; composite expressions are descended into so independent
/// violations accumulate.
///
/// ```
/// use sqlweave_core::ast::Expr;
/// use sqlweave_core::validate::ConstantExpressionValidator;
///
/// let expr = Expr::param("a").add(Expr::param("b"));
/// let errors = ConstantExpressionValidator::validate(&expr);
/// assert_eq!(errors.len(), 2);
///
/// assert!(ConstantExpressionValidator::validate(&Expr::int(1).add(Expr::int(2))).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ConstantExpressionValidator {
    errors: Vec<ValidationError>,
}

impl ConstantExpressionValidator {
    /// Creates a validator with an empty error list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates one expression and returns every violation found.
    #[must_use]
    pub fn validate(expr: &Expr) -> Vec<ValidationError> {
        let mut validator = Self::new();
        validator.check_expr(expr);
        validator.finish()
    }

    /// Walks an expression, adding to the error list.
    pub fn check_expr(&mut self, expr: &Expr) {
        completed(expr.accept(self));
    }

    /// Walks any node, adding to the error list.
    pub fn check_node(&mut self, node: &Node) {
        completed(node.accept(self));
    }

    /// Returns the errors collected so far.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the validator and returns the collected errors.
    #[must_use]
    pub fn finish(self) -> Vec<ValidationError> {
        debug!(errors = self.errors.len(), "constant expression validated");
        self.errors
    }

    /// Clears the collected errors.
    pub fn reset(&mut self) {
        self.errors.clear();
    }

    fn reject(&mut self, node: impl Into<Node>, what: &str) -> Result<(), Infallible> {
        self.errors.push(ValidationError::new(
            node,
            format!("{what} is not allowed in a constant expression"),
        ));
        Ok(())
    }
}

impl NodeVisitor for ConstantExpressionValidator {
    type Error = Infallible;

    fn visit_null(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_boolean(&mut self, _value: bool) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_literal(&mut self, _literal: &Literal) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), Infallible> {
        self.reject(
            Expr::Parameter(parameter.clone()),
            &format!("parameter {}", parameter.name),
        )
    }

    fn visit_field(&mut self, field: &Field) -> Result<(), Infallible> {
        self.reject(Expr::Field(field.clone()), &format!("column {}", field.name))
    }

    fn visit_raw_field(&mut self, field: &RawField) -> Result<(), Infallible> {
        self.reject(Expr::RawField(field.clone()), "a raw column")
    }

    fn visit_column_builder_field(&mut self, field: &ColumnBuilderField) -> Result<(), Infallible> {
        self.reject(
            Expr::ColumnBuilder(field.clone()),
            &format!("column {}", field.column.name()),
        )
    }

    fn visit_excluded_field(&mut self, field: &ExcludedField) -> Result<(), Infallible> {
        self.reject(
            Expr::Excluded(field.clone()),
            &format!("excluded column {}", field.name),
        )
    }

    fn visit_all_fields(&mut self, fields: &AllFields) -> Result<(), Infallible> {
        self.reject(Expr::All(fields.clone()), "*")
    }

    fn visit_unary(&mut self, expr: &UnaryExpr) -> Result<(), Infallible> {
        visit::walk_unary(self, expr)
    }

    fn visit_arithmetic(&mut self, expr: &ArithmeticExpr) -> Result<(), Infallible> {
        visit::walk_arithmetic(self, expr)
    }

    fn visit_bitwise(&mut self, expr: &BitwiseExpr) -> Result<(), Infallible> {
        visit::walk_bitwise(self, expr)
    }

    fn visit_comparison(&mut self, condition: &Comparison) -> Result<(), Infallible> {
        visit::walk_comparison(self, condition)
    }

    fn visit_logical(&mut self, condition: &LogicalCondition) -> Result<(), Infallible> {
        visit::walk_logical(self, condition)
    }

    fn visit_not(&mut self, condition: &NotCondition) -> Result<(), Infallible> {
        visit::walk_not(self, condition)
    }

    fn visit_is_null(&mut self, condition: &IsNull) -> Result<(), Infallible> {
        visit::walk_is_null(self, condition)
    }

    fn visit_like(&mut self, condition: &Like) -> Result<(), Infallible> {
        visit::walk_like(self, condition)
    }

    fn visit_in_list(&mut self, condition: &InList) -> Result<(), Infallible> {
        visit::walk_in_list(self, condition)
    }

    fn visit_in_query(&mut self, condition: &InQuery) -> Result<(), Infallible> {
        visit::walk_in_query(self, condition)
    }

    fn visit_between(&mut self, condition: &Between) -> Result<(), Infallible> {
        visit::walk_between(self, condition)
    }

    fn visit_exists(&mut self, condition: &Exists) -> Result<(), Infallible> {
        visit::walk_exists(self, condition)
    }

    fn visit_case(&mut self, expr: &CaseExpr) -> Result<(), Infallible> {
        visit::walk_case(self, expr)
    }

    fn visit_cast(&mut self, expr: &CastExpr) -> Result<(), Infallible> {
        visit::walk_cast(self, expr)
    }

    fn visit_function(&mut self, function: &ScalarFunction) -> Result<(), Infallible> {
        visit::walk_function(self, function)
    }

    // Aggregates and window functions need a row set.
    fn visit_aggregate(&mut self, function: &AggregateFunction) -> Result<(), Infallible> {
        self.reject(Expr::Aggregate(function.clone()), "an aggregate function")
    }

    fn visit_window_function(&mut self, function: &WindowFunction) -> Result<(), Infallible> {
        self.reject(Expr::Window(function.clone()), "a window function")
    }

    fn visit_subquery(&mut self, subquery: &Subquery) -> Result<(), Infallible> {
        visit::walk_subquery(self, subquery)
    }

    // ==================== Record sets ====================

    fn visit_raw_record_set(&mut self, record_set: &RawRecordSet) -> Result<(), Infallible> {
        self.reject(RecordSet::Raw(record_set.clone()), "a record set")
    }

    fn visit_table(&mut self, table: &Arc<Table>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::Table(Arc::clone(table)),
            &format!("table {}", table.name),
        )
    }

    fn visit_view(&mut self, view: &Arc<View>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::View(Arc::clone(view)),
            &format!("view {}", view.name),
        )
    }

    fn visit_table_builder(&mut self, table: &TableBuilderRef) -> Result<(), Infallible> {
        self.reject(
            RecordSet::TableBuilder(table.clone()),
            &format!("table {}", table.name()),
        )
    }

    fn visit_view_builder(&mut self, view: &ViewBuilderRef) -> Result<(), Infallible> {
        self.reject(
            RecordSet::ViewBuilder(view.clone()),
            &format!("view {}", view.name()),
        )
    }

    fn visit_new_table(&mut self, table: &Arc<TableDefinition>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::NewTable(Arc::clone(table)),
            &format!("table {}", table.name),
        )
    }

    fn visit_aliased(&mut self, record_set: &AliasedRecordSet) -> Result<(), Infallible> {
        self.reject(RecordSet::Aliased(record_set.clone()), "a record set")
    }

    fn visit_query_record_set(&mut self, record_set: &QueryRecordSet) -> Result<(), Infallible> {
        self.reject(RecordSet::Query(record_set.clone()), "a record set")
    }

    fn visit_cte_reference(&mut self, cte: &Arc<CommonTableExpression>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::Cte(Arc::clone(cte)),
            &format!("common table expression {}", cte.name),
        )
    }

    fn visit_join(&mut self, join: &Join) -> Result<(), Infallible> {
        self.reject(join.clone(), "a join")
    }

    fn visit_data_source(&mut self, source: &DataSource) -> Result<(), Infallible> {
        self.reject(source.clone(), "a data source")
    }

    // ==================== Traits ====================

    fn visit_with(&mut self, with: &WithClause) -> Result<(), Infallible> {
        self.reject(QueryTrait::With(with.clone()), "WITH")
    }

    fn visit_distinct(&mut self, distinct: &Distinct) -> Result<(), Infallible> {
        self.reject(QueryTrait::Distinct(distinct.clone()), "DISTINCT")
    }

    fn visit_filter(&mut self, filter: &Filter) -> Result<(), Infallible> {
        self.reject(QueryTrait::Filter(filter.clone()), "WHERE")
    }

    fn visit_group_by(&mut self, group_by: &GroupBy) -> Result<(), Infallible> {
        self.reject(QueryTrait::GroupBy(group_by.clone()), "GROUP BY")
    }

    fn visit_having(&mut self, having: &Having) -> Result<(), Infallible> {
        self.reject(QueryTrait::Having(having.clone()), "HAVING")
    }

    fn visit_window_clause(&mut self, window: &WindowClause) -> Result<(), Infallible> {
        self.reject(QueryTrait::Window(window.clone()), "WINDOW")
    }

    fn visit_order_by(&mut self, order_by: &OrderBy) -> Result<(), Infallible> {
        self.reject(QueryTrait::OrderBy(order_by.clone()), "ORDER BY")
    }

    fn visit_limit(&mut self, limit: &Limit) -> Result<(), Infallible> {
        self.reject(QueryTrait::Limit(limit.clone()), "LIMIT")
    }

    fn visit_offset(&mut self, offset: &Offset) -> Result<(), Infallible> {
        self.reject(QueryTrait::Offset(offset.clone()), "OFFSET")
    }

    // ==================== Queries ====================

    fn visit_raw_query(&mut self, query: &RawQuery) -> Result<(), Infallible> {
        self.reject(Query::Raw(query.clone()), "a raw query")
    }

    fn visit_select(&mut self, query: &SelectQuery) -> Result<(), Infallible> {
        visit::walk_select(self, query)
    }

    fn visit_compound(&mut self, query: &CompoundQuery) -> Result<(), Infallible> {
        visit::walk_compound(self, query)
    }

    // ==================== Statements ====================

    fn visit_insert(&mut self, insert: &Insert) -> Result<(), Infallible> {
        self.reject(Statement::Insert(insert.clone()), "INSERT")
    }

    fn visit_upsert(&mut self, upsert: &Upsert) -> Result<(), Infallible> {
        self.reject(Statement::Upsert(upsert.clone()), "INSERT ... ON CONFLICT")
    }

    fn visit_update(&mut self, update: &Update) -> Result<(), Infallible> {
        self.reject(Statement::Update(update.clone()), "UPDATE")
    }

    fn visit_delete(&mut self, delete: &Delete) -> Result<(), Infallible> {
        self.reject(Statement::Delete(delete.clone()), "DELETE")
    }

    fn visit_truncate(&mut self, truncate: &Truncate) -> Result<(), Infallible> {
        self.reject(Statement::Truncate(truncate.clone()), "TRUNCATE")
    }

    fn visit_raw_statement(&mut self, statement: &RawStatement) -> Result<(), Infallible> {
        self.reject(Statement::Raw(statement.clone()), "a raw statement")
    }

    fn visit_create_table(&mut self, statement: &CreateTable) -> Result<(), Infallible> {
        self.reject(Statement::CreateTable(statement.clone()), "CREATE TABLE")
    }

    fn visit_drop_table(&mut self, statement: &DropTable) -> Result<(), Infallible> {
        self.reject(Statement::DropTable(statement.clone()), "DROP TABLE")
    }

    fn visit_rename_table(&mut self, statement: &RenameTable) -> Result<(), Infallible> {
        self.reject(Statement::RenameTable(statement.clone()), "ALTER TABLE")
    }

    fn visit_add_column(&mut self, statement: &AddColumn) -> Result<(), Infallible> {
        self.reject(Statement::AddColumn(statement.clone()), "ALTER TABLE")
    }

    fn visit_drop_column(&mut self, statement: &DropColumn) -> Result<(), Infallible> {
        self.reject(Statement::DropColumn(statement.clone()), "ALTER TABLE")
    }

    fn visit_rename_column(&mut self, statement: &RenameColumn) -> Result<(), Infallible> {
        self.reject(Statement::RenameColumn(statement.clone()), "ALTER TABLE")
    }

    fn visit_alter_column(&mut self, statement: &AlterColumn) -> Result<(), Infallible> {
        self.reject(Statement::AlterColumn(statement.clone()), "ALTER TABLE")
    }

    fn visit_add_constraint(&mut self, statement: &AddConstraint) -> Result<(), Infallible> {
        self.reject(Statement::AddConstraint(statement.clone()), "ALTER TABLE")
    }

    fn visit_drop_constraint(&mut self, statement: &DropConstraint) -> Result<(), Infallible> {
        self.reject(Statement::DropConstraint(statement.clone()), "ALTER TABLE")
    }

    fn visit_create_view(&mut self, statement: &CreateView) -> Result<(), Infallible> {
        self.reject(Statement::CreateView(statement.clone()), "CREATE VIEW")
    }

    fn visit_drop_view(&mut self, statement: &DropView) -> Result<(), Infallible> {
        self.reject(Statement::DropView(statement.clone()), "DROP VIEW")
    }

    fn visit_create_index(&mut self, statement: &CreateIndex) -> Result<(), Infallible> {
        self.reject(Statement::CreateIndex(statement.clone()), "CREATE INDEX")
    }

    fn visit_drop_index(&mut self, statement: &DropIndex) -> Result<(), Infallible> {
        self.reject(Statement::DropIndex(statement.clone()), "DROP INDEX")
    }

    fn visit_create_schema(&mut self, statement: &CreateSchema) -> Result<(), Infallible> {
        self.reject(Statement::CreateSchema(statement.clone()), "CREATE SCHEMA")
    }

    fn visit_drop_schema(&mut self, statement: &DropSchema) -> Result<(), Infallible> {
        self.reject(Statement::DropSchema(statement.clone()), "DROP SCHEMA")
    }

    fn visit_begin(&mut self, statement: &Begin) -> Result<(), Infallible> {
        self.reject(Statement::Begin(*statement), "BEGIN")
    }

    fn visit_commit(&mut self) -> Result<(), Infallible> {
        self.reject(Statement::Commit, "COMMIT")
    }

    fn visit_rollback(&mut self) -> Result<(), Infallible> {
        self.reject(Statement::Rollback, "ROLLBACK")
    }

    fn visit_savepoint(&mut self, statement: &Savepoint) -> Result<(), Infallible> {
        self.reject(Statement::Savepoint(statement.clone()), "SAVEPOINT")
    }

    fn visit_release_savepoint(&mut self, statement: &ReleaseSavepoint) -> Result<(), Infallible> {
        self.reject(
            Statement::ReleaseSavepoint(statement.clone()),
            "RELEASE SAVEPOINT",
        )
    }

    fn visit_rollback_to_savepoint(
        &mut self,
        statement: &RollbackToSavepoint,
    ) -> Result<(), Infallible> {
        self.reject(
            Statement::RollbackToSavepoint(statement.clone()),
            "ROLLBACK TO SAVEPOINT",
        )
    }

    fn visit_column_definition(&mut self, column: &ColumnDefinition) -> Result<(), Infallible> {
        self.reject(
            column.clone(),
            &format!("column definition {}", column.name),
        )
    }

    fn visit_custom(&mut self, _node: &CustomNodeRef) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FunctionKind;
    use crate::schema::memory::MemoryDatabase;

    #[test]
    fn test_constants_are_accepted() {
        for expr in [
            Expr::null(),
            Expr::boolean(true),
            Expr::boolean(false),
            Expr::int(42),
            Expr::string("x"),
            Expr::function(FunctionKind::CurrentTimestamp, vec![]),
            Expr::int(1).add(Expr::int(2)).mul(Expr::int(3)),
        ] {
            assert!(ConstantExpressionValidator::validate(&expr).is_empty(), "{expr:?}");
        }
    }

    #[test]
    fn test_one_error_per_operand() {
        let t = RecordSet::table(Table::new("public", "t"));
        let expr = t.field("a").add(Expr::param("p"));
        let errors = ConstantExpressionValidator::validate(&expr);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0].node, Node::Expr(Expr::Field(_))));
        assert!(matches!(errors[1].node, Node::Expr(Expr::Parameter(_))));
    }

    #[test]
    fn test_field_is_one_error() {
        // The record set of the field is not reported separately.
        let t = RecordSet::table(Table::new("public", "t"));
        assert_eq!(ConstantExpressionValidator::validate(&t.field("a")).len(), 1);
    }

    #[test]
    fn test_column_builder_is_rejected() {
        let db = MemoryDatabase::new();
        let column = db.add_schema("public").add_table("t").add_column("a");
        let expr = Expr::column_builder(column.into()).eq(Expr::int(1));
        let errors = ConstantExpressionValidator::validate(&expr);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "column a is not allowed in a constant expression");
    }

    #[test]
    fn test_record_sets_and_statements_are_rejected() {
        let mut validator = ConstantExpressionValidator::new();
        validator.check_node(&Node::RecordSet(RecordSet::raw("t")));
        validator.check_node(&Node::Statement(Statement::Commit));
        assert_eq!(validator.errors().len(), 2);

        validator.reset();
        assert!(validator.errors().is_empty());
    }
}
