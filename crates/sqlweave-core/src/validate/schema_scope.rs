use std::collections::HashSet;
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
    LogicalCondition, Node, NotCondition, Offset, OrderBy, Parameter, QueryRecordSet, RawField,
    RawQuery, RawRecordSet, RawStatement, RecordSet, ReleaseSavepoint, RenameColumn, RenameTable,
    RollbackToSavepoint, Savepoint, ScalarFunction, SelectQuery, Statement, Subquery, Truncate,
    UnaryExpr, Update, Upsert, WindowClause, WindowFunction, WithClause,
};
use crate::schema::{
    ColumnBuilderRef, ColumnDefinition, ObjectId, SchemaBuilderRef, SchemaObject, Table,
    TableBuilderRef, TableDefinition, View, ViewBuilderRef,
};
use crate::visit::{self, NodeVisitor};

use super::{completed, ValidationError};

/// A builder object referenced by a validated tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferencedObject {
    Schema(SchemaBuilderRef),
    Table(TableBuilderRef),
    Column(ColumnBuilderRef),
    View(ViewBuilderRef),
}

impl ReferencedObject {
    /// Returns the identity of the referenced object.
    #[must_use]
    pub fn object_id(&self) -> ObjectId {
        match self {
            Self::Schema(schema) => schema.object_id(),
            Self::Table(table) => table.object_id(),
            Self::Column(column) => column.object_id(),
            Self::View(view) => view.object_id(),
        }
    }
}

/// Set of referenced builder objects, iterated in first-reference order.
#[derive(Debug, Clone, Default)]
pub struct ReferencedObjects {
    order: Vec<ReferencedObject>,
    seen: HashSet<ReferencedObject>,
}

impl ReferencedObjects {
    /// Adds an object; returns false if it was already present.
    pub fn insert(&mut self, object: ReferencedObject) -> bool {
        if self.seen.insert(object.clone()) {
            self.order.push(object);
            true
        } else {
            false
        }
    }

    /// Returns whether the object is present.
    #[must_use]
    pub fn contains(&self, object: &ReferencedObject) -> bool {
        self.seen.contains(object)
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates in first-reference order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReferencedObject> {
        self.order.iter()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

impl<'a> IntoIterator for &'a ReferencedObjects {
    type Item = &'a ReferencedObject;
    type IntoIter = std::slice::Iter<'a, ReferencedObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Checks that every builder reference in a tree belongs to the database
/// of a bound schema and is still live, and collects the referenced
/// objects.
///
/// Finalized tables and views are always rejected: only builder objects
/// are legitimate while a schema is being defined. Raw record sets and raw
/// fields are accepted without being recorded.
#[derive(Debug)]
pub struct SchemaScopeExpressionValidator {
    schema: SchemaBuilderRef,
    errors: Vec<ValidationError>,
    referenced: ReferencedObjects,
}

impl SchemaScopeExpressionValidator {
    /// Creates a validator bound to `schema`.
    #[must_use]
    pub fn new(schema: SchemaBuilderRef) -> Self {
        Self {
            schema,
            errors: Vec::new(),
            referenced: ReferencedObjects::default(),
        }
    }

    /// Returns the bound schema.
    #[must_use]
    pub const fn schema(&self) -> &SchemaBuilderRef {
        &self.schema
    }

    /// Walks an expression.
    pub fn check_expr(&mut self, expr: &Expr) {
        completed(expr.accept(self));
        self.log_walk();
    }

    /// Walks a statement.
    pub fn check_statement(&mut self, statement: &Statement) {
        completed(statement.accept(self));
        self.log_walk();
    }

    /// Walks any node.
    pub fn check_node(&mut self, node: &Node) {
        completed(node.accept(self));
        self.log_walk();
    }

    /// Returns the errors collected so far.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the objects referenced so far.
    #[must_use]
    pub const fn referenced(&self) -> &ReferencedObjects {
        &self.referenced
    }

    /// Consumes the validator, returning the errors and referenced objects.
    #[must_use]
    pub fn finish(self) -> (Vec<ValidationError>, ReferencedObjects) {
        (self.errors, self.referenced)
    }

    /// Clears the collected errors and references.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.referenced.clear();
    }

    fn log_walk(&self) {
        debug!(
            schema = %self.schema.name(),
            errors = self.errors.len(),
            referenced = self.referenced.len(),
            "schema scope validated"
        );
    }

    fn reject(&mut self, node: impl Into<Node>, message: String) -> Result<(), Infallible> {
        self.errors.push(ValidationError::new(node, message));
        Ok(())
    }

    /// Why `object` is out of scope, if it is.
    fn out_of_scope<T: SchemaObject + ?Sized>(&self, object: &T) -> Option<&'static str> {
        if object.database_id() != self.schema.database_id() {
            Some("belongs to another database")
        } else if object.is_removed() {
            Some("has been removed")
        } else {
            None
        }
    }

    fn reference_schema(&mut self, schema: SchemaBuilderRef) {
        if schema.object_id() != self.schema.object_id() {
            self.referenced.insert(ReferencedObject::Schema(schema));
        }
    }
}

impl NodeVisitor for SchemaScopeExpressionValidator {
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
            format!(
                "parameter {} is not allowed in a schema definition",
                parameter.name
            ),
        )
    }

    fn visit_field(&mut self, field: &Field) -> Result<(), Infallible> {
        visit::walk_field(self, field)
    }

    fn visit_raw_field(&mut self, _field: &RawField) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_column_builder_field(&mut self, field: &ColumnBuilderField) -> Result<(), Infallible> {
        let column = &field.column;
        let problem = match column.table() {
            Some(table) => match self.out_of_scope(&**column) {
                Some(problem) => problem,
                None => {
                    self.referenced
                        .insert(ReferencedObject::Column(column.clone()));
                    self.reference_schema(table.schema());
                    return Ok(());
                }
            },
            None => "has been removed",
        };
        self.reject(
            Expr::ColumnBuilder(field.clone()),
            format!("column {} {problem}", column.name()),
        )
    }

    fn visit_excluded_field(&mut self, _field: &ExcludedField) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_all_fields(&mut self, fields: &AllFields) -> Result<(), Infallible> {
        visit::walk_all_fields(self, fields)
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

    fn visit_aggregate(&mut self, function: &AggregateFunction) -> Result<(), Infallible> {
        visit::walk_aggregate(self, function)
    }

    fn visit_window_function(&mut self, function: &WindowFunction) -> Result<(), Infallible> {
        visit::walk_window_function(self, function)
    }

    fn visit_subquery(&mut self, subquery: &Subquery) -> Result<(), Infallible> {
        visit::walk_subquery(self, subquery)
    }

    // ==================== Record sets ====================

    fn visit_raw_record_set(&mut self, _record_set: &RawRecordSet) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_table(&mut self, table: &Arc<Table>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::Table(Arc::clone(table)),
            format!(
                "table {}.{} is finalized; only table builders can be referenced",
                table.schema, table.name
            ),
        )
    }

    fn visit_view(&mut self, view: &Arc<View>) -> Result<(), Infallible> {
        self.reject(
            RecordSet::View(Arc::clone(view)),
            format!(
                "view {}.{} is finalized; only view builders can be referenced",
                view.schema, view.name
            ),
        )
    }

    fn visit_table_builder(&mut self, table: &TableBuilderRef) -> Result<(), Infallible> {
        match self.out_of_scope(&**table) {
            Some(problem) => self.reject(
                RecordSet::TableBuilder(table.clone()),
                format!("table {} {problem}", table.name()),
            ),
            None => {
                self.referenced.insert(ReferencedObject::Table(table.clone()));
                self.reference_schema(table.schema());
                Ok(())
            }
        }
    }

    fn visit_view_builder(&mut self, view: &ViewBuilderRef) -> Result<(), Infallible> {
        match self.out_of_scope(&**view) {
            Some(problem) => self.reject(
                RecordSet::ViewBuilder(view.clone()),
                format!("view {} {problem}", view.name()),
            ),
            None => {
                self.referenced.insert(ReferencedObject::View(view.clone()));
                self.reference_schema(view.schema());
                Ok(())
            }
        }
    }

    // Defined in the same batch; its body is checked where it is created.
    fn visit_new_table(&mut self, _table: &Arc<TableDefinition>) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_aliased(&mut self, record_set: &AliasedRecordSet) -> Result<(), Infallible> {
        visit::walk_aliased(self, record_set)
    }

    fn visit_query_record_set(&mut self, record_set: &QueryRecordSet) -> Result<(), Infallible> {
        visit::walk_query_record_set(self, record_set)
    }

    // The body is walked where the CTE is declared.
    fn visit_cte_reference(&mut self, _cte: &Arc<CommonTableExpression>) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_join(&mut self, join: &Join) -> Result<(), Infallible> {
        visit::walk_join(self, join)
    }

    fn visit_data_source(&mut self, source: &DataSource) -> Result<(), Infallible> {
        visit::walk_data_source(self, source)
    }

    // ==================== Traits ====================

    fn visit_with(&mut self, with: &WithClause) -> Result<(), Infallible> {
        visit::walk_with(self, with)
    }

    fn visit_distinct(&mut self, distinct: &Distinct) -> Result<(), Infallible> {
        visit::walk_distinct(self, distinct)
    }

    fn visit_filter(&mut self, filter: &Filter) -> Result<(), Infallible> {
        visit::walk_filter(self, filter)
    }

    fn visit_group_by(&mut self, group_by: &GroupBy) -> Result<(), Infallible> {
        visit::walk_group_by(self, group_by)
    }

    fn visit_having(&mut self, having: &Having) -> Result<(), Infallible> {
        visit::walk_having(self, having)
    }

    fn visit_window_clause(&mut self, window: &WindowClause) -> Result<(), Infallible> {
        visit::walk_window_clause(self, window)
    }

    fn visit_order_by(&mut self, order_by: &OrderBy) -> Result<(), Infallible> {
        visit::walk_order_by(self, order_by)
    }

    fn visit_limit(&mut self, limit: &Limit) -> Result<(), Infallible> {
        visit::walk_limit(self, limit)
    }

    fn visit_offset(&mut self, offset: &Offset) -> Result<(), Infallible> {
        visit::walk_offset(self, offset)
    }

    // ==================== Queries ====================

    fn visit_raw_query(&mut self, _query: &RawQuery) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_select(&mut self, query: &SelectQuery) -> Result<(), Infallible> {
        visit::walk_select(self, query)
    }

    fn visit_compound(&mut self, query: &CompoundQuery) -> Result<(), Infallible> {
        visit::walk_compound(self, query)
    }

    // ==================== Statements ====================

    fn visit_insert(&mut self, insert: &Insert) -> Result<(), Infallible> {
        visit::walk_insert(self, insert)
    }

    fn visit_upsert(&mut self, upsert: &Upsert) -> Result<(), Infallible> {
        visit::walk_upsert(self, upsert)
    }

    fn visit_update(&mut self, update: &Update) -> Result<(), Infallible> {
        visit::walk_update(self, update)
    }

    fn visit_delete(&mut self, delete: &Delete) -> Result<(), Infallible> {
        visit::walk_delete(self, delete)
    }

    fn visit_truncate(&mut self, truncate: &Truncate) -> Result<(), Infallible> {
        visit::walk_truncate(self, truncate)
    }

    fn visit_raw_statement(&mut self, _statement: &RawStatement) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_create_table(&mut self, statement: &CreateTable) -> Result<(), Infallible> {
        visit::walk_table_definition(self, &statement.table)
    }

    fn visit_drop_table(&mut self, statement: &DropTable) -> Result<(), Infallible> {
        statement.table.accept(self)
    }

    fn visit_rename_table(&mut self, statement: &RenameTable) -> Result<(), Infallible> {
        statement.table.accept(self)
    }

    fn visit_add_column(&mut self, statement: &AddColumn) -> Result<(), Infallible> {
        statement.table.accept(self)?;
        statement.column.accept(self)
    }

    fn visit_drop_column(&mut self, statement: &DropColumn) -> Result<(), Infallible> {
        statement.table.accept(self)
    }

    fn visit_rename_column(&mut self, statement: &RenameColumn) -> Result<(), Infallible> {
        statement.table.accept(self)
    }

    fn visit_alter_column(&mut self, statement: &AlterColumn) -> Result<(), Infallible> {
        visit::walk_alter_column(self, statement)
    }

    fn visit_add_constraint(&mut self, statement: &AddConstraint) -> Result<(), Infallible> {
        statement.table.accept(self)?;
        visit::walk_table_constraint(self, &statement.constraint)
    }

    fn visit_drop_constraint(&mut self, statement: &DropConstraint) -> Result<(), Infallible> {
        statement.table.accept(self)
    }

    fn visit_create_view(&mut self, statement: &CreateView) -> Result<(), Infallible> {
        statement.view.accept(self)?;
        statement.query.accept(self)
    }

    fn visit_drop_view(&mut self, statement: &DropView) -> Result<(), Infallible> {
        statement.view.accept(self)
    }

    fn visit_create_index(&mut self, statement: &CreateIndex) -> Result<(), Infallible> {
        visit::walk_create_index(self, statement)
    }

    fn visit_drop_index(&mut self, _statement: &DropIndex) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_create_schema(&mut self, _statement: &CreateSchema) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_drop_schema(&mut self, _statement: &DropSchema) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_begin(&mut self, _statement: &Begin) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_commit(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_rollback(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_savepoint(&mut self, _statement: &Savepoint) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_release_savepoint(&mut self, _statement: &ReleaseSavepoint) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_rollback_to_savepoint(
        &mut self,
        _statement: &RollbackToSavepoint,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_column_definition(&mut self, column: &ColumnDefinition) -> Result<(), Infallible> {
        visit::walk_column_definition(self, column)
    }

    fn visit_custom(&mut self, _node: &CustomNodeRef) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::memory::MemoryDatabase;

    #[test]
    fn test_live_column_is_referenced() {
        let db = MemoryDatabase::new();
        let public = db.add_schema("public");
        let column = public.add_table("t").add_column("a");

        let mut validator = SchemaScopeExpressionValidator::new(public.clone().into());
        validator.check_expr(&Expr::column_builder(column.clone().into()));

        assert!(validator.errors().is_empty());
        assert_eq!(validator.referenced().len(), 1);
        assert!(validator
            .referenced()
            .contains(&ReferencedObject::Column(column.into())));
    }

    #[test]
    fn test_removed_column_is_rejected() {
        let db = MemoryDatabase::new();
        let public = db.add_schema("public");
        let table = public.add_table("t");
        let column = table.add_column("a");
        table.remove_column("a");

        let mut validator = SchemaScopeExpressionValidator::new(public.into());
        validator.check_expr(&Expr::column_builder(column.into()));

        assert_eq!(validator.errors().len(), 1);
        assert_eq!(validator.errors()[0].message, "column a has been removed");
        assert!(validator.referenced().is_empty());
    }

    #[test]
    fn test_foreign_schema_is_referenced_once() {
        let db = MemoryDatabase::new();
        let public = db.add_schema("public");
        let audit = db.add_schema("audit");
        let log = audit.add_table("log");
        let a = log.add_column("a");
        let b = log.add_column("b");

        let mut validator = SchemaScopeExpressionValidator::new(public.into());
        validator.check_expr(
            &Expr::column_builder(a.into()).eq(Expr::column_builder(b.into())),
        );

        let (errors, referenced) = validator.finish();
        assert!(errors.is_empty());
        assert_eq!(referenced.len(), 3);
        assert!(matches!(
            referenced.iter().nth(1),
            Some(ReferencedObject::Schema(s)) if s.name() == "audit"
        ));
    }

    #[test]
    fn test_finalized_table_is_rejected() {
        let db = MemoryDatabase::new();
        let public = db.add_schema("public");
        let t = RecordSet::table(Table::new("public", "t"));

        let mut validator = SchemaScopeExpressionValidator::new(public.into());
        validator.check_expr(&t.field("a"));
        assert_eq!(validator.errors().len(), 1);
        assert!(validator.referenced().is_empty());
    }
}
