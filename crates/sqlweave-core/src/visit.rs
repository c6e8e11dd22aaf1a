//! Visitor protocol.
//!
//! [`NodeVisitor`] has exactly one method per node kind and no default
//! implementations, so adding a node kind fails to compile until every
//! visitor handles it. Nodes dispatch to the matching method through
//! `accept`.
//!
//! The `walk_*` functions visit the children of a composite node in
//! rendering order. A visitor calls them from its own methods when it
//! wants to descend.

use std::sync::Arc;

use crate::ast::{
    AddColumn, AddConstraint, AggregateFunction, AliasedRecordSet, AllFields, AlterColumn,
    AlterColumnChange, ArithmeticExpr, Begin, Between, BitwiseExpr, CaseExpr, CastExpr,
    ColumnBuilderField, CommonTableExpression, Comparison, CompoundQuery, ConflictAction,
    CreateIndex, CreateSchema, CreateTable, CreateView, CustomNodeRef, DataSource, Delete,
    Distinct, DropColumn, DropConstraint, DropIndex, DropSchema, DropTable, DropView,
    ExcludedField, Exists, Expr, Field, Filter, GroupBy, Having, InList, InQuery, Insert,
    InsertSource, IsNull, Join, Like, Limit, Literal, LogicalCondition, Node, NotCondition,
    Offset, OrderBy, OrderItem, Parameter, Query, QueryRecordSet, QueryTrait, RawField,
    RawQuery, RawRecordSet, RawStatement, RecordSet, ReleaseSavepoint, RenameColumn,
    RenameTable, RollbackToSavepoint, Savepoint, ScalarFunction, SelectItem, SelectQuery,
    Statement, Subquery, TraitChain, Truncate, UnaryExpr, Update, Upsert, WindowClause,
    WindowDefinition, WindowFunction, WithClause,
};
use crate::schema::{
    ColumnDefinition, KeyPart, Table, TableBuilderRef, TableConstraint, TableDefinition, View,
    ViewBuilderRef,
};

/// A visitor over every node kind.
pub trait NodeVisitor {
    /// Error aborting the walk.
    type Error;

    // ==================== Expressions ====================

    /// `NULL`.
    fn visit_null(&mut self) -> Result<(), Self::Error>;
    /// `TRUE` / `FALSE`.
    fn visit_boolean(&mut self, value: bool) -> Result<(), Self::Error>;
    fn visit_literal(&mut self, literal: &Literal) -> Result<(), Self::Error>;
    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), Self::Error>;
    fn visit_field(&mut self, field: &Field) -> Result<(), Self::Error>;
    fn visit_raw_field(&mut self, field: &RawField) -> Result<(), Self::Error>;
    fn visit_column_builder_field(&mut self, field: &ColumnBuilderField)
        -> Result<(), Self::Error>;
    fn visit_excluded_field(&mut self, field: &ExcludedField) -> Result<(), Self::Error>;
    fn visit_all_fields(&mut self, fields: &AllFields) -> Result<(), Self::Error>;
    fn visit_unary(&mut self, expr: &UnaryExpr) -> Result<(), Self::Error>;
    fn visit_arithmetic(&mut self, expr: &ArithmeticExpr) -> Result<(), Self::Error>;
    fn visit_bitwise(&mut self, expr: &BitwiseExpr) -> Result<(), Self::Error>;
    fn visit_comparison(&mut self, condition: &Comparison) -> Result<(), Self::Error>;
    fn visit_logical(&mut self, condition: &LogicalCondition) -> Result<(), Self::Error>;
    fn visit_not(&mut self, condition: &NotCondition) -> Result<(), Self::Error>;
    fn visit_is_null(&mut self, condition: &IsNull) -> Result<(), Self::Error>;
    fn visit_like(&mut self, condition: &Like) -> Result<(), Self::Error>;
    fn visit_in_list(&mut self, condition: &InList) -> Result<(), Self::Error>;
    fn visit_in_query(&mut self, condition: &InQuery) -> Result<(), Self::Error>;
    fn visit_between(&mut self, condition: &Between) -> Result<(), Self::Error>;
    fn visit_exists(&mut self, condition: &Exists) -> Result<(), Self::Error>;
    fn visit_case(&mut self, expr: &CaseExpr) -> Result<(), Self::Error>;
    fn visit_cast(&mut self, expr: &CastExpr) -> Result<(), Self::Error>;
    fn visit_function(&mut self, function: &ScalarFunction) -> Result<(), Self::Error>;
    fn visit_aggregate(&mut self, function: &AggregateFunction) -> Result<(), Self::Error>;
    fn visit_window_function(&mut self, function: &WindowFunction) -> Result<(), Self::Error>;
    fn visit_subquery(&mut self, subquery: &Subquery) -> Result<(), Self::Error>;

    // ==================== Record sets ====================

    fn visit_raw_record_set(&mut self, record_set: &RawRecordSet) -> Result<(), Self::Error>;
    /// A finalized table.
    fn visit_table(&mut self, table: &Arc<Table>) -> Result<(), Self::Error>;
    /// A finalized view.
    fn visit_view(&mut self, view: &Arc<View>) -> Result<(), Self::Error>;
    fn visit_table_builder(&mut self, table: &TableBuilderRef) -> Result<(), Self::Error>;
    fn visit_view_builder(&mut self, view: &ViewBuilderRef) -> Result<(), Self::Error>;
    /// A table defined in the same batch, used as a record set.
    fn visit_new_table(&mut self, table: &Arc<TableDefinition>) -> Result<(), Self::Error>;
    fn visit_aliased(&mut self, record_set: &AliasedRecordSet) -> Result<(), Self::Error>;
    fn visit_query_record_set(&mut self, record_set: &QueryRecordSet) -> Result<(), Self::Error>;
    /// A reference to a CTE by name.
    fn visit_cte_reference(&mut self, cte: &Arc<CommonTableExpression>) -> Result<(), Self::Error>;
    fn visit_join(&mut self, join: &Join) -> Result<(), Self::Error>;
    fn visit_data_source(&mut self, source: &DataSource) -> Result<(), Self::Error>;

    // ==================== Traits ====================

    fn visit_with(&mut self, with: &WithClause) -> Result<(), Self::Error>;
    fn visit_distinct(&mut self, distinct: &Distinct) -> Result<(), Self::Error>;
    fn visit_filter(&mut self, filter: &Filter) -> Result<(), Self::Error>;
    fn visit_group_by(&mut self, group_by: &GroupBy) -> Result<(), Self::Error>;
    fn visit_having(&mut self, having: &Having) -> Result<(), Self::Error>;
    fn visit_window_clause(&mut self, window: &WindowClause) -> Result<(), Self::Error>;
    fn visit_order_by(&mut self, order_by: &OrderBy) -> Result<(), Self::Error>;
    fn visit_limit(&mut self, limit: &Limit) -> Result<(), Self::Error>;
    fn visit_offset(&mut self, offset: &Offset) -> Result<(), Self::Error>;

    // ==================== Queries ====================

    fn visit_raw_query(&mut self, query: &RawQuery) -> Result<(), Self::Error>;
    fn visit_select(&mut self, query: &SelectQuery) -> Result<(), Self::Error>;
    fn visit_compound(&mut self, query: &CompoundQuery) -> Result<(), Self::Error>;

    // ==================== Statements ====================

    fn visit_insert(&mut self, insert: &Insert) -> Result<(), Self::Error>;
    fn visit_upsert(&mut self, upsert: &Upsert) -> Result<(), Self::Error>;
    fn visit_update(&mut self, update: &Update) -> Result<(), Self::Error>;
    fn visit_delete(&mut self, delete: &Delete) -> Result<(), Self::Error>;
    fn visit_truncate(&mut self, truncate: &Truncate) -> Result<(), Self::Error>;
    fn visit_raw_statement(&mut self, statement: &RawStatement) -> Result<(), Self::Error>;
    fn visit_create_table(&mut self, statement: &CreateTable) -> Result<(), Self::Error>;
    fn visit_drop_table(&mut self, statement: &DropTable) -> Result<(), Self::Error>;
    fn visit_rename_table(&mut self, statement: &RenameTable) -> Result<(), Self::Error>;
    fn visit_add_column(&mut self, statement: &AddColumn) -> Result<(), Self::Error>;
    fn visit_drop_column(&mut self, statement: &DropColumn) -> Result<(), Self::Error>;
    fn visit_rename_column(&mut self, statement: &RenameColumn) -> Result<(), Self::Error>;
    fn visit_alter_column(&mut self, statement: &AlterColumn) -> Result<(), Self::Error>;
    fn visit_add_constraint(&mut self, statement: &AddConstraint) -> Result<(), Self::Error>;
    fn visit_drop_constraint(&mut self, statement: &DropConstraint) -> Result<(), Self::Error>;
    fn visit_create_view(&mut self, statement: &CreateView) -> Result<(), Self::Error>;
    fn visit_drop_view(&mut self, statement: &DropView) -> Result<(), Self::Error>;
    fn visit_create_index(&mut self, statement: &CreateIndex) -> Result<(), Self::Error>;
    fn visit_drop_index(&mut self, statement: &DropIndex) -> Result<(), Self::Error>;
    fn visit_create_schema(&mut self, statement: &CreateSchema) -> Result<(), Self::Error>;
    fn visit_drop_schema(&mut self, statement: &DropSchema) -> Result<(), Self::Error>;
    fn visit_begin(&mut self, statement: &Begin) -> Result<(), Self::Error>;
    fn visit_commit(&mut self) -> Result<(), Self::Error>;
    fn visit_rollback(&mut self) -> Result<(), Self::Error>;
    fn visit_savepoint(&mut self, statement: &Savepoint) -> Result<(), Self::Error>;
    fn visit_release_savepoint(&mut self, statement: &ReleaseSavepoint)
        -> Result<(), Self::Error>;
    fn visit_rollback_to_savepoint(
        &mut self,
        statement: &RollbackToSavepoint,
    ) -> Result<(), Self::Error>;

    // ==================== Other ====================

    fn visit_column_definition(&mut self, column: &ColumnDefinition) -> Result<(), Self::Error>;
    /// The open extension node, in any position.
    fn visit_custom(&mut self, node: &CustomNodeRef) -> Result<(), Self::Error>;
}

// =============================================================================
// Dispatch
// =============================================================================

impl Expr {
    /// Dispatches to the visitor method of this expression kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::Null => visitor.visit_null(),
            Self::Boolean(value) => visitor.visit_boolean(*value),
            Self::Literal(literal) => visitor.visit_literal(literal),
            Self::Parameter(parameter) => visitor.visit_parameter(parameter),
            Self::Field(field) => visitor.visit_field(field),
            Self::RawField(field) => visitor.visit_raw_field(field),
            Self::ColumnBuilder(field) => visitor.visit_column_builder_field(field),
            Self::Excluded(field) => visitor.visit_excluded_field(field),
            Self::All(fields) => visitor.visit_all_fields(fields),
            Self::Unary(expr) => visitor.visit_unary(expr),
            Self::Arithmetic(expr) => visitor.visit_arithmetic(expr),
            Self::Bitwise(expr) => visitor.visit_bitwise(expr),
            Self::Comparison(condition) => visitor.visit_comparison(condition),
            Self::Logical(condition) => visitor.visit_logical(condition),
            Self::Not(condition) => visitor.visit_not(condition),
            Self::IsNull(condition) => visitor.visit_is_null(condition),
            Self::Like(condition) => visitor.visit_like(condition),
            Self::InList(condition) => visitor.visit_in_list(condition),
            Self::InQuery(condition) => visitor.visit_in_query(condition),
            Self::Between(condition) => visitor.visit_between(condition),
            Self::Exists(condition) => visitor.visit_exists(condition),
            Self::Case(expr) => visitor.visit_case(expr),
            Self::Cast(expr) => visitor.visit_cast(expr),
            Self::Function(function) => visitor.visit_function(function),
            Self::Aggregate(function) => visitor.visit_aggregate(function),
            Self::Window(function) => visitor.visit_window_function(function),
            Self::Subquery(subquery) => visitor.visit_subquery(subquery),
            Self::Custom(node) => visitor.visit_custom(node),
        }
    }
}

impl RecordSet {
    /// Dispatches to the visitor method of this record set kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::Raw(raw) => visitor.visit_raw_record_set(raw),
            Self::Table(table) => visitor.visit_table(table),
            Self::View(view) => visitor.visit_view(view),
            Self::TableBuilder(table) => visitor.visit_table_builder(table),
            Self::ViewBuilder(view) => visitor.visit_view_builder(view),
            Self::NewTable(table) => visitor.visit_new_table(table),
            Self::Aliased(aliased) => visitor.visit_aliased(aliased),
            Self::Query(query) => visitor.visit_query_record_set(query),
            Self::Cte(cte) => visitor.visit_cte_reference(cte),
        }
    }
}

impl Join {
    /// Dispatches to [`NodeVisitor::visit_join`].
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_join(self)
    }
}

impl DataSource {
    /// Dispatches to [`NodeVisitor::visit_data_source`].
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_data_source(self)
    }
}

impl QueryTrait {
    /// Dispatches to the visitor method of this trait kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::With(with) => visitor.visit_with(with),
            Self::Distinct(distinct) => visitor.visit_distinct(distinct),
            Self::Filter(filter) => visitor.visit_filter(filter),
            Self::GroupBy(group_by) => visitor.visit_group_by(group_by),
            Self::Having(having) => visitor.visit_having(having),
            Self::Window(window) => visitor.visit_window_clause(window),
            Self::OrderBy(order_by) => visitor.visit_order_by(order_by),
            Self::Limit(limit) => visitor.visit_limit(limit),
            Self::Offset(offset) => visitor.visit_offset(offset),
        }
    }
}

impl Query {
    /// Dispatches to the visitor method of this query kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::Raw(query) => visitor.visit_raw_query(query),
            Self::Select(query) => visitor.visit_select(query),
            Self::Compound(query) => visitor.visit_compound(query),
        }
    }
}

impl Statement {
    /// Dispatches to the visitor method of this statement kind.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::Insert(s) => visitor.visit_insert(s),
            Self::Upsert(s) => visitor.visit_upsert(s),
            Self::Update(s) => visitor.visit_update(s),
            Self::Delete(s) => visitor.visit_delete(s),
            Self::Truncate(s) => visitor.visit_truncate(s),
            Self::Raw(s) => visitor.visit_raw_statement(s),
            Self::CreateTable(s) => visitor.visit_create_table(s),
            Self::DropTable(s) => visitor.visit_drop_table(s),
            Self::RenameTable(s) => visitor.visit_rename_table(s),
            Self::AddColumn(s) => visitor.visit_add_column(s),
            Self::DropColumn(s) => visitor.visit_drop_column(s),
            Self::RenameColumn(s) => visitor.visit_rename_column(s),
            Self::AlterColumn(s) => visitor.visit_alter_column(s),
            Self::AddConstraint(s) => visitor.visit_add_constraint(s),
            Self::DropConstraint(s) => visitor.visit_drop_constraint(s),
            Self::CreateView(s) => visitor.visit_create_view(s),
            Self::DropView(s) => visitor.visit_drop_view(s),
            Self::CreateIndex(s) => visitor.visit_create_index(s),
            Self::DropIndex(s) => visitor.visit_drop_index(s),
            Self::CreateSchema(s) => visitor.visit_create_schema(s),
            Self::DropSchema(s) => visitor.visit_drop_schema(s),
            Self::Begin(s) => visitor.visit_begin(s),
            Self::Commit => visitor.visit_commit(),
            Self::Rollback => visitor.visit_rollback(),
            Self::Savepoint(s) => visitor.visit_savepoint(s),
            Self::ReleaseSavepoint(s) => visitor.visit_release_savepoint(s),
            Self::RollbackToSavepoint(s) => visitor.visit_rollback_to_savepoint(s),
            Self::Custom(node) => visitor.visit_custom(node),
        }
    }
}

impl ColumnDefinition {
    /// Dispatches to [`NodeVisitor::visit_column_definition`].
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_column_definition(self)
    }
}

impl Node {
    /// Dispatches to the visitor method of the wrapped node.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Self::Expr(node) => node.accept(visitor),
            Self::RecordSet(node) => node.accept(visitor),
            Self::Join(node) => node.accept(visitor),
            Self::DataSource(node) => node.accept(visitor),
            Self::Trait(node) => node.accept(visitor),
            Self::Query(node) => node.accept(visitor),
            Self::Statement(node) => node.accept(visitor),
            Self::ColumnDefinition(node) => node.accept(visitor),
            Self::Custom(node) => visitor.visit_custom(node),
        }
    }
}

// =============================================================================
// Walking
// =============================================================================

fn walk_exprs<'a, V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    exprs: impl IntoIterator<Item = &'a Expr>,
) -> Result<(), V::Error> {
    for expr in exprs {
        expr.accept(visitor)?;
    }
    Ok(())
}

fn walk_order_items<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    items: &[OrderItem],
) -> Result<(), V::Error> {
    walk_exprs(visitor, items.iter().map(|item| &item.expr))
}

fn walk_select_items<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    items: &[SelectItem],
) -> Result<(), V::Error> {
    walk_exprs(visitor, items.iter().map(|item| &item.expr))
}

/// Visits every trait of a chain in insertion order.
pub fn walk_traits<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    traits: &TraitChain,
) -> Result<(), V::Error> {
    for query_trait in traits {
        query_trait.accept(visitor)?;
    }
    Ok(())
}

/// Visits the record set of a field.
pub fn walk_field<V: NodeVisitor + ?Sized>(visitor: &mut V, field: &Field) -> Result<(), V::Error> {
    field.record_set.accept(visitor)
}

/// Visits the qualifying record set of `set.*`.
pub fn walk_all_fields<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    fields: &AllFields,
) -> Result<(), V::Error> {
    match &fields.record_set {
        Some(record_set) => record_set.accept(visitor),
        None => Ok(()),
    }
}

/// Visits the operand.
pub fn walk_unary<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    expr: &UnaryExpr,
) -> Result<(), V::Error> {
    expr.operand.accept(visitor)
}

/// Visits both operands.
pub fn walk_arithmetic<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    expr: &ArithmeticExpr,
) -> Result<(), V::Error> {
    expr.left.accept(visitor)?;
    expr.right.accept(visitor)
}

/// Visits both operands.
pub fn walk_bitwise<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    expr: &BitwiseExpr,
) -> Result<(), V::Error> {
    expr.left.accept(visitor)?;
    expr.right.accept(visitor)
}

/// Visits both operands.
pub fn walk_comparison<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &Comparison,
) -> Result<(), V::Error> {
    condition.left.accept(visitor)?;
    condition.right.accept(visitor)
}

/// Visits every operand.
pub fn walk_logical<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &LogicalCondition,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &condition.operands)
}

/// Visits the operand.
pub fn walk_not<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &NotCondition,
) -> Result<(), V::Error> {
    condition.operand.accept(visitor)
}

/// Visits the tested expression.
pub fn walk_is_null<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &IsNull,
) -> Result<(), V::Error> {
    condition.expr.accept(visitor)
}

/// Visits the tested expression and the pattern.
pub fn walk_like<V: NodeVisitor + ?Sized>(visitor: &mut V, condition: &Like) -> Result<(), V::Error> {
    condition.expr.accept(visitor)?;
    condition.pattern.accept(visitor)
}

/// Visits the tested expression and every candidate.
pub fn walk_in_list<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &InList,
) -> Result<(), V::Error> {
    condition.expr.accept(visitor)?;
    walk_exprs(visitor, &condition.list)
}

/// Visits the tested expression and the subquery.
pub fn walk_in_query<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &InQuery,
) -> Result<(), V::Error> {
    condition.expr.accept(visitor)?;
    condition.query.accept(visitor)
}

/// Visits the tested expression and both bounds.
pub fn walk_between<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &Between,
) -> Result<(), V::Error> {
    condition.expr.accept(visitor)?;
    condition.low.accept(visitor)?;
    condition.high.accept(visitor)
}

/// Visits the subquery.
pub fn walk_exists<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    condition: &Exists,
) -> Result<(), V::Error> {
    condition.query.accept(visitor)
}

/// Visits the operand, every branch and the ELSE result.
pub fn walk_case<V: NodeVisitor + ?Sized>(visitor: &mut V, expr: &CaseExpr) -> Result<(), V::Error> {
    if let Some(operand) = &expr.operand {
        operand.accept(visitor)?;
    }
    for branch in &expr.branches {
        branch.when.accept(visitor)?;
        branch.then.accept(visitor)?;
    }
    if let Some(otherwise) = &expr.otherwise {
        otherwise.accept(visitor)?;
    }
    Ok(())
}

/// Visits the converted value.
pub fn walk_cast<V: NodeVisitor + ?Sized>(visitor: &mut V, expr: &CastExpr) -> Result<(), V::Error> {
    expr.expr.accept(visitor)
}

/// Visits every argument.
pub fn walk_function<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    function: &ScalarFunction,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &function.arguments)
}

/// Visits every argument, then the traits.
pub fn walk_aggregate<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    function: &AggregateFunction,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &function.arguments)?;
    walk_traits(visitor, &function.traits)
}

/// Visits every argument, the partition keys, then the traits.
pub fn walk_window_function<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    function: &WindowFunction,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &function.arguments)?;
    walk_exprs(visitor, &function.partition_by)?;
    walk_traits(visitor, &function.traits)
}

/// Visits the subquery.
pub fn walk_subquery<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    subquery: &Subquery,
) -> Result<(), V::Error> {
    subquery.query.accept(visitor)
}

/// Visits the underlying record set.
pub fn walk_aliased<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    record_set: &AliasedRecordSet,
) -> Result<(), V::Error> {
    record_set.inner.accept(visitor)
}

/// Visits the subquery.
pub fn walk_query_record_set<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    record_set: &QueryRecordSet,
) -> Result<(), V::Error> {
    record_set.query.accept(visitor)
}

/// Visits the columns, primary key expressions and constraints of a table
/// definition.
pub fn walk_table_definition<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    table: &TableDefinition,
) -> Result<(), V::Error> {
    for column in &table.columns {
        column.accept(visitor)?;
    }
    if let Some(primary_key) = &table.primary_key {
        for part in &primary_key.parts {
            if let KeyPart::Expression(expr) = part {
                expr.accept(visitor)?;
            }
        }
    }
    for constraint in &table.constraints {
        walk_table_constraint(visitor, constraint)?;
    }
    Ok(())
}

/// Visits the expressions and referenced table of a constraint.
pub fn walk_table_constraint<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    constraint: &TableConstraint,
) -> Result<(), V::Error> {
    match constraint {
        TableConstraint::PrimaryKey(primary_key) => {
            for part in &primary_key.parts {
                if let KeyPart::Expression(expr) = part {
                    expr.accept(visitor)?;
                }
            }
            Ok(())
        }
        TableConstraint::Unique { .. } => Ok(()),
        TableConstraint::ForeignKey(foreign_key) => foreign_key.references.accept(visitor),
        TableConstraint::Check { condition, .. } => condition.accept(visitor),
    }
}

/// Visits the default and generation expressions of a column.
pub fn walk_column_definition<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    column: &ColumnDefinition,
) -> Result<(), V::Error> {
    if let Some(default) = &column.default {
        default.accept(visitor)?;
    }
    if let Some(computed) = &column.computed {
        computed.expr.accept(visitor)?;
    }
    Ok(())
}

/// Visits the joined record set and the join condition.
pub fn walk_join<V: NodeVisitor + ?Sized>(visitor: &mut V, join: &Join) -> Result<(), V::Error> {
    join.record_set.accept(visitor)?;
    match &join.on {
        Some(on) => on.accept(visitor),
        None => Ok(()),
    }
}

/// Visits the first record set, every join, then the traits.
pub fn walk_data_source<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    source: &DataSource,
) -> Result<(), V::Error> {
    source.record_set.accept(visitor)?;
    for join in &source.joins {
        join.accept(visitor)?;
    }
    walk_traits(visitor, &source.traits)
}

/// Visits the body of every declared CTE.
pub fn walk_with<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    with: &WithClause,
) -> Result<(), V::Error> {
    for cte in &with.ctes {
        cte.query.accept(visitor)?;
    }
    Ok(())
}

/// Visits the `DISTINCT ON` expressions.
pub fn walk_distinct<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    distinct: &Distinct,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &distinct.on)
}

/// Visits the condition.
pub fn walk_filter<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    filter: &Filter,
) -> Result<(), V::Error> {
    filter.condition.accept(visitor)
}

/// Visits the grouping keys.
pub fn walk_group_by<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    group_by: &GroupBy,
) -> Result<(), V::Error> {
    walk_exprs(visitor, &group_by.exprs)
}

/// Visits the condition.
pub fn walk_having<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    having: &Having,
) -> Result<(), V::Error> {
    having.condition.accept(visitor)
}

/// Visits the partition keys and sort keys of every window definition.
pub fn walk_window_clause<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    window: &WindowClause,
) -> Result<(), V::Error> {
    for WindowDefinition {
        partition_by,
        order_by,
        ..
    } in &window.definitions
    {
        walk_exprs(visitor, partition_by)?;
        walk_order_items(visitor, order_by)?;
    }
    Ok(())
}

/// Visits the sort keys.
pub fn walk_order_by<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    order_by: &OrderBy,
) -> Result<(), V::Error> {
    walk_order_items(visitor, &order_by.items)
}

/// Visits the row count.
pub fn walk_limit<V: NodeVisitor + ?Sized>(visitor: &mut V, limit: &Limit) -> Result<(), V::Error> {
    limit.count.accept(visitor)
}

/// Visits the row count.
pub fn walk_offset<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    offset: &Offset,
) -> Result<(), V::Error> {
    offset.count.accept(visitor)
}

/// Visits the selection, then the data source.
pub fn walk_select<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    query: &SelectQuery,
) -> Result<(), V::Error> {
    walk_select_items(visitor, &query.selection)?;
    query.source.accept(visitor)
}

/// Visits every operand, then the traits.
pub fn walk_compound<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    query: &CompoundQuery,
) -> Result<(), V::Error> {
    query.first.accept(visitor)?;
    for (_, operand) in &query.rest {
        operand.accept(visitor)?;
    }
    walk_traits(visitor, &query.traits)
}

/// Visits the target, the inserted rows and the RETURNING items.
pub fn walk_insert<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    insert: &Insert,
) -> Result<(), V::Error> {
    insert.target.accept(visitor)?;
    match &insert.source {
        InsertSource::Values(rows) => {
            for row in rows {
                walk_exprs(visitor, row)?;
            }
        }
        InsertSource::Query(query) => query.accept(visitor)?,
        InsertSource::DefaultValues => {}
    }
    walk_select_items(visitor, &insert.returning)
}

/// Visits the insert, then the conflict action.
pub fn walk_upsert<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    upsert: &Upsert,
) -> Result<(), V::Error> {
    walk_insert(visitor, &upsert.insert)?;
    if let ConflictAction::DoUpdate {
        assignments,
        filter,
    } = &upsert.action
    {
        walk_exprs(visitor, assignments.iter().map(|a| &a.value))?;
        if let Some(filter) = filter {
            filter.accept(visitor)?;
        }
    }
    Ok(())
}

/// Visits the data source, the assigned values and the RETURNING items.
pub fn walk_update<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    update: &Update,
) -> Result<(), V::Error> {
    update.source.accept(visitor)?;
    walk_exprs(visitor, update.assignments.iter().map(|a| &a.value))?;
    walk_select_items(visitor, &update.returning)
}

/// Visits the data source and the RETURNING items.
pub fn walk_delete<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    delete: &Delete,
) -> Result<(), V::Error> {
    delete.source.accept(visitor)?;
    walk_select_items(visitor, &delete.returning)
}

/// Visits every truncated table.
pub fn walk_truncate<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    truncate: &Truncate,
) -> Result<(), V::Error> {
    for record_set in &truncate.record_sets {
        record_set.accept(visitor)?;
    }
    Ok(())
}

/// Visits the altered table and the expressions of the change.
pub fn walk_alter_column<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    statement: &AlterColumn,
) -> Result<(), V::Error> {
    statement.table.accept(visitor)?;
    match &statement.change {
        AlterColumnChange::SetDataType {
            using: Some(using), ..
        } => using.accept(visitor),
        AlterColumnChange::SetDefault(default) => default.accept(visitor),
        AlterColumnChange::SetDataType { using: None, .. }
        | AlterColumnChange::SetNullable(_)
        | AlterColumnChange::DropDefault => Ok(()),
    }
}

/// Visits the indexed table, the key expressions and the partial-index
/// condition.
pub fn walk_create_index<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    statement: &CreateIndex,
) -> Result<(), V::Error> {
    statement.table.accept(visitor)?;
    walk_order_items(visitor, &statement.columns)?;
    match &statement.filter {
        Some(filter) => filter.accept(visitor),
        None => Ok(()),
    }
}

/// Visits the body of a CTE.
pub fn walk_cte<V: NodeVisitor + ?Sized>(
    visitor: &mut V,
    cte: &CommonTableExpression,
) -> Result<(), V::Error> {
    cte.query.accept(visitor)
}
