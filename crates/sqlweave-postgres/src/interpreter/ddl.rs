//! Schema-changing statements.

use sqlweave_core::ast::{
    AddColumn, AddConstraint, AlterColumn, AlterColumnChange, CreateIndex, CreateSchema,
    CreateTable, CreateView, DropColumn, DropConstraint, DropIndex, DropSchema, DropTable,
    DropView, Expr, IndexMethod, RecordSet, RenameColumn, RenameTable, Statement,
};
use sqlweave_core::error::InterpretError;
use sqlweave_core::schema::{
    ColumnDefinition, ColumnStorage, ForeignKey, IdentityGeneration, KeyPart, PrimaryKey,
    TableConstraint,
};

use super::{structural, PostgresInterpreter};

const INDENT: &str = "    ";

impl PostgresInterpreter {
    /// Renders the record set an ALTER/DROP statement names, without alias.
    fn ddl_target(
        &mut self,
        table: &RecordSet,
        node: impl FnOnce() -> Statement,
    ) -> Result<(), InterpretError> {
        match table.unaliased() {
            RecordSet::Query(_) | RecordSet::Cte(_) => Err(structural(
                node(),
                "schema statements must name a table or view",
            )),
            target => target.accept(self),
        }
    }

    fn alter_table(
        &mut self,
        table: &RecordSet,
        node: impl FnOnce() -> Statement,
    ) -> Result<(), InterpretError> {
        self.push("ALTER TABLE ");
        self.ddl_target(table, node)?;
        self.push(" ");
        Ok(())
    }

    fn push_if(&mut self, condition: bool, text: &str) {
        if condition {
            self.push(text);
        }
    }

    // ==================== Tables ====================

    pub(super) fn render_create_table(&mut self, statement: &CreateTable) -> Result<(), InterpretError> {
        let table = &statement.table;
        self.push("CREATE ");
        self.push_if(table.temporary, "TEMPORARY ");
        self.push("TABLE ");
        self.push_if(statement.if_not_exists, "IF NOT EXISTS ");
        let name = self.qualified_name(table.schema.as_deref(), &table.name, table.temporary);
        self.push(&name);

        let entries = table.columns.len()
            + usize::from(table.primary_key.is_some())
            + table.constraints.len();
        if entries == 0 {
            self.push(" ()");
            return Ok(());
        }
        self.push(" (\n");
        let mut first = true;
        let mut line = |this: &mut Self| {
            if !std::mem::take(&mut first) {
                this.push(",\n");
            }
            this.push(INDENT);
        };
        for column in &table.columns {
            line(self);
            self.column_definition(column)?;
        }
        if let Some(primary_key) = &table.primary_key {
            line(self);
            self.primary_key(primary_key)?;
        }
        for constraint in &table.constraints {
            line(self);
            self.table_constraint(constraint)?;
        }
        self.push("\n)");
        Ok(())
    }

    /// `"name" TYPE [COLLATE] [GENERATED ...] [NOT NULL] [DEFAULT (...)]`.
    pub(super) fn column_definition(&mut self, column: &ColumnDefinition) -> Result<(), InterpretError> {
        if column.computed.is_some() && (column.identity.is_some() || column.default.is_some()) {
            return Err(structural(
                column.clone(),
                "a generated column cannot also be an identity or have a default",
            ));
        }
        let data_type = match &column.data_type {
            Some(data_type) => data_type.to_sql(),
            None => self.types.data_type(column.logical_type)?.to_sql(),
        };
        self.push_identifier(&column.name);
        self.push(" ");
        self.push(&data_type);
        if let Some(collation) = &column.collation {
            self.push(" COLLATE ");
            self.push_identifier(collation);
        }
        if let Some(computed) = &column.computed {
            self.push(" GENERATED ALWAYS AS (");
            self.unqualified(|this| computed.expr.accept(this))?;
            self.push(")");
            match computed.storage {
                ColumnStorage::Stored => self.push(" STORED"),
                ColumnStorage::Virtual if self.options.explicit_virtual_storage => {
                    self.push(" VIRTUAL");
                }
                ColumnStorage::Virtual => {}
            }
        }
        match column.identity {
            Some(IdentityGeneration::Always) => self.push(" GENERATED ALWAYS AS IDENTITY"),
            Some(IdentityGeneration::ByDefault) => self.push(" GENERATED BY DEFAULT AS IDENTITY"),
            None => {}
        }
        self.push_if(!column.nullable, " NOT NULL");
        if let Some(default) = &column.default {
            self.push(" DEFAULT (");
            self.unqualified(|this| default.accept(this))?;
            self.push(")");
        }
        Ok(())
    }

    fn constraint_name(&mut self, name: Option<&String>) {
        if let Some(name) = name {
            self.push("CONSTRAINT ");
            self.push_identifier(name);
            self.push(" ");
        }
    }

    fn primary_key(&mut self, primary_key: &PrimaryKey) -> Result<(), InterpretError> {
        let mut columns = Vec::with_capacity(primary_key.parts.len());
        for part in &primary_key.parts {
            match part {
                KeyPart::Column(name) => columns.push(name.clone()),
                KeyPart::Expression(expr) => {
                    return Err(structural(
                        expr.clone(),
                        "PostgreSQL primary keys cannot contain expressions",
                    ));
                }
            }
        }
        self.constraint_name(primary_key.name.as_ref());
        self.push("PRIMARY KEY (");
        self.identifiers(&columns);
        self.push(")");
        Ok(())
    }

    fn table_constraint(&mut self, constraint: &TableConstraint) -> Result<(), InterpretError> {
        match constraint {
            TableConstraint::PrimaryKey(primary_key) => self.primary_key(primary_key),
            TableConstraint::Unique { name, columns } => {
                self.constraint_name(name.as_ref());
                self.push("UNIQUE (");
                self.identifiers(columns);
                self.push(")");
                Ok(())
            }
            TableConstraint::ForeignKey(foreign_key) => self.foreign_key(foreign_key),
            TableConstraint::Check { name, condition } => {
                self.constraint_name(name.as_ref());
                self.push("CHECK (");
                self.unqualified(|this| condition.accept(this))?;
                self.push(")");
                Ok(())
            }
        }
    }

    fn foreign_key(&mut self, foreign_key: &ForeignKey) -> Result<(), InterpretError> {
        self.constraint_name(foreign_key.name.as_ref());
        self.push("FOREIGN KEY (");
        self.identifiers(&foreign_key.columns);
        self.push(") REFERENCES ");
        foreign_key.references.unaliased().accept(self)?;
        if !foreign_key.referenced_columns.is_empty() {
            self.push(" (");
            self.identifiers(&foreign_key.referenced_columns);
            self.push(")");
        }
        if let Some(action) = foreign_key.on_delete {
            self.push(" ON DELETE ");
            self.push(action.as_sql());
        }
        if let Some(action) = foreign_key.on_update {
            self.push(" ON UPDATE ");
            self.push(action.as_sql());
        }
        Ok(())
    }

    pub(super) fn render_drop_table(&mut self, statement: &DropTable) -> Result<(), InterpretError> {
        self.push("DROP TABLE ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        self.ddl_target(&statement.table, || Statement::DropTable(statement.clone()))?;
        self.push_if(statement.cascade, " CASCADE");
        Ok(())
    }

    pub(super) fn render_rename_table(&mut self, statement: &RenameTable) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::RenameTable(statement.clone()))?;
        self.push("RENAME TO ");
        self.push_identifier(&statement.new_name);
        Ok(())
    }

    // ==================== Columns and constraints ====================

    pub(super) fn render_add_column(&mut self, statement: &AddColumn) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::AddColumn(statement.clone()))?;
        self.push("ADD COLUMN ");
        self.push_if(statement.if_not_exists, "IF NOT EXISTS ");
        self.column_definition(&statement.column)
    }

    pub(super) fn render_drop_column(&mut self, statement: &DropColumn) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::DropColumn(statement.clone()))?;
        self.push("DROP COLUMN ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        self.push_identifier(&statement.column);
        self.push_if(statement.cascade, " CASCADE");
        Ok(())
    }

    pub(super) fn render_rename_column(&mut self, statement: &RenameColumn) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::RenameColumn(statement.clone()))?;
        self.push("RENAME COLUMN ");
        self.push_identifier(&statement.old_name);
        self.push(" TO ");
        self.push_identifier(&statement.new_name);
        Ok(())
    }

    pub(super) fn render_alter_column(&mut self, statement: &AlterColumn) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::AlterColumn(statement.clone()))?;
        self.push("ALTER COLUMN ");
        self.push_identifier(&statement.column);
        self.push(" ");
        match &statement.change {
            AlterColumnChange::SetDataType { data_type, using } => {
                self.push("TYPE ");
                self.cast_target(data_type)?;
                if let Some(using) = using {
                    self.push(" USING ");
                    self.unqualified(|this| using.accept(this))?;
                }
            }
            AlterColumnChange::SetNullable(true) => self.push("DROP NOT NULL"),
            AlterColumnChange::SetNullable(false) => self.push("SET NOT NULL"),
            AlterColumnChange::SetDefault(default) => {
                self.push("SET DEFAULT ");
                self.unqualified(|this| default.accept(this))?;
            }
            AlterColumnChange::DropDefault => self.push("DROP DEFAULT"),
        }
        Ok(())
    }

    pub(super) fn render_add_constraint(&mut self, statement: &AddConstraint) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::AddConstraint(statement.clone()))?;
        self.push("ADD ");
        self.table_constraint(&statement.constraint)
    }

    pub(super) fn render_drop_constraint(
        &mut self,
        statement: &DropConstraint,
    ) -> Result<(), InterpretError> {
        self.alter_table(&statement.table, || Statement::DropConstraint(statement.clone()))?;
        self.push("DROP CONSTRAINT ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        self.push_identifier(&statement.name);
        self.push_if(statement.cascade, " CASCADE");
        Ok(())
    }

    // ==================== Views ====================

    /// Name of a view target, and whether it is temporary.
    fn view_name(
        &self,
        view: &RecordSet,
        node: impl FnOnce() -> Statement,
    ) -> Result<(String, bool), InterpretError> {
        match view.unaliased() {
            RecordSet::View(view) => Ok((
                self.qualified_name(Some(&view.schema), &view.name, view.temporary),
                view.temporary,
            )),
            RecordSet::ViewBuilder(view) => Ok((
                self.qualified_name(Some(&view.schema().name()), &view.name(), view.is_temporary()),
                view.is_temporary(),
            )),
            RecordSet::Raw(raw) => Ok((raw.sql.clone(), false)),
            _ => Err(structural(node(), "view statements must name a view")),
        }
    }

    pub(super) fn render_create_view(&mut self, statement: &CreateView) -> Result<(), InterpretError> {
        let node = || Statement::CreateView(statement.clone());
        let (name, temporary) = self.view_name(&statement.view, node)?;
        if statement.materialized && (statement.or_replace || temporary) {
            return Err(structural(
                node(),
                "materialized views cannot be OR REPLACE or TEMPORARY",
            ));
        }
        self.push("CREATE ");
        self.push_if(statement.or_replace, "OR REPLACE ");
        self.push_if(temporary, "TEMPORARY ");
        self.push_if(statement.materialized, "MATERIALIZED ");
        self.push("VIEW ");
        self.push(&name);
        if !statement.columns.is_empty() {
            self.push(" (");
            self.identifiers(&statement.columns);
            self.push(")");
        }
        self.push(" AS ");
        statement.query.accept(self)
    }

    pub(super) fn render_drop_view(&mut self, statement: &DropView) -> Result<(), InterpretError> {
        let (name, _) = self.view_name(&statement.view, || Statement::DropView(statement.clone()))?;
        self.push("DROP ");
        self.push_if(statement.materialized, "MATERIALIZED ");
        self.push("VIEW ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        self.push(&name);
        self.push_if(statement.cascade, " CASCADE");
        Ok(())
    }

    // ==================== Indexes and schemas ====================

    pub(super) fn render_create_index(&mut self, statement: &CreateIndex) -> Result<(), InterpretError> {
        let node = || Statement::CreateIndex(statement.clone());
        if statement.columns.is_empty() {
            return Err(structural(node(), "an index needs at least one key"));
        }
        self.push("CREATE ");
        self.push_if(statement.unique, "UNIQUE ");
        self.push("INDEX ");
        self.push_if(statement.concurrently, "CONCURRENTLY ");
        self.push_if(statement.if_not_exists, "IF NOT EXISTS ");
        self.push_identifier(&statement.name);
        self.push(" ON ");
        self.ddl_target(&statement.table, node)?;
        if let Some(method) = statement.method.filter(|m| *m != IndexMethod::BTree) {
            self.push(" USING ");
            self.push(method.as_str());
        }
        self.push(" (");
        self.unqualified(|this| {
            this.separated(&statement.columns, ", ", |this, item| {
                if matches!(
                    item.expr,
                    Expr::Field(_) | Expr::ColumnBuilder(_) | Expr::RawField(_)
                ) {
                    item.expr.accept(this)?;
                } else {
                    this.push("(");
                    item.expr.accept(this)?;
                    this.push(")");
                }
                this.order_suffix(item);
                Ok(())
            })
        })?;
        self.push(")");
        if !statement.include.is_empty() {
            self.push(" INCLUDE (");
            self.identifiers(&statement.include);
            self.push(")");
        }
        if let Some(filter) = &statement.filter {
            self.push(" WHERE ");
            self.unqualified(|this| filter.accept(this))?;
        }
        Ok(())
    }

    pub(super) fn render_drop_index(&mut self, statement: &DropIndex) {
        self.push("DROP INDEX ");
        self.push_if(statement.concurrently, "CONCURRENTLY ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        if let Some(schema) = &statement.schema {
            self.push_identifier(schema);
            self.push(".");
        }
        self.push_identifier(&statement.name);
        self.push_if(statement.cascade, " CASCADE");
    }

    pub(super) fn render_create_schema(&mut self, statement: &CreateSchema) {
        self.push("CREATE SCHEMA ");
        self.push_if(statement.if_not_exists, "IF NOT EXISTS ");
        self.push_identifier(&statement.name);
    }

    pub(super) fn render_drop_schema(&mut self, statement: &DropSchema) {
        self.push("DROP SCHEMA ");
        self.push_if(statement.if_exists, "IF EXISTS ");
        self.push_identifier(&statement.name);
        self.push_if(statement.cascade, " CASCADE");
    }
}
