//! In-memory builder objects.
//!
//! A small schema model implementing the builder capabilities: a database
//! owns schemas, schemas own tables and views, tables own columns.
//! Removing an object marks it (and everything it owns) removed; handles
//! held elsewhere stay valid but report [`SchemaObject::is_removed`].
//!
//! ```
//! use sqlweave_core::schema::memory::MemoryDatabase;
//! use sqlweave_core::schema::SchemaObject;
//!
//! let db = MemoryDatabase::new();
//! let public = db.add_schema("public");
//! let users = public.add_table("users");
//! let id = users.add_column("id");
//! users.set_primary_key(&["id"]);
//!
//! users.remove_column("id");
//! assert!(id.is_removed());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::builder::{
    ColumnBuilder, ColumnBuilderRef, ObjectId, SchemaBuilder, SchemaBuilderRef, SchemaObject,
    TableBuilder, TableBuilderRef, ViewBuilder,
};
use super::table::PrimaryKey;

/// Root of an in-memory schema model.
#[derive(Debug)]
pub struct MemoryDatabase {
    id: ObjectId,
}

impl MemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ObjectId::next(),
        })
    }

    /// Returns the database identity.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Adds a schema.
    #[must_use]
    pub fn add_schema(&self, name: impl Into<String>) -> Arc<MemorySchema> {
        Arc::new(MemorySchema {
            id: ObjectId::next(),
            database_id: self.id,
            name: name.into(),
            removed: AtomicBool::new(false),
        })
    }
}

/// An in-memory schema.
#[derive(Debug)]
pub struct MemorySchema {
    id: ObjectId,
    database_id: ObjectId,
    name: String,
    removed: AtomicBool,
}

impl MemorySchema {
    /// Adds a table.
    #[must_use]
    pub fn add_table(self: &Arc<Self>, name: impl Into<String>) -> Arc<MemoryTable> {
        self.new_table(name.into(), false)
    }

    /// Adds a temporary table.
    #[must_use]
    pub fn add_temporary_table(self: &Arc<Self>, name: impl Into<String>) -> Arc<MemoryTable> {
        self.new_table(name.into(), true)
    }

    fn new_table(self: &Arc<Self>, name: String, temporary: bool) -> Arc<MemoryTable> {
        Arc::new_cyclic(|this| MemoryTable {
            id: ObjectId::next(),
            schema: Arc::clone(self),
            name,
            temporary,
            columns: RwLock::new(Vec::new()),
            primary_key: RwLock::new(None),
            removed: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    /// Adds a view.
    #[must_use]
    pub fn add_view(self: &Arc<Self>, name: impl Into<String>) -> Arc<MemoryView> {
        Arc::new(MemoryView {
            id: ObjectId::next(),
            schema: Arc::clone(self),
            name: name.into(),
            removed: AtomicBool::new(false),
        })
    }

    /// Marks the schema and everything in it removed.
    pub fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

impl SchemaObject for MemorySchema {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn database_id(&self) -> ObjectId {
        self.database_id
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl SchemaBuilder for MemorySchema {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// An in-memory table.
#[derive(Debug)]
pub struct MemoryTable {
    id: ObjectId,
    schema: Arc<MemorySchema>,
    name: String,
    temporary: bool,
    columns: RwLock<Vec<Arc<MemoryColumn>>>,
    primary_key: RwLock<Option<PrimaryKey>>,
    removed: AtomicBool,
    this: Weak<Self>,
}

impl MemoryTable {
    /// Adds a column.
    #[must_use]
    pub fn add_column(&self, name: impl Into<String>) -> Arc<MemoryColumn> {
        let column = Arc::new(MemoryColumn {
            id: ObjectId::next(),
            database_id: self.schema.database_id,
            table: self.this.clone(),
            name: name.into(),
            removed: AtomicBool::new(false),
        });
        self.columns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&column));
        column
    }

    /// Removes a column, marking it removed. Returns false if there is no
    /// live column of that name.
    pub fn remove_column(&self, name: &str) -> bool {
        let mut columns = self.columns.write().unwrap_or_else(PoisonError::into_inner);
        match columns.iter().position(|c| c.name == name) {
            Some(index) => {
                let column = columns.remove(index);
                column.removed.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Sets a primary key over plain columns.
    pub fn set_primary_key(&self, columns: &[&str]) {
        self.set_primary_key_parts(Some(PrimaryKey::columns(columns)));
    }

    /// Replaces the primary key.
    pub fn set_primary_key_parts(&self, primary_key: Option<PrimaryKey>) {
        *self
            .primary_key
            .write()
            .unwrap_or_else(PoisonError::into_inner) = primary_key;
    }

    /// Marks the table and its columns removed.
    pub fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

impl SchemaObject for MemoryTable {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn database_id(&self) -> ObjectId {
        self.schema.database_id
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst) || self.schema.is_removed()
    }
}

impl TableBuilder for MemoryTable {
    fn schema(&self) -> SchemaBuilderRef {
        SchemaBuilderRef::from(Arc::clone(&self.schema))
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_temporary(&self) -> bool {
        self.temporary
    }

    fn columns(&self) -> Vec<ColumnBuilderRef> {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|c| ColumnBuilderRef::from(Arc::clone(c)))
            .collect()
    }

    fn primary_key(&self) -> Option<PrimaryKey> {
        self.primary_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// An in-memory column.
#[derive(Debug)]
pub struct MemoryColumn {
    id: ObjectId,
    database_id: ObjectId,
    table: Weak<MemoryTable>,
    name: String,
    removed: AtomicBool,
}

impl SchemaObject for MemoryColumn {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn database_id(&self) -> ObjectId {
        self.database_id
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
            || self.table.upgrade().map_or(true, |t| t.is_removed())
    }
}

impl ColumnBuilder for MemoryColumn {
    fn table(&self) -> Option<TableBuilderRef> {
        self.table.upgrade().map(TableBuilderRef::from)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// An in-memory view.
#[derive(Debug)]
pub struct MemoryView {
    id: ObjectId,
    schema: Arc<MemorySchema>,
    name: String,
    removed: AtomicBool,
}

impl MemoryView {
    /// Marks the view removed.
    pub fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}

impl SchemaObject for MemoryView {
    fn object_id(&self) -> ObjectId {
        self.id
    }

    fn database_id(&self) -> ObjectId {
        self.schema.database_id
    }

    fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst) || self.schema.is_removed()
    }
}

impl ViewBuilder for MemoryView {
    fn schema(&self) -> SchemaBuilderRef {
        SchemaBuilderRef::from(Arc::clone(&self.schema))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_cascades() {
        let db = MemoryDatabase::new();
        let schema = db.add_schema("public");
        let table = schema.add_table("t");
        let column = table.add_column("a");
        assert!(!column.is_removed());

        table.remove();
        assert!(table.is_removed());
        assert!(column.is_removed());
    }

    #[test]
    fn test_schema_removal_reaches_views() {
        let db = MemoryDatabase::new();
        let schema = db.add_schema("reporting");
        let view = schema.add_view("v");
        schema.remove();
        assert!(view.is_removed());
    }

    #[test]
    fn test_remove_column() {
        let db = MemoryDatabase::new();
        let table = db.add_schema("public").add_table("t");
        let a = table.add_column("a");
        let _b = table.add_column("b");

        assert!(table.remove_column("a"));
        assert!(!table.remove_column("a"));
        assert!(a.is_removed());
        assert_eq!(table.columns().len(), 1);
    }

    #[test]
    fn test_column_knows_its_table() {
        let db = MemoryDatabase::new();
        let table = db.add_schema("public").add_table("t");
        let column = table.add_column("a");
        let owner = column.table().unwrap();
        assert_eq!(owner.object_id(), table.object_id());
        assert_eq!(owner.schema().name(), "public");
        assert_eq!(column.database_id(), db.id());
    }

    #[test]
    fn test_primary_key() {
        let db = MemoryDatabase::new();
        let table = db.add_schema("public").add_table("t");
        assert!(table.primary_key().is_none());
        table.set_primary_key(&["a", "c"]);
        assert_eq!(
            table.primary_key().unwrap().plain_columns(),
            Some(vec!["a", "c"])
        );
    }
}
