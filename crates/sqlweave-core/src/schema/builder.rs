//! Capabilities of schema builder objects.
//!
//! Builder objects are schemas, tables, columns and views that are still
//! being defined or altered. The node model only needs a read-only view of
//! them: identity, owning database, owning schema and whether they have
//! been removed. Any schema model can take part in SQL generation and
//! scope validation by implementing these traits; [`memory`](super::memory)
//! provides a ready-made implementation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::table::PrimaryKey;

/// Identity of a schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocates a process-wide unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps an id assigned by an external model.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities shared by every builder object.
pub trait SchemaObject: fmt::Debug + Send + Sync {
    /// Returns the identity of the object.
    fn object_id(&self) -> ObjectId;

    /// Returns the identity of the owning database.
    fn database_id(&self) -> ObjectId;

    /// Returns true once the object has been removed from its owner.
    fn is_removed(&self) -> bool;
}

/// A schema being defined.
pub trait SchemaBuilder: SchemaObject {
    /// Returns the schema name.
    fn name(&self) -> String;
}

/// A table being defined.
pub trait TableBuilder: SchemaObject {
    /// Returns the owning schema.
    fn schema(&self) -> SchemaBuilderRef;

    /// Returns the table name.
    fn name(&self) -> String;

    /// Returns true for temporary tables.
    fn is_temporary(&self) -> bool {
        false
    }

    /// Returns the column builders in order.
    fn columns(&self) -> Vec<ColumnBuilderRef>;

    /// Returns the primary key.
    fn primary_key(&self) -> Option<PrimaryKey>;
}

/// A column being defined.
pub trait ColumnBuilder: SchemaObject {
    /// Returns the owning table, `None` once the table has been dropped.
    fn table(&self) -> Option<TableBuilderRef>;

    /// Returns the column name.
    fn name(&self) -> String;
}

/// A view being defined.
pub trait ViewBuilder: SchemaObject {
    /// Returns the owning schema.
    fn schema(&self) -> SchemaBuilderRef;

    /// Returns the view name.
    fn name(&self) -> String;

    /// Returns true for temporary views.
    fn is_temporary(&self) -> bool {
        false
    }
}

macro_rules! builder_ref {
    ($(#[$meta:meta])* $name:ident => $trait_:ident) => {
        $(#[$meta])*
        ///
        /// Compares and hashes by object identity.
        #[derive(Clone)]
        pub struct $name(Arc<dyn $trait_>);

        impl $name {
            /// Wraps a shared builder object.
            #[must_use]
            pub fn new(object: Arc<dyn $trait_>) -> Self {
                Self(object)
            }
        }

        impl std::ops::Deref for $name {
            type Target = dyn $trait_;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl<T: $trait_ + 'static> From<Arc<T>> for $name {
            fn from(object: Arc<T>) -> Self {
                Self(object)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.object_id() == other.0.object_id()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.object_id().hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "({}{})"),
                    self.0.name(),
                    self.0.object_id()
                )
            }
        }
    };
}

builder_ref! {
    /// Shared handle to a [`SchemaBuilder`].
    SchemaBuilderRef => SchemaBuilder
}

builder_ref! {
    /// Shared handle to a [`TableBuilder`].
    TableBuilderRef => TableBuilder
}

builder_ref! {
    /// Shared handle to a [`ColumnBuilder`].
    ColumnBuilderRef => ColumnBuilder
}

builder_ref! {
    /// Shared handle to a [`ViewBuilder`].
    ViewBuilderRef => ViewBuilder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert_eq!(ObjectId::from_raw(a.get()), a);
    }
}
