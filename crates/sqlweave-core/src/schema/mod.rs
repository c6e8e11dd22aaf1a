//! Schema model.
//!
//! Three kinds of schema objects appear in syntax trees:
//!
//! - finalized objects ([`Table`], [`View`]) describing what already
//!   exists in the database,
//! - definitions ([`TableDefinition`], [`ColumnDefinition`]) of objects
//!   created by the statements being generated,
//! - builder objects ([`TableBuilder`], [`ColumnBuilder`], [`ViewBuilder`])
//!   owned by an external schema model and referenced while that model is
//!   being defined or altered.

mod builder;
mod definition;
pub mod memory;
mod table;

pub use builder::{
    ColumnBuilder, ColumnBuilderRef, ObjectId, SchemaBuilder, SchemaBuilderRef, SchemaObject,
    TableBuilder, TableBuilderRef, ViewBuilder, ViewBuilderRef,
};
pub use definition::{
    ColumnDefinition, ColumnStorage, ComputedColumn, ForeignKey, ForeignKeyAction,
    IdentityGeneration, TableConstraint, TableDefinition,
};
pub use table::{Column, KeyPart, PrimaryKey, Table, View};
