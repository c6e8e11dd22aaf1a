//! # sqlweave-core
//!
//! An immutable SQL syntax tree with a closed visitor protocol.
//!
//! This crate provides:
//! - The node model: expressions, record sets, queries, statements and the
//!   trait chains (WHERE, GROUP BY, ORDER BY, ...) attached to them
//! - [`NodeVisitor`], with one method per node kind, implemented by dialect
//!   interpreters and validators
//! - Dialect-scoped data types with bounded parameters
//! - Builder capability traits for schemas under construction, plus an
//!   in-memory implementation
//! - Two validators: constant expressions and schema scope
//!
//! Rendering SQL text is the job of a dialect crate such as
//! `sqlweave-postgres`.
//!
//! ## Building a tree
//!
//! ```rust
//! use sqlweave_core::ast::{DataSource, Delete, Expr, RecordSet, Statement};
//! use sqlweave_core::schema::Table;
//!
//! let orders = RecordSet::table(Table::new("sales", "orders")).alias("o");
//! let delete = Delete::new(
//!     DataSource::new(orders.clone()).filter(orders.field("total").lt(Expr::int(0))),
//! );
//! let statement = Statement::from(delete);
//! # let _ = statement;
//! ```
//!
//! ## Validating an expression
//!
//! ```rust
//! use sqlweave_core::ast::Expr;
//! use sqlweave_core::validate::ConstantExpressionValidator;
//!
//! let default = Expr::int(1).add(Expr::param("p"));
//! let errors = ConstantExpressionValidator::validate(&default);
//! assert_eq!(errors.len(), 1);
//! ```

pub mod ast;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod types;
pub mod validate;
pub mod visit;

pub use ast::{Expr, Node, Query, RecordSet, Statement};
pub use dialect::{CompiledParameter, CompiledSql, Dialect};
pub use error::{DataTypeError, InterpretError};
pub use types::{LogicalType, SqlDataType, TypeDefinitions};
pub use validate::{ValidationError, ValidationErrors};
pub use visit::NodeVisitor;
