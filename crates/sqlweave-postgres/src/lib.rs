//! # sqlweave-postgres
//!
//! PostgreSQL rendering for `sqlweave-core` syntax trees.
//!
//! # How PostgreSQL differs from other dialects
//!
//! - **Parameters**: placeholders render as `@name` and each name is
//!   reported once, in order of first use. Drivers rewrite them to `$n`.
//! - **[DELETE] and [UPDATE]**: only one extra record set is allowed
//!   (`USING` / `FROM`). Sources with more joins, or with DISTINCT,
//!   grouping, ordering or paging, are rewritten around a CTE that
//!   selects the primary key of the affected rows.
//! - **[UPSERT]**: `INSERT ... ON CONFLICT (...) DO UPDATE` needs a
//!   conflict target; when none is given the target table's primary key is
//!   used.
//! - **[Generated columns]**: `GENERATED ALWAYS AS (...) STORED`, plus
//!   identity columns in place of `SERIAL`.
//! - **Types**: every data type carries its OID; `DECIMAL` defaults to
//!   `DECIMAL(29, 10)`. See [`types`].
//! - **Functions**: portable date arithmetic and .NET-style ticks are
//!   rewritten to `EXTRACT`, `MAKE_INTERVAL` and `AGE`. See [`functions`].
//!
//! [DELETE]: https://www.postgresql.org/docs/current/sql-delete.html
//! [UPDATE]: https://www.postgresql.org/docs/current/sql-update.html
//! [UPSERT]: https://www.postgresql.org/docs/current/sql-insert.html#SQL-ON-CONFLICT
//! [Generated columns]: https://www.postgresql.org/docs/current/ddl-generated-columns.html
//!
//! ## Example
//!
//! ```rust
//! use sqlweave_core::ast::{Assignment, ConflictAction, Expr, Insert, RecordSet, Statement, Upsert};
//! use sqlweave_core::schema::{Column, PrimaryKey, Table};
//! use sqlweave_postgres::{types, PostgresInterpreter};
//!
//! let users = RecordSet::table(
//!     Table::new("public", "users")
//!         .column(Column::new("id", types::int8()).not_null())
//!         .column(Column::new("name", types::text()))
//!         .primary_key(PrimaryKey::columns(&["id"])),
//! );
//! let upsert = Upsert {
//!     insert: Insert::values(
//!         users,
//!         vec!["id".into(), "name".into()],
//!         vec![vec![Expr::param("id"), Expr::param("name")]],
//!     ),
//!     conflict_target: None,
//!     action: ConflictAction::DoUpdate {
//!         assignments: vec![Assignment::new("name", Expr::excluded("name"))],
//!         filter: None,
//!     },
//! };
//!
//! let compiled = PostgresInterpreter::new()
//!     .compile(&Statement::Upsert(upsert))
//!     .unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     r#"INSERT INTO "public"."users" ("id", "name") VALUES (@id, @name) ON CONFLICT ("id") DO UPDATE SET "name" = EXCLUDED."name""#
//! );
//! ```

pub mod custom;
mod dialect;
pub mod functions;
mod interpreter;
pub mod options;
pub mod types;

pub use dialect::PostgresDialect;
pub use interpreter::PostgresInterpreter;
pub use options::{ConfigError, InterpreterOptions};
pub use types::PostgresTypeDefinitions;
