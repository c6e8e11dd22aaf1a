//! PostgreSQL dialect implementation.

use sqlweave_core::dialect::Dialect;

/// PostgreSQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn parameter_prefix(&self) -> char {
        '@' // rewritten to $n by the driver layer
    }
}
