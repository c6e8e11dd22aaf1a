//! Transaction control statements.

/// Transaction isolation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// Transaction access modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

impl AccessMode {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReadWrite => "READ WRITE",
            Self::ReadOnly => "READ ONLY",
        }
    }
}

/// `BEGIN [ISOLATION LEVEL ...] [READ ONLY|READ WRITE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Begin {
    /// Isolation level; server default when `None`.
    pub isolation: Option<IsolationLevel>,
    /// Access mode; server default when `None`.
    pub access: Option<AccessMode>,
}

/// `SAVEPOINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Savepoint {
    /// Savepoint name.
    pub name: String,
}

/// `RELEASE SAVEPOINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSavepoint {
    /// Savepoint name.
    pub name: String,
}

/// `ROLLBACK TO SAVEPOINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackToSavepoint {
    /// Savepoint name.
    pub name: String,
}
