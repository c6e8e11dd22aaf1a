//! Error types shared by every dialect interpreter.

use crate::ast::Node;
use crate::types::LogicalType;

/// Errors raised while constructing or resolving a [`SqlDataType`].
///
/// [`SqlDataType`]: crate::types::SqlDataType
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTypeError {
    /// A type parameter lies outside its declared bounds.
    #[error("{type_name} {parameter} must be within [{min}, {max}], got {value}")]
    OutOfBounds {
        /// Canonical name of the type.
        type_name: String,
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// The number of parameters does not match the type's declaration.
    #[error("{type_name} takes {expected} parameter(s), got {actual}")]
    ParameterCount {
        /// Canonical name of the type.
        type_name: String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied parameters.
        actual: usize,
    },

    /// The dialect has no data type for a logical type.
    #[error("no {dialect} data type is defined for {logical:?}")]
    Unmapped {
        /// Dialect name.
        dialect: &'static str,
        /// The logical type that could not be resolved.
        logical: LogicalType,
    },
}

/// Errors raised by a dialect interpreter.
///
/// Interpreters fail on the first construct they cannot render: a partially
/// rendered statement is never returned.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// The node is well-formed but its shape cannot be rendered, e.g. a
    /// complex DELETE whose target has no row identity.
    #[error("{visitor}: {message}")]
    Structural {
        /// Name of the visitor that raised the error.
        visitor: &'static str,
        /// The offending node.
        node: Box<Node>,
        /// What precondition was not met.
        message: String,
    },

    /// The dialect has no rendering at all for the node.
    #[error("{visitor} does not recognize {kind}")]
    UnrecognizedNode {
        /// Name of the visitor that raised the error.
        visitor: &'static str,
        /// The offending node.
        node: Box<Node>,
        /// Short description of the unrecognized construct.
        kind: String,
    },

    /// A data type could not be resolved or constructed.
    #[error(transparent)]
    DataType(#[from] DataTypeError),
}

impl InterpretError {
    /// Creates a structural error.
    #[must_use]
    pub fn structural(
        visitor: &'static str,
        node: impl Into<Node>,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            visitor,
            node: Box::new(node.into()),
            message: message.into(),
        }
    }

    /// Creates an unrecognized-node error.
    #[must_use]
    pub fn unrecognized(visitor: &'static str, node: impl Into<Node>, kind: impl Into<String>) -> Self {
        Self::UnrecognizedNode {
            visitor,
            node: Box::new(node.into()),
            kind: kind.into(),
        }
    }

    /// Returns the offending node, if the error carries one.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match self {
            Self::Structural { node, .. } | Self::UnrecognizedNode { node, .. } => Some(node),
            Self::DataType(_) => None,
        }
    }

    /// Returns the name of the visitor that raised the error.
    #[must_use]
    pub const fn visitor(&self) -> Option<&'static str> {
        match self {
            Self::Structural { visitor, .. } | Self::UnrecognizedNode { visitor, .. } => {
                Some(visitor)
            }
            Self::DataType(_) => None,
        }
    }

    /// Returns true for [`InterpretError::Structural`].
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }

    /// Returns true for [`InterpretError::UnrecognizedNode`].
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::UnrecognizedNode { .. })
    }
}
