//! Structural validators.
//!
//! Validators walk a tree once and accumulate every violation they find,
//! so a caller can report all problems in one pass. They never fail the
//! walk itself: their [`NodeVisitor::Error`](crate::visit::NodeVisitor::Error)
//! is [`Infallible`].

mod constant;
mod schema_scope;

use std::convert::Infallible;
use std::fmt;

use thiserror::Error;

use crate::ast::Node;

pub use constant::ConstantExpressionValidator;
pub use schema_scope::{ReferencedObject, ReferencedObjects, SchemaScopeExpressionValidator};

/// One violation: the offending node and what is wrong with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The offending node.
    pub node: Node,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(node: impl Into<Node>, message: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Non-empty list of validation errors, in walk order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} validation error(s): {}", .errors.len(), join_messages(.errors))]
pub struct ValidationErrors {
    /// The collected errors.
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over the errors in walk order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turns a collected error list into a `Result`.
///
/// # Errors
///
/// Returns [`ValidationErrors`] if `errors` is not empty.
pub fn into_result(errors: Vec<ValidationError>) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn completed(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn test_into_result() {
        assert!(into_result(Vec::new()).is_ok());

        let errors = vec![
            ValidationError::new(Expr::param("a"), "first"),
            ValidationError::new(Expr::param("b"), "second"),
        ];
        let err = into_result(errors).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string(), "2 validation error(s): first; second");
    }
}
