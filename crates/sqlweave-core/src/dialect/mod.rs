//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. This module
//! provides a trait for the lexical, dialect-specific behavior (quoting,
//! placeholders) and the output contract shared by every
//! dialect interpreter.

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: std::fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the prefix of named parameter placeholders.
    fn parameter_prefix(&self) -> char {
        ':'
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut escaped = String::with_capacity(name.len() + 2);
        escaped.push(quote);
        for c in name.chars() {
            if c == quote {
                escaped.push(quote);
            }
            escaped.push(c);
        }
        escaped.push(quote);
        escaped
    }

    /// Quotes a string literal, doubling embedded single quotes.
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Returns the placeholder of a named parameter.
    fn parameter_placeholder(&self, name: &str) -> String {
        format!("{}{name}", self.parameter_prefix())
    }
}

/// A named parameter encountered while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledParameter {
    /// Name without prefix.
    pub name: String,
    /// Placeholder as it appears in the text.
    pub placeholder: String,
}

/// The output of one compilation: SQL text plus the named parameters it
/// refers to, each listed once in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledSql {
    /// SQL text.
    pub sql: String,
    /// Parameters in order of first appearance.
    pub parameters: Vec<CompiledParameter>,
}

impl CompiledSql {
    /// Returns the parameter names in order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

impl std::fmt::Display for CompiledSql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
