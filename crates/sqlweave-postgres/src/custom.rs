//! PostgreSQL-specific custom nodes.
//!
//! These plug into the open extension points of the node model. The
//! interpreter recognizes them by type; other visitors see them as opaque
//! custom nodes.

use std::any::Any;

use sqlweave_core::ast::{
    AggregateFunction, AggregateKind, Arity, CustomAggregate, CustomAggregateRef, CustomFunction,
    CustomFunctionRef, CustomNode, CustomNodeRef, Expr, FunctionKind, Statement,
};
use sqlweave_core::dialect::Dialect;

/// `gen_random_uuid()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenRandomUuid;

impl CustomFunction for GenRandomUuid {
    fn name(&self) -> &str {
        "gen_random_uuid"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `to_jsonb(value)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToJsonb;

impl CustomFunction for ToJsonb {
    fn name(&self) -> &str {
        "to_jsonb"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `jsonb_agg(value)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonbAgg;

impl CustomAggregate for JsonbAgg {
    fn name(&self) -> &str {
        "jsonb_agg"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `NOTIFY channel [, 'payload']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notify {
    pub channel: String,
    pub payload: Option<String>,
}

impl Notify {
    /// Renders the statement for `dialect`.
    #[must_use]
    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let mut sql = format!("NOTIFY {}", dialect.quote_identifier(&self.channel));
        if let Some(payload) = &self.payload {
            sql.push_str(", ");
            sql.push_str(&dialect.quote_string(payload));
        }
        sql
    }
}

impl CustomNode for Notify {
    fn name(&self) -> &str {
        "notify"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn render(&self, dialect: &dyn Dialect) -> Option<String> {
        Some(self.to_sql(dialect))
    }
}

/// `gen_random_uuid()` as an expression.
#[must_use]
pub fn gen_random_uuid() -> Expr {
    Expr::function(
        FunctionKind::Custom(CustomFunctionRef::new(GenRandomUuid)),
        Vec::new(),
    )
}

/// `to_jsonb(value)` as an expression.
#[must_use]
pub fn to_jsonb(value: Expr) -> Expr {
    Expr::function(
        FunctionKind::Custom(CustomFunctionRef::new(ToJsonb)),
        vec![value],
    )
}

/// `jsonb_agg(value)` as an expression.
#[must_use]
pub fn jsonb_agg(value: Expr) -> Expr {
    Expr::Aggregate(AggregateFunction::new(
        AggregateKind::Custom(CustomAggregateRef::new(JsonbAgg)),
        vec![value],
    ))
}

/// A `NOTIFY` statement.
#[must_use]
pub fn notify(channel: impl Into<String>, payload: Option<String>) -> Statement {
    Statement::Custom(CustomNodeRef::new(Notify {
        channel: channel.into(),
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PostgresDialect;

    #[test]
    fn test_notify_sql() {
        let dialect = PostgresDialect::new();
        let bare = Notify {
            channel: "jobs".into(),
            payload: None,
        };
        assert_eq!(bare.to_sql(&dialect), "NOTIFY \"jobs\"");

        let with_payload = Notify {
            channel: "jobs".into(),
            payload: Some("it's ready".into()),
        };
        assert_eq!(
            with_payload.render(&dialect).as_deref(),
            Some("NOTIFY \"jobs\", 'it''s ready'")
        );
    }

    #[test]
    fn test_constructors() {
        let Expr::Function(function) = gen_random_uuid() else {
            panic!("expected function");
        };
        assert!(function.arguments.is_empty());
        assert!(matches!(
            function.kind,
            FunctionKind::Custom(ref custom) if custom.downcast_ref::<GenRandomUuid>().is_some()
        ));
        assert!(matches!(jsonb_agg(Expr::int(1)), Expr::Aggregate(_)));
        assert!(matches!(notify("jobs", None), Statement::Custom(_)));
    }
}
