//! Transaction control and custom nodes.

use sqlweave_core::ast::{Begin, CustomNodeRef};
use sqlweave_core::error::InterpretError;

use super::{unrecognized, PostgresInterpreter};
use crate::custom::Notify;

impl PostgresInterpreter {
    pub(super) fn render_begin(&mut self, statement: &Begin) {
        self.push("BEGIN");
        let mut modes = Vec::with_capacity(2);
        if let Some(isolation) = statement.isolation {
            modes.push(format!("ISOLATION LEVEL {}", isolation.as_str()));
        }
        if let Some(access) = statement.access {
            modes.push(access.as_str().to_string());
        }
        if !modes.is_empty() {
            self.push(" ");
            self.push(&modes.join(", "));
        }
    }

    pub(super) fn render_custom(&mut self, node: &CustomNodeRef) -> Result<(), InterpretError> {
        if let Some(notify) = node.downcast_ref::<Notify>() {
            let sql = notify.to_sql(&self.dialect);
            self.push(&sql);
            return Ok(());
        }
        let sql = node
            .render(&self.dialect)
            .ok_or_else(|| unrecognized(node.clone(), format!("custom node {}", node.name())))?;
        self.push(&sql);
        Ok(())
    }
}
