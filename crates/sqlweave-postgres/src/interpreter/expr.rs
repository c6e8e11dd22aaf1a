//! Expressions, literals and function rewrites.

use sqlweave_core::ast::{
    AggregateFunction, AggregateKind, AllFields, ArithmeticExpr, ArithmeticOp, Arity, Between,
    BitwiseExpr, BitwiseOp, CaseExpr, CastExpr, CastTarget, ColumnBuilderField, Comparison,
    DatePart, DateUnit, Exists, Expr, Field, FrameBound, FunctionKind, InList, InQuery, IsNull,
    Like, Literal, LogicalCondition, LogicalOp, NotCondition, OrderDirection, OrderItem, Parameter,
    ScalarFunction, Subquery, TraitKind, UnaryExpr, WindowFrame, WindowFunction, WindowKind,
};
use sqlweave_core::dialect::{CompiledParameter, Dialect};
use sqlweave_core::error::InterpretError;

use super::{structural, unrecognized, PostgresInterpreter};
use crate::functions::{self, Scale, Translation, TICKS_PER_SECOND, UNIX_EPOCH_TICKS};

// Binding strength, loosest first, as in the PostgreSQL operator table.
pub(super) const OR: u8 = 1;
pub(super) const AND: u8 = 2;
const NOT: u8 = 3;
const IS: u8 = 4;
const COMPARISON: u8 = 5;
const RANGE: u8 = 6;
const OPERATOR: u8 = 7;
const ADDITIVE: u8 = 8;
const MULTIPLICATIVE: u8 = 9;
const UNARY: u8 = 10;
pub(super) const ATOM: u8 = 11;

/// Binding strength of the rendered form of `expr`.
pub(super) fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Logical(condition) => match condition.op {
            LogicalOp::Or => OR,
            LogicalOp::And => AND,
        },
        Expr::Not(_) => NOT,
        Expr::Exists(exists) if exists.negated => NOT,
        Expr::IsNull(_) => IS,
        Expr::Comparison(_) => COMPARISON,
        Expr::Like(_) | Expr::InList(_) | Expr::InQuery(_) | Expr::Between(_) => RANGE,
        Expr::Bitwise(_) => OPERATOR,
        Expr::Arithmetic(arithmetic) => arithmetic_precedence(arithmetic.op),
        Expr::Unary(_) => UNARY,
        Expr::Literal(Literal::Integer(value)) if *value < 0 => UNARY,
        Expr::Literal(Literal::Float(value)) if value.is_finite() && value.is_sign_negative() => {
            UNARY
        }
        Expr::Literal(Literal::Decimal(value)) if value.is_sign_negative() => UNARY,
        _ => ATOM,
    }
}

const fn arithmetic_precedence(op: ArithmeticOp) -> u8 {
    match op {
        ArithmeticOp::Add | ArithmeticOp::Subtract => ADDITIVE,
        ArithmeticOp::Multiply | ArithmeticOp::Divide | ArithmeticOp::Modulo => MULTIPLICATIVE,
    }
}

const fn bitwise_operator(op: BitwiseOp) -> &'static str {
    match op {
        BitwiseOp::And => "&",
        BitwiseOp::Or => "|",
        BitwiseOp::Xor => "#",
        BitwiseOp::ShiftLeft => "<<",
        BitwiseOp::ShiftRight => ">>",
    }
}

fn function_label(kind: &FunctionKind) -> String {
    match kind {
        FunctionKind::Custom(custom) => custom.name().to_string(),
        other => format!("{other:?}"),
    }
}

fn check_arity(arity: Arity, count: usize, label: &str, node: impl FnOnce() -> Expr) -> Result<(), InterpretError> {
    if arity.accepts(count) {
        Ok(())
    } else {
        Err(structural(
            node(),
            format!("{label} expects {arity:?} argument(s), got {count}"),
        ))
    }
}

impl PostgresInterpreter {
    /// Renders `expr`, parenthesized when it binds looser than `min`.
    pub(super) fn operand(&mut self, expr: &Expr, min: u8) -> Result<(), InterpretError> {
        if precedence(expr) < min {
            self.push("(");
            expr.accept(self)?;
            self.push(")");
            Ok(())
        } else {
            expr.accept(self)
        }
    }

    pub(super) fn expr_list<'a>(
        &mut self,
        exprs: impl IntoIterator<Item = &'a Expr>,
    ) -> Result<(), InterpretError> {
        self.separated(exprs, ", ", |this, expr| expr.accept(this))
    }

    /// Renders conditions joined with `AND`.
    pub(super) fn conjunction(&mut self, conditions: &[&Expr]) -> Result<(), InterpretError> {
        match conditions {
            [single] => single.accept(self),
            _ => self.separated(conditions.iter().copied(), " AND ", |this, condition| {
                this.operand(condition, AND + 1)
            }),
        }
    }

    pub(super) fn order_items<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a OrderItem>,
    ) -> Result<(), InterpretError> {
        self.separated(items, ", ", |this, item| {
            item.expr.accept(this)?;
            this.order_suffix(item);
            Ok(())
        })
    }

    pub(super) fn order_suffix(&mut self, item: &OrderItem) {
        if item.direction == OrderDirection::Desc {
            self.push(" DESC");
        }
        if let Some(nulls) = item.nulls {
            self.push(" ");
            self.push(nulls.as_str());
        }
    }

    // ==================== Leaves ====================

    pub(super) fn render_literal(&mut self, literal: &Literal) -> Result<(), InterpretError> {
        let text = match literal {
            Literal::Integer(value) => value.to_string(),
            Literal::Float(value) if value.is_nan() => "'NaN'::FLOAT8".to_string(),
            Literal::Float(value) if value.is_infinite() => {
                if value.is_sign_positive() {
                    "'Infinity'::FLOAT8".to_string()
                } else {
                    "'-Infinity'::FLOAT8".to_string()
                }
            }
            Literal::Float(value) => format!("{value:?}"),
            Literal::Decimal(value) => value.to_string(),
            Literal::String(value) => self.dialect.quote_string(value),
            Literal::Bytes(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("'\\x{hex}'::BYTEA")
            }
            Literal::Date(date) => format!("DATE '{}'", date.format("%Y-%m-%d")),
            Literal::Time(time) => format!("TIME '{}'", time.format("%H:%M:%S%.f")),
            Literal::DateTime(timestamp) => {
                format!("TIMESTAMP '{}'", timestamp.format("%Y-%m-%d %H:%M:%S%.f"))
            }
            Literal::DateTimeOffset(timestamp) => {
                format!("TIMESTAMPTZ '{}'", timestamp.format("%Y-%m-%d %H:%M:%S%.f%:z"))
            }
            Literal::TimeSpan(span) => {
                let micros = span.num_microseconds().ok_or_else(|| {
                    structural(
                        Expr::Literal(literal.clone()),
                        "interval does not fit in 64-bit microseconds",
                    )
                })?;
                format!("INTERVAL '{micros} microseconds'")
            }
            Literal::Guid(guid) => format!("'{guid}'::UUID"),
        };
        self.push(&text);
        Ok(())
    }

    pub(super) fn render_parameter(&mut self, parameter: &Parameter) {
        let placeholder = self.dialect.parameter_placeholder(&parameter.name);
        self.push(&placeholder);
        if !self.parameters.iter().any(|p| p.name == parameter.name) {
            self.parameters.push(CompiledParameter {
                name: parameter.name.clone(),
                placeholder,
            });
        }
    }

    pub(super) fn render_field(&mut self, field: &Field) {
        if !self.unqualified {
            let qualifier = self.qualifier(&field.record_set);
            self.push(&qualifier);
            self.push(".");
        }
        self.push_identifier(&field.name);
    }

    pub(super) fn render_column_builder_field(
        &mut self,
        field: &ColumnBuilderField,
    ) -> Result<(), InterpretError> {
        let column = field.column.name();
        if !self.unqualified {
            let table = field.column.table().ok_or_else(|| {
                structural(
                    Expr::ColumnBuilder(field.clone()),
                    format!("column {column} no longer belongs to a table"),
                )
            })?;
            let qualified =
                self.qualified_name(Some(&table.schema().name()), &table.name(), table.is_temporary());
            self.push(&qualified);
            self.push(".");
        }
        self.push_identifier(&column);
        Ok(())
    }

    pub(super) fn render_all_fields(&mut self, fields: &AllFields) {
        if let Some(record_set) = &fields.record_set {
            let qualifier = self.qualifier(record_set);
            self.push(&qualifier);
            self.push(".");
        }
        self.push("*");
    }

    // ==================== Operators ====================

    pub(super) fn render_unary(&mut self, expr: &UnaryExpr) -> Result<(), InterpretError> {
        self.push(expr.op.as_str());
        self.operand(&expr.operand, UNARY + 1)
    }

    pub(super) fn render_arithmetic(&mut self, expr: &ArithmeticExpr) -> Result<(), InterpretError> {
        let strength = arithmetic_precedence(expr.op);
        self.operand(&expr.left, strength)?;
        self.push(" ");
        self.push(expr.op.as_str());
        self.push(" ");
        self.operand(&expr.right, strength + 1)
    }

    pub(super) fn render_bitwise(&mut self, expr: &BitwiseExpr) -> Result<(), InterpretError> {
        self.operand(&expr.left, OPERATOR)?;
        self.push(" ");
        self.push(bitwise_operator(expr.op));
        self.push(" ");
        self.operand(&expr.right, OPERATOR + 1)
    }

    pub(super) fn render_comparison(&mut self, condition: &Comparison) -> Result<(), InterpretError> {
        self.operand(&condition.left, COMPARISON + 1)?;
        self.push(" ");
        self.push(condition.op.as_str());
        self.push(" ");
        self.operand(&condition.right, COMPARISON + 1)
    }

    pub(super) fn render_logical(
        &mut self,
        condition: &LogicalCondition,
    ) -> Result<(), InterpretError> {
        let (keyword, strength, empty) = match condition.op {
            LogicalOp::And => (" AND ", AND, "TRUE"),
            LogicalOp::Or => (" OR ", OR, "FALSE"),
        };
        match condition.operands.as_slice() {
            [] => {
                self.push(empty);
                Ok(())
            }
            [single] => single.accept(self),
            operands => self.separated(operands, keyword, |this, operand| {
                this.operand(operand, strength + 1)
            }),
        }
    }

    pub(super) fn render_not(&mut self, condition: &NotCondition) -> Result<(), InterpretError> {
        self.push("NOT ");
        self.operand(&condition.operand, NOT)
    }

    pub(super) fn render_is_null(&mut self, condition: &IsNull) -> Result<(), InterpretError> {
        self.operand(&condition.expr, IS + 1)?;
        self.push(if condition.negated {
            " IS NOT NULL"
        } else {
            " IS NULL"
        });
        Ok(())
    }

    pub(super) fn render_like(&mut self, condition: &Like) -> Result<(), InterpretError> {
        self.operand(&condition.expr, RANGE + 1)?;
        if condition.negated {
            self.push(" NOT");
        }
        self.push(if condition.case_insensitive {
            " ILIKE "
        } else {
            " LIKE "
        });
        self.operand(&condition.pattern, RANGE + 1)
    }

    pub(super) fn render_in_list(&mut self, condition: &InList) -> Result<(), InterpretError> {
        if condition.list.is_empty() {
            self.push(if condition.negated { "TRUE" } else { "FALSE" });
            return Ok(());
        }
        self.operand(&condition.expr, RANGE + 1)?;
        self.push(if condition.negated { " NOT IN (" } else { " IN (" });
        self.expr_list(&condition.list)?;
        self.push(")");
        Ok(())
    }

    pub(super) fn render_in_query(&mut self, condition: &InQuery) -> Result<(), InterpretError> {
        self.operand(&condition.expr, RANGE + 1)?;
        self.push(if condition.negated { " NOT IN (" } else { " IN (" });
        condition.query.accept(self)?;
        self.push(")");
        Ok(())
    }

    pub(super) fn render_between(&mut self, condition: &Between) -> Result<(), InterpretError> {
        self.operand(&condition.expr, RANGE + 1)?;
        self.push(if condition.negated {
            " NOT BETWEEN "
        } else {
            " BETWEEN "
        });
        self.operand(&condition.low, RANGE + 1)?;
        self.push(" AND ");
        self.operand(&condition.high, RANGE + 1)
    }

    pub(super) fn render_exists(&mut self, condition: &Exists) -> Result<(), InterpretError> {
        self.push(if condition.negated {
            "NOT EXISTS ("
        } else {
            "EXISTS ("
        });
        condition.query.accept(self)?;
        self.push(")");
        Ok(())
    }

    pub(super) fn render_case(&mut self, expr: &CaseExpr) -> Result<(), InterpretError> {
        if expr.branches.is_empty() {
            return Err(structural(
                Expr::Case(expr.clone()),
                "CASE needs at least one WHEN branch",
            ));
        }
        self.push("CASE");
        if let Some(operand) = &expr.operand {
            self.push(" ");
            operand.accept(self)?;
        }
        for branch in &expr.branches {
            self.push(" WHEN ");
            branch.when.accept(self)?;
            self.push(" THEN ");
            branch.then.accept(self)?;
        }
        if let Some(otherwise) = &expr.otherwise {
            self.push(" ELSE ");
            otherwise.accept(self)?;
        }
        self.push(" END");
        Ok(())
    }

    pub(super) fn render_cast(&mut self, expr: &CastExpr) -> Result<(), InterpretError> {
        self.push("CAST(");
        expr.expr.accept(self)?;
        self.push(" AS ");
        self.cast_target(&expr.target)?;
        self.push(")");
        Ok(())
    }

    pub(super) fn cast_target(&mut self, target: &CastTarget) -> Result<(), InterpretError> {
        let data_type = match target {
            CastTarget::Logical(logical) => self.types.data_type(*logical)?,
            CastTarget::Native(data_type) => std::sync::Arc::clone(data_type),
        };
        self.push(&data_type.to_sql());
        Ok(())
    }

    pub(super) fn render_subquery(&mut self, subquery: &Subquery) -> Result<(), InterpretError> {
        self.push("(");
        subquery.query.accept(self)?;
        self.push(")");
        Ok(())
    }

    // ==================== Functions ====================

    pub(super) fn render_function(&mut self, function: &ScalarFunction) -> Result<(), InterpretError> {
        let translation = functions::scalar(&function.kind);
        if translation == Translation::Unsupported {
            return Err(unrecognized(
                Expr::Function(function.clone()),
                format!("custom function {}", function_label(&function.kind)),
            ));
        }
        let arguments = &function.arguments;
        check_arity(
            function.kind.arity(),
            arguments.len(),
            &function_label(&function.kind),
            || Expr::Function(function.clone()),
        )?;
        match translation {
            Translation::Keyword(keyword) => self.push(keyword),
            Translation::Call(name) => self.call(name, arguments)?,
            Translation::Rewrite => self.rewrite(&function.kind, arguments)?,
            Translation::Unsupported => {}
        }
        Ok(())
    }

    fn call(&mut self, name: &str, arguments: &[Expr]) -> Result<(), InterpretError> {
        self.push(name);
        self.push("(");
        self.expr_list(arguments)?;
        self.push(")");
        Ok(())
    }

    // Arity has been checked by the caller, so indexing is in bounds.
    fn rewrite(&mut self, kind: &FunctionKind, args: &[Expr]) -> Result<(), InterpretError> {
        match kind {
            FunctionKind::LastIndexOf => self.last_index_of(&args[0], &args[1]),
            FunctionKind::DatePart(part) => self.date_part(*part, &args[0]),
            FunctionKind::DateAdd(unit) => self.date_add(*unit, &args[0], &args[1]),
            FunctionKind::DateDiff(unit) => self.date_diff(*unit, &args[0], &args[1]),
            FunctionKind::DateTrunc(unit) => {
                self.push("DATE_TRUNC('");
                self.push(functions::trunc_field(*unit));
                self.push("', ");
                args[0].accept(self)?;
                self.push(")");
                Ok(())
            }
            FunctionKind::ToTicks => {
                self.push("(CAST(TRUNC(EXTRACT(EPOCH FROM ");
                args[0].accept(self)?;
                self.push(&format!(
                    ") * {TICKS_PER_SECOND}) AS INT8) + {UNIX_EPOCH_TICKS})"
                ));
                Ok(())
            }
            FunctionKind::FromTicks => {
                self.push("TO_TIMESTAMP((");
                self.operand(&args[0], ADDITIVE)?;
                self.push(&format!(" - {UNIX_EPOCH_TICKS}) / {TICKS_PER_SECOND}.0)"));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn last_index_of(&mut self, haystack: &Expr, needle: &Expr) -> Result<(), InterpretError> {
        self.push("CASE WHEN STRPOS(");
        haystack.accept(self)?;
        self.push(", ");
        needle.accept(self)?;
        self.push(") = 0 THEN 0 ELSE LENGTH(");
        haystack.accept(self)?;
        self.push(") - STRPOS(REVERSE(");
        haystack.accept(self)?;
        self.push("), REVERSE(");
        needle.accept(self)?;
        self.push(")) - LENGTH(");
        needle.accept(self)?;
        self.push(") + 2 END");
        Ok(())
    }

    fn date_part(&mut self, part: DatePart, value: &Expr) -> Result<(), InterpretError> {
        let field = functions::extract_field(part);
        match part {
            DatePart::Millisecond => self.push("(CAST(TRUNC(EXTRACT("),
            DatePart::Second => self.push("CAST(TRUNC(EXTRACT("),
            _ => self.push("CAST(EXTRACT("),
        }
        self.push(field);
        self.push(" FROM ");
        value.accept(self)?;
        self.push(match part {
            DatePart::Millisecond => ")) AS INT4) % 1000)",
            DatePart::Second => ")) AS INT4)",
            _ => ") AS INT4)",
        });
        Ok(())
    }

    fn date_add(&mut self, unit: DateUnit, value: &Expr, amount: &Expr) -> Result<(), InterpretError> {
        let (field, scale) = functions::make_interval_field(unit);
        let amount_type = if field == "secs" { "FLOAT8" } else { "INT4" };
        self.push("(");
        self.operand(value, ADDITIVE)?;
        self.push(" + MAKE_INTERVAL(");
        self.push(field);
        self.push(" => CAST(");
        amount.accept(self)?;
        self.push(" AS ");
        self.push(amount_type);
        self.push(")");
        self.push(&scale.suffix());
        self.push("))");
        Ok(())
    }

    fn date_diff(&mut self, unit: DateUnit, start: &Expr, end: &Expr) -> Result<(), InterpretError> {
        let Some(scale) = functions::epoch_scale(unit) else {
            return self.calendar_diff(unit, start, end);
        };
        self.push("CAST(TRUNC(EXTRACT(EPOCH FROM (");
        self.operand(end, ADDITIVE)?;
        self.push(" - ");
        self.operand(start, ADDITIVE + 1)?;
        self.push("))");
        self.push(&scale.suffix());
        self.push(") AS INT8)");
        Ok(())
    }

    fn calendar_diff(&mut self, unit: DateUnit, start: &Expr, end: &Expr) -> Result<(), InterpretError> {
        let age = |this: &mut Self, field: &str| -> Result<(), InterpretError> {
            this.push("EXTRACT(");
            this.push(field);
            this.push(" FROM AGE(");
            end.accept(this)?;
            this.push(", ");
            start.accept(this)?;
            this.push("))");
            Ok(())
        };
        match unit {
            DateUnit::Year => {
                self.push("CAST(");
                age(self, "YEAR")?;
                self.push(" AS INT8)");
            }
            DateUnit::Quarter => {
                self.push("CAST(TRUNC((");
                age(self, "YEAR")?;
                self.push(" * 12 + ");
                age(self, "MONTH")?;
                self.push(&format!("){}) AS INT8)", Scale::Divide("3").suffix()));
            }
            _ => {
                self.push("CAST(");
                age(self, "YEAR")?;
                self.push(" * 12 + ");
                age(self, "MONTH")?;
                self.push(" AS INT8)");
            }
        }
        Ok(())
    }

    pub(super) fn render_aggregate(
        &mut self,
        function: &AggregateFunction,
    ) -> Result<(), InterpretError> {
        let node = || Expr::Aggregate(function.clone());
        let name = functions::aggregate(&function.kind).ok_or_else(|| {
            unrecognized(node(), format!("custom aggregate {}", aggregate_label(&function.kind)))
        })?;
        check_arity(
            function.kind.arity(),
            function.arguments.len(),
            &aggregate_label(&function.kind),
            node,
        )?;
        if function
            .traits
            .contains_other_than(&[TraitKind::Distinct, TraitKind::OrderBy, TraitKind::Filter])
        {
            return Err(structural(
                node(),
                "aggregates accept only DISTINCT, ORDER BY and FILTER",
            ));
        }
        let slots = function.traits.slots();
        self.push(name);
        self.push("(");
        if let Some(on) = slots.distinct {
            if !on.is_empty() {
                return Err(structural(node(), "aggregates do not support DISTINCT ON"));
            }
            self.push("DISTINCT ");
        }
        if matches!(function.kind, AggregateKind::CountAll) {
            self.push("*");
        } else {
            self.expr_list(&function.arguments)?;
        }
        if !slots.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.order_items(slots.order_by.iter().copied())?;
        }
        self.push(")");
        self.aggregate_filter(&slots.filter)
    }

    fn aggregate_filter(&mut self, filter: &[&Expr]) -> Result<(), InterpretError> {
        if !filter.is_empty() {
            self.push(" FILTER (WHERE ");
            self.conjunction(filter)?;
            self.push(")");
        }
        Ok(())
    }

    pub(super) fn render_window_function(
        &mut self,
        function: &WindowFunction,
    ) -> Result<(), InterpretError> {
        let node = || Expr::Window(function.clone());
        let name = functions::window(&function.kind).ok_or_else(|| {
            unrecognized(node(), format!("window function {:?}", function.kind))
        })?;
        check_arity(
            function.kind.arity(),
            function.arguments.len(),
            name,
            node,
        )?;
        let aggregate = matches!(function.kind, WindowKind::Aggregate(_));
        let allowed: &[TraitKind] = if aggregate {
            &[TraitKind::OrderBy, TraitKind::Filter]
        } else {
            &[TraitKind::OrderBy]
        };
        if function.traits.contains_other_than(allowed) {
            return Err(structural(
                node(),
                "window functions accept only ORDER BY, and FILTER on aggregates",
            ));
        }
        let slots = function.traits.slots();
        self.push(name);
        self.push("(");
        if matches!(function.kind, WindowKind::Aggregate(AggregateKind::CountAll)) {
            self.push("*");
        } else {
            self.expr_list(&function.arguments)?;
        }
        self.push(")");
        self.aggregate_filter(&slots.filter)?;
        self.push(" OVER ");
        let bare_reference = function.partition_by.is_empty()
            && slots.order_by.is_empty()
            && function.frame.is_none();
        match &function.window_name {
            Some(window) if bare_reference => {
                self.push_identifier(window);
                Ok(())
            }
            window => {
                self.push("(");
                self.window_spec(
                    window.as_deref(),
                    &function.partition_by,
                    &slots.order_by,
                    function.frame.as_ref(),
                )?;
                self.push(")");
                Ok(())
            }
        }
    }

    /// The inside of `OVER (...)` or `AS (...)`.
    pub(super) fn window_spec(
        &mut self,
        base: Option<&str>,
        partition_by: &[Expr],
        order_by: &[&OrderItem],
        frame: Option<&WindowFrame>,
    ) -> Result<(), InterpretError> {
        let mut first = true;
        let mut gap = |this: &mut Self| {
            if !std::mem::take(&mut first) {
                this.push(" ");
            }
        };
        if let Some(base) = base {
            gap(self);
            self.push_identifier(base);
        }
        if !partition_by.is_empty() {
            gap(self);
            self.push("PARTITION BY ");
            self.expr_list(partition_by)?;
        }
        if !order_by.is_empty() {
            gap(self);
            self.push("ORDER BY ");
            self.order_items(order_by.iter().copied())?;
        }
        if let Some(frame) = frame {
            gap(self);
            self.push(frame.mode.as_str());
            match frame.end {
                Some(end) => {
                    self.push(" BETWEEN ");
                    self.frame_bound(frame.start);
                    self.push(" AND ");
                    self.frame_bound(end);
                }
                None => {
                    self.push(" ");
                    self.frame_bound(frame.start);
                }
            }
        }
        Ok(())
    }

    fn frame_bound(&mut self, bound: FrameBound) {
        let text = match bound {
            FrameBound::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
            FrameBound::Preceding(n) => format!("{n} PRECEDING"),
            FrameBound::CurrentRow => "CURRENT ROW".to_string(),
            FrameBound::Following(n) => format!("{n} FOLLOWING"),
            FrameBound::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
        };
        self.push(&text);
    }
}

fn aggregate_label(kind: &AggregateKind) -> String {
    match kind {
        AggregateKind::Custom(custom) => custom.name().to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let a = Expr::raw_field("a");
        assert!(precedence(&a.clone().or(Expr::null())) < precedence(&a.clone().and(Expr::null())));
        assert!(precedence(&a.clone().eq(Expr::int(1))) < precedence(&a.clone().add(Expr::int(1))));
        assert!(precedence(&a.clone().add(Expr::int(1))) < precedence(&a.clone().mul(Expr::int(1))));
        assert_eq!(precedence(&Expr::int(-1)), UNARY);
        assert_eq!(precedence(&Expr::int(1)), ATOM);
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(bitwise_operator(BitwiseOp::Xor), "#");
        assert_eq!(bitwise_operator(BitwiseOp::ShiftLeft), "<<");
    }
}
