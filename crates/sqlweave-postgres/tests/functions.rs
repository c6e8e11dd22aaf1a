//! Scalar function rewrites, aggregates and window functions.

mod common;
use common::*;

use std::any::Any;

use sqlweave_core::ast::{
    AggregateFunction, AggregateKind, CustomAggregate, CustomAggregateRef, CustomFunction,
    CustomFunctionRef, DatePart, DateUnit, Distinct, Expr, Filter, FrameBound, FrameMode,
    FunctionKind, Limit, OrderBy, OrderItem, QueryTrait, WindowFrame, WindowFunction, WindowKind,
};
use sqlweave_postgres::custom::{gen_random_uuid, jsonb_agg, to_jsonb};

fn call(kind: FunctionKind, arguments: Vec<Expr>) -> String {
    compile_expr(&Expr::function(kind, arguments))
}

fn d() -> Expr {
    Expr::param("d")
}

fn diff(unit: DateUnit) -> String {
    call(
        FunctionKind::DateDiff(unit),
        vec![Expr::param("s"), Expr::param("e")],
    )
}

fn order_by(items: Vec<OrderItem>) -> QueryTrait {
    QueryTrait::OrderBy(OrderBy { items })
}

fn filter(condition: Expr) -> QueryTrait {
    QueryTrait::Filter(Filter { condition })
}

#[derive(Debug)]
struct Soundex;

impl CustomFunction for Soundex {
    fn name(&self) -> &str {
        "soundex"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Median;

impl CustomAggregate for Median {
    fn name(&self) -> &str {
        "median"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ===================================================================
// Plain calls
// ===================================================================

#[test]
fn renamed_calls() {
    assert_eq!(
        call(FunctionKind::Coalesce, vec![Expr::param("a"), Expr::int(0)]),
        "COALESCE(@a, 0)"
    );
    assert_eq!(
        call(
            FunctionKind::Substring,
            vec![Expr::param("s"), Expr::int(2), Expr::int(3)]
        ),
        "SUBSTR(@s, 2, 3)"
    );
    assert_eq!(call(FunctionKind::Trim, vec![Expr::param("s")]), "BTRIM(@s)");
    assert_eq!(
        call(FunctionKind::IndexOf, vec![Expr::param("s"), Expr::string("x")]),
        "STRPOS(@s, 'x')"
    );
    assert_eq!(call(FunctionKind::Random, Vec::new()), "RANDOM()");
}

#[test]
fn keyword_functions() {
    assert_eq!(call(FunctionKind::CurrentTimestamp, Vec::new()), "CURRENT_TIMESTAMP");
    assert_eq!(
        call(FunctionKind::UtcNow, Vec::new()),
        "(CURRENT_TIMESTAMP AT TIME ZONE 'UTC')"
    );
}

#[test]
fn wrong_arity_is_structural() {
    let expr = Expr::function(FunctionKind::Abs, vec![Expr::int(1), Expr::int(2)]);
    let err = compile_expr_err(&expr);
    assert!(err.is_structural());
    assert!(err.to_string().contains("Abs"));
}

#[test]
fn postgres_extension_functions() {
    assert_eq!(compile_expr(&gen_random_uuid()), "GEN_RANDOM_UUID()");
    assert_eq!(compile_expr(&to_jsonb(Expr::param("x"))), "TO_JSONB(@x)");
    assert_eq!(compile_expr(&jsonb_agg(Expr::param("x"))), "JSONB_AGG(@x)");
}

#[test]
fn unknown_custom_function_is_unrecognized() {
    let expr = Expr::function(
        FunctionKind::Custom(CustomFunctionRef::new(Soundex)),
        vec![Expr::param("s")],
    );
    let err = compile_expr_err(&expr);
    assert!(err.is_unrecognized());
    assert!(err.to_string().contains("soundex"));
}

#[test]
fn last_index_of() {
    assert_eq!(
        call(
            FunctionKind::LastIndexOf,
            vec![Expr::param("s"), Expr::param("n")]
        ),
        concat!(
            "CASE WHEN STRPOS(@s, @n) = 0 THEN 0 ELSE LENGTH(@s) - ",
            "STRPOS(REVERSE(@s), REVERSE(@n)) - LENGTH(@n) + 2 END"
        )
    );
}

// ===================================================================
// Dates
// ===================================================================

#[test]
fn date_parts() {
    assert_eq!(
        call(FunctionKind::DatePart(DatePart::Year), vec![d()]),
        "CAST(EXTRACT(YEAR FROM @d) AS INT4)"
    );
    assert_eq!(
        call(FunctionKind::DatePart(DatePart::DayOfWeek), vec![d()]),
        "CAST(EXTRACT(DOW FROM @d) AS INT4)"
    );
    assert_eq!(
        call(FunctionKind::DatePart(DatePart::Second), vec![d()]),
        "CAST(TRUNC(EXTRACT(SECOND FROM @d)) AS INT4)"
    );
    assert_eq!(
        call(FunctionKind::DatePart(DatePart::Millisecond), vec![d()]),
        "(CAST(TRUNC(EXTRACT(MILLISECONDS FROM @d)) AS INT4) % 1000)"
    );
}

#[test]
fn date_add() {
    let add = |unit| call(FunctionKind::DateAdd(unit), vec![d(), Expr::param("n")]);
    assert_eq!(
        add(DateUnit::Day),
        "(@d + MAKE_INTERVAL(days => CAST(@n AS INT4)))"
    );
    assert_eq!(
        add(DateUnit::Quarter),
        "(@d + MAKE_INTERVAL(months => CAST(@n AS INT4) * 3))"
    );
    assert_eq!(
        add(DateUnit::Millisecond),
        "(@d + MAKE_INTERVAL(secs => CAST(@n AS FLOAT8) / 1000.0))"
    );
}

#[test]
fn date_diff_by_epoch() {
    assert_eq!(
        diff(DateUnit::Day),
        "CAST(TRUNC(EXTRACT(EPOCH FROM (@e - @s)) / 86400) AS INT8)"
    );
    assert_eq!(
        diff(DateUnit::Second),
        "CAST(TRUNC(EXTRACT(EPOCH FROM (@e - @s))) AS INT8)"
    );
    assert_eq!(
        diff(DateUnit::Millisecond),
        "CAST(TRUNC(EXTRACT(EPOCH FROM (@e - @s)) * 1000) AS INT8)"
    );
}

#[test]
fn date_diff_by_calendar() {
    assert_eq!(
        diff(DateUnit::Year),
        "CAST(EXTRACT(YEAR FROM AGE(@e, @s)) AS INT8)"
    );
    assert_eq!(
        diff(DateUnit::Month),
        "CAST(EXTRACT(YEAR FROM AGE(@e, @s)) * 12 + EXTRACT(MONTH FROM AGE(@e, @s)) AS INT8)"
    );
    assert_eq!(
        diff(DateUnit::Quarter),
        "CAST(TRUNC((EXTRACT(YEAR FROM AGE(@e, @s)) * 12 + EXTRACT(MONTH FROM AGE(@e, @s))) / 3) AS INT8)"
    );
}

#[test]
fn date_diff_parenthesizes_operands() {
    let start = Expr::param("a").sub(Expr::param("b"));
    assert_eq!(
        call(FunctionKind::DateDiff(DateUnit::Hour), vec![start, Expr::param("e")]),
        "CAST(TRUNC(EXTRACT(EPOCH FROM (@e - (@a - @b))) / 3600) AS INT8)"
    );
}

#[test]
fn date_trunc() {
    assert_eq!(
        call(FunctionKind::DateTrunc(DateUnit::Week), vec![d()]),
        "DATE_TRUNC('week', @d)"
    );
    assert_eq!(
        call(FunctionKind::DateTrunc(DateUnit::Millisecond), vec![d()]),
        "DATE_TRUNC('milliseconds', @d)"
    );
}

#[test]
fn ticks() {
    assert_eq!(
        call(FunctionKind::ToTicks, vec![d()]),
        "(CAST(TRUNC(EXTRACT(EPOCH FROM @d) * 10000000) AS INT8) + 621355968000000000)"
    );
    assert_eq!(
        call(FunctionKind::FromTicks, vec![Expr::param("t")]),
        "TO_TIMESTAMP((@t - 621355968000000000) / 10000000.0)"
    );
}

// ===================================================================
// Aggregates
// ===================================================================

#[test]
fn aggregate_with_distinct() {
    let o = orders();
    let mut sum = AggregateFunction::new(AggregateKind::Sum, vec![o.field("total")]);
    sum.traits.push(QueryTrait::Distinct(Distinct::default()));
    assert_eq!(
        compile_expr(&Expr::Aggregate(sum)),
        r#"SUM(DISTINCT "o"."total")"#
    );
}

#[test]
fn aggregate_with_order_and_filter() {
    let c = customers();
    let mut names = AggregateFunction::new(
        AggregateKind::StringAgg,
        vec![c.field("name"), Expr::string(", ")],
    );
    names.traits.push(order_by(vec![OrderItem::asc(c.field("name"))]));
    names.traits.push(filter(c.field("region").eq(Expr::string("eu"))));
    assert_eq!(
        compile_expr(&Expr::Aggregate(names)),
        r#"STRING_AGG("c"."name", ', ' ORDER BY "c"."name") FILTER (WHERE "c"."region" = 'eu')"#
    );
}

#[test]
fn aggregate_rejects_other_traits() {
    let mut count = AggregateFunction::new(AggregateKind::CountAll, Vec::new());
    count.traits.push(QueryTrait::Limit(Limit {
        count: Expr::int(1),
    }));
    assert!(compile_expr_err(&Expr::Aggregate(count)).is_structural());

    let mut distinct_on = AggregateFunction::new(AggregateKind::Max, vec![Expr::param("x")]);
    distinct_on.traits.push(QueryTrait::Distinct(Distinct {
        on: vec![Expr::param("x")],
    }));
    assert!(compile_expr_err(&Expr::Aggregate(distinct_on)).is_structural());
}

#[test]
fn unknown_custom_aggregate_is_unrecognized() {
    let median = AggregateFunction::new(
        AggregateKind::Custom(CustomAggregateRef::new(Median)),
        vec![Expr::param("x")],
    );
    let err = compile_expr_err(&Expr::Aggregate(median));
    assert!(err.is_unrecognized());
    assert!(err.to_string().contains("median"));
}

// ===================================================================
// Window functions
// ===================================================================

#[test]
fn running_total() {
    let o = orders();
    let mut running = WindowFunction::new(
        WindowKind::Aggregate(AggregateKind::Sum),
        vec![o.field("total")],
    )
    .partition_by(vec![o.field("customer_id")])
    .frame(WindowFrame::between(
        FrameMode::Rows,
        FrameBound::UnboundedPreceding,
        FrameBound::CurrentRow,
    ));
    running.traits.push(order_by(vec![OrderItem::asc(o.field("id"))]));
    assert_eq!(
        compile_expr(&Expr::Window(running)),
        concat!(
            r#"SUM("o"."total") OVER (PARTITION BY "o"."customer_id" ORDER BY "o"."id" "#,
            r#"ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"#
        )
    );
}

#[test]
fn single_bound_frame_and_empty_window() {
    let mut lag = WindowFunction::new(WindowKind::Lag, vec![Expr::param("x"), Expr::int(1)])
        .frame(WindowFrame {
            mode: FrameMode::Range,
            start: FrameBound::Preceding(3),
            end: None,
        });
    lag.traits.push(order_by(vec![OrderItem::desc(Expr::param("k"))]));
    assert_eq!(
        compile_expr(&Expr::Window(lag)),
        "LAG(@x, 1) OVER (ORDER BY @k DESC RANGE 3 PRECEDING)"
    );
    assert_eq!(
        compile_expr(&Expr::Window(WindowFunction::new(WindowKind::Rank, Vec::new()))),
        "RANK() OVER ()"
    );
}

#[test]
fn named_window_with_refinement() {
    let mut first = WindowFunction::new(WindowKind::FirstValue, vec![Expr::param("x")]).over("w");
    first.traits.push(order_by(vec![OrderItem::asc(Expr::param("k"))]));
    assert_eq!(
        compile_expr(&Expr::Window(first)),
        r#"FIRST_VALUE(@x) OVER ("w" ORDER BY @k)"#
    );
}

#[test]
fn windowed_count_with_filter() {
    let mut count = WindowFunction::new(WindowKind::Aggregate(AggregateKind::CountAll), Vec::new());
    count.traits.push(filter(Expr::param("flag")));
    assert_eq!(
        compile_expr(&Expr::Window(count)),
        "COUNT(*) FILTER (WHERE @flag) OVER ()"
    );
}

#[test]
fn ranking_window_rejects_filter() {
    let mut rank = WindowFunction::new(WindowKind::DenseRank, Vec::new());
    rank.traits.push(filter(Expr::param("flag")));
    assert!(compile_expr_err(&Expr::Window(rank)).is_structural());
}

#[test]
fn window_arity_is_checked() {
    let ntile = WindowFunction::new(WindowKind::Ntile, Vec::new());
    assert!(compile_expr_err(&Expr::Window(ntile)).is_structural());
}
