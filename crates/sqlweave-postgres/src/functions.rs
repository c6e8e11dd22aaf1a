//! Function translation table.
//!
//! Maps portable function kinds to PostgreSQL names. Kinds that need more
//! than a renamed call (date arithmetic, ticks, last-index-of) are
//! rewritten by the interpreter and have no entry here.

use sqlweave_core::ast::{AggregateKind, DatePart, DateUnit, FunctionKind, WindowKind};

use crate::custom::{GenRandomUuid, JsonbAgg, ToJsonb};

/// .NET ticks at the Unix epoch.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// How a scalar function renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// `NAME(arg, ...)`.
    Call(&'static str),
    /// A bare keyword with no argument list.
    Keyword(&'static str),
    /// Rewritten by the interpreter.
    Rewrite,
    /// No PostgreSQL rendering.
    Unsupported,
}

/// Looks up the rendering of a scalar function.
#[must_use]
pub fn scalar(kind: &FunctionKind) -> Translation {
    use Translation::{Call, Keyword, Rewrite};

    match kind {
        FunctionKind::CurrentDate => Keyword("CURRENT_DATE"),
        FunctionKind::CurrentTime => Keyword("CURRENT_TIME"),
        FunctionKind::CurrentTimestamp => Keyword("CURRENT_TIMESTAMP"),
        FunctionKind::UtcNow => Keyword("(CURRENT_TIMESTAMP AT TIME ZONE 'UTC')"),
        FunctionKind::Random => Call("RANDOM"),
        FunctionKind::NewGuid => Call("GEN_RANDOM_UUID"),
        FunctionKind::Coalesce => Call("COALESCE"),
        FunctionKind::NullIf => Call("NULLIF"),
        FunctionKind::Greatest => Call("GREATEST"),
        FunctionKind::Least => Call("LEAST"),
        FunctionKind::Abs => Call("ABS"),
        FunctionKind::Ceiling => Call("CEILING"),
        FunctionKind::Floor => Call("FLOOR"),
        FunctionKind::Round => Call("ROUND"),
        FunctionKind::Truncate => Call("TRUNC"),
        FunctionKind::Power => Call("POWER"),
        FunctionKind::Sqrt => Call("SQRT"),
        FunctionKind::Sign => Call("SIGN"),
        FunctionKind::Exp => Call("EXP"),
        FunctionKind::Ln => Call("LN"),
        FunctionKind::Log10 => Call("LOG"),
        FunctionKind::Length => Call("LENGTH"),
        FunctionKind::Lower => Call("LOWER"),
        FunctionKind::Upper => Call("UPPER"),
        FunctionKind::Trim => Call("BTRIM"),
        FunctionKind::TrimStart => Call("LTRIM"),
        FunctionKind::TrimEnd => Call("RTRIM"),
        FunctionKind::Substring => Call("SUBSTR"),
        FunctionKind::IndexOf => Call("STRPOS"),
        FunctionKind::Replace => Call("REPLACE"),
        FunctionKind::Concat => Call("CONCAT"),
        FunctionKind::Left => Call("LEFT"),
        FunctionKind::Right => Call("RIGHT"),
        FunctionKind::Reverse => Call("REVERSE"),
        FunctionKind::PadLeft => Call("LPAD"),
        FunctionKind::PadRight => Call("RPAD"),
        FunctionKind::LastIndexOf
        | FunctionKind::DatePart(_)
        | FunctionKind::DateAdd(_)
        | FunctionKind::DateDiff(_)
        | FunctionKind::DateTrunc(_)
        | FunctionKind::ToTicks
        | FunctionKind::FromTicks => Rewrite,
        FunctionKind::Custom(custom) => {
            if custom.downcast_ref::<GenRandomUuid>().is_some() {
                Call("GEN_RANDOM_UUID")
            } else if custom.downcast_ref::<ToJsonb>().is_some() {
                Call("TO_JSONB")
            } else {
                Translation::Unsupported
            }
        }
    }
}

/// Name of an aggregate, or `None` for an unrecognized custom aggregate.
#[must_use]
pub fn aggregate(kind: &AggregateKind) -> Option<&'static str> {
    Some(match kind {
        AggregateKind::Count | AggregateKind::CountAll => "COUNT",
        AggregateKind::Sum => "SUM",
        AggregateKind::Avg => "AVG",
        AggregateKind::Min => "MIN",
        AggregateKind::Max => "MAX",
        AggregateKind::StringAgg => "STRING_AGG",
        AggregateKind::BoolAnd => "BOOL_AND",
        AggregateKind::BoolOr => "BOOL_OR",
        AggregateKind::StdDev => "STDDEV_SAMP",
        AggregateKind::Variance => "VAR_SAMP",
        AggregateKind::Custom(custom) => {
            custom.downcast_ref::<JsonbAgg>()?;
            "JSONB_AGG"
        }
    })
}

/// Name of a window function, or `None` for an unrecognized custom
/// aggregate.
#[must_use]
pub fn window(kind: &WindowKind) -> Option<&'static str> {
    Some(match kind {
        WindowKind::RowNumber => "ROW_NUMBER",
        WindowKind::Rank => "RANK",
        WindowKind::DenseRank => "DENSE_RANK",
        WindowKind::PercentRank => "PERCENT_RANK",
        WindowKind::CumeDist => "CUME_DIST",
        WindowKind::Ntile => "NTILE",
        WindowKind::Lag => "LAG",
        WindowKind::Lead => "LEAD",
        WindowKind::FirstValue => "FIRST_VALUE",
        WindowKind::LastValue => "LAST_VALUE",
        WindowKind::NthValue => "NTH_VALUE",
        WindowKind::Aggregate(kind) => return aggregate(kind),
    })
}

/// `EXTRACT` field for a date part.
#[must_use]
pub const fn extract_field(part: DatePart) -> &'static str {
    match part {
        DatePart::Year => "YEAR",
        DatePart::Quarter => "QUARTER",
        DatePart::Month => "MONTH",
        DatePart::Week => "WEEK",
        DatePart::Day => "DAY",
        DatePart::DayOfWeek => "DOW",
        DatePart::DayOfYear => "DOY",
        DatePart::Hour => "HOUR",
        DatePart::Minute => "MINUTE",
        DatePart::Second => "SECOND",
        DatePart::Millisecond => "MILLISECONDS",
    }
}

/// `DATE_TRUNC` field for a unit.
#[must_use]
pub const fn trunc_field(unit: DateUnit) -> &'static str {
    match unit {
        DateUnit::Millisecond => "milliseconds",
        DateUnit::Microsecond => "microseconds",
        other => other.as_str(),
    }
}

/// `MAKE_INTERVAL` argument for a unit, with the factor applied to the
/// amount. A factor below one is written as a divisor.
#[must_use]
pub const fn make_interval_field(unit: DateUnit) -> (&'static str, Scale) {
    match unit {
        DateUnit::Year => ("years", Scale::One),
        DateUnit::Quarter => ("months", Scale::Multiply("3")),
        DateUnit::Month => ("months", Scale::One),
        DateUnit::Week => ("weeks", Scale::One),
        DateUnit::Day => ("days", Scale::One),
        DateUnit::Hour => ("hours", Scale::One),
        DateUnit::Minute => ("mins", Scale::One),
        DateUnit::Second => ("secs", Scale::One),
        DateUnit::Millisecond => ("secs", Scale::Divide("1000.0")),
        DateUnit::Microsecond => ("secs", Scale::Divide("1000000.0")),
    }
}

/// Seconds-based scaling of an epoch difference for a sub-month unit.
/// `None` for units measured on the calendar (years, quarters, months).
#[must_use]
pub const fn epoch_scale(unit: DateUnit) -> Option<Scale> {
    match unit {
        DateUnit::Year | DateUnit::Quarter | DateUnit::Month => None,
        DateUnit::Week => Some(Scale::Divide("604800")),
        DateUnit::Day => Some(Scale::Divide("86400")),
        DateUnit::Hour => Some(Scale::Divide("3600")),
        DateUnit::Minute => Some(Scale::Divide("60")),
        DateUnit::Second => Some(Scale::One),
        DateUnit::Millisecond => Some(Scale::Multiply("1000")),
        DateUnit::Microsecond => Some(Scale::Multiply("1000000")),
    }
}

/// A constant factor applied to a rendered operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    One,
    Multiply(&'static str),
    Divide(&'static str),
}

impl Scale {
    /// The operator suffix, e.g. ` * 3`.
    #[must_use]
    pub fn suffix(self) -> String {
        match self {
            Self::One => String::new(),
            Self::Multiply(factor) => format!(" * {factor}"),
            Self::Divide(divisor) => format!(" / {divisor}"),
        }
    }
}
