//! Scalar, aggregate and window functions.
//!
//! Function kinds are portable: each dialect interpreter maps them onto its
//! own built-ins, rewriting where the dialect has no direct equivalent.

use super::custom::{CustomAggregateRef, CustomFunctionRef};
use super::expression::Expr;
use super::traits::TraitChain;

/// Accepted argument counts of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
    /// At least `n` arguments.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` arguments are accepted.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::AtLeast(n) => count >= n,
        }
    }
}

/// Units for date arithmetic and truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

impl DateUnit {
    /// Returns the lowercase unit name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Millisecond => "millisecond",
            Self::Microsecond => "microsecond",
        }
    }
}

/// Fields extractable from a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    DayOfWeek,
    DayOfYear,
    Hour,
    Minute,
    Second,
    Millisecond,
}

/// Portable scalar functions.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionKind {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    UtcNow,
    Random,
    NewGuid,
    Coalesce,
    NullIf,
    Greatest,
    Least,
    Abs,
    Ceiling,
    Floor,
    /// `ROUND(x)` or `ROUND(x, digits)`.
    Round,
    /// Truncates toward zero, optionally to a number of digits.
    Truncate,
    Power,
    Sqrt,
    Sign,
    Exp,
    Ln,
    Log10,
    Length,
    Lower,
    Upper,
    Trim,
    TrimStart,
    TrimEnd,
    /// `SUBSTRING(s, start)` or `SUBSTRING(s, start, length)`, 1-based.
    Substring,
    /// 1-based position of the needle, 0 when absent.
    IndexOf,
    /// 1-based position of the last occurrence, 0 when absent.
    LastIndexOf,
    Replace,
    Concat,
    Left,
    Right,
    Reverse,
    PadLeft,
    PadRight,
    DatePart(DatePart),
    /// `DATE ADD(unit, value, amount)` with arguments `(value, amount)`.
    DateAdd(DateUnit),
    /// Whole units elapsed from the first argument to the second.
    DateDiff(DateUnit),
    DateTrunc(DateUnit),
    /// 100-nanosecond intervals since 0001-01-01T00:00:00Z.
    ToTicks,
    /// Inverse of [`FunctionKind::ToTicks`].
    FromTicks,
    /// An extension function.
    Custom(CustomFunctionRef),
}

impl FunctionKind {
    /// Returns the accepted argument counts.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Self::CurrentDate
            | Self::CurrentTime
            | Self::CurrentTimestamp
            | Self::UtcNow
            | Self::Random
            | Self::NewGuid => Arity::Exact(0),
            Self::Coalesce | Self::Greatest | Self::Least | Self::Concat => Arity::AtLeast(1),
            Self::Abs
            | Self::Ceiling
            | Self::Floor
            | Self::Sqrt
            | Self::Sign
            | Self::Exp
            | Self::Ln
            | Self::Log10
            | Self::Length
            | Self::Lower
            | Self::Upper
            | Self::Trim
            | Self::TrimStart
            | Self::TrimEnd
            | Self::Reverse
            | Self::DatePart(_)
            | Self::DateTrunc(_)
            | Self::ToTicks
            | Self::FromTicks => Arity::Exact(1),
            Self::Round | Self::Truncate => Arity::Range(1, 2),
            Self::NullIf
            | Self::Power
            | Self::IndexOf
            | Self::LastIndexOf
            | Self::Left
            | Self::Right
            | Self::DateAdd(_)
            | Self::DateDiff(_) => Arity::Exact(2),
            Self::Substring | Self::PadLeft | Self::PadRight => Arity::Range(2, 3),
            Self::Replace => Arity::Exact(3),
            Self::Custom(custom) => custom.arity(),
        }
    }

    /// Returns true for the niladic current date/time functions, the only
    /// functions that are constant without any arguments.
    #[must_use]
    pub const fn is_current_temporal(&self) -> bool {
        matches!(
            self,
            Self::CurrentDate | Self::CurrentTime | Self::CurrentTimestamp | Self::UtcNow
        )
    }
}

/// A scalar function call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarFunction {
    /// Function.
    pub kind: FunctionKind,
    /// Arguments in call order.
    pub arguments: Vec<Expr>,
}

impl ScalarFunction {
    /// Creates a function call.
    #[must_use]
    pub const fn new(kind: FunctionKind, arguments: Vec<Expr>) -> Self {
        Self { kind, arguments }
    }
}

/// Portable aggregate functions.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateKind {
    Count,
    /// `COUNT(*)`.
    CountAll,
    Sum,
    Avg,
    Min,
    Max,
    /// `STRING_AGG(value, separator)`.
    StringAgg,
    BoolAnd,
    BoolOr,
    StdDev,
    Variance,
    /// An extension aggregate.
    Custom(CustomAggregateRef),
}

impl AggregateKind {
    /// Returns the accepted argument counts.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Self::CountAll => Arity::Exact(0),
            Self::StringAgg => Arity::Exact(2),
            Self::Custom(custom) => custom.arity(),
            _ => Arity::Exact(1),
        }
    }
}

/// An aggregate call.
///
/// Accepts the DISTINCT, FILTER and ORDER BY traits.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFunction {
    /// Aggregate.
    pub kind: AggregateKind,
    /// Arguments in call order.
    pub arguments: Vec<Expr>,
    /// Modifiers.
    pub traits: TraitChain,
}

impl AggregateFunction {
    /// Creates an aggregate call without traits.
    #[must_use]
    pub fn new(kind: AggregateKind, arguments: Vec<Expr>) -> Self {
        Self {
            kind,
            arguments,
            traits: TraitChain::new(),
        }
    }
}

/// Portable window functions.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowKind {
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile,
    Lag,
    Lead,
    FirstValue,
    LastValue,
    NthValue,
    /// An aggregate evaluated over the window.
    Aggregate(AggregateKind),
}

impl WindowKind {
    /// Returns the accepted argument counts.
    #[must_use]
    pub fn arity(&self) -> Arity {
        match self {
            Self::RowNumber | Self::Rank | Self::DenseRank | Self::PercentRank | Self::CumeDist => {
                Arity::Exact(0)
            }
            Self::Ntile | Self::FirstValue | Self::LastValue => Arity::Exact(1),
            Self::Lag | Self::Lead => Arity::Range(1, 3),
            Self::NthValue => Arity::Exact(2),
            Self::Aggregate(kind) => kind.arity(),
        }
    }
}

/// Frame units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    Rows,
    Range,
    Groups,
}

impl FrameMode {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

/// `ROWS|RANGE|GROUPS [BETWEEN start AND end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    /// Frame units.
    pub mode: FrameMode,
    /// Frame start.
    pub start: FrameBound,
    /// Frame end; `None` renders the single-bound form.
    pub end: Option<FrameBound>,
}

impl WindowFrame {
    /// Creates a `BETWEEN start AND end` frame.
    #[must_use]
    pub const fn between(mode: FrameMode, start: FrameBound, end: FrameBound) -> Self {
        Self {
            mode,
            start,
            end: Some(end),
        }
    }
}

/// A window function call.
///
/// Ordering inside the window comes from the ORDER BY trait; a named
/// window replaces the inline window definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFunction {
    /// Function.
    pub kind: WindowKind,
    /// Arguments in call order.
    pub arguments: Vec<Expr>,
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,
    /// Modifiers.
    pub traits: TraitChain,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
    /// Reference to a window declared by the WINDOW trait.
    pub window_name: Option<String>,
}

impl WindowFunction {
    /// Creates a window call over the whole partition set.
    #[must_use]
    pub fn new(kind: WindowKind, arguments: Vec<Expr>) -> Self {
        Self {
            kind,
            arguments,
            partition_by: Vec::new(),
            traits: TraitChain::new(),
            frame: None,
            window_name: None,
        }
    }

    /// Sets the `PARTITION BY` expressions.
    #[must_use]
    pub fn partition_by(mut self, exprs: Vec<Expr>) -> Self {
        self.partition_by = exprs;
        self
    }

    /// Sets the frame clause.
    #[must_use]
    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Refers to a named window.
    #[must_use]
    pub fn over(mut self, window_name: impl Into<String>) -> Self {
        self.window_name = Some(window_name.into());
        self
    }
}
