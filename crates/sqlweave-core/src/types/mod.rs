//! SQL data types.
//!
//! Every dialect describes its column types with [`SqlDataType`]: a canonical
//! name, the dialect's native type code and the [`LogicalType`] it maps back
//! to. Parameterized types (precision, scale, length) validate their
//! parameters against [`ParameterBounds`] on construction.
//!
//! A dialect exposes its catalogue through [`TypeDefinitions`], which the
//! interpreters consult when a node only carries a logical type.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DataTypeError;

/// Dialect-independent value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalType {
    /// True/false.
    Boolean,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// 32-bit float.
    Single,
    /// 64-bit float.
    Double,
    /// Exact decimal number.
    Decimal,
    /// Character data.
    String,
    /// Byte data.
    Binary,
    /// 128-bit unique identifier.
    Guid,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time without offset.
    DateTime,
    /// Date and time with UTC offset.
    DateTimeOffset,
    /// Elapsed time.
    TimeSpan,
    /// JSON document.
    Json,
}

impl LogicalType {
    /// Every logical type, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Boolean,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Single,
        Self::Double,
        Self::Decimal,
        Self::String,
        Self::Binary,
        Self::Guid,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::TimeSpan,
        Self::Json,
    ];

    /// Returns the name of the logical type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Single => "single",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Guid => "guid",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::DateTimeOffset => "datetimeoffset",
            Self::TimeSpan => "timespan",
            Self::Json => "json",
        }
    }

    /// Returns true for the integer, float and decimal types.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int16 | Self::Int32 | Self::Int64 | Self::Single | Self::Double | Self::Decimal
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rust types with a fixed [`LogicalType`].
///
/// Used by typed column and parameter constructors:
///
/// ```
/// use sqlweave_core::types::{LogicalType, SqlTyped};
///
/// assert_eq!(<i32 as SqlTyped>::LOGICAL_TYPE, LogicalType::Int32);
/// assert_eq!(<Option<String> as SqlTyped>::LOGICAL_TYPE, LogicalType::String);
/// ```
pub trait SqlTyped {
    /// The logical type of the Rust type.
    const LOGICAL_TYPE: LogicalType;
}

macro_rules! sql_typed {
    ($($ty:ty => $logical:ident),* $(,)?) => {
        $(impl SqlTyped for $ty {
            const LOGICAL_TYPE: LogicalType = LogicalType::$logical;
        })*
    };
}

sql_typed! {
    bool => Boolean,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    &str => String,
    Vec<u8> => Binary,
    Uuid => Guid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    DateTime<Utc> => DateTimeOffset,
    TimeDelta => TimeSpan,
}

impl<T: SqlTyped> SqlTyped for Option<T> {
    const LOGICAL_TYPE: LogicalType = T::LOGICAL_TYPE;
}

/// Inclusive bounds of one integer parameter of a parameterized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterBounds {
    /// Parameter name used in error messages.
    pub name: &'static str,
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

impl ParameterBounds {
    /// Creates parameter bounds.
    #[must_use]
    pub const fn new(name: &'static str, min: i64, max: i64) -> Self {
        Self { name, min, max }
    }

    /// Returns true if `value` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Checks `value` against the bounds of a parameter of `type_name`.
    pub fn check(&self, type_name: &str, value: i64) -> Result<i64, DataTypeError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(DataTypeError::OutOfBounds {
                type_name: type_name.to_string(),
                parameter: self.name,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// A concrete data type of one dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlDataType {
    name: Cow<'static, str>,
    native: u32,
    logical: LogicalType,
    parameters: Vec<i64>,
}

impl SqlDataType {
    /// Creates an unparameterized data type.
    #[must_use]
    pub const fn simple(name: &'static str, native: u32, logical: LogicalType) -> Self {
        Self {
            name: Cow::Borrowed(name),
            native,
            logical,
            parameters: Vec::new(),
        }
    }

    /// Creates a parameterized data type after checking every parameter
    /// against its bounds.
    ///
    /// `values` may be shorter than `bounds` to leave trailing parameters
    /// unspecified; it may never be longer.
    pub fn parameterized(
        name: &'static str,
        native: u32,
        logical: LogicalType,
        bounds: &[ParameterBounds],
        values: &[i64],
    ) -> Result<Self, DataTypeError> {
        if values.len() > bounds.len() {
            return Err(DataTypeError::ParameterCount {
                type_name: name.to_string(),
                expected: bounds.len(),
                actual: values.len(),
            });
        }
        let parameters = bounds
            .iter()
            .zip(values)
            .map(|(bound, &value)| bound.check(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: Cow::Borrowed(name),
            native,
            logical,
            parameters,
        })
    }

    /// Returns the canonical type name, without parameters.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dialect's native type code.
    #[must_use]
    pub const fn native_type(&self) -> u32 {
        self.native
    }

    /// Returns the logical type this data type maps to.
    #[must_use]
    pub const fn logical_type(&self) -> LogicalType {
        self.logical
    }

    /// Returns the type parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[i64] {
        &self.parameters
    }

    /// Returns the SQL representation, e.g. `DECIMAL(29, 10)`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SqlDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.parameters.is_empty() {
            f.write_str("(")?;
            for (i, p) in self.parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{p}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A dialect's data type catalogue.
pub trait TypeDefinitions: fmt::Debug + Send + Sync {
    /// Returns the dialect name.
    fn dialect(&self) -> &'static str;

    /// Returns the default data type for a logical type.
    fn data_type(&self, logical: LogicalType) -> Result<Arc<SqlDataType>, DataTypeError>;

    /// Returns the logical type of a data type.
    fn logical_type(&self, data_type: &SqlDataType) -> LogicalType {
        data_type.logical_type()
    }
}
