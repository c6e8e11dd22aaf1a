//! Literal values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::types::LogicalType;

/// A constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer.
    Integer(i64),
    /// Float.
    Float(f64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Character string.
    String(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Timestamp without offset.
    DateTime(NaiveDateTime),
    /// Timestamp with UTC offset.
    DateTimeOffset(DateTime<FixedOffset>),
    /// Elapsed time.
    TimeSpan(TimeDelta),
    /// Unique identifier.
    Guid(Uuid),
}

impl Literal {
    /// Returns the logical type of the value.
    #[must_use]
    pub const fn logical_type(&self) -> LogicalType {
        match self {
            Self::Integer(_) => LogicalType::Int64,
            Self::Float(_) => LogicalType::Double,
            Self::Decimal(_) => LogicalType::Decimal,
            Self::String(_) => LogicalType::String,
            Self::Bytes(_) => LogicalType::Binary,
            Self::Date(_) => LogicalType::Date,
            Self::Time(_) => LogicalType::Time,
            Self::DateTime(_) => LogicalType::DateTime,
            Self::DateTimeOffset(_) => LogicalType::DateTimeOffset,
            Self::TimeSpan(_) => LogicalType::TimeSpan,
            Self::Guid(_) => LogicalType::Guid,
        }
    }
}

macro_rules! literal_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(impl From<$ty> for Literal {
            fn from($v: $ty) -> Self {
                $body
            }
        })*
    };
}

literal_from! {
    i16 => |v| Self::Integer(i64::from(v)),
    i32 => |v| Self::Integer(i64::from(v)),
    i64 => |v| Self::Integer(v),
    f32 => |v| Self::Float(f64::from(v)),
    f64 => |v| Self::Float(v),
    Decimal => |v| Self::Decimal(v),
    String => |v| Self::String(v),
    &str => |v| Self::String(v.to_string()),
    Vec<u8> => |v| Self::Bytes(v),
    &[u8] => |v| Self::Bytes(v.to_vec()),
    NaiveDate => |v| Self::Date(v),
    NaiveTime => |v| Self::Time(v),
    NaiveDateTime => |v| Self::DateTime(v),
    DateTime<FixedOffset> => |v| Self::DateTimeOffset(v),
    DateTime<Utc> => |v| Self::DateTimeOffset(v.fixed_offset()),
    TimeDelta => |v| Self::TimeSpan(v),
    Uuid => |v| Self::Guid(v),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Literal::from(42_i32), Literal::Integer(42));
        assert_eq!(Literal::from("x"), Literal::String("x".into()));
        assert_eq!(Literal::from(&[1_u8, 2][..]), Literal::Bytes(vec![1, 2]));
    }

    #[test]
    fn test_logical_type() {
        assert_eq!(Literal::from(1.5).logical_type(), LogicalType::Double);
        assert_eq!(
            Literal::from(Uuid::nil()).logical_type(),
            LogicalType::Guid
        );
        assert_eq!(
            Literal::from(TimeDelta::seconds(3)).logical_type(),
            LogicalType::TimeSpan
        );
    }
}
