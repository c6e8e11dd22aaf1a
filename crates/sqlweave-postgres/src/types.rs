//! PostgreSQL data-type catalogue.
//!
//! Every type carries its PostgreSQL OID as the native tag. Unparameterized
//! types and the default forms of parameterized ones are process-wide
//! singletons, so resolving the same logical type twice yields the same
//! `Arc`.
//!
//! ```
//! use std::sync::Arc;
//! use sqlweave_core::types::{LogicalType, TypeDefinitions};
//! use sqlweave_postgres::types::{self, PostgresTypeDefinitions};
//!
//! let money = types::decimal(19, 4).unwrap();
//! assert_eq!(money.to_sql(), "DECIMAL(19, 4)");
//!
//! let default = PostgresTypeDefinitions.data_type(LogicalType::Decimal).unwrap();
//! assert!(Arc::ptr_eq(&default, &types::decimal(29, 10).unwrap()));
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;
use sqlweave_core::error::DataTypeError;
use sqlweave_core::types::{LogicalType, ParameterBounds, SqlDataType, TypeDefinitions};

/// PostgreSQL type OIDs used by the catalogue.
pub mod oid {
    pub const BOOL: u32 = 16;
    pub const BYTEA: u32 = 17;
    pub const INT8: u32 = 20;
    pub const INT2: u32 = 21;
    pub const INT4: u32 = 23;
    pub const TEXT: u32 = 25;
    pub const FLOAT4: u32 = 700;
    pub const FLOAT8: u32 = 701;
    pub const CHAR: u32 = 1042;
    pub const VARCHAR: u32 = 1043;
    pub const DATE: u32 = 1082;
    pub const TIME: u32 = 1083;
    pub const TIMESTAMP: u32 = 1114;
    pub const TIMESTAMPTZ: u32 = 1184;
    pub const INTERVAL: u32 = 1186;
    pub const NUMERIC: u32 = 1700;
    pub const UUID: u32 = 2950;
    pub const JSONB: u32 = 3802;
}

pub const DECIMAL_PRECISION: ParameterBounds = ParameterBounds::new("precision", 0, 1000);
pub const DECIMAL_SCALE: ParameterBounds = ParameterBounds::new("scale", -1000, 1000);
pub const VARCHAR_LENGTH: ParameterBounds = ParameterBounds::new("length", 0, 10_485_760);
pub const CHAR_LENGTH: ParameterBounds = ParameterBounds::new("length", 1, 10_485_760);
pub const TEMPORAL_PRECISION: ParameterBounds = ParameterBounds::new("precision", 0, 6);

/// Precision and scale of the canonical decimal.
pub const DEFAULT_DECIMAL: (i64, i64) = (29, 10);

macro_rules! simple_types {
    ($($fn_name:ident, $static_name:ident => $sql:literal, $oid:ident, $logical:ident;)*) => {
        $(
            static $static_name: Lazy<Arc<SqlDataType>> = Lazy::new(|| {
                Arc::new(SqlDataType::simple($sql, oid::$oid, LogicalType::$logical))
            });

            #[doc = concat!("`", $sql, "`.")]
            #[must_use]
            pub fn $fn_name() -> Arc<SqlDataType> {
                Arc::clone(&$static_name)
            }
        )*
    };
}

simple_types! {
    boolean, BOOL => "BOOL", BOOL, Boolean;
    int2, INT2 => "INT2", INT2, Int16;
    int4, INT4 => "INT4", INT4, Int32;
    int8, INT8 => "INT8", INT8, Int64;
    float4, FLOAT4 => "FLOAT4", FLOAT4, Single;
    float8, FLOAT8 => "FLOAT8", FLOAT8, Double;
    text, TEXT => "TEXT", TEXT, String;
    bytea, BYTEA => "BYTEA", BYTEA, Binary;
    uuid, UUID => "UUID", UUID, Guid;
    date, DATE => "DATE", DATE, Date;
    interval, INTERVAL => "INTERVAL", INTERVAL, TimeSpan;
    jsonb, JSONB => "JSONB", JSONB, Json;
}

static DECIMAL: Lazy<Arc<SqlDataType>> = Lazy::new(|| {
    Arc::new(
        SqlDataType::parameterized(
            "DECIMAL",
            oid::NUMERIC,
            LogicalType::Decimal,
            &[DECIMAL_PRECISION, DECIMAL_SCALE],
            &[DEFAULT_DECIMAL.0, DEFAULT_DECIMAL.1],
        )
        .unwrap_or_else(|_| SqlDataType::simple("DECIMAL", oid::NUMERIC, LogicalType::Decimal)),
    )
});

static VARCHAR: Lazy<Arc<SqlDataType>> = Lazy::new(|| {
    Arc::new(SqlDataType::simple("VARCHAR", oid::VARCHAR, LogicalType::String))
});

static TIME: Lazy<Arc<SqlDataType>> =
    Lazy::new(|| Arc::new(SqlDataType::simple("TIME", oid::TIME, LogicalType::Time)));

static TIMESTAMP: Lazy<Arc<SqlDataType>> = Lazy::new(|| {
    Arc::new(SqlDataType::simple("TIMESTAMP", oid::TIMESTAMP, LogicalType::DateTime))
});

static TIMESTAMPTZ: Lazy<Arc<SqlDataType>> = Lazy::new(|| {
    Arc::new(SqlDataType::simple(
        "TIMESTAMPTZ",
        oid::TIMESTAMPTZ,
        LogicalType::DateTimeOffset,
    ))
});

/// `DECIMAL(precision, scale)`.
///
/// `(29, 10)` returns the shared canonical instance.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] when precision is outside
/// `[0, 1000]` or scale is outside `[-1000, 1000]`.
pub fn decimal(precision: i64, scale: i64) -> Result<Arc<SqlDataType>, DataTypeError> {
    let data_type = SqlDataType::parameterized(
        "DECIMAL",
        oid::NUMERIC,
        LogicalType::Decimal,
        &[DECIMAL_PRECISION, DECIMAL_SCALE],
        &[precision, scale],
    )?;
    if (precision, scale) == DEFAULT_DECIMAL {
        return Ok(Arc::clone(&DECIMAL));
    }
    Ok(Arc::new(data_type))
}

/// `VARCHAR` or `VARCHAR(length)`.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] for a length outside
/// `[0, 10485760]`.
pub fn varchar(length: Option<i64>) -> Result<Arc<SqlDataType>, DataTypeError> {
    match length {
        None => Ok(Arc::clone(&VARCHAR)),
        Some(length) => SqlDataType::parameterized(
            "VARCHAR",
            oid::VARCHAR,
            LogicalType::String,
            &[VARCHAR_LENGTH],
            &[length],
        )
        .map(Arc::new),
    }
}

/// `CHAR(length)`.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] for a length outside
/// `[1, 10485760]`.
pub fn fixed_char(length: i64) -> Result<Arc<SqlDataType>, DataTypeError> {
    SqlDataType::parameterized(
        "CHAR",
        oid::CHAR,
        LogicalType::String,
        &[CHAR_LENGTH],
        &[length],
    )
    .map(Arc::new)
}

fn temporal(
    name: &'static str,
    native: u32,
    logical: LogicalType,
    cached: &Lazy<Arc<SqlDataType>>,
    precision: Option<i64>,
) -> Result<Arc<SqlDataType>, DataTypeError> {
    match precision {
        None => Ok(Arc::clone(cached)),
        Some(precision) => {
            SqlDataType::parameterized(name, native, logical, &[TEMPORAL_PRECISION], &[precision])
                .map(Arc::new)
        }
    }
}

/// `TIME` or `TIME(precision)`.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] for a precision outside `[0, 6]`.
pub fn time(precision: Option<i64>) -> Result<Arc<SqlDataType>, DataTypeError> {
    temporal("TIME", oid::TIME, LogicalType::Time, &TIME, precision)
}

/// `TIMESTAMP` or `TIMESTAMP(precision)`.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] for a precision outside `[0, 6]`.
pub fn timestamp(precision: Option<i64>) -> Result<Arc<SqlDataType>, DataTypeError> {
    temporal(
        "TIMESTAMP",
        oid::TIMESTAMP,
        LogicalType::DateTime,
        &TIMESTAMP,
        precision,
    )
}

/// `TIMESTAMPTZ` or `TIMESTAMPTZ(precision)`.
///
/// # Errors
///
/// Returns [`DataTypeError::OutOfBounds`] for a precision outside `[0, 6]`.
pub fn timestamptz(precision: Option<i64>) -> Result<Arc<SqlDataType>, DataTypeError> {
    temporal(
        "TIMESTAMPTZ",
        oid::TIMESTAMPTZ,
        LogicalType::DateTimeOffset,
        &TIMESTAMPTZ,
        precision,
    )
}

/// The default PostgreSQL type-definition provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresTypeDefinitions;

impl TypeDefinitions for PostgresTypeDefinitions {
    fn dialect(&self) -> &'static str {
        "postgresql"
    }

    fn data_type(&self, logical: LogicalType) -> Result<Arc<SqlDataType>, DataTypeError> {
        Ok(match logical {
            LogicalType::Boolean => boolean(),
            LogicalType::Int16 => int2(),
            LogicalType::Int32 => int4(),
            LogicalType::Int64 => int8(),
            LogicalType::Single => float4(),
            LogicalType::Double => float8(),
            LogicalType::Decimal => Arc::clone(&DECIMAL),
            LogicalType::String => Arc::clone(&VARCHAR),
            LogicalType::Binary => bytea(),
            LogicalType::Guid => uuid(),
            LogicalType::Date => date(),
            LogicalType::Time => Arc::clone(&TIME),
            LogicalType::DateTime => Arc::clone(&TIMESTAMP),
            LogicalType::DateTimeOffset => Arc::clone(&TIMESTAMPTZ),
            LogicalType::TimeSpan => interval(),
            LogicalType::Json => jsonb(),
        })
    }
}
