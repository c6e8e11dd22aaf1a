//! Property tests for data-type parameter bounds and parameter collection.

use proptest::prelude::*;
use sqlweave_core::ast::Expr;
use sqlweave_core::error::DataTypeError;
use sqlweave_postgres::{types, PostgresInterpreter};

proptest! {
    #[test]
    fn decimal_accepts_exactly_its_bounds(precision in -50_i64..1100, scale in -1100_i64..1100) {
        let in_bounds = (0..=1000).contains(&precision) && (-1000..=1000).contains(&scale);
        match types::decimal(precision, scale) {
            Ok(data_type) => {
                prop_assert!(in_bounds);
                prop_assert_eq!(data_type.parameters(), &[precision, scale][..]);
                prop_assert_eq!(data_type.to_sql(), format!("DECIMAL({precision}, {scale})"));
            }
            Err(DataTypeError::OutOfBounds { type_name, value, .. }) => {
                prop_assert!(!in_bounds);
                prop_assert_eq!(type_name, "DECIMAL");
                prop_assert!(value == precision || value == scale);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn temporal_precision_is_zero_to_six(precision in -10_i64..20) {
        prop_assert_eq!(types::timestamp(Some(precision)).is_ok(), (0..=6).contains(&precision));
        prop_assert_eq!(types::time(Some(precision)).is_ok(), (0..=6).contains(&precision));
    }

    #[test]
    fn char_length_starts_at_one(length in -5_i64..5) {
        prop_assert_eq!(types::fixed_char(length).is_ok(), length >= 1);
        prop_assert_eq!(types::varchar(Some(length)).is_ok(), length >= 0);
    }

    #[test]
    fn parameters_are_deduplicated(names in prop::collection::vec("[a-c]", 1..8)) {
        let expr = names
            .iter()
            .map(Expr::param)
            .reduce(Expr::add)
            .unwrap_or_else(Expr::null);
        let compiled = PostgresInterpreter::new().compile_expr(&expr).unwrap();

        let mut expected: Vec<&str> = Vec::new();
        for name in &names {
            if !expected.contains(&name.as_str()) {
                expected.push(name);
            }
        }
        prop_assert_eq!(compiled.parameter_names(), expected);
    }
}
