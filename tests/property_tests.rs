//! Property-based tests for SqlValue and parameter rendering using proptest

use proptest::prelude::*;
use sqlcraft::prelude::*;

// ============================================================================
// SqlValue Roundtrip Tests
// ============================================================================

proptest! {
    /// Bool values roundtrip correctly
    #[test]
    fn test_bool_roundtrip(value in any::<bool>()) {
        let val = SqlValue::from(value);
        assert_eq!(val.as_bool(), Some(value));
        assert!(!val.is_null());
        assert_eq!(val.type_name(), "bool");
    }

    /// Int values roundtrip correctly
    #[test]
    fn test_int_roundtrip(value in any::<i32>()) {
        let val = SqlValue::from(value);
        assert_eq!(val.as_int(), Some(value));
        assert_eq!(val.as_long(), Some(value as i64));
        assert_eq!(val.type_name(), "int");
    }

    /// Long values roundtrip correctly
    #[test]
    fn test_long_roundtrip(value in any::<i64>()) {
        let val = SqlValue::from(value);
        assert_eq!(val.as_long(), Some(value));
        assert_eq!(val.type_name(), "long");
    }

    /// Double values roundtrip correctly (excluding NaN and infinities)
    #[test]
    fn test_double_roundtrip(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let val = SqlValue::from(value);
        let retrieved = val.as_double().unwrap();
        assert!((retrieved - value).abs() < 1e-10 || retrieved == value);
        assert_eq!(val.type_name(), "double");
    }

    /// String values roundtrip correctly
    #[test]
    fn test_string_roundtrip(value in ".*") {
        let val = SqlValue::from(value.clone());
        assert_eq!(val.as_str(), Some(value.as_str()));
        assert_eq!(val.as_string(), value);
        assert_eq!(val.type_name(), "string");
    }

    /// Bytes values roundtrip correctly
    #[test]
    fn test_bytes_roundtrip(value in proptest::collection::vec(any::<u8>(), 0..256)) {
        let val = SqlValue::from(value.clone());
        assert_eq!(val.as_bytes(), Some(value.as_slice()));
        assert_eq!(val.type_name(), "bytes");
    }

    /// The JSON bridge never panics and preserves scalar values
    #[test]
    fn test_json_bridge_roundtrip(value in any::<i64>()) {
        let json = SqlValue::Long(value).to_json();
        let back = SqlValue::from_json(&json).unwrap();
        assert_eq!(back, SqlValue::Long(value));
    }
}

// ============================================================================
// Parameter Rendering Properties
// ============================================================================

proptest! {
    /// Text without placeholders renders unchanged for every dialect
    #[test]
    fn test_text_without_placeholders_unchanged(text in "[a-zA-Z0-9 ,=<>()*.]*") {
        for dialect in [
            SqlDialect::Sqlite,
            SqlDialect::Mysql,
            SqlDialect::Postgres,
            SqlDialect::SqlServer,
        ] {
            let (rendered, values) = sqlcraft::core::bind::render(&text, &[], dialect).unwrap();
            assert_eq!(rendered, text);
            assert!(values.is_empty());
        }
    }

    /// A list parameter expands to exactly one positional value per element
    #[test]
    fn test_list_expansion_counts(items in proptest::collection::vec(any::<i32>(), 1..20)) {
        let params = vec![Parameter::list("ids", items.clone())];
        let (rendered, values) =
            sqlcraft::core::bind::render("SELECT * FROM t WHERE id IN (@ids)", &params, SqlDialect::Sqlite)
                .unwrap();
        assert_eq!(values.len(), items.len());
        assert_eq!(rendered.matches('?').count(), items.len());
    }

    /// Repeated scalar references push one value per occurrence
    #[test]
    fn test_repeated_reference_counts(n in 1usize..10) {
        let text = (0..n).map(|_| "@v").collect::<Vec<_>>().join(" + ");
        let params = vec![Parameter::single("v", 1)];
        let (_, values) =
            sqlcraft::core::bind::render(&text, &params, SqlDialect::Postgres).unwrap();
        assert_eq!(values.len(), n);
    }

    /// Identifier quoting always wraps in the dialect's quote characters
    #[test]
    fn test_quote_always_wrapped(name in "[a-zA-Z_][a-zA-Z0-9_]{0,30}") {
        let quoted = SqlDialect::Sqlite.quote(&name);
        assert!(quoted.starts_with('[') && quoted.ends_with(']'));
        let quoted = SqlDialect::Postgres.quote(&name);
        assert!(quoted.starts_with('"') && quoted.ends_with('"'));
    }
}
