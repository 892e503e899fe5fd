use criteria_syntax::{Arity, Operator, ParseOptions, SyntaxError, parse_filters, parse_filters_with};

#[test]
fn test_unknown_operator_names_segment_and_hint() {
    let err = parse_filters("age:gte(1),name:like(Jo)").unwrap_err();
    match &err {
        SyntaxError::UnknownOperator {
            segment, operator, ..
        } => {
            assert_eq!(segment, "name:like(Jo)");
            assert_eq!(operator, "like");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("name:eq(...)"));
}

#[test]
fn test_wrong_operand_counts() {
    let err = parse_filters("age:between(1)").unwrap_err();
    assert_eq!(
        err,
        SyntaxError::Arity {
            segment: "age:between(1)".to_string(),
            operator: Operator::Between,
            expected: Arity::Two,
            found: 1,
        }
    );

    assert!(matches!(
        parse_filters("age:eq()"),
        Err(SyntaxError::Arity { found: 0, .. })
    ));
    assert!(matches!(
        parse_filters("status:in()"),
        Err(SyntaxError::Arity { found: 0, .. })
    ));
    assert!(matches!(
        parse_filters("age:eq(1,2)"),
        Err(SyntaxError::Arity { found: 2, .. })
    ));
}

#[test]
fn test_missing_operands_and_columns() {
    assert!(matches!(
        parse_filters("age:"),
        Err(SyntaxError::Malformed { .. })
    ));
    assert!(matches!(
        parse_filters("justtext"),
        Err(SyntaxError::Malformed { .. })
    ));
    assert!(matches!(
        parse_filters(":eq(1)"),
        Err(SyntaxError::InvalidColumn { .. })
    ));
    assert!(matches!(
        parse_filters("a..b:eq(1)"),
        Err(SyntaxError::InvalidColumn { .. })
    ));
    assert!(matches!(
        parse_filters("status:in(a,,b)"),
        Err(SyntaxError::Malformed { .. })
    ));
}

#[test]
fn test_unclosed_operator_call_is_malformed() {
    for text in [
        "name:contains(Jo",
        "age:eq(25",
        "name:startswith(a)b)",
        "age:gte(1)(2)",
    ] {
        let err = parse_filters(text).unwrap_err();
        assert!(
            matches!(err, SyntaxError::Malformed { ref segment, .. } if segment == text),
            "'{text}' gave {err:?}"
        );
    }

    // Escaped or spaced parentheses are still a plain value.
    assert!(parse_filters(r"name:contains\(Jo").is_ok());
    assert!(parse_filters("name:John (Jr").is_ok());
}

#[test]
fn test_group_shape_errors() {
    assert!(matches!(
        parse_filters("and()"),
        Err(SyntaxError::EmptyGroup { .. })
    ));
    assert!(matches!(
        parse_filters("not(a:1,b:2)"),
        Err(SyntaxError::NotArity { found: 2, .. })
    ));
    assert!(matches!(
        parse_filters("a:1,,b:2"),
        Err(SyntaxError::EmptyCriterion { .. })
    ));
}

#[test]
fn test_simplified_equality_can_be_disabled() {
    let strict = ParseOptions {
        allow_simplified_equality: false,
        ..ParseOptions::default()
    };
    assert!(parse_filters_with("name:eq(John)", &strict).is_ok());
    assert!(matches!(
        parse_filters_with("name:John", &strict),
        Err(SyntaxError::SimplifiedEqualityDisabled { .. })
    ));
}

#[test]
fn test_parse_options_from_json() {
    let options: ParseOptions = serde_json::from_str(r#"{"max_depth": 4}"#).unwrap();
    assert_eq!(options.max_depth, 4);
    assert!(options.allow_simplified_equality);
}
