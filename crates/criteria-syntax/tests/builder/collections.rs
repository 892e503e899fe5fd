use criteria_syntax::{
    FilterCollection, FilterCriterion, Literal, Operator, SortCollection, SyntaxError,
    parse_filters,
};

#[test]
fn test_builder_matches_parser() {
    let built = FilterCollection::builder()
        .filter("age", Operator::GreaterThanOrEqual, ["25"])
        .or(|g| g.eq("status", "active").is_null("status"))
        .build()
        .unwrap();
    let parsed = parse_filters("age:gte(25),or(status:active,status:isnull())").unwrap();

    assert_eq!(built, parsed);
    assert_eq!(built.fingerprint(), parsed.fingerprint());
}

#[test]
fn test_typed_literals_serialize_as_text() {
    let built = FilterCollection::builder()
        .between("salary", 50_000, 60_000)
        .eq("active", true)
        .eq("ratio", 0.5)
        .build()
        .unwrap();
    assert_eq!(
        built.to_string(),
        "salary:between(50000,60000),active:eq(true),ratio:eq(0.5)"
    );
}

#[test]
fn test_deserialized_collections_are_validated_on_demand() {
    let json = r#"[
        {"column": "age", "operator": "between", "operands": [1]},
        {"combinator": "not", "children": []}
    ]"#;
    let filters: FilterCollection = serde_json::from_str(json).unwrap();
    assert_eq!(filters.len(), 2);
    assert!(matches!(filters.validate(), Err(SyntaxError::Arity { .. })));

    let ok: FilterCollection =
        serde_json::from_str(r#"[{"column": "deleted_at", "operator": "isnull"}]"#).unwrap();
    assert!(ok.validate().is_ok());
    assert_eq!(ok.to_string(), "deleted_at:isnull()");
}

#[test]
fn test_json_round_trip_keeps_structure() {
    let filters = parse_filters("and(a:in(1,2),not(b:startswith(x)))").unwrap();
    let json = serde_json::to_value(&filters).unwrap();
    let back: FilterCollection = serde_json::from_value(json).unwrap();
    assert_eq!(back, filters);
}

#[test]
fn test_collection_iteration_order() {
    let filters: FilterCollection = vec![
        FilterCriterion::eq("b", 2).unwrap(),
        FilterCriterion::eq("a", Literal::from("1")).unwrap(),
    ]
    .into();
    let columns: Vec<String> = filters
        .iter()
        .filter_map(FilterCriterion::as_condition)
        .map(|c| c.column.to_string())
        .collect();
    assert_eq!(columns, vec!["b", "a"]);

    let sorts: SortCollection = "z:asc,y:desc".parse().unwrap();
    let keys: Vec<String> = (&sorts).into_iter().map(|s| s.to_string()).collect();
    assert_eq!(keys, vec!["z:asc", "y:desc"]);
}
