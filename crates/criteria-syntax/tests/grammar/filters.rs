use criteria_syntax::{
    Combinator, FilterCriterion, Literal, Operator, ParseOptions, parse_filters,
    parse_filters_with,
};

fn texts(values: &[&str]) -> Vec<Literal> {
    values.iter().map(|v| Literal::from(*v)).collect()
}

#[test]
fn test_parse_single_condition() {
    let filters = parse_filters("age:gte(25)").unwrap();
    assert_eq!(filters.len(), 1);

    let condition = filters.criteria()[0].as_condition().unwrap();
    assert_eq!(condition.column.to_string(), "age");
    assert_eq!(condition.operator, Operator::GreaterThanOrEqual);
    assert_eq!(condition.operands, texts(&["25"]));
}

#[test]
fn test_parse_simplified_equality() {
    let filters = parse_filters("name:John, time:10:30").unwrap();
    let name = filters.criteria()[0].as_condition().unwrap();
    assert_eq!(name.operator, Operator::Equal);
    assert_eq!(name.operands, texts(&["John"]));

    let time = filters.criteria()[1].as_condition().unwrap();
    assert_eq!(time.column.to_string(), "time");
    assert_eq!(time.operands, texts(&["10:30"]));
}

#[test]
fn test_parse_multi_value_operators() {
    let filters =
        parse_filters("status:in(active, pending ,closed),age:between(18,65),x:isnull()").unwrap();

    let status = filters.criteria()[0].as_condition().unwrap();
    assert_eq!(status.operator, Operator::In);
    assert_eq!(status.operands, texts(&["active", "pending", "closed"]));

    let age = filters.criteria()[1].as_condition().unwrap();
    assert_eq!(age.operator, Operator::Between);
    assert_eq!(age.operands, texts(&["18", "65"]));

    let x = filters.criteria()[2].as_condition().unwrap();
    assert_eq!(x.operator, Operator::IsNull);
    assert!(x.operands.is_empty());
}

#[test]
fn test_parse_keywords_case_insensitively() {
    let filters = parse_filters("OR(age:LT(18),age:Gt(65)),Not(name:IsNull())").unwrap();
    assert_eq!(
        filters.to_string(),
        "or(age:lt(18),age:gt(65)),not(name:isnull())"
    );
}

#[test]
fn test_parse_nested_groups() {
    let filters =
        parse_filters("and(status:active,or(age:lt(18),not(address.city:eq(Paris))))").unwrap();
    assert_eq!(filters.len(), 1);

    let FilterCriterion::Group(and) = &filters.criteria()[0] else {
        panic!("expected a group");
    };
    assert_eq!(and.combinator, Combinator::And);
    assert_eq!(and.children.len(), 2);

    let FilterCriterion::Group(or) = &and.children[1] else {
        panic!("expected a nested group");
    };
    assert_eq!(or.combinator, Combinator::Or);

    let FilterCriterion::Group(not) = &or.children[1] else {
        panic!("expected a not group");
    };
    let city = not.children[0].as_condition().unwrap();
    assert_eq!(city.column.segments(), ["address", "city"]);
}

#[test]
fn test_parse_escaped_operands() {
    let filters = parse_filters(r"title:contains(a\,b),name:O\(Brien\),note:eq(\ padded\ )").unwrap();
    assert_eq!(
        filters.criteria()[0].as_condition().unwrap().operands,
        texts(&["a,b"])
    );
    assert_eq!(
        filters.criteria()[1].as_condition().unwrap().operands,
        texts(&["O(Brien)"])
    );
    assert_eq!(
        filters.criteria()[2].as_condition().unwrap().operands,
        texts(&[" padded "])
    );
}

#[test]
fn test_value_with_parentheses_is_plain_text() {
    let filters = parse_filters("name:John (Jr)").unwrap();
    let name = filters.criteria()[0].as_condition().unwrap();
    assert_eq!(name.operator, Operator::Equal);
    assert_eq!(name.operands, texts(&["John (Jr)"]));
}

#[test]
fn test_column_named_like_combinator_is_a_condition() {
    let filters = parse_filters("and:eq(1)").unwrap();
    let condition = filters.criteria()[0].as_condition().unwrap();
    assert_eq!(condition.column.to_string(), "and");
}

#[test]
fn test_empty_input_yields_empty_collection() {
    assert!(parse_filters("").unwrap().is_empty());
    assert!(parse_filters("   ").unwrap().is_empty());
}

#[test]
fn test_depth_limit() {
    let options = ParseOptions {
        max_depth: 2,
        ..ParseOptions::default()
    };
    assert!(parse_filters_with("and(or(a:1))", &options).is_ok());
    assert!(parse_filters_with("and(or(not(a:1)))", &options).is_err());

    let deep = format!("{}a:1{}", "not(".repeat(40), ")".repeat(40));
    assert!(parse_filters(&deep).is_err());
}
