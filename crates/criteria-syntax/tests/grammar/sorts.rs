use criteria_syntax::{SortDirection, SyntaxError, parse_sorts};

#[test]
fn test_parse_sort_keys_in_order() {
    let sorts = parse_sorts("salary:desc, name:asc").unwrap();
    assert_eq!(sorts.len(), 2);
    assert_eq!(sorts.criteria()[0].column.to_string(), "salary");
    assert_eq!(sorts.criteria()[0].direction, SortDirection::Descending);
    assert_eq!(sorts.criteria()[1].column.to_string(), "name");
    assert_eq!(sorts.criteria()[1].direction, SortDirection::Ascending);
}

#[test]
fn test_parse_long_direction_names() {
    let sorts = parse_sorts("address.city:Descending,age:ASCENDING").unwrap();
    assert_eq!(sorts.to_string(), "address.city:desc,age:asc");
}

#[test]
fn test_duplicate_sort_keys_are_kept() {
    let sorts = parse_sorts("name:asc,name:desc").unwrap();
    assert_eq!(sorts.len(), 2);
}

#[test]
fn test_sort_errors() {
    assert!(matches!(
        parse_sorts("name:sideways"),
        Err(SyntaxError::UnknownDirection { .. })
    ));
    assert!(matches!(
        parse_sorts("name"),
        Err(SyntaxError::Malformed { .. })
    ));
    assert!(matches!(
        parse_sorts("name:asc,,age:desc"),
        Err(SyntaxError::EmptyCriterion { .. })
    ));
    assert!(parse_sorts("").unwrap().is_empty());
}
