use criteria_syntax::{FilterCollection, FilterCriterion, SortCollection, parse_filters, parse_sorts};

const FILTERS: &[&str] = &[
    "age:gte(25)",
    "name:John",
    "status:in(active,pending),age:between(18,65)",
    "or(age:lt(18),age:gt(65)),not(email:isnull())",
    "and(status:active,or(a.b.c:ne(1),not(x:notbetween(1,2))))",
    r"title:contains(a\,b),note:eq(\ padded\ ),path:eq(C:\\tmp)",
    "name:John (Jr),time:10:30",
    "AND(a:EQ(1),b:StartsWith(x))",
    "tags:nin(a,b,c), deleted_at:isnotnull()",
];

#[test]
fn test_filter_round_trip() {
    for input in FILTERS {
        let parsed = parse_filters(input).unwrap();
        let reparsed = parse_filters(&parsed.to_string()).unwrap();
        assert_eq!(reparsed, parsed, "round trip failed for {input}");
    }
}

#[test]
fn test_canonical_text_is_stable() {
    for input in FILTERS {
        let canonical = parse_filters(input).unwrap().to_string();
        let again = parse_filters(&canonical).unwrap().to_string();
        assert_eq!(again, canonical);
    }
}

#[test]
fn test_canonical_forms() {
    let filters = parse_filters("name:John , x:ISNULL()").unwrap();
    assert_eq!(filters.to_string(), "name:eq(John),x:isnull()");

    let escaped = parse_filters(r"title:contains(f\(x\))").unwrap();
    assert_eq!(escaped.to_string(), r"title:contains(f\(x\))");
}

#[test]
fn test_sort_round_trip() {
    for input in ["salary:desc,name:asc", "a.b:ASC", "x:descending, y:ascending"] {
        let parsed = parse_sorts(input).unwrap();
        assert_eq!(parse_sorts(&parsed.to_string()).unwrap(), parsed);
    }
}

#[test]
fn test_single_criterion_from_str() {
    let criterion: FilterCriterion = "or(a:1,b:2)".parse().unwrap();
    assert_eq!(criterion.to_string(), "or(a:eq(1),b:eq(2))");

    assert!("a:1,b:2".parse::<FilterCriterion>().is_err());
    assert!("".parse::<FilterCriterion>().is_err());
}

#[test]
fn test_collections_from_str() {
    let filters: FilterCollection = "a:1".parse().unwrap();
    let sorts: SortCollection = "a:desc".parse().unwrap();
    assert_eq!(filters.len(), 1);
    assert_eq!(sorts.len(), 1);
}
