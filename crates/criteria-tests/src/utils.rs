#![allow(dead_code)]

use crate::{Employee, User};
use criteria_engine::CompiledQuery;
use model::shape::resolver::PathResolver;
use serde_json::Value as Json;

pub fn employee_resolver() -> PathResolver<Employee> {
    PathResolver::for_record()
}

pub fn user_resolver() -> PathResolver<User> {
    PathResolver::for_record()
}

pub fn names<'a>(employees: impl IntoIterator<Item = &'a Employee>) -> Vec<&'a str> {
    employees.into_iter().map(|e| e.name.as_str()).collect()
}

/// Runs filter and sort text against the employees and returns matching names in order.
pub fn query_names(records: &[Employee], filters: &str, sorts: &str) -> Vec<String> {
    let resolver = employee_resolver();
    let query = CompiledQuery::compile_str(filters, sorts, &resolver)
        .unwrap_or_else(|err| panic!("query '{filters}' / '{sorts}' failed: {err}"));
    query
        .apply(records)
        .into_iter()
        .map(|e| e.name.clone())
        .collect()
}

pub fn json_names(records: &[&Json]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get("name").and_then(Json::as_str))
        .map(str::to_string)
        .collect()
}

pub fn assert_send_sync<T: Send + Sync>() {}
