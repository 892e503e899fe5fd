//! Runtime shape for `serde_json::Value` records.
//!
//! Shapes come from a fluent builder, a JSON schema document or inference over
//! sample records. Schema documents map member names to a kind name or a nested
//! object; a trailing `?` on either the key or the kind marks the member optional:
//!
//! ```json
//! { "name": "string", "age": "integer?", "address?": { "city": "string" } }
//! ```

use crate::{
    core::{coercion::parse_datetime, kind::ValueKind, value::Value},
    shape::{
        Hop, Member, ShapeDescriptor, NestedShape,
        error::ShapeError,
        hop,
    },
};
use serde_json::{Map, Value as Json};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
enum JsonMember {
    Field { kind: ValueKind, optional: bool },
    Nested { shape: Arc<JsonShape>, optional: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonShape {
    name: String,
    members: BTreeMap<String, JsonMember>,
}

impl JsonShape {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: &str, kind: ValueKind) -> Self {
        self.members.insert(
            name.to_string(),
            JsonMember::Field {
                kind,
                optional: false,
            },
        );
        self
    }

    pub fn optional_field(mut self, name: &str, kind: ValueKind) -> Self {
        self.members.insert(
            name.to_string(),
            JsonMember::Field {
                kind,
                optional: true,
            },
        );
        self
    }

    pub fn nested(mut self, name: &str, shape: JsonShape) -> Self {
        self.members.insert(
            name.to_string(),
            JsonMember::Nested {
                shape: Arc::new(shape),
                optional: false,
            },
        );
        self
    }

    pub fn optional_nested(mut self, name: &str, shape: JsonShape) -> Self {
        self.members.insert(
            name.to_string(),
            JsonMember::Nested {
                shape: Arc::new(shape),
                optional: true,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Builds a shape from a schema document.
    pub fn from_schema(name: &str, schema: &Json) -> Result<Self, ShapeError> {
        let Json::Object(entries) = schema else {
            return Err(ShapeError::InvalidSchema {
                key: name.to_string(),
                reason: "a shape must be a JSON object".to_string(),
            });
        };

        let mut shape = JsonShape::new(name);
        for (raw_key, entry) in entries {
            let (key, key_optional) = strip_optional(raw_key);
            match entry {
                Json::String(kind_name) => {
                    let (kind_name, kind_optional) = strip_optional(kind_name);
                    let kind = ValueKind::from_name(kind_name).ok_or_else(|| {
                        ShapeError::InvalidSchema {
                            key: raw_key.clone(),
                            reason: format!("unknown value kind '{kind_name}'"),
                        }
                    })?;
                    shape = if key_optional || kind_optional {
                        shape.optional_field(key, kind)
                    } else {
                        shape.field(key, kind)
                    };
                }
                Json::Object(_) => {
                    let nested = JsonShape::from_schema(key, entry)?;
                    shape = if key_optional {
                        shape.optional_nested(key, nested)
                    } else {
                        shape.nested(key, nested)
                    };
                }
                other => {
                    return Err(ShapeError::InvalidSchema {
                        key: raw_key.clone(),
                        reason: format!("expected a kind name or an object, found {other}"),
                    });
                }
            }
        }

        Ok(shape)
    }

    pub fn from_schema_str(name: &str, schema: &str) -> Result<Self, ShapeError> {
        let schema: Json = serde_json::from_str(schema)?;
        Self::from_schema(name, &schema)
    }

    /// Infers a shape from sample records.
    ///
    /// Members missing from some records or holding `null` are optional. Integer and
    /// float samples widen to float; strings that all parse as date/times become
    /// date/times. Conflicting kinds fall back to string.
    pub fn infer(name: &str, records: &[Json]) -> Self {
        let objects: Vec<&Map<String, Json>> = records.iter().filter_map(Json::as_object).collect();
        let shape = infer_objects(name, &objects);
        debug!(shape = name, members = shape.len(), samples = objects.len(), "Inferred JSON shape");
        shape
    }
}

fn strip_optional(text: &str) -> (&str, bool) {
    match text.strip_suffix('?') {
        Some(stripped) => (stripped.trim(), true),
        None => (text.trim(), false),
    }
}

fn infer_objects(name: &str, objects: &[&Map<String, Json>]) -> JsonShape {
    let mut keys: Vec<&String> = objects.iter().flat_map(|o| o.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut shape = JsonShape::new(name);
    for key in keys {
        let values: Vec<&Json> = objects.iter().filter_map(|o| o.get(key.as_str())).collect();
        let present: Vec<&Json> = values.iter().copied().filter(|v| !v.is_null()).collect();
        let optional = present.len() < objects.len();

        if present.iter().all(|v| v.is_object()) && !present.is_empty() {
            let nested: Vec<&Map<String, Json>> =
                present.iter().filter_map(|v| v.as_object()).collect();
            let inner = infer_objects(key, &nested);
            shape = if optional {
                shape.optional_nested(key, inner)
            } else {
                shape.nested(key, inner)
            };
            continue;
        }

        let kind = infer_kind(key, &present);
        shape = if optional {
            shape.optional_field(key, kind)
        } else {
            shape.field(key, kind)
        };
    }

    shape
}

fn infer_kind(key: &str, values: &[&Json]) -> ValueKind {
    let mut kind: Option<ValueKind> = None;

    for value in values {
        let next = match value {
            Json::Bool(_) => ValueKind::Boolean,
            Json::Number(n) if n.is_i64() => ValueKind::Integer,
            Json::Number(_) => ValueKind::Float,
            Json::String(s) if parse_datetime(s).is_some() => ValueKind::DateTime,
            Json::String(_) => ValueKind::String,
            _ => {
                warn!(member = key, "Member mixes objects or arrays with scalars, reading it as string");
                ValueKind::String
            }
        };

        kind = Some(match (kind, next) {
            (None, next) => next,
            (Some(prev), next) if prev == next => prev,
            (Some(ValueKind::Integer), ValueKind::Float)
            | (Some(ValueKind::Float), ValueKind::Integer) => ValueKind::Float,
            _ => ValueKind::String,
        });
    }

    kind.unwrap_or(ValueKind::String)
}

/// Reads a JSON scalar as a value of `kind`.
///
/// `null`, mismatched JSON types and undeclared enum variants are absent.
pub fn read_json(json: &Json, kind: &ValueKind) -> Option<Value> {
    match kind {
        ValueKind::String => match json {
            Json::String(s) => Some(Value::String(s.clone())),
            Json::Number(n) => Some(Value::String(n.to_string())),
            Json::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        ValueKind::Integer => json.as_i64().map(Value::Int),
        ValueKind::Float => json.as_f64().filter(|v| !v.is_nan()).map(Value::Float),
        ValueKind::Boolean => json.as_bool().map(Value::Boolean),
        ValueKind::DateTime => json.as_str().and_then(parse_datetime).map(Value::DateTime),
        ValueKind::Enum(variants) => json
            .as_str()
            .and_then(|s| kind.variant_index(s))
            .and_then(|idx| variants.get(idx).cloned())
            .map(Value::Enum),
    }
}

impl ShapeDescriptor<Json> for JsonShape {
    fn name(&self) -> &str {
        &self.name
    }

    fn member(&self, segment: &str) -> Option<Member<Json>> {
        let key = segment.to_string();
        match self.members.get(segment)? {
            JsonMember::Field { kind, optional } => {
                let read_kind = kind.clone();
                Some(Member::Field {
                    kind: kind.clone(),
                    optional: *optional,
                    read: Arc::new(move |record: &Json| {
                        record.get(&key).and_then(|v| read_json(v, &read_kind))
                    }),
                })
            }
            JsonMember::Nested { shape, optional } => {
                let get = hop(move |record: &Json| record.get(&key).filter(|v| v.is_object()));
                let nested: Arc<dyn NestedShape<Json>> =
                    Arc::new(Hop::new(get, Arc::clone(shape) as Arc<dyn ShapeDescriptor<Json>>));
                Some(Member::Nested {
                    optional: *optional,
                    shape: nested,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{error::ResolveError, resolver::resolve};
    use criteria_syntax::ColumnPath;
    use serde_json::json;

    fn path(text: &str) -> ColumnPath {
        ColumnPath::parse(text).unwrap()
    }

    #[test]
    fn test_builder_shape_reads_nested_values() {
        let shape = JsonShape::new("employee")
            .field("name", ValueKind::String)
            .optional_nested("address", JsonShape::new("address").field("city", ValueKind::String));

        let accessor = resolve(&shape, &path("address.city")).unwrap();
        assert!(accessor.is_nullable());

        let record = json!({"name": "Alice", "address": {"city": "Oslo"}});
        assert_eq!(accessor.read(&record), Some(Value::from("Oslo")));
        assert_eq!(accessor.read(&json!({"name": "Bob"})), None);
        assert_eq!(accessor.read(&json!({"address": null})), None);
    }

    #[test]
    fn test_schema_document() {
        let shape = JsonShape::from_schema_str(
            "employee",
            r#"{
                "name": "string",
                "age": "integer?",
                "level": "enum(Junior|Senior)",
                "address?": { "city": "string" }
            }"#,
        )
        .unwrap();

        let age = resolve(&shape, &path("age")).unwrap();
        assert!(age.is_nullable());
        assert_eq!(age.kind(), &ValueKind::Integer);

        let level = resolve(&shape, &path("level")).unwrap();
        assert_eq!(
            level.read(&json!({"level": "senior"})),
            Some(Value::Enum("Senior".to_string()))
        );

        assert!(resolve(&shape, &path("address.city")).unwrap().is_nullable());
        assert!(matches!(
            resolve(&shape, &path("address.zip")),
            Err(ResolveError::UnknownPath { .. })
        ));
    }

    #[test]
    fn test_schema_rejects_unknown_kinds() {
        let err = JsonShape::from_schema_str("x", r#"{"blob": "bytes"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown value kind 'bytes'"));
        assert!(JsonShape::from_schema_str("x", r#"{"n": 1}"#).is_err());
        assert!(JsonShape::from_schema_str("x", "[]").is_err());
    }

    #[test]
    fn test_infer_from_samples() {
        let records = vec![
            json!({"name": "Alice", "salary": 55000, "hired": "2020-01-15", "address": {"city": "Oslo"}}),
            json!({"name": "Bob", "salary": 60000.5, "hired": "2019-03-01", "manager": null}),
        ];
        let shape = JsonShape::infer("employee", &records);

        let salary = resolve(&shape, &path("salary")).unwrap();
        assert_eq!(salary.kind(), &ValueKind::Float);
        assert!(!salary.is_nullable());

        let hired = resolve(&shape, &path("hired")).unwrap();
        assert_eq!(hired.kind(), &ValueKind::DateTime);

        assert!(resolve(&shape, &path("address.city")).unwrap().is_nullable());
        assert!(resolve(&shape, &path("manager")).unwrap().is_nullable());
    }

    #[test]
    fn test_mismatched_json_types_are_absent() {
        let shape = JsonShape::new("r").field("age", ValueKind::Integer);
        let age = resolve(&shape, &path("age")).unwrap();
        assert_eq!(age.read(&json!({"age": "thirty"})), None);
        assert_eq!(age.read(&json!({"age": 30})), Some(Value::Int(30)));
    }

    #[test]
    fn test_undeclared_variant_is_absent() {
        let shape =
            JsonShape::new("r").field("level", ValueKind::enumeration(["Junior", "Senior"]));
        let level = resolve(&shape, &path("level")).unwrap();
        assert_eq!(
            level.read(&json!({"level": "senior"})),
            Some(Value::Enum("Senior".to_string()))
        );
        assert_eq!(level.read(&json!({"level": "Principal"})), None);
    }
}
