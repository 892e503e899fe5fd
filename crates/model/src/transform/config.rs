use crate::transform::{
    error::MappingError,
    mapping::{CastMappingTable, ColumnMappingBuilder},
    transforms::ValueTransform,
};
use criteria_syntax::Operator;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use tracing::info;

/// Declarative form of a [`CastMappingTable`], loaded from JSON:
///
/// ```json
/// {
///   "exclude_unmapped": true,
///   "columns": {
///     "age": "yearsOld",
///     "name": { "target": "profile.fullName", "transform": { "type": "lowercase" } }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub exclude_unmapped: bool,
    pub columns: BTreeMap<String, ColumnTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnTarget {
    Column(String),
    Detailed {
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<Operator>,
        #[serde(default)]
        reverse_sort: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<ValueTransform>,
    },
}

impl MappingConfig {
    pub fn from_json(text: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            columns = config.columns.len(),
            exclude_unmapped = config.exclude_unmapped,
            "Loaded mapping config"
        );
        Ok(config)
    }

    pub fn to_table(&self) -> Result<CastMappingTable, MappingError> {
        let builder = self
            .columns
            .iter()
            .fold(CastMappingTable::builder(), |builder, (source, target)| {
                match target {
                    ColumnTarget::Column(target) => builder.map(source, target),
                    ColumnTarget::Detailed {
                        target,
                        operator,
                        reverse_sort,
                        transform,
                    } => builder.map_with(source, target, |m| {
                        configure(m, *operator, *reverse_sort, transform.clone())
                    }),
                }
            });

        builder.exclude_unmapped(self.exclude_unmapped).build()
    }
}

fn configure(
    mut mapping: ColumnMappingBuilder,
    operator: Option<Operator>,
    reverse_sort: bool,
    transform: Option<ValueTransform>,
) -> ColumnMappingBuilder {
    if let Some(operator) = operator {
        mapping = mapping.operator(operator);
    }
    if reverse_sort {
        mapping = mapping.reverse_sort();
    }
    if let Some(transform) = transform {
        mapping = mapping.value_transform(transform);
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use criteria_syntax::{ColumnPath, parse_filters, parse_sorts};

    const CONFIG: &str = r#"{
        "exclude_unmapped": true,
        "columns": {
            "age": "yearsOld",
            "name": {
                "target": "profile.fullName",
                "operator": "contains",
                "transform": { "type": "lowercase" }
            },
            "rank": { "target": "position", "reverse_sort": true },
            "status": {
                "target": "state",
                "transform": { "type": "lookup", "values": { "active": "A" } }
            }
        }
    }"#;

    #[test]
    fn test_config_builds_table() {
        let config = MappingConfig::from_json(CONFIG).unwrap();
        assert!(config.exclude_unmapped);
        assert_eq!(config.columns.len(), 4);

        let table = config.to_table().unwrap();
        assert_eq!(
            table.target_for(&ColumnPath::parse("age").unwrap()),
            Some(&ColumnPath::parse("yearsOld").unwrap())
        );

        let filters = parse_filters("name:eq(JOHN),status:active,email:isnull()").unwrap();
        assert_eq!(
            table.rewrite_filters(&filters).to_string(),
            "profile.fullName:contains(john),state:eq(A)"
        );

        let sorts = parse_sorts("rank:asc,age:desc").unwrap();
        assert_eq!(table.rewrite_sorts(&sorts).to_string(), "position:desc,yearsOld:desc");
    }

    #[test]
    fn test_config_defaults_and_errors() {
        let empty = MappingConfig::from_json("{}").unwrap();
        assert!(!empty.exclude_unmapped);
        assert!(empty.to_table().unwrap().is_empty());

        assert!(matches!(
            MappingConfig::from_json(r#"{"columns": {"a": 5}}"#),
            Err(MappingError::Json(_))
        ));

        let bad_target = MappingConfig::from_json(r#"{"columns": {"a": "b..c"}}"#).unwrap();
        assert!(matches!(
            bad_target.to_table(),
            Err(MappingError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = MappingConfig::from_file("/nonexistent/mapping.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mapping.json"));
    }
}
