use crate::error::CliError;
use criteria_syntax::{FilterCollection, SortCollection};
use serde::Serialize;
use serde_json::Value as Json;

#[derive(Serialize)]
pub struct CastOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<&'a FilterCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<&'a SortCollection>,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

/// Canonical text and fingerprint, one `label: value` pair per line.
pub fn describe(label: &str, canonical: &str, fingerprint: &str) -> String {
    format!("{label}: {canonical}\nfingerprint: {fingerprint}")
}

pub async fn write_records(records: &[Json], path: Option<String>) -> Result<(), CliError> {
    let json = to_json(records)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}
